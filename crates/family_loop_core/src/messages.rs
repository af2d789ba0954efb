//! crates/family_loop_core/src/messages.rs
//!
//! Template-based "reach out" message suggestions.

use serde::{Deserialize, Serialize};

use crate::domain::Relationship;

/// The voice a suggested message is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Warm,
    Casual,
    Playful,
    #[default]
    Neutral,
}

impl Tone {
    /// Unrecognized tones fall back to `Neutral`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "warm" => Tone::Warm,
            "casual" => Tone::Casual,
            "playful" => Tone::Playful,
            _ => Tone::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Warm => "warm",
            Tone::Casual => "casual",
            Tone::Playful => "playful",
            Tone::Neutral => "neutral",
        }
    }
}

/// Everything a suggestion service needs to draft a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub name: String,
    pub relationship: Relationship,
    pub tone: Tone,
    /// `None` when the contact has never been contacted.
    pub days_since_contact: Option<i64>,
}

fn opener(days_since_contact: Option<i64>) -> &'static str {
    match days_since_contact {
        None => "It's been a while!",
        Some(d) if d > 30 => "It's been a while!",
        Some(d) if d > 14 => "Just checking in.",
        Some(_) => "Thinking of you.",
    }
}

/// Drafts a short message from fixed templates.
pub fn suggest_message(request: &MessageRequest) -> String {
    let name = &request.name;
    let opener = opener(request.days_since_contact);
    match request.tone {
        Tone::Warm => format!("Hey {name}, {opener} I hope everything is going great."),
        Tone::Casual => format!("Hey {name}, {opener} How's it going?"),
        Tone::Playful => format!("Yo {name}! {opener} What's new?"),
        Tone::Neutral => format!("Hi {name}, {opener} Wanted to reach out."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tone: Tone, days: Option<i64>) -> MessageRequest {
        MessageRequest {
            name: "Carol".into(),
            relationship: Relationship::Aunt,
            tone,
            days_since_contact: days,
        }
    }

    #[test]
    fn opener_follows_staleness() {
        assert_eq!(
            suggest_message(&request(Tone::Warm, Some(45))),
            "Hey Carol, It's been a while! I hope everything is going great."
        );
        assert_eq!(
            suggest_message(&request(Tone::Casual, Some(20))),
            "Hey Carol, Just checking in. How's it going?"
        );
        assert_eq!(
            suggest_message(&request(Tone::Playful, Some(14))),
            "Yo Carol! Thinking of you. What's new?"
        );
        assert_eq!(
            suggest_message(&request(Tone::Neutral, None)),
            "Hi Carol, It's been a while! Wanted to reach out."
        );
    }

    #[test]
    fn unknown_tone_is_neutral() {
        assert_eq!(Tone::from_label(" PLAYFUL "), Tone::Playful);
        assert_eq!(Tone::from_label("formal"), Tone::Neutral);
    }
}
