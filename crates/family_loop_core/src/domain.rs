//! crates/family_loop_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database; the serde derives only
//! describe their JSON shape at the service boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

//=========================================================================================
// Relationship and Group
//=========================================================================================

/// The relationship label assigned to a contact by the classifier.
///
/// Declaration order matches the lexicon's iteration order, with the
/// default `Contact` last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Mother,
    Father,
    Uncle,
    Aunt,
    Sister,
    Brother,
    Grandmother,
    Grandfather,
    Cousin,
    Work,
    Friend,
    #[default]
    Contact,
}

impl Relationship {
    pub const ALL: [Relationship; 12] = [
        Relationship::Mother,
        Relationship::Father,
        Relationship::Uncle,
        Relationship::Aunt,
        Relationship::Sister,
        Relationship::Brother,
        Relationship::Grandmother,
        Relationship::Grandfather,
        Relationship::Cousin,
        Relationship::Work,
        Relationship::Friend,
        Relationship::Contact,
    ];

    /// The coarser bucket this relationship belongs to.
    pub fn group(self) -> Group {
        match self {
            Relationship::Mother
            | Relationship::Father
            | Relationship::Uncle
            | Relationship::Aunt
            | Relationship::Sister
            | Relationship::Brother
            | Relationship::Grandmother
            | Relationship::Grandfather
            | Relationship::Cousin => Group::Family,
            Relationship::Work => Group::Work,
            Relationship::Friend => Group::Friends,
            Relationship::Contact => Group::Contacts,
        }
    }

    pub fn is_family(self) -> bool {
        self.group() == Group::Family
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::Mother => "Mother",
            Relationship::Father => "Father",
            Relationship::Uncle => "Uncle",
            Relationship::Aunt => "Aunt",
            Relationship::Sister => "Sister",
            Relationship::Brother => "Brother",
            Relationship::Grandmother => "Grandmother",
            Relationship::Grandfather => "Grandfather",
            Relationship::Cousin => "Cousin",
            Relationship::Work => "Work",
            Relationship::Friend => "Friend",
            Relationship::Contact => "Contact",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relationship::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::unknown("relationship", s))
    }
}

/// The display bucket a contact is grouped under.
///
/// `Ord` follows declaration order, which is the order groups are listed in
/// a grouped view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Family,
    Work,
    Friends,
    Contacts,
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Family => "Family",
            Group::Work => "Work",
            Group::Friends => "Friends",
            Group::Contacts => "Contacts",
        }
    }

    /// Badge color shown next to contacts of this group.
    pub fn color(self) -> &'static str {
        match self {
            Group::Family => "#ff6b6b",
            Group::Work => "#4ecdc4",
            Group::Friends => "#45b7d1",
            Group::Contacts => "#96ceb4",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Contacts
//=========================================================================================

/// One entry as it arrives from the device address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_numbers: Option<Vec<String>>,
}

impl RawContact {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn phone_numbers(&self) -> &[String] {
        self.phone_numbers.as_deref().unwrap_or(&[])
    }
}

/// A device contact after classification.
///
/// Staleness (`last_interaction_at`, `days_since_contact`) is not stored here;
/// it is derived from the interaction log each time a view is ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: Option<String>,
    pub phone_numbers: Vec<String>,
    pub relationship: Relationship,
    pub group: Group,
}

impl Contact {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

//=========================================================================================
// Interactions
//=========================================================================================

/// How the user got in touch with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    Call,
    Text,
    InPerson,
    VideoCall,
    Other,
}

impl InteractionType {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Call => "call",
            InteractionType::Text => "text",
            InteractionType::InPerson => "in-person",
            InteractionType::VideoCall => "video-call",
            InteractionType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionType::Call => "Phone Call",
            InteractionType::Text => "Text/Message",
            InteractionType::InPerson => "In Person",
            InteractionType::VideoCall => "Video Call",
            InteractionType::Other => "Other",
        }
    }
}

impl FromStr for InteractionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(InteractionType::Call),
            "text" => Ok(InteractionType::Text),
            "in-person" => Ok(InteractionType::InPerson),
            "video-call" => Ok(InteractionType::VideoCall),
            "other" => Ok(InteractionType::Other),
            _ => Err(CoreError::unknown("interaction type", s)),
        }
    }
}

/// A user-logged record of contacting someone. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub contact_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

//=========================================================================================
// Communication Goals
//=========================================================================================

/// How often the user wants to be in touch with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalFrequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "every-3-days")]
    EveryThreeDays,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
}

/// Which interaction types count towards a goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMethod {
    #[default]
    Any,
    Call,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationGoal {
    pub id: Uuid,
    pub contact_id: String,
    pub contact_name: String,
    pub frequency: GoalFrequency,
    pub method: GoalMethod,
    pub is_active: bool,
    pub custom_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Family Events
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Birthday,
    Anniversary,
    Wedding,
    Graduation,
    Custom,
}

/// A dated occasion tied to a contact, optionally recurring every year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyEvent {
    pub id: Uuid,
    pub contact_id: String,
    pub contact_name: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub title: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub reminder_days: Vec<u32>,
    pub notes: Option<String>,
    pub last_wished: Option<DateTime<Utc>>,
    pub is_active: bool,
}

//=========================================================================================
// Users
//=========================================================================================

// Identity comes from the external provider; we only keep the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_relationships_map_to_family_group() {
        for r in Relationship::ALL {
            let expected = match r {
                Relationship::Work => Group::Work,
                Relationship::Friend => Group::Friends,
                Relationship::Contact => Group::Contacts,
                _ => Group::Family,
            };
            assert_eq!(r.group(), expected, "{r}");
        }
    }

    #[test]
    fn relationship_parses_its_own_label() {
        for r in Relationship::ALL {
            assert_eq!(r.as_str().parse::<Relationship>().unwrap(), r);
        }
        assert!("mother".parse::<Relationship>().is_err());
    }

    #[test]
    fn interaction_type_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&InteractionType::VideoCall).unwrap();
        assert_eq!(json, "\"video-call\"");
        assert_eq!(
            "in-person".parse::<InteractionType>().unwrap(),
            InteractionType::InPerson
        );
    }

    #[test]
    fn raw_contact_tolerates_missing_fields() {
        let raw: RawContact = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(raw.display_name(), "");
        assert!(raw.phone_numbers().is_empty());
    }
}
