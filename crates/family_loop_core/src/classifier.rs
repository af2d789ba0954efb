//! crates/family_loop_core/src/classifier.rs
//!
//! Maps a contact's display name to a relationship label by matching it
//! against a fixed lexicon of lowercase name fragments.
//!
//! The lexicon is scanned in declaration order and the first relationship
//! with a matching fragment wins, so a name like "Bro Manager" is a
//! `Brother`, not `Work`. All fragments are compiled once into a
//! `RegexSet`; the lowest matching set index is the earliest lexicon entry.
//!
//! Fragments match whole words by default. Plain substring matching is kept
//! as [`MatchMode::Substring`], but short fragments make it noisy: "spam"
//! contains "pa" (Father) and "manager" contains "ma" (Mother).

use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{Group, Relationship};
use crate::error::CoreError;

/// The relationship lexicon, in match-priority order.
pub const LEXICON: &[(Relationship, &[&str])] = &[
    (Relationship::Mother, &["mom", "mommy", "mama", "ma", "mother", "mum", "mummy"]),
    (
        Relationship::Father,
        &["dad", "daddy", "dada", "papa", "pa", "father", "pop", "pops"],
    ),
    (Relationship::Uncle, &["uncle", "unc", "tio"]),
    (Relationship::Aunt, &["aunt", "aunty", "auntie", "tia"]),
    (Relationship::Sister, &["sis", "sister"]),
    (Relationship::Brother, &["bro", "brother"]),
    (
        Relationship::Grandmother,
        &["grandma", "granny", "nana", "gram", "grandmother"],
    ),
    (Relationship::Grandfather, &["grandpa", "gramps", "grandfather"]),
    (Relationship::Cousin, &["cousin", "cuz"]),
    (
        Relationship::Work,
        &["customer", "support", "office", "manager", "company", "business", "hr", "boss"],
    ),
    (
        Relationship::Friend,
        &["buddy", "pal", "bestie", "bestfriend", "best-friend", "best friend"],
    ),
];

/// How a lexicon fragment has to appear in a name to count as a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Only as whole words: "Grandma" is a grandmother, "Pallavi" is nobody's pal.
    #[default]
    WholeWord,
    /// Anywhere in the name, including inside other words ("grandma" hits "ma").
    Substring,
}

impl FromStr for MatchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "whole-word" | "whole_word" | "word" => Ok(MatchMode::WholeWord),
            _ => Err(CoreError::unknown("match mode", s)),
        }
    }
}

static SUBSTRING_SET: Lazy<RegexSet> = Lazy::new(|| build_set(MatchMode::Substring));
static WHOLE_WORD_SET: Lazy<RegexSet> = Lazy::new(|| build_set(MatchMode::WholeWord));

fn build_set(mode: MatchMode) -> RegexSet {
    let patterns = LEXICON.iter().map(|(_, fragments)| {
        let alternation = fragments
            .iter()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");
        match mode {
            MatchMode::Substring => format!("(?:{alternation})"),
            MatchMode::WholeWord => format!(r"\b(?:{alternation})\b"),
        }
    });
    RegexSet::new(patterns).expect("lexicon fragments are escaped literals")
}

/// The outcome of classifying one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub relationship: Relationship,
    pub group: Group,
}

impl From<Relationship> for Classification {
    fn from(relationship: Relationship) -> Self {
        Self {
            relationship,
            group: relationship.group(),
        }
    }
}

/// A relationship classifier bound to one matching mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classifier {
    mode: MatchMode,
}

impl Classifier {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn detect_relationship(&self, name: &str) -> Relationship {
        if name.is_empty() {
            return Relationship::Contact;
        }
        let set: &RegexSet = match self.mode {
            MatchMode::Substring => &SUBSTRING_SET,
            MatchMode::WholeWord => &WHOLE_WORD_SET,
        };
        let lowered = name.to_lowercase();
        set.matches(&lowered)
            .iter()
            .next()
            .map(|index| LEXICON[index].0)
            .unwrap_or_default()
    }

    pub fn classify(&self, name: &str) -> Classification {
        self.detect_relationship(name).into()
    }
}

/// Classifies a name with the default whole-word policy.
pub fn classify(name: &str) -> Classification {
    Classifier::default().classify(name)
}

/// Detects a relationship with the default whole-word policy.
pub fn detect_relationship(name: &str) -> Relationship {
    Classifier::default().detect_relationship(name)
}
