//! crates/family_loop_core/src/interactions.rs
//!
//! The append-only interaction log. Logging an interaction is the only
//! mutation in the model; entries are never edited or removed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Contact, Interaction, InteractionType};
use crate::error::{CoreError, CoreResult};
use crate::ranker::{rank_and_group, GroupedView};

/// Longest note a user can attach to an interaction.
pub const MAX_NOTE_CHARS: usize = 100;

/// Trims a user note, turning blank input into `None`.
pub fn normalize_note(note: Option<&str>) -> CoreResult<Option<String>> {
    let Some(trimmed) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let len = trimmed.chars().count();
    if len > MAX_NOTE_CHARS {
        return Err(CoreError::NoteTooLong {
            len,
            max: MAX_NOTE_CHARS,
        });
    }
    Ok(Some(trimmed.to_string()))
}

impl Interaction {
    /// Builds a new record stamped at `now`.
    ///
    /// Ids are UUIDv7, so they carry their creation time.
    pub fn record(
        contact_id: impl Into<String>,
        kind: InteractionType,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        Ok(Self {
            id: Uuid::now_v7(),
            contact_id: contact_id.into(),
            kind,
            occurred_at: now,
            note: normalize_note(note)?,
        })
    }
}

/// An in-memory, creation-ordered interaction history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionLog {
    entries: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new interaction and returns it.
    pub fn log(
        &mut self,
        contact_id: impl Into<String>,
        kind: InteractionType,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<&Interaction> {
        self.entries.push(Interaction::record(contact_id, kind, note, now)?);
        match self.entries.last() {
            Some(logged) => Ok(logged),
            None => unreachable!("an entry was just pushed"),
        }
    }

    pub fn entries(&self) -> &[Interaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_contact<'a>(&'a self, contact_id: &'a str) -> impl Iterator<Item = &'a Interaction> {
        self.entries.iter().filter(move |i| i.contact_id == contact_id)
    }

    pub fn latest_for<'a>(&'a self, contact_id: &str) -> Option<&'a Interaction> {
        self.entries
            .iter()
            .filter(|i| i.contact_id == contact_id)
            .fold(None, |best: Option<&'a Interaction>, i| match best {
                Some(b) if b.occurred_at >= i.occurred_at => Some(b),
                _ => Some(i),
            })
    }

    /// Ranks `contacts` against the current log.
    pub fn rank(&self, contacts: &[Contact], now: DateTime<Utc>) -> GroupedView {
        rank_and_group(contacts, &self.entries, now)
    }
}

impl From<Vec<Interaction>> for InteractionLog {
    fn from(entries: Vec<Interaction>) -> Self {
        Self { entries }
    }
}
