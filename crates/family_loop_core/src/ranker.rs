//! crates/family_loop_core/src/ranker.rs
//!
//! Joins classified contacts with the interaction log and orders each group
//! so the contacts most in need of attention come first.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

use crate::domain::{Contact, Group, Interaction, InteractionType};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Sort key for a contact that has never been contacted. Sorts ahead of any
/// real day count.
pub const NEVER_CONTACTED: i64 = i64::MAX;

/// Whole days from `then` to `now`, rounded down.
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Staleness bucket shown next to each contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Recent,
    Week,
    Month,
    Overdue,
    #[serde(rename = "none")]
    NoContact,
}

impl UrgencyTier {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => UrgencyTier::NoContact,
            Some(d) if d <= 3 => UrgencyTier::Recent,
            Some(d) if d <= 7 => UrgencyTier::Week,
            Some(d) if d <= 30 => UrgencyTier::Month,
            Some(_) => UrgencyTier::Overdue,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            UrgencyTier::Recent => "#27ae60",
            UrgencyTier::Week => "#f39c12",
            UrgencyTier::Month => "#e67e22",
            UrgencyTier::Overdue => "#e74c3c",
            UrgencyTier::NoContact => "#95a5a6",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UrgencyTier::Recent => "Recent",
            UrgencyTier::Week => "This week",
            UrgencyTier::Month => "This month",
            UrgencyTier::Overdue => "Overdue",
            UrgencyTier::NoContact => "No contact yet",
        }
    }
}

/// Human-readable "last contacted" text.
pub fn describe_staleness(days: Option<i64>) -> String {
    match days {
        None => "No recent contact".to_string(),
        Some(d) if d <= 1 => "Today!".to_string(),
        Some(d) if d <= 30 => format!("{d} days ago"),
        Some(d) if d <= 365 => format!("{} months ago", d / 30),
        Some(d) => format!("{} years ago", d / 365),
    }
}

/// A contact annotated with everything the attention view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub group_color: &'static str,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub last_interaction_type: Option<InteractionType>,
    pub last_interaction_label: Option<&'static str>,
    pub last_interaction_note: Option<String>,
    pub days_since_contact: Option<i64>,
    pub urgency: UrgencyTier,
    pub urgency_color: &'static str,
    pub urgency_label: &'static str,
    pub last_contact_text: String,
}

impl RankedContact {
    fn new(contact: Contact, latest: Option<&Interaction>, now: DateTime<Utc>) -> Self {
        let days = latest.map(|i| days_between(i.occurred_at, now));
        let urgency = UrgencyTier::from_days(days);
        Self {
            group_color: contact.group.color(),
            contact,
            last_interaction_at: latest.map(|i| i.occurred_at),
            last_interaction_type: latest.map(|i| i.kind),
            last_interaction_label: latest.map(|i| i.kind.label()),
            last_interaction_note: latest.and_then(|i| i.note.clone()),
            days_since_contact: days,
            urgency,
            urgency_color: urgency.color(),
            urgency_label: urgency.label(),
            last_contact_text: describe_staleness(days),
        }
    }

    /// Larger means more urgent.
    pub fn urgency_key(&self) -> i64 {
        self.days_since_contact.unwrap_or(NEVER_CONTACTED)
    }
}

/// Contacts bucketed by group, each bucket ordered most-urgent first.
pub type GroupedView = BTreeMap<Group, Vec<RankedContact>>;

/// Most recent interaction per contact id. On equal timestamps the earlier
/// log entry is kept.
pub fn latest_interactions(interactions: &[Interaction]) -> HashMap<&str, &Interaction> {
    let mut latest: HashMap<&str, &Interaction> = HashMap::new();
    for interaction in interactions {
        latest
            .entry(interaction.contact_id.as_str())
            .and_modify(|current| {
                if interaction.occurred_at > current.occurred_at {
                    *current = interaction;
                }
            })
            .or_insert(interaction);
    }
    latest
}

/// Annotates every contact with its staleness and groups them for display.
///
/// Pure: the same contacts, log and `now` always produce the same view.
pub fn rank_and_group(
    contacts: &[Contact],
    interactions: &[Interaction],
    now: DateTime<Utc>,
) -> GroupedView {
    let latest = latest_interactions(interactions);

    let mut view = GroupedView::new();
    for contact in contacts {
        let ranked = RankedContact::new(
            contact.clone(),
            latest.get(contact.id.as_str()).copied(),
            now,
        );
        view.entry(contact.group).or_default().push(ranked);
    }

    // Stable sort: ties keep their input order.
    for members in view.values_mut() {
        members.sort_by_key(|c| Reverse(c.urgency_key()));
    }

    trace!(
        contacts = contacts.len(),
        interactions = interactions.len(),
        groups = view.len(),
        "Ranked contacts"
    );
    view
}
