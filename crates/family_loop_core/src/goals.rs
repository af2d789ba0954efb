//! crates/family_loop_core/src/goals.rs
//!
//! Communication goals: "talk to Mom weekly" style targets and their status
//! against the interaction log.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{CommunicationGoal, Contact, GoalFrequency, GoalMethod, Interaction, InteractionType};
use crate::error::{CoreError, CoreResult};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

impl GoalFrequency {
    pub fn days(self) -> i64 {
        match self {
            GoalFrequency::Daily => 1,
            GoalFrequency::EveryThreeDays => 3,
            GoalFrequency::Weekly => 7,
            GoalFrequency::Monthly => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GoalFrequency::Daily => "daily",
            GoalFrequency::EveryThreeDays => "every-3-days",
            GoalFrequency::Weekly => "weekly",
            GoalFrequency::Monthly => "monthly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalFrequency::Daily => "Every day",
            GoalFrequency::EveryThreeDays => "Every 3 days",
            GoalFrequency::Weekly => "Weekly",
            GoalFrequency::Monthly => "Monthly",
        }
    }
}

impl FromStr for GoalFrequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(GoalFrequency::Daily),
            "every-3-days" => Ok(GoalFrequency::EveryThreeDays),
            "weekly" => Ok(GoalFrequency::Weekly),
            "monthly" => Ok(GoalFrequency::Monthly),
            _ => Err(CoreError::unknown("goal frequency", s)),
        }
    }
}

impl GoalMethod {
    /// Whether an interaction of `kind` counts towards a goal with this method.
    pub fn accepts(self, kind: InteractionType) -> bool {
        match self {
            GoalMethod::Any => true,
            GoalMethod::Call => matches!(kind, InteractionType::Call | InteractionType::VideoCall),
            GoalMethod::Text => kind == InteractionType::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GoalMethod::Any => "any",
            GoalMethod::Call => "call",
            GoalMethod::Text => "text",
        }
    }
}

impl FromStr for GoalMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(GoalMethod::Any),
            "call" => Ok(GoalMethod::Call),
            "text" => Ok(GoalMethod::Text),
            _ => Err(CoreError::unknown("goal method", s)),
        }
    }
}

impl CommunicationGoal {
    pub fn new(
        contact: &Contact,
        frequency: GoalFrequency,
        method: GoalMethod,
        custom_note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let name = contact.display_name();
        Self {
            id: Uuid::new_v4(),
            contact_id: contact.id.clone(),
            contact_name: if name.is_empty() { "Unknown".to_string() } else { name.to_string() },
            frequency,
            method,
            is_active: true,
            custom_note: custom_note
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: now,
        }
    }

    /// When the next contact is due, given the last qualifying interaction.
    pub fn next_due(&self, last: &Interaction) -> DateTime<Utc> {
        last.occurred_at + Duration::days(self.frequency.days())
    }
}

/// Where a goal stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GoalStatus {
    Inactive,
    NoContactYet,
    Overdue { days: i64 },
    DueToday,
    DueTomorrow,
    OnTrack { days: i64 },
}

impl GoalStatus {
    pub fn describe(self) -> String {
        match self {
            GoalStatus::Inactive => "Inactive".to_string(),
            GoalStatus::NoContactYet => "No contact yet".to_string(),
            GoalStatus::Overdue { days } => format!("{days} days overdue"),
            GoalStatus::DueToday => "Due today".to_string(),
            GoalStatus::DueTomorrow => "Due tomorrow".to_string(),
            GoalStatus::OnTrack { days } => format!("Due in {days} days"),
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            GoalStatus::Inactive | GoalStatus::NoContactYet => "#95a5a6",
            GoalStatus::Overdue { .. } => "#e74c3c",
            GoalStatus::DueToday | GoalStatus::DueTomorrow => "#f39c12",
            GoalStatus::OnTrack { .. } => "#27ae60",
        }
    }
}

fn latest_matching<'a>(
    goal: &CommunicationGoal,
    interactions: &'a [Interaction],
    accept: impl Fn(InteractionType) -> bool,
) -> Option<&'a Interaction> {
    interactions
        .iter()
        .filter(|i| i.contact_id == goal.contact_id && accept(i.kind))
        .fold(None, |best: Option<&Interaction>, i| match best {
            Some(b) if b.occurred_at >= i.occurred_at => Some(b),
            _ => Some(i),
        })
}

/// Whole days until `due`, rounded up.
fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (due - now).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Status of one goal, counting only interactions its method accepts.
pub fn goal_status(
    goal: &CommunicationGoal,
    interactions: &[Interaction],
    now: DateTime<Utc>,
) -> GoalStatus {
    if !goal.is_active {
        return GoalStatus::Inactive;
    }
    let Some(last) = latest_matching(goal, interactions, |kind| goal.method.accepts(kind)) else {
        return GoalStatus::NoContactYet;
    };

    match days_until(goal.next_due(last), now) {
        d if d < 0 => GoalStatus::Overdue { days: -d },
        0 => GoalStatus::DueToday,
        1 => GoalStatus::DueTomorrow,
        d => GoalStatus::OnTrack { days: d },
    }
}

/// Whether a goal needs attention now.
///
/// Unlike [`goal_status`], any interaction type with the contact resets the
/// clock here, and a goal with no interaction at all is due.
pub fn is_due(goal: &CommunicationGoal, interactions: &[Interaction], now: DateTime<Utc>) -> bool {
    if !goal.is_active {
        return false;
    }
    match latest_matching(goal, interactions, |_| true) {
        None => true,
        Some(last) => goal.next_due(last) <= now,
    }
}

/// Goals that are due, in their original order.
pub fn due_goals<'a>(
    goals: &'a [CommunicationGoal],
    interactions: &[Interaction],
    now: DateTime<Utc>,
) -> Vec<&'a CommunicationGoal> {
    goals
        .iter()
        .filter(|goal| is_due(goal, interactions, now))
        .collect()
}

/// Flips a goal between active and inactive.
pub fn toggle(goal: &mut CommunicationGoal) {
    goal.is_active = !goal.is_active;
}

/// Parses a frequency/method pair as sent by clients.
pub fn parse_goal_options(frequency: &str, method: Option<&str>) -> CoreResult<(GoalFrequency, GoalMethod)> {
    let frequency = frequency.parse()?;
    let method = method.map(str::parse).transpose()?.unwrap_or_default();
    Ok((frequency, method))
}
