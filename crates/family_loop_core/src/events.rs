//! crates/family_loop_core/src/events.rs
//!
//! Family events (birthdays, anniversaries, ...) and their reminder windows.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Contact, EventType, FamilyEvent};
use crate::error::{CoreError, CoreResult};

/// Reminder offsets a user can pick, in days before the event.
pub const REMINDER_OPTIONS: [u32; 5] = [0, 1, 3, 7, 14];

/// Earliest year accepted in a fully spelled-out date.
pub const MIN_EVENT_YEAR: i32 = 1900;

static NON_DATE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d/\-]").expect("static date pattern compiles"));

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Birthday => "birthday",
            EventType::Anniversary => "anniversary",
            EventType::Wedding => "wedding",
            EventType::Graduation => "graduation",
            EventType::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventType::Birthday => "Birthday",
            EventType::Anniversary => "Anniversary",
            EventType::Wedding => "Wedding",
            EventType::Graduation => "Graduation",
            EventType::Custom => "Custom Event",
        }
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(EventType::Birthday),
            "anniversary" => Ok(EventType::Anniversary),
            "wedding" => Ok(EventType::Wedding),
            "graduation" => Ok(EventType::Graduation),
            "custom" => Ok(EventType::Custom),
            _ => Err(CoreError::unknown("event type", s)),
        }
    }
}

/// Parses `MM/DD` (current year) or `MM/DD/YYYY`; `-` works as a separator
/// too and any other characters are ignored.
pub fn parse_event_date(input: &str, today: NaiveDate) -> CoreResult<NaiveDate> {
    let invalid = || CoreError::InvalidDate(input.to_string());
    let cleaned = NON_DATE_CHARS.replace_all(input, "");
    let parts: Vec<&str> = cleaned.split(|c: char| c == '/' || c == '-').collect();

    let number = |s: &str| s.parse::<u32>().map_err(|_| invalid());
    let (month, day, year) = match parts.as_slice() {
        [m, d] => (number(*m)?, number(*d)?, today.year()),
        [m, d, y] => {
            let year = y.parse::<i32>().map_err(|_| invalid())?;
            if year < MIN_EVENT_YEAR {
                return Err(invalid());
            }
            (number(*m)?, number(*d)?, year)
        }
        _ => return Err(invalid()),
    };
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Title suggested for an event with a given contact. Custom events start blank.
pub fn default_title(kind: EventType, contact_name: &str) -> String {
    match kind {
        EventType::Custom => String::new(),
        _ => format!("{contact_name}'s {}", kind.label()),
    }
}

impl FamilyEvent {
    /// Builds a new active event. A blank title falls back to
    /// [`default_title`]; custom events must be given one.
    pub fn new(
        contact: &Contact,
        kind: EventType,
        title: Option<&str>,
        date: NaiveDate,
        is_recurring: bool,
        reminder_days: u32,
        notes: Option<&str>,
    ) -> CoreResult<Self> {
        if !REMINDER_OPTIONS.contains(&reminder_days) {
            return Err(CoreError::unknown("reminder offset", &reminder_days.to_string()));
        }
        let contact_name = match contact.display_name() {
            "" => "Unknown",
            name => name,
        };
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => default_title(kind, contact_name),
        };
        if title.is_empty() {
            return Err(CoreError::MissingTitle);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            contact_id: contact.id.clone(),
            contact_name: contact_name.to_string(),
            kind,
            title,
            date,
            is_recurring,
            reminder_days: vec![reminder_days],
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            last_wished: None,
            is_active: true,
        })
    }

    pub fn mark_wished(&mut self, at: DateTime<Utc>) {
        self.last_wished = Some(at);
    }

    /// The next date this event falls on, counted from `today`.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        if !self.is_recurring {
            return self.date;
        }
        let this_year = anniversary_in(self.date, today.year());
        if this_year < today {
            anniversary_in(self.date, today.year() + 1)
        } else {
            this_year
        }
    }
}

// Feb 29 rolls over to Mar 1 in non-leap years.
fn anniversary_in(date: NaiveDate, year: i32) -> NaiveDate {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

/// An event projected onto the calendar relative to today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    #[serde(flatten)]
    pub event: FamilyEvent,
    pub next_date: NaiveDate,
    pub days_until: i64,
    pub is_due: bool,
}

/// Active events, soonest first. An event is due when today is one of its
/// reminder offsets before the next occurrence.
pub fn upcoming_events(events: &[FamilyEvent], now: DateTime<Utc>) -> Vec<UpcomingEvent> {
    let today = now.date_naive();
    let mut upcoming: Vec<UpcomingEvent> = events
        .iter()
        .filter(|e| e.is_active)
        .map(|event| {
            let next_date = event.next_occurrence(today);
            let days_until = (next_date - today).num_days();
            let is_due = u32::try_from(days_until)
                .map(|d| event.reminder_days.contains(&d))
                .unwrap_or(false);
            UpcomingEvent {
                event: event.clone(),
                next_date,
                days_until,
                is_due,
            }
        })
        .collect();
    upcoming.sort_by_key(|e| e.days_until);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, Relationship};
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap()
    }

    fn dad() -> Contact {
        Contact {
            id: "dad".into(),
            name: Some("Dad".into()),
            phone_numbers: vec![],
            relationship: Relationship::Father,
            group: Group::Family,
        }
    }

    fn birthday(month: u32, day: u32, reminder: u32) -> FamilyEvent {
        let date = NaiveDate::from_ymd_opt(1960, month, day).unwrap();
        FamilyEvent::new(&dad(), EventType::Birthday, None, date, true, reminder, None).unwrap()
    }

    #[test]
    fn parses_short_and_long_dates() {
        assert_eq!(
            parse_event_date("07/04", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
        );
        assert_eq!(
            parse_event_date("12-25-1990", today()).unwrap(),
            NaiveDate::from_ymd_opt(1990, 12, 25).unwrap()
        );
        // Stray characters are stripped before splitting.
        assert_eq!(
            parse_event_date(" 3 / 9 ", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn rejects_bad_dates() {
        for input in ["", "13/01", "00/10", "02/30", "1/2/1850", "1/2/3/4", "July 4th", "/5"] {
            assert!(
                matches!(parse_event_date(input, today()), Err(CoreError::InvalidDate(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_titles() {
        assert_eq!(default_title(EventType::Birthday, "Dad"), "Dad's Birthday");
        assert_eq!(default_title(EventType::Custom, "Dad"), "");
        let event = birthday(1, 1, 1);
        assert_eq!(event.title, "Dad's Birthday");
    }

    #[test]
    fn custom_event_needs_a_title() {
        let date = today();
        let err = FamilyEvent::new(&dad(), EventType::Custom, Some("  "), date, false, 0, None);
        assert_eq!(err, Err(CoreError::MissingTitle));
        let ok = FamilyEvent::new(&dad(), EventType::Custom, Some("Retirement party"), date, false, 0, None);
        assert_eq!(ok.unwrap().title, "Retirement party");
    }

    #[test]
    fn reminder_offset_must_be_an_option() {
        let err = FamilyEvent::new(&dad(), EventType::Birthday, None, today(), true, 5, None);
        assert!(matches!(err, Err(CoreError::UnknownOption { .. })));
    }

    #[test]
    fn recurring_events_roll_to_the_next_occurrence() {
        assert_eq!(
            birthday(6, 16, 1).next_occurrence(today()),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
        );
        assert_eq!(
            birthday(6, 15, 0).next_occurrence(today()),
            today(),
            "an event on today's date stays today"
        );
        assert_eq!(
            birthday(1, 2, 1).next_occurrence(today()),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
    }

    #[test]
    fn leap_day_falls_back_to_march_first() {
        let date = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();
        let event = FamilyEvent::new(&dad(), EventType::Wedding, None, date, true, 0, None).unwrap();
        assert_eq!(
            event.next_occurrence(today()),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn upcoming_sorts_soonest_first_and_flags_due() {
        let tomorrow = birthday(6, 16, 1);
        let next_week = birthday(6, 22, 3);
        let today_event = birthday(6, 15, 0);
        let mut retired = birthday(6, 17, 1);
        retired.is_active = false;
        let past_once = FamilyEvent::new(
            &dad(),
            EventType::Graduation,
            None,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            false,
            0,
            None,
        )
        .unwrap();

        let events = [next_week.clone(), tomorrow.clone(), retired, today_event.clone(), past_once];
        let upcoming = upcoming_events(&events, now());

        let days: Vec<_> = upcoming.iter().map(|e| e.days_until).collect();
        assert_eq!(days, [-14, 0, 1, 7]);
        let due: Vec<_> = upcoming.iter().map(|e| e.is_due).collect();
        assert_eq!(due, [false, true, true, false]);
        assert_eq!(upcoming[1].event.id, today_event.id);
        assert_eq!(upcoming[2].event.id, tomorrow.id);
    }

    #[test]
    fn marking_wished_records_the_time() {
        let mut event = birthday(6, 16, 1);
        event.mark_wished(now());
        assert_eq!(event.last_wished, Some(now()));
    }
}
