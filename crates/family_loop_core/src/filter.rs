//! crates/family_loop_core/src/filter.rs
//!
//! Narrows a raw address book down to the contacts worth tracking and
//! classifies the survivors.

use tracing::debug;

use crate::classifier::{Classification, Classifier, MatchMode};
use crate::domain::{Contact, RawContact, Relationship};

/// Name fragments that mark an entry as junk.
pub const SPAM_MARKERS: &[&str] = &["spam", "telemarketer", "robocall"];

/// Cap for the main tracking list.
pub const MAIN_LIST_CAP: usize = 300;

/// Cap for the chat contact picker.
pub const CHAT_LIST_CAP: usize = 100;

/// Longest name still considered a plausible person's name.
pub const MAX_PERSON_NAME_CHARS: usize = 40;

/// Settings for one filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub cap: usize,
    pub classifier: Classifier,
}

impl FilterPolicy {
    pub fn main() -> Self {
        Self::with_cap(MAIN_LIST_CAP)
    }

    pub fn chat() -> Self {
        Self::with_cap(CHAT_LIST_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            classifier: Classifier::default(),
        }
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.classifier = Classifier::new(mode);
        self
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::main()
    }
}

/// Decides whether a single contact belongs in the tracked list.
///
/// Rules apply in order and the first one that fires decides.
pub fn is_relevant(raw: &RawContact, classification: Classification) -> bool {
    let relationship = classification.relationship;
    if relationship.is_family() {
        return true;
    }
    if raw.phone_numbers().is_empty() {
        return false;
    }

    let name = raw.display_name();
    let lowered = name.to_lowercase();
    if SPAM_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return false;
    }

    if matches!(relationship, Relationship::Work | Relationship::Friend) {
        return true;
    }
    looks_like_person(name)
}

/// Two to four space-separated words and at most forty characters.
pub fn looks_like_person(name: &str) -> bool {
    let words = name.split(' ').count();
    (2..=4).contains(&words) && name.chars().count() <= MAX_PERSON_NAME_CHARS
}

/// Filters and classifies `raw`, keeping at most `policy.cap` contacts in
/// their original order.
pub fn filter_contacts(raw: &[RawContact], policy: &FilterPolicy) -> Vec<Contact> {
    let kept: Vec<Contact> = raw
        .iter()
        .filter_map(|entry| {
            let classification = policy.classifier.classify(entry.display_name());
            is_relevant(entry, classification).then(|| Contact {
                id: entry.id.clone(),
                name: entry.name.clone(),
                phone_numbers: entry.phone_numbers().to_vec(),
                relationship: classification.relationship,
                group: classification.group,
            })
        })
        .take(policy.cap)
        .collect();

    debug!(
        total = raw.len(),
        kept = kept.len(),
        cap = policy.cap,
        "Filtered contact list"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Group;
    use proptest::prelude::*;

    fn raw(id: &str, name: Option<&str>, phones: &[&str]) -> RawContact {
        RawContact {
            id: id.to_string(),
            name: name.map(str::to_string),
            phone_numbers: Some(phones.iter().map(|p| p.to_string()).collect()),
        }
    }

    #[test]
    fn family_without_phone_is_kept() {
        let mom = raw("1", Some("Mom"), &[]);
        let out = filter_contacts(&[mom], &FilterPolicy::main());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relationship, Relationship::Mother);
        assert_eq!(out[0].group, Group::Family);
    }

    #[test]
    fn spam_is_dropped_even_with_a_phone() {
        let junk = raw("2", Some("Bob Smith Enterprises Spam"), &["555-1"]);
        assert!(filter_contacts(&[junk], &FilterPolicy::main()).is_empty());
    }

    #[test]
    fn non_family_without_phone_is_dropped() {
        let entries = [
            raw("1", Some("Jane Doe"), &[]),
            RawContact {
                id: "2".into(),
                name: Some("Office Line".into()),
                phone_numbers: None,
            },
        ];
        assert!(filter_contacts(&entries, &FilterPolicy::main()).is_empty());
    }

    #[test]
    fn work_and_friends_skip_the_person_heuristic() {
        // Single-word names fail the person test but still survive as work/friend.
        let entries = [
            raw("1", Some("Boss"), &["1"]),
            raw("2", Some("Buddy"), &["2"]),
            raw("3", Some("Plumber"), &["3"]),
        ];
        let ids: Vec<_> = filter_contacts(&entries, &FilterPolicy::main())
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn person_heuristic_bounds() {
        assert!(!looks_like_person(""));
        assert!(!looks_like_person("Cher"));
        assert!(looks_like_person("Jane Doe"));
        assert!(looks_like_person("Mary Ann Van Dyke"));
        assert!(!looks_like_person("One Two Three Four Five"));
        assert!(!looks_like_person(&format!("Jane {}", "x".repeat(40))));
        // Splitting on single spaces counts the empty piece between double spaces.
        assert!(!looks_like_person("Jane  Q  Public"));
    }

    #[test]
    fn missing_name_is_treated_as_empty() {
        let nameless = raw("1", None, &["555"]);
        assert!(filter_contacts(&[nameless], &FilterPolicy::main()).is_empty());
    }

    #[test]
    fn chat_policy_caps_at_one_hundred() {
        let entries: Vec<_> = (0..150)
            .map(|i| raw(&i.to_string(), Some("Jane Doe"), &["555"]))
            .collect();
        assert_eq!(filter_contacts(&entries, &FilterPolicy::chat()).len(), CHAT_LIST_CAP);
        assert_eq!(filter_contacts(&entries, &FilterPolicy::main()).len(), 150);
    }

    #[test]
    fn substring_policy_changes_what_counts_as_family() {
        let entry = raw("1", Some("Bob Smith Enterprises Spam"), &["555-1"]);
        let policy = FilterPolicy::main().match_mode(MatchMode::Substring);
        // "spam" contains "pa", so the legacy rule files this under Father.
        let out = filter_contacts(&[entry], &policy);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relationship, Relationship::Father);
    }

    fn arb_contact() -> impl Strategy<Value = RawContact> {
        (
            Just(String::new()),
            proptest::option::of(prop_oneof![
                Just("Mom".to_string()),
                Just("Aunt Carol".to_string()),
                Just("Robocall Center".to_string()),
                "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,5}",
            ]),
            proptest::option::of(proptest::collection::vec("[0-9]{3}", 0..3)),
        )
            .prop_map(|(id, name, phone_numbers)| RawContact {
                id,
                name,
                phone_numbers,
            })
    }

    // Ids become input positions so order can be checked.
    fn with_unique_ids(entries: Vec<RawContact>) -> Vec<RawContact> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.id = i.to_string();
                e
            })
            .collect()
    }

    proptest! {
        #[test]
        fn family_kept_and_phoneless_strangers_dropped(
            entries in proptest::collection::vec(arb_contact(), 0..60)
        ) {
            let entries = with_unique_ids(entries);
            let policy = FilterPolicy::with_cap(usize::MAX);
            let kept = filter_contacts(&entries, &policy);
            for entry in &entries {
                let survived = kept.iter().any(|c| c.id == entry.id);
                if policy.classifier.classify(entry.display_name()).group == Group::Family {
                    prop_assert!(survived);
                } else if entry.phone_numbers().is_empty() {
                    prop_assert!(!survived);
                }
            }
        }

        #[test]
        fn output_is_capped_and_keeps_input_order(
            entries in proptest::collection::vec(arb_contact(), 0..60),
            cap in 0usize..40,
        ) {
            let entries = with_unique_ids(entries);
            let kept = filter_contacts(&entries, &FilterPolicy::with_cap(cap));
            prop_assert!(kept.len() <= cap);
            let positions: Vec<usize> = kept.iter().map(|c| c.id.parse().unwrap()).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
