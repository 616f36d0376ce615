//! Intent matching
//!
//! An intent matches when its name is contained in the command. Containment
//! is whole-string and case-insensitive, so short names can over-match
//! ("a" matches nearly everything). The first candidate in scan order wins:
//! the store yields candidates by intent id, then response id.

use crate::Result;
use crate::db::{IntentStore, ResponseCandidate};

/// Pick the response for `command` from ordered candidates
#[must_use]
pub fn select_response<'a>(
    command: &str,
    candidates: &'a [ResponseCandidate],
) -> Option<&'a ResponseCandidate> {
    if command.is_empty() {
        return None;
    }

    let haystack = command.to_lowercase();

    candidates.iter().find(|candidate| {
        let needle = candidate.intent_name.to_lowercase();
        !needle.is_empty() && haystack.contains(&needle)
    })
}

/// Maps normalized commands to responses from the intent store
#[derive(Clone)]
pub struct IntentMatcher {
    store: IntentStore,
}

impl IntentMatcher {
    /// Create a matcher backed by `store`
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(store: IntentStore) -> Self {
        Self { store }
    }

    /// Response for `command`, or `None` if nothing matches
    ///
    /// # Errors
    ///
    /// Returns error if the catalogue cannot be read
    pub fn find(&self, command: &str) -> Result<Option<String>> {
        let response = self.store.find_response_for_command(command)?;

        match &response {
            Some(text) => tracing::debug!(command, response = %text, "intent matched"),
            None => tracing::debug!(command, "no intent matched"),
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(intent_id: i64, name: &str, response: &str) -> ResponseCandidate {
        ResponseCandidate {
            intent_id,
            intent_name: name.to_string(),
            response_text: response.to_string(),
        }
    }

    #[test]
    fn test_substring_match() {
        let candidates = vec![candidate(1, "hora", "São três horas.")];

        let found = select_response("que hora é", &candidates).unwrap();
        assert_eq!(found.response_text, "São três horas.");
    }

    #[test]
    fn test_containment_is_not_word_bounded() {
        let candidates = vec![candidate(1, "hora", "São três horas.")];

        assert!(select_response("que horas são", &candidates).is_some());
        assert!(select_response("trabalhorama", &candidates).is_some());
        assert!(select_response("agora não", &candidates).is_none());
    }

    #[test]
    fn test_case_insensitive() {
        let candidates = vec![candidate(1, "Música", "Tocando música.")];

        assert!(select_response("toca uma música", &candidates).is_some());
        assert!(select_response("TOCA UMA MÚSICA", &candidates).is_some());
    }

    #[test]
    fn test_empty_command_never_matches() {
        let candidates = vec![candidate(1, "hora", "São três horas.")];

        assert!(select_response("", &candidates).is_none());
    }

    #[test]
    fn test_empty_name_never_matches() {
        let candidates = vec![candidate(1, "", "vazio")];

        assert!(select_response("qualquer coisa", &candidates).is_none());
    }

    #[test]
    fn test_first_in_scan_order_wins() {
        let candidates = vec![
            candidate(1, "a", "genérico"),
            candidate(2, "hora", "específico"),
        ];

        // No ranking by specificity
        let found = select_response("que hora é", &candidates).unwrap();
        assert_eq!(found.intent_id, 1);
    }

    #[test]
    fn test_matcher_reads_store() {
        let store = IntentStore::open_in_memory().unwrap();
        store
            .intents()
            .add_intent("hora", None, &["São três horas.".to_string()])
            .unwrap();

        let matcher = IntentMatcher::new(store);
        assert_eq!(
            matcher.find("que hora é").unwrap().as_deref(),
            Some("São três horas.")
        );
        assert_eq!(matcher.find("me conte uma piada").unwrap(), None);
    }
}
