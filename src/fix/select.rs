//! Candidate ranking and selection.
//!
//! Selection is deliberately simple: sort descending by confidence with a
//! stable sort (ties keep generation order) and take the head. Preferences
//! influence candidate generation upstream, not the selection rule; callers
//! needing a different policy swap this component's comparator.

use std::cmp::Ordering;

use crate::fix::{FixPreferences, FixSuggestion};

/// Ranks candidates and picks the winner.
#[derive(Debug, Default)]
pub struct FixSelector;

impl FixSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick the best candidate.
    ///
    /// An empty candidate list yields the zero-confidence no-fix sentinel
    /// whose code equals `original_code`.
    pub fn select(
        &self,
        candidates: &[FixSuggestion],
        _preferences: &FixPreferences,
        original_code: &str,
    ) -> FixSuggestion {
        if candidates.is_empty() {
            return FixSuggestion::no_fix(original_code);
        }

        let mut ranked: Vec<&FixSuggestion> = candidates.iter().collect();
        // Stable sort: equal confidences keep their generation order.
        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        ranked[0].clone()
    }
}
