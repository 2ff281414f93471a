//! Educational content keyed by error kind.
//!
//! Fixed lookup table; unrecognized kinds get a generic entry. The content
//! is advisory prose attached to explanations so a reader can learn the
//! class of bug, not just see the patch.

use serde::{Deserialize, Serialize};

use crate::classify::ErrorKind;

/// One educational block attached to an explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    pub concept: String,
    pub explanation: String,
    pub examples: Vec<String>,
    pub best_practices: Vec<String>,
    pub common_mistakes: Vec<String>,
    pub related_patterns: Vec<String>,
}

impl EducationalContent {
    fn new(
        concept: &str,
        explanation: &str,
        examples: &[&str],
        best_practices: &[&str],
        common_mistakes: &[&str],
        related_patterns: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            concept: concept.to_string(),
            explanation: explanation.to_string(),
            examples: owned(examples),
            best_practices: owned(best_practices),
            common_mistakes: owned(common_mistakes),
            related_patterns: owned(related_patterns),
        }
    }
}

/// Look up the educational block for an error kind.
pub fn content_for(kind: ErrorKind) -> EducationalContent {
    match kind {
        ErrorKind::NullReference => EducationalContent::new(
            "Null and undefined safety",
            "Accessing a property or method on a value that is null or undefined \
             fails at runtime. The value usually comes from an unchecked external \
             source: an API response, a missing map entry, or an optional argument.",
            &[
                "user?.profile?.name instead of user.profile.name",
                "if value is not None: before attribute access",
                "Objects.requireNonNull(arg, \"arg\") at method entry",
            ],
            &[
                "Validate inputs at the boundary where they enter the system",
                "Prefer optional chaining or explicit guards over deep unchecked access",
                "Make absence explicit in signatures instead of relying on null",
            ],
            &[
                "Assuming an API response always contains the expected shape",
                "Guarding one access but not the next one on the same value",
            ],
            &["optional-chaining-guard", "null-guard-insertion"],
        ),
        ErrorKind::UndefinedVariable => EducationalContent::new(
            "Identifier scope and declaration",
            "A name was used before it was declared or outside the scope where it \
             was declared. Typos in identifiers surface the same way.",
            &[
                "let total = 0; before the loop that accumulates into it",
                "count = 0 at module level before incrementing in a function",
            ],
            &[
                "Declare variables close to first use",
                "Enable strict or linted mode so undeclared names fail early",
            ],
            &[
                "Referencing a variable declared in a narrower block",
                "Misspelling a name so it silently refers to nothing",
            ],
            &["declaration-insertion"],
        ),
        ErrorKind::TypeMismatch => EducationalContent::new(
            "Type compatibility",
            "An operation received a value of a different type than it expects. \
             Loose coercion rules can hide the mismatch until a boundary enforces it.",
            &[
                "a === b instead of a == b to avoid coercion",
                "str(count) before concatenating with a string",
            ],
            &[
                "Use strict comparison operators",
                "Convert explicitly at boundaries instead of relying on coercion",
            ],
            &[
                "Comparing a number with a numeric string using loose equality",
                "Concatenating mixed types and expecting arithmetic",
            ],
            &["type-normalization"],
        ),
        ErrorKind::SyntaxError => EducationalContent::new(
            "Source well-formedness",
            "The code does not parse: an unbalanced bracket, a missing terminator, \
             or a truncated construct stops compilation before anything runs.",
            &[
                "Matching every opening ( [ { with its closer",
                "Terminating statements where the language requires it",
            ],
            &[
                "Let the editor or formatter balance delimiters",
                "Read the parser's reported position; the real mistake is usually just before it",
            ],
            &["Fixing the reported line while the unbalanced delimiter is earlier"],
            &["delimiter-balancing"],
        ),
        ErrorKind::IndexOutOfBounds => EducationalContent::new(
            "Collection bounds",
            "An index outside the valid range was used. Off-by-one mistakes at loop \
             boundaries and empty collections are the usual sources.",
            &[
                "if i < len(items): before items[i]",
                "for (let i = 0; i < items.length; i++) not <=",
            ],
            &[
                "Check emptiness before indexing the first or last element",
                "Prefer iteration constructs over manual index arithmetic",
            ],
            &["Using <= in a zero-based loop bound", "Indexing the result of a filter that may be empty"],
            &["bounds-guard"],
        ),
        ErrorKind::MissingKey => EducationalContent::new(
            "Map and dictionary lookup",
            "A lookup assumed a key that is not present. Data from outside the \
             program rarely guarantees its shape.",
            &[
                "config.get('timeout', 30) instead of config['timeout']",
                "'timeout' in config before indexing",
            ],
            &[
                "Use lookup forms that express a default",
                "Validate required keys once at the boundary",
            ],
            &["Indexing parsed JSON without checking the field exists"],
            &["safe-key-lookup"],
        ),
        ErrorKind::Unknown => EducationalContent::new(
            "Defensive error handling",
            "The failure did not match a known category. Wrapping the risky \
             section in structured error handling keeps the failure observable \
             and the program running while the root cause is investigated.",
            &[
                "try { risky(); } catch (error) { report(error); }",
                "try: risky() except Exception as error: report(error)",
            ],
            &[
                "Log enough context to reproduce the failure",
                "Narrow the handled region once the cause is understood",
            ],
            &["Swallowing the error without recording it"],
            &["error-handling-wrap"],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_content() {
        for kind in [
            ErrorKind::NullReference,
            ErrorKind::UndefinedVariable,
            ErrorKind::TypeMismatch,
            ErrorKind::SyntaxError,
            ErrorKind::IndexOutOfBounds,
            ErrorKind::MissingKey,
            ErrorKind::Unknown,
        ] {
            let content = content_for(kind);
            assert!(!content.concept.is_empty());
            assert!(!content.explanation.is_empty());
            assert!(!content.examples.is_empty());
            assert!(!content.best_practices.is_empty());
            assert!(!content.common_mistakes.is_empty());
            assert!(!content.related_patterns.is_empty());
        }
    }

    #[test]
    fn test_unknown_kind_gets_generic_entry() {
        let content = content_for(ErrorKind::Unknown);
        assert_eq!(content.concept, "Defensive error handling");
    }

    #[test]
    fn test_null_reference_teaches_optional_chaining() {
        let content = content_for(ErrorKind::NullReference);
        assert!(content
            .related_patterns
            .iter()
            .any(|p| p == "optional-chaining-guard"));
    }
}
