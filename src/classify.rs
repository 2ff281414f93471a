//! Error classification.
//!
//! Maps a language plus raw error text to a canonical [`ErrorKind`] via
//! ordered signature rules. Each supported language contributes its own
//! [`Classifier`] implementation behind a registry, so adding a language
//! means adding a variant and an impl rather than editing a shared
//! dispatch function.
//!
//! Classification is deterministic, side-effect free, and never fails:
//! absent error text or an unmatched message degrades to
//! [`ErrorKind::Unknown`], which downstream stages handle as a valid (if
//! low-value) kind.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::Language;

// ============================================================================
// Error Kinds
// ============================================================================

/// Canonical category a raw error message is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Access through a null/undefined/None value
    NullReference,
    /// Reference to a name that was never declared
    UndefinedVariable,
    /// Operation applied to a value of the wrong type
    TypeMismatch,
    /// Source text the parser cannot accept
    SyntaxError,
    /// Collection access past its bounds
    IndexOutOfBounds,
    /// Lookup of a missing map/dictionary key
    MissingKey,
    /// No signature rule matched (or no error text was supplied)
    Unknown,
}

/// Static array of all kinds for iteration
static ALL_KINDS: &[ErrorKind] = &[
    ErrorKind::NullReference,
    ErrorKind::UndefinedVariable,
    ErrorKind::TypeMismatch,
    ErrorKind::SyntaxError,
    ErrorKind::IndexOutOfBounds,
    ErrorKind::MissingKey,
    ErrorKind::Unknown,
];

impl ErrorKind {
    /// Returns all canonical kinds.
    pub fn all() -> &'static [ErrorKind] {
        ALL_KINDS
    }

    /// Returns the canonical kebab-case tag used in responses and pattern
    /// keys.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::NullReference => "null-reference",
            ErrorKind::UndefinedVariable => "undefined-variable",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::SyntaxError => "syntax-error",
            ErrorKind::IndexOutOfBounds => "index-out-of-bounds",
            ErrorKind::MissingKey => "missing-key",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Returns the human-readable root cause for this kind.
    ///
    /// Fixed lookup table; [`ErrorKind::Unknown`] maps to an explicit
    /// sentinel rather than an error.
    pub fn root_cause(&self) -> &'static str {
        match self {
            ErrorKind::NullReference => {
                "A value was accessed through a reference that is null or undefined \
                 at the point of use, usually because an upstream lookup can fail."
            }
            ErrorKind::UndefinedVariable => {
                "An identifier is used before any declaration introduces it, often a \
                 typo or a declaration that was removed or never written."
            }
            ErrorKind::TypeMismatch => {
                "An operation received a value whose runtime or declared type does \
                 not support it, typically from an implicit conversion or a wrong \
                 assumption about an API's return type."
            }
            ErrorKind::SyntaxError => {
                "The source text violates the language grammar, commonly unbalanced \
                 delimiters, a missing terminator, or a stray token."
            }
            ErrorKind::IndexOutOfBounds => {
                "A collection is indexed past its current length, usually an \
                 off-by-one loop bound or an empty-collection edge case."
            }
            ErrorKind::MissingKey => {
                "A map or dictionary lookup assumed a key that is not present, \
                 usually missing validation of external or optional data."
            }
            ErrorKind::Unknown => "Unknown root cause: the error did not match any known signature.",
        }
    }

    /// Returns the default severity assigned to this kind.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::SyntaxError => Severity::Critical,
            ErrorKind::NullReference | ErrorKind::TypeMismatch => Severity::High,
            ErrorKind::UndefinedVariable
            | ErrorKind::IndexOutOfBounds
            | ErrorKind::MissingKey => Severity::Medium,
            ErrorKind::Unknown => Severity::Low,
        }
    }

    /// Returns the lowercase phrases whose presence in an error message
    /// marks it as "similar" to this kind.
    ///
    /// This is the explicit similarity predicate used by the pattern store
    /// when deciding whether a learning example should update an existing
    /// pattern. It is heuristic by design; keeping it as data makes its
    /// false-positive/negative rate measurable.
    pub fn signature_phrases(&self) -> &'static [&'static str] {
        match self {
            ErrorKind::NullReference => &[
                "cannot read propert",
                "of undefined",
                "of null",
                "nonetype",
                "nullpointerexception",
            ],
            ErrorKind::UndefinedVariable => &[
                "is not defined",
                "nameerror",
                "cannot find symbol",
                "cannot find name",
            ],
            ErrorKind::TypeMismatch => &[
                "is not a function",
                "typeerror",
                "incompatible types",
                "not assignable",
            ],
            ErrorKind::SyntaxError => &[
                "unexpected token",
                "syntaxerror",
                "indentationerror",
                "unexpected end of input",
            ],
            ErrorKind::IndexOutOfBounds => &["indexerror", "out of bounds", "rangeerror"],
            ErrorKind::MissingKey => &["keyerror"],
            ErrorKind::Unknown => &[],
        }
    }

    /// Checks whether `error` is similar to this kind per the signature
    /// phrases. [`ErrorKind::Unknown`] matches nothing.
    pub fn matches_error_text(&self, error: &str) -> bool {
        let lower = error.to_lowercase();
        self.signature_phrases()
            .iter()
            .any(|phrase| lower.contains(phrase))
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Severity of a classified defect or security issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Classifiers
// ============================================================================

/// One ordered signature rule: the first rule whose pattern matches wins.
#[derive(Debug)]
pub struct SignatureRule {
    pattern: Regex,
    kind: ErrorKind,
}

impl SignatureRule {
    fn new(pattern: &str, kind: ErrorKind) -> Self {
        // Rule tables are compile-time literals; a bad pattern is a bug,
        // not a runtime condition.
        Self {
            pattern: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid classifier pattern '{}': {}", pattern, e)
            }),
            kind,
        }
    }
}

/// A per-language error classifier.
pub trait Classifier: Send + Sync {
    /// The language this classifier handles.
    fn language(&self) -> Language;

    /// Ordered signature rules for this language.
    fn rules(&self) -> &[SignatureRule];

    /// Classify raw error text into a canonical kind.
    ///
    /// Absent or unmatched input degrades to [`ErrorKind::Unknown`].
    fn classify(&self, error: Option<&str>) -> ErrorKind {
        let Some(error) = error else {
            return ErrorKind::Unknown;
        };
        self.rules()
            .iter()
            .find(|rule| rule.pattern.is_match(error))
            .map(|rule| rule.kind)
            .unwrap_or(ErrorKind::Unknown)
    }
}

macro_rules! classifier {
    ($name:ident, $language:expr, [$(($pattern:expr, $kind:expr)),* $(,)?]) => {
        pub struct $name {
            rules: Vec<SignatureRule>,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    rules: vec![$(SignatureRule::new($pattern, $kind)),*],
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Classifier for $name {
            fn language(&self) -> Language {
                $language
            }

            fn rules(&self) -> &[SignatureRule] {
                &self.rules
            }
        }
    };
}

classifier!(
    JavaScriptClassifier,
    Language::JavaScript,
    [
        (
            r"Cannot read propert(y|ies)|of (undefined|null)",
            ErrorKind::NullReference
        ),
        (r"is not defined", ErrorKind::UndefinedVariable),
        (r"is not a function|is not iterable", ErrorKind::TypeMismatch),
        (
            r"Unexpected token|Unexpected end of input",
            ErrorKind::SyntaxError
        ),
        (r"RangeError", ErrorKind::IndexOutOfBounds),
    ]
);

classifier!(
    TypeScriptClassifier,
    Language::TypeScript,
    [
        (
            r"Cannot read propert(y|ies)|of (undefined|null)|possibly 'undefined'",
            ErrorKind::NullReference
        ),
        (
            r"Cannot find name|is not defined",
            ErrorKind::UndefinedVariable
        ),
        (
            r"is not assignable to|does not exist on type|is not a function|TS2322|TS2345",
            ErrorKind::TypeMismatch
        ),
        (
            r"Unexpected token|expected\.|TS1005",
            ErrorKind::SyntaxError
        ),
        (r"RangeError", ErrorKind::IndexOutOfBounds),
    ]
);

classifier!(
    PythonClassifier,
    Language::Python,
    [
        (
            r"AttributeError: 'NoneType'|NoneType.*has no attribute",
            ErrorKind::NullReference
        ),
        (r"NameError", ErrorKind::UndefinedVariable),
        (r"SyntaxError|IndentationError", ErrorKind::SyntaxError),
        (r"IndexError", ErrorKind::IndexOutOfBounds),
        (r"KeyError", ErrorKind::MissingKey),
        (r"TypeError", ErrorKind::TypeMismatch),
    ]
);

classifier!(
    JavaClassifier,
    Language::Java,
    [
        (r"NullPointerException", ErrorKind::NullReference),
        (r"cannot find symbol", ErrorKind::UndefinedVariable),
        (
            r"incompatible types|inconvertible types|ClassCastException",
            ErrorKind::TypeMismatch
        ),
        (
            r"';' expected|illegal start of expression|reached end of file while parsing",
            ErrorKind::SyntaxError
        ),
        (
            r"ArrayIndexOutOfBoundsException|IndexOutOfBoundsException",
            ErrorKind::IndexOutOfBounds
        ),
    ]
);

// ============================================================================
// Registry
// ============================================================================

/// Registry dispatching classification to the language's classifier.
pub struct ClassifierRegistry {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl ClassifierRegistry {
    /// Build a registry with one classifier per supported language.
    pub fn new() -> Self {
        Self {
            classifiers: vec![
                Box::new(JavaScriptClassifier::new()),
                Box::new(TypeScriptClassifier::new()),
                Box::new(PythonClassifier::new()),
                Box::new(JavaClassifier::new()),
            ],
        }
    }

    /// Classify error text for the given language.
    pub fn classify(&self, language: Language, error: Option<&str>) -> ErrorKind {
        self.classifiers
            .iter()
            .find(|c| c.language() == language)
            .map(|c| c.classify(error))
            .unwrap_or(ErrorKind::Unknown)
    }
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClassifierRegistry {
        ClassifierRegistry::new()
    }

    // ========================================================================
    // Classification tests
    // ========================================================================

    #[test]
    fn test_javascript_null_reference() {
        let kind = registry().classify(
            Language::JavaScript,
            Some("TypeError: Cannot read property 'name' of undefined"),
        );
        assert_eq!(kind, ErrorKind::NullReference);
    }

    #[test]
    fn test_javascript_modern_null_reference_message() {
        let kind = registry().classify(
            Language::JavaScript,
            Some("TypeError: Cannot read properties of undefined (reading 'name')"),
        );
        assert_eq!(kind, ErrorKind::NullReference);
    }

    #[test]
    fn test_javascript_undefined_variable() {
        let kind = registry().classify(
            Language::JavaScript,
            Some("ReferenceError: counter is not defined"),
        );
        assert_eq!(kind, ErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_javascript_type_mismatch() {
        let kind = registry().classify(
            Language::JavaScript,
            Some("TypeError: user.save is not a function"),
        );
        assert_eq!(kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_javascript_syntax_error() {
        let kind = registry().classify(
            Language::JavaScript,
            Some("SyntaxError: Unexpected token '}'"),
        );
        assert_eq!(kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn test_typescript_type_mismatch() {
        let kind = registry().classify(
            Language::TypeScript,
            Some("TS2322: Type 'string' is not assignable to type 'number'"),
        );
        assert_eq!(kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_typescript_missing_name() {
        let kind = registry().classify(
            Language::TypeScript,
            Some("error TS2304: Cannot find name 'useState'"),
        );
        assert_eq!(kind, ErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_python_none_attribute() {
        let kind = registry().classify(
            Language::Python,
            Some("AttributeError: 'NoneType' object has no attribute 'name'"),
        );
        assert_eq!(kind, ErrorKind::NullReference);
    }

    #[test]
    fn test_python_name_error() {
        let kind = registry().classify(
            Language::Python,
            Some("NameError: name 'counter' is not defined"),
        );
        assert_eq!(kind, ErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_python_key_error() {
        let kind = registry().classify(Language::Python, Some("KeyError: 'user_id'"));
        assert_eq!(kind, ErrorKind::MissingKey);
    }

    #[test]
    fn test_python_rule_order_syntax_before_type() {
        // NameError contains no "TypeError", but an IndentationError message
        // must win even though "TypeError" rules exist later in the table.
        let kind = registry().classify(
            Language::Python,
            Some("IndentationError: unexpected indent"),
        );
        assert_eq!(kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn test_java_null_pointer() {
        let kind = registry().classify(
            Language::Java,
            Some("Exception in thread \"main\" java.lang.NullPointerException"),
        );
        assert_eq!(kind, ErrorKind::NullReference);
    }

    #[test]
    fn test_java_index_out_of_bounds() {
        let kind = registry().classify(
            Language::Java,
            Some("java.lang.ArrayIndexOutOfBoundsException: Index 5 out of bounds for length 3"),
        );
        assert_eq!(kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_absent_error_is_unknown() {
        assert_eq!(
            registry().classify(Language::JavaScript, None),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_unmatched_error_is_unknown() {
        assert_eq!(
            registry().classify(Language::JavaScript, Some("something very strange happened")),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let msg = Some("TypeError: Cannot read property 'x' of undefined");
        let reg = registry();
        let first = reg.classify(Language::JavaScript, msg);
        for _ in 0..10 {
            assert_eq!(reg.classify(Language::JavaScript, msg), first);
        }
    }

    // ========================================================================
    // Root cause / severity tests
    // ========================================================================

    #[test]
    fn test_root_cause_known_kinds_non_empty() {
        for kind in ErrorKind::all() {
            assert!(!kind.root_cause().is_empty());
        }
    }

    #[test]
    fn test_root_cause_unknown_sentinel() {
        assert!(ErrorKind::Unknown.root_cause().contains("Unknown root cause"));
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(ErrorKind::SyntaxError.severity(), Severity::Critical);
        assert_eq!(ErrorKind::NullReference.severity(), Severity::High);
        assert_eq!(ErrorKind::TypeMismatch.severity(), Severity::High);
        assert_eq!(ErrorKind::MissingKey.severity(), Severity::Medium);
        assert_eq!(ErrorKind::Unknown.severity(), Severity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_severity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_error_kind_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::NullReference).unwrap(),
            "\"null-reference\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    // ========================================================================
    // Similarity predicate tests
    // ========================================================================

    #[test]
    fn test_matches_error_text_positive() {
        assert!(ErrorKind::NullReference
            .matches_error_text("TypeError: Cannot read property 'a' of undefined"));
        assert!(ErrorKind::MissingKey.matches_error_text("KeyError: 'id'"));
    }

    #[test]
    fn test_matches_error_text_case_insensitive() {
        assert!(ErrorKind::NullReference.matches_error_text("NULLPOINTEREXCEPTION at Main.java"));
    }

    #[test]
    fn test_matches_error_text_negative() {
        assert!(!ErrorKind::MissingKey.matches_error_text("something else entirely"));
    }

    #[test]
    fn test_unknown_matches_nothing() {
        assert!(!ErrorKind::Unknown.matches_error_text("anything at all"));
    }
}
