//! Fix candidate generation.
//!
//! Dispatches on the classified [`ErrorKind`] to a fixed set of
//! transformation strategies. Strategies are pure text-to-text pattern
//! substitutions: no reparsing, and every strategy is total — given any
//! input text it returns *some* transformed text, even if a no-op.
//!
//! Each strategy produces exactly one candidate with a strategy-specific
//! fixed confidence. Caller preferences shape generation (an aggressive
//! style adds a fallback error-wrap candidate; comment and test-case
//! options enrich the output) but never selection, which lives in
//! [`select`].

pub mod select;

pub use select::FixSelector;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ErrorKind;
use crate::language::Language;

// ============================================================================
// Preferences
// ============================================================================

/// How invasive generated fixes are allowed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixStyle {
    /// Touch only the code the error points at.
    #[default]
    Conservative,
    /// Apply the transformation broadly and add fallback candidates.
    Aggressive,
}

/// Caller preferences for fix generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixPreferences {
    pub style: FixStyle,
    pub include_comments: bool,
    pub include_tests: bool,
}

// ============================================================================
// Suggestions
// ============================================================================

/// One proposed code transformation with an associated confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixSuggestion {
    /// Unique id for this candidate.
    pub id: String,
    /// Short human-readable description of the transformation.
    pub description: String,
    /// Full replacement text for the submitted code.
    pub code: String,
    /// Strategy-specific confidence in [0, 1].
    pub confidence: f64,
    /// Natural-language explanation of why this fix applies.
    pub explanation: String,
    /// Illustrative test case descriptions, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<String>>,
}

impl FixSuggestion {
    fn new(
        description: impl Into<String>,
        code: impl Into<String>,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            code: code.into(),
            confidence: confidence.clamp(0.0, 1.0),
            explanation: explanation.into(),
            test_cases: None,
        }
    }

    /// The zero-confidence sentinel returned when nothing can be suggested.
    /// Applying it leaves the code unchanged.
    pub fn no_fix(original_code: &str) -> Self {
        Self::new(
            "No fix available",
            original_code,
            0.0,
            "No applicable transformation was found; the code is returned unchanged.",
        )
    }

    fn with_test_cases(mut self, cases: Vec<String>) -> Self {
        self.test_cases = Some(cases);
        self
    }
}

// ============================================================================
// Strategy confidences
// ============================================================================

const CONFIDENCE_NULL_GUARD: f64 = 0.85;
const CONFIDENCE_DECLARATION: f64 = 0.75;
const CONFIDENCE_TYPE_NORMALIZE: f64 = 0.7;
const CONFIDENCE_SYNTAX_REPAIR: f64 = 0.6;
const CONFIDENCE_BOUNDS_GUARD: f64 = 0.7;
const CONFIDENCE_SAFE_LOOKUP: f64 = 0.75;
const CONFIDENCE_GENERIC_WRAP: f64 = 0.4;

// ============================================================================
// Generator
// ============================================================================

/// Produces candidate transformations for a classified defect.
pub struct FixGenerator {
    ident_dot: Regex,
    loose_equality: Regex,
    property_in_error: Regex,
    name_in_error: Regex,
    index_access: Regex,
    key_access: Regex,
}

impl FixGenerator {
    /// Build the generator with its fixed substitution patterns.
    pub fn new() -> Self {
        let re = |p: &str| {
            Regex::new(p).unwrap_or_else(|e| panic!("invalid fix pattern '{}': {}", p, e))
        };
        Self {
            ident_dot: re(r"([A-Za-z_]\w*)\."),
            // Loose equality only: === and !== must be left alone.
            loose_equality: re(r"([^=!<>])==([^=])"),
            property_in_error: re(r"propert(?:y|ies)[^']*'([^']+)'|\(reading '([^']+)'\)"),
            name_in_error: re(r"name '([^']+)'|'([^']+)' is not defined|symbol:\s*variable (\w+)"),
            index_access: re(r"([A-Za-z_]\w*)\[([A-Za-z_]\w*)\]"),
            key_access: re(r#"([A-Za-z_]\w*)\[(["'][^"']+["'])\]"#),
        }
    }

    /// Generate candidates for the given defect.
    ///
    /// Always returns at least one candidate; every candidate's confidence
    /// is within [0, 1].
    pub fn generate(
        &self,
        code: &str,
        language: Language,
        kind: ErrorKind,
        error: Option<&str>,
        prefs: &FixPreferences,
    ) -> Vec<FixSuggestion> {
        let primary = match kind {
            ErrorKind::NullReference => self.null_guard(code, language, error, prefs),
            ErrorKind::UndefinedVariable => self.insert_declaration(code, language, error),
            ErrorKind::TypeMismatch => self.normalize_types(code, language),
            ErrorKind::SyntaxError => self.repair_syntax(code, language),
            ErrorKind::IndexOutOfBounds => self.bounds_guard(code, language),
            ErrorKind::MissingKey => self.safe_lookup(code, language),
            ErrorKind::Unknown => self.generic_wrap(code, language),
        };

        let mut candidates = vec![self.finish(primary, language, kind, prefs)];

        // Aggressive callers also get the defensive wrap as a ranked
        // alternative, unless it is already the primary strategy.
        if prefs.style == FixStyle::Aggressive && kind != ErrorKind::Unknown {
            candidates.push(self.finish(self.generic_wrap(code, language), language, kind, prefs));
        }

        candidates
    }

    fn finish(
        &self,
        mut suggestion: FixSuggestion,
        language: Language,
        kind: ErrorKind,
        prefs: &FixPreferences,
    ) -> FixSuggestion {
        if prefs.include_comments && suggestion.confidence > 0.0 {
            suggestion.code = format!(
                "{} {}: {}\n{}",
                language.comment_prefix(),
                "auto-fix",
                suggestion.description,
                suggestion.code
            );
        }
        if prefs.include_tests {
            suggestion = suggestion.with_test_cases(test_case_descriptions(kind));
        }
        suggestion
    }

    // ------------------------------------------------------------------
    // Strategies
    // ------------------------------------------------------------------

    /// Insert defensive null guards around the failing access.
    fn null_guard(
        &self,
        code: &str,
        language: Language,
        error: Option<&str>,
        prefs: &FixPreferences,
    ) -> FixSuggestion {
        let fixed = match language {
            Language::JavaScript | Language::TypeScript => {
                let property = error.and_then(|e| self.extract_property(e));
                match (&property, prefs.style) {
                    // Conservative: rewrite only accesses of the property
                    // the error names.
                    (Some(prop), FixStyle::Conservative) => {
                        let target =
                            Regex::new(&format!(r"([A-Za-z_]\w*)\.{}", regex::escape(prop)));
                        match target {
                            Ok(target) => target
                                .replace_all(code, format!("$1?.{}", prop))
                                .into_owned(),
                            Err(_) => self.ident_dot.replace_all(code, "$1?.").into_owned(),
                        }
                    }
                    _ => self.ident_dot.replace_all(code, "$1?.").into_owned(),
                }
            }
            Language::Python => match self.receiver_of_first_access(code) {
                Some(root) => format!("if {} is not None:\n{}", root, indent(code, "    ")),
                None => code.to_string(),
            },
            Language::Java => match self.receiver_of_first_access(code) {
                Some(root) => format!("if ({} != null) {{\n{}\n}}", root, indent(code, "    ")),
                None => code.to_string(),
            },
        };

        FixSuggestion::new(
            "Guard the null-prone access",
            fixed,
            CONFIDENCE_NULL_GUARD,
            "The failing property access is reached while its receiver can be \
             null or undefined. Guarding the access short-circuits safely \
             instead of raising at runtime.",
        )
    }

    /// Insert a declaration for the undefined name at the top of the code.
    fn insert_declaration(
        &self,
        code: &str,
        language: Language,
        error: Option<&str>,
    ) -> FixSuggestion {
        let name = error.and_then(|e| self.extract_name(e));
        let fixed = match &name {
            Some(name) => {
                let decl = match language {
                    Language::JavaScript => format!("let {};", name),
                    Language::TypeScript => format!("let {}: unknown;", name),
                    Language::Python => format!("{} = None", name),
                    Language::Java => format!("Object {} = null;", name),
                };
                format!("{}\n{}", decl, code)
            }
            // Total even when the error names nothing recognizable.
            None => code.to_string(),
        };

        FixSuggestion::new(
            "Declare the missing identifier",
            fixed,
            CONFIDENCE_DECLARATION,
            "An identifier is used without a declaration in scope. Declaring \
             it up front removes the reference error; review the placeholder \
             initial value.",
        )
    }

    /// Normalize suspicious type usage.
    fn normalize_types(&self, code: &str, language: Language) -> FixSuggestion {
        let fixed = match language {
            // Loose equality is the most common source of JS type surprises.
            Language::JavaScript => self
                .loose_equality
                .replace_all(code, "${1}===${2}")
                .into_owned(),
            // TypeScript gets an explicit annotation where inference failed.
            Language::TypeScript => {
                let annotated = Regex::new(r"\b(let|const)\s+([A-Za-z_]\w*)\s*=")
                    .map(|re| re.replace_all(code, "$1 $2: unknown =").into_owned())
                    .unwrap_or_else(|_| code.to_string());
                annotated
            }
            // Coerce the right-hand side of string concatenation.
            Language::Python => Regex::new(r#"(["'][^"']*["']\s*\+\s*)([A-Za-z_]\w*)"#)
                .map(|re| re.replace_all(code, "${1}str(${2})").into_owned())
                .unwrap_or_else(|_| code.to_string()),
            Language::Java => code.to_string(),
        };

        FixSuggestion::new(
            "Normalize the mismatched types",
            fixed,
            CONFIDENCE_TYPE_NORMALIZE,
            "An operation received a value of an unexpected type. Making the \
             comparison or conversion explicit removes the implicit coercion \
             that caused the mismatch.",
        )
    }

    /// Balance unclosed delimiters.
    fn repair_syntax(&self, code: &str, _language: Language) -> FixSuggestion {
        let mut fixed = code.to_string();
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
            let opens = code.matches(open).count();
            let closes = code.matches(close).count();
            if opens > closes {
                for _ in 0..(opens - closes) {
                    fixed.push(close);
                }
            }
        }

        FixSuggestion::new(
            "Balance unclosed delimiters",
            fixed,
            CONFIDENCE_SYNTAX_REPAIR,
            "The parser rejected the source text. Unbalanced delimiters are \
             the most common cause; missing closers are appended at the end \
             of the snippet.",
        )
    }

    /// Wrap the first index access in a bounds check.
    fn bounds_guard(&self, code: &str, language: Language) -> FixSuggestion {
        let fixed = match self.index_access.captures(code) {
            Some(caps) => {
                let (coll, idx) = (&caps[1], &caps[2]);
                match language {
                    Language::Python => format!(
                        "if {} < len({}):\n{}",
                        idx,
                        coll,
                        indent(code, "    ")
                    ),
                    _ => format!(
                        "if ({} < {}.length) {{\n{}\n}}",
                        idx,
                        coll,
                        indent(code, "    ")
                    ),
                }
            }
            None => code.to_string(),
        };

        FixSuggestion::new(
            "Guard the index access",
            fixed,
            CONFIDENCE_BOUNDS_GUARD,
            "A collection is indexed past its length. Checking the index \
             against the collection size before the access prevents the \
             out-of-bounds failure.",
        )
    }

    /// Replace a hard key lookup with a safe one.
    fn safe_lookup(&self, code: &str, language: Language) -> FixSuggestion {
        let fixed = match language {
            Language::Python => self
                .key_access
                .replace_all(code, "$1.get($2)")
                .into_owned(),
            _ => self.ident_dot.replace_all(code, "$1?.").into_owned(),
        };

        FixSuggestion::new(
            "Use a safe key lookup",
            fixed,
            CONFIDENCE_SAFE_LOOKUP,
            "A lookup assumed a key that may be absent. A safe accessor \
             returns a default instead of raising when the key is missing.",
        )
    }

    /// Generic fallback: wrap the code in error handling.
    fn generic_wrap(&self, code: &str, language: Language) -> FixSuggestion {
        let fixed = match language {
            Language::JavaScript | Language::TypeScript => format!(
                "try {{\n{}\n}} catch (error) {{\n    console.error('Unhandled error:', error);\n}}",
                indent(code, "    ")
            ),
            Language::Python => format!(
                "try:\n{}\nexcept Exception as error:\n    print(f\"Unhandled error: {{error}}\")",
                indent(code, "    ")
            ),
            Language::Java => format!(
                "try {{\n{}\n}} catch (Exception error) {{\n    System.err.println(\"Unhandled error: \" + error);\n}}",
                indent(code, "    ")
            ),
        };

        FixSuggestion::new(
            "Wrap in error handling",
            fixed,
            CONFIDENCE_GENERIC_WRAP,
            "The defect did not match a known signature, so the code is \
             wrapped in error handling to contain the failure while the \
             underlying cause is investigated.",
        )
    }

    // ------------------------------------------------------------------
    // Extraction helpers
    // ------------------------------------------------------------------

    fn extract_property(&self, error: &str) -> Option<String> {
        self.property_in_error.captures(error).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
        })
    }

    fn extract_name(&self, error: &str) -> Option<String> {
        self.name_in_error.captures(error).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
        })
    }

    fn receiver_of_first_access(&self, code: &str) -> Option<String> {
        self.ident_dot
            .captures(code)
            .map(|caps| caps[1].to_string())
    }
}

impl Default for FixGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Indent every line of `code` by `prefix`.
fn indent(code: &str, prefix: &str) -> String {
    code.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Illustrative test-case descriptions per error kind.
fn test_case_descriptions(kind: ErrorKind) -> Vec<String> {
    match kind {
        ErrorKind::NullReference => vec![
            "passes a null/undefined receiver and expects no throw".to_string(),
            "passes a populated receiver and expects the original result".to_string(),
        ],
        ErrorKind::UndefinedVariable => vec![
            "references the declared identifier and expects no reference error".to_string(),
        ],
        ErrorKind::TypeMismatch => vec![
            "exercises the operation with each expected operand type".to_string(),
        ],
        ErrorKind::SyntaxError => vec!["parses the repaired source without errors".to_string()],
        ErrorKind::IndexOutOfBounds => vec![
            "indexes an empty collection and expects the guard to skip".to_string(),
            "indexes within bounds and expects the original behavior".to_string(),
        ],
        ErrorKind::MissingKey => vec![
            "looks up an absent key and expects a default instead of a raise".to_string(),
        ],
        ErrorKind::Unknown => vec![
            "runs the wrapped code and expects failures to be contained".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> FixGenerator {
        FixGenerator::new()
    }

    fn prefs() -> FixPreferences {
        FixPreferences::default()
    }

    // ========================================================================
    // Null guard
    // ========================================================================

    #[test]
    fn test_js_null_guard_uses_optional_chaining() {
        let fixes = generator().generate(
            "user.name",
            Language::JavaScript,
            ErrorKind::NullReference,
            Some("TypeError: Cannot read property 'name' of undefined"),
            &prefs(),
        );
        assert_eq!(fixes.len(), 1);
        assert!(fixes[0].code.contains("user?.name"));
        assert!(fixes[0].confidence >= 0.8);
    }

    #[test]
    fn test_js_conservative_guard_targets_named_property() {
        let code = "console.log(user.name);";
        let fixes = generator().generate(
            code,
            Language::JavaScript,
            ErrorKind::NullReference,
            Some("TypeError: Cannot read property 'name' of undefined"),
            &prefs(),
        );
        assert!(fixes[0].code.contains("user?.name"));
        // The unrelated console.log receiver is untouched.
        assert!(fixes[0].code.contains("console.log"));
    }

    #[test]
    fn test_js_aggressive_guard_rewrites_all_accesses() {
        let aggressive = FixPreferences {
            style: FixStyle::Aggressive,
            ..Default::default()
        };
        let fixes = generator().generate(
            "a.b; c.d;",
            Language::JavaScript,
            ErrorKind::NullReference,
            Some("Cannot read properties of undefined (reading 'b')"),
            &aggressive,
        );
        assert!(fixes[0].code.contains("a?.b"));
        assert!(fixes[0].code.contains("c?.d"));
    }

    #[test]
    fn test_python_null_guard_wraps_in_none_check() {
        let fixes = generator().generate(
            "print(user.name)",
            Language::Python,
            ErrorKind::NullReference,
            Some("AttributeError: 'NoneType' object has no attribute 'name'"),
            &prefs(),
        );
        assert!(fixes[0].code.contains("is not None"));
        assert!(fixes[0].code.contains("    print(user.name)"));
    }

    #[test]
    fn test_java_null_guard_wraps_in_null_check() {
        let fixes = generator().generate(
            "System.out.println(user.getName());",
            Language::Java,
            ErrorKind::NullReference,
            Some("java.lang.NullPointerException"),
            &prefs(),
        );
        assert!(fixes[0].code.contains("!= null"));
    }

    // ========================================================================
    // Other strategies
    // ========================================================================

    #[test]
    fn test_declaration_inserted_for_named_variable() {
        let fixes = generator().generate(
            "counter += 1;",
            Language::JavaScript,
            ErrorKind::UndefinedVariable,
            Some("ReferenceError: 'counter' is not defined"),
            &prefs(),
        );
        assert!(fixes[0].code.starts_with("let counter;"));
        assert!(fixes[0].code.contains("counter += 1;"));
    }

    #[test]
    fn test_declaration_python_uses_none() {
        let fixes = generator().generate(
            "counter += 1",
            Language::Python,
            ErrorKind::UndefinedVariable,
            Some("NameError: name 'counter' is not defined"),
            &prefs(),
        );
        assert!(fixes[0].code.starts_with("counter = None"));
    }

    #[test]
    fn test_declaration_total_without_name() {
        let fixes = generator().generate(
            "x += 1;",
            Language::JavaScript,
            ErrorKind::UndefinedVariable,
            Some("some unhelpful message"),
            &prefs(),
        );
        // Strategy stays total: unchanged code, still one candidate.
        assert_eq!(fixes[0].code, "x += 1;");
    }

    #[test]
    fn test_type_normalization_js_strict_equality() {
        let fixes = generator().generate(
            "if (a == b) { f(); }",
            Language::JavaScript,
            ErrorKind::TypeMismatch,
            None,
            &prefs(),
        );
        assert!(fixes[0].code.contains("==="));
        assert!(!fixes[0].code.contains("====="));
    }

    #[test]
    fn test_type_normalization_preserves_strict_operators() {
        let fixes = generator().generate(
            "if (a === b && c !== d && e == f) { g(x); }",
            Language::JavaScript,
            ErrorKind::TypeMismatch,
            Some("TypeError: x is not a function"),
            &prefs(),
        );
        assert!(!fixes[0].code.contains("===="), "got {:?}", fixes[0].code);
        assert!(fixes[0].code.contains("a === b"));
        assert!(fixes[0].code.contains("c !== d"));
        // The one loose comparison still gets normalized.
        assert!(fixes[0].code.contains("e === f"));
    }

    #[test]
    fn test_type_normalization_python_str_coercion() {
        let fixes = generator().generate(
            r#"message = "count: " + count"#,
            Language::Python,
            ErrorKind::TypeMismatch,
            None,
            &prefs(),
        );
        assert!(fixes[0].code.contains("str(count)"));
        // The string literal on the left of the concatenation survives.
        assert_eq!(fixes[0].code, r#"message = "count: " + str(count)"#);
    }

    #[test]
    fn test_syntax_repair_appends_missing_closers() {
        let fixes = generator().generate(
            "function f() { if (x) { g();",
            Language::JavaScript,
            ErrorKind::SyntaxError,
            Some("SyntaxError: Unexpected end of input"),
            &prefs(),
        );
        let opens = fixes[0].code.matches('{').count();
        let closes = fixes[0].code.matches('}').count();
        assert_eq!(opens, closes);
        let p_opens = fixes[0].code.matches('(').count();
        let p_closes = fixes[0].code.matches(')').count();
        assert_eq!(p_opens, p_closes);
    }

    #[test]
    fn test_bounds_guard_wraps_index_access() {
        let fixes = generator().generate(
            "value = items[i]",
            Language::Python,
            ErrorKind::IndexOutOfBounds,
            Some("IndexError: list index out of range"),
            &prefs(),
        );
        assert!(fixes[0].code.contains("if i < len(items):"));
    }

    #[test]
    fn test_safe_lookup_python_get() {
        let fixes = generator().generate(
            r#"value = record["user_id"]"#,
            Language::Python,
            ErrorKind::MissingKey,
            Some("KeyError: 'user_id'"),
            &prefs(),
        );
        assert!(fixes[0].code.contains(r#"record.get("user_id")"#));
    }

    #[test]
    fn test_generic_wrap_javascript() {
        let fixes = generator().generate(
            "doSomething();",
            Language::JavaScript,
            ErrorKind::Unknown,
            None,
            &prefs(),
        );
        assert!(fixes[0].code.contains("try {"));
        assert!(fixes[0].code.contains("catch"));
        assert!(fixes[0].confidence > 0.0);
        assert!(fixes[0].confidence < 0.5);
    }

    #[test]
    fn test_generic_wrap_python() {
        let fixes = generator().generate(
            "do_something()",
            Language::Python,
            ErrorKind::Unknown,
            None,
            &prefs(),
        );
        assert!(fixes[0].code.starts_with("try:"));
        assert!(fixes[0].code.contains("except Exception"));
    }

    // ========================================================================
    // Preferences and totality
    // ========================================================================

    #[test]
    fn test_aggressive_style_adds_fallback_candidate() {
        let aggressive = FixPreferences {
            style: FixStyle::Aggressive,
            ..Default::default()
        };
        let fixes = generator().generate(
            "user.name",
            Language::JavaScript,
            ErrorKind::NullReference,
            Some("Cannot read property 'name' of undefined"),
            &aggressive,
        );
        assert_eq!(fixes.len(), 2);
        assert!(fixes[0].confidence > fixes[1].confidence);
    }

    #[test]
    fn test_include_comments_prepends_marker() {
        let with_comments = FixPreferences {
            include_comments: true,
            ..Default::default()
        };
        let fixes = generator().generate(
            "user.name",
            Language::JavaScript,
            ErrorKind::NullReference,
            Some("Cannot read property 'name' of undefined"),
            &with_comments,
        );
        assert!(fixes[0].code.starts_with("// auto-fix:"));
    }

    #[test]
    fn test_include_tests_attaches_descriptions() {
        let with_tests = FixPreferences {
            include_tests: true,
            ..Default::default()
        };
        let fixes = generator().generate(
            "user.name",
            Language::JavaScript,
            ErrorKind::NullReference,
            None,
            &with_tests,
        );
        let cases = fixes[0].test_cases.as_ref().unwrap();
        assert!(!cases.is_empty());
    }

    #[test]
    fn test_every_kind_yields_a_candidate_with_bounded_confidence() {
        let gen = generator();
        for kind in ErrorKind::all() {
            for language in Language::all() {
                let fixes = gen.generate("x", *language, *kind, None, &prefs());
                assert!(!fixes.is_empty(), "no candidate for {:?}", kind);
                for fix in &fixes {
                    assert!(
                        (0.0..=1.0).contains(&fix.confidence),
                        "confidence out of range for {:?}: {}",
                        kind,
                        fix.confidence
                    );
                    assert!(!fix.code.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_no_fix_sentinel_echoes_original() {
        let sentinel = FixSuggestion::no_fix("original();");
        assert_eq!(sentinel.code, "original();");
        assert_eq!(sentinel.confidence, 0.0);
    }
}
