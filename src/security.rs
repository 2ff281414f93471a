//! Static security scanning.
//!
//! A fixed battery of unsafe-pattern checks run over the submitted source
//! text. Each check is independent: a match in one never suppresses the
//! others, and the battery order is fixed so reports are stable. Findings
//! are advisory, not gating; false positives are expected and acceptable.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::Severity;
use crate::language::Language;

// ============================================================================
// Issue Types
// ============================================================================

/// A single advisory finding from the security battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    /// Stable identifier of the battery item that fired.
    pub kind: String,
    /// How bad a confirmed instance of this pattern would be.
    pub severity: Severity,
    /// What the scanner saw.
    pub description: String,
    /// How to remediate.
    pub recommendation: String,
    /// Common Weakness Enumeration tag, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
}

// ============================================================================
// Battery
// ============================================================================

/// One battery item: a pattern plus the fixed report it emits on match.
struct BatteryItem {
    kind: &'static str,
    pattern: Regex,
    severity: Severity,
    description: &'static str,
    recommendation: &'static str,
    cwe: Option<&'static str>,
    /// Restrict the check to specific languages; `None` means all.
    languages: Option<&'static [Language]>,
}

impl BatteryItem {
    fn applies_to(&self, language: Language) -> bool {
        match self.languages {
            None => true,
            Some(langs) => langs.contains(&language),
        }
    }
}

/// Static signature scanner for known unsafe-code idioms.
pub struct SecurityScanner {
    battery: Vec<BatteryItem>,
}

impl SecurityScanner {
    /// Build the scanner with the standard battery.
    pub fn new() -> Self {
        let item = |kind: &'static str,
                    pattern: &str,
                    severity: Severity,
                    description: &'static str,
                    recommendation: &'static str,
                    cwe: Option<&'static str>,
                    languages: Option<&'static [Language]>| {
            BatteryItem {
                kind,
                pattern: Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid battery pattern '{}': {}", pattern, e)),
                severity,
                description,
                recommendation,
                cwe,
                languages,
            }
        };

        Self {
            battery: vec![
                item(
                    "sql-injection",
                    r#"(?i)(select|insert|update|delete)\s+.*(\+\s*\w|\$\{|%s|\.format\()"#,
                    Severity::Critical,
                    "Query text appears to be built by string interpolation or concatenation",
                    "Use parameterized queries or a prepared-statement API instead of building SQL from strings",
                    Some("CWE-89"),
                    None,
                ),
                item(
                    "markup-injection",
                    r"\.innerHTML\s*=|document\.write\s*\(|dangerouslySetInnerHTML",
                    Severity::High,
                    "Unescaped data is written directly into markup",
                    "Escape or sanitize values before inserting them into the DOM, or assign textContent",
                    Some("CWE-79"),
                    Some(&[Language::JavaScript, Language::TypeScript]),
                ),
                item(
                    "dynamic-eval",
                    r"\beval\s*\(|new\s+Function\s*\(|\bexec\s*\(",
                    Severity::High,
                    "Dynamic code evaluation of runtime strings",
                    "Replace dynamic evaluation with explicit dispatch over known operations",
                    Some("CWE-95"),
                    None,
                ),
                item(
                    "hardcoded-credentials",
                    r#"(?i)(password|passwd|secret|api[_-]?key|token)\s*[:=]\s*["'][^"']{4,}["']"#,
                    Severity::Critical,
                    "A credential-like literal is hard-coded in source",
                    "Move secrets to environment variables or a secret manager and rotate the exposed value",
                    Some("CWE-798"),
                    None,
                ),
                item(
                    "weak-hash",
                    r"(?i)\b(md5|sha1)\s*\(",
                    Severity::Medium,
                    "A weak hash function is used",
                    "Use a modern hash (SHA-256 or better) or a dedicated password hashing function",
                    Some("CWE-328"),
                    None,
                ),
                item(
                    "shell-injection",
                    r"child_process|os\.system\s*\(|subprocess\.(call|run|Popen)\s*\([^)]*shell\s*=\s*True|Runtime\.getRuntime\(\)\.exec",
                    Severity::High,
                    "A shell command appears to be built from program data",
                    "Pass arguments as a list to the process API and avoid shell interpretation",
                    Some("CWE-78"),
                    None,
                ),
            ],
        }
    }

    /// Run the full battery over `code`.
    ///
    /// Checks run in fixed order and independently; the result contains one
    /// issue per battery item that matched.
    pub fn scan(&self, code: &str, language: Language) -> Vec<SecurityIssue> {
        self.battery
            .iter()
            .filter(|item| item.applies_to(language))
            .filter(|item| item.pattern.is_match(code))
            .map(|item| SecurityIssue {
                kind: item.kind.to_string(),
                severity: item.severity,
                description: item.description.to_string(),
                recommendation: item.recommendation.to_string(),
                cwe: item.cwe.map(str::to_string),
            })
            .collect()
    }
}

impl Default for SecurityScanner {
    fn default() -> Self {
        Self::new()
    }
}
