//! Explanation synthesis for completed fixes.
//!
//! Invoked on demand, after and independently of fix application. An
//! explanation is a fixed four-step reasoning trace (error-type analysis,
//! pattern-match lookup, context understanding, solution generation), a
//! small set of templated alternatives, an educational block keyed by error
//! kind, and directional performance/security impact notes derived from
//! textual heuristics rather than measurement.
//!
//! Explanations are cached by fix id in a bounded LRU so repeat retrievals
//! are cheap without the cache growing with process lifetime.

pub mod education;

pub use education::{content_for, EducationalContent};

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::classify::{ClassifierRegistry, ErrorKind};
use crate::language::Language;

/// Default bound for the explanation cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

// ============================================================================
// Data types
// ============================================================================

/// One step of the reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStep {
    pub title: String,
    pub description: String,
    pub evidence: Vec<String>,
    pub confidence: f64,
}

/// Category label for an alternative fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlternativeLabel {
    Simple,
    Advanced,
    Temporary,
}

/// An alternative the synthesizer considered but did not choose.
///
/// Drawn from fixed templates, not independently computed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeFix {
    pub label: AlternativeLabel,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub confidence: f64,
    pub why_not_chosen: String,
}

/// The full explanation of one applied fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub id: String,
    pub fix_id: String,
    pub reasoning: Vec<ReasoningStep>,
    pub confidence: f64,
    pub alternatives: Vec<AlternativeFix>,
    pub educational_value: EducationalContent,
    pub performance_impact: String,
    pub security_implications: String,
}

// ============================================================================
// Synthesizer
// ============================================================================

/// Builds and caches explanations for completed fixes.
pub struct ExplanationSynthesizer {
    classifiers: ClassifierRegistry,
    cache: Mutex<LruCache<String, Explanation>>,
}

impl ExplanationSynthesizer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            classifiers: ClassifierRegistry::new(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Synthesize the explanation for a completed fix and cache it by fix id.
    pub fn explain(
        &self,
        fix_id: &str,
        original_code: &str,
        fixed_code: &str,
        error: Option<&str>,
        language: Language,
        context: Option<&str>,
    ) -> Explanation {
        let kind = self.classifiers.classify(language, error);
        let reasoning = reasoning_steps(kind, error, language, context);
        let confidence =
            reasoning.iter().map(|s| s.confidence).sum::<f64>() / reasoning.len() as f64;

        let explanation = Explanation {
            id: Uuid::new_v4().to_string(),
            fix_id: fix_id.to_string(),
            reasoning,
            confidence,
            alternatives: alternatives_for(kind),
            educational_value: content_for(kind),
            performance_impact: performance_impact(original_code, fixed_code),
            security_implications: security_implications(original_code, fixed_code),
        };

        debug!(fix_id = %fix_id, kind = %kind.tag(), "synthesized explanation");
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(fix_id.to_string(), explanation.clone());
        }
        explanation
    }

    /// Retrieve a previously synthesized explanation, refreshing its recency.
    pub fn cached(&self, fix_id: &str) -> Option<Explanation> {
        self.cache.lock().ok()?.get(fix_id).cloned()
    }

    /// Number of cached explanations.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for ExplanationSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Reasoning trace
// ============================================================================

fn reasoning_steps(
    kind: ErrorKind,
    error: Option<&str>,
    language: Language,
    context: Option<&str>,
) -> Vec<ReasoningStep> {
    let mut error_evidence = vec![format!("Classified as {}", kind.tag())];
    if let Some(error) = error {
        error_evidence.push(format!("Error message: {}", error));
    } else {
        error_evidence.push("No error message supplied; classified from code alone".to_string());
    }

    let mut context_evidence = vec![format!("Target language: {}", language)];
    if let Some(context) = context {
        context_evidence.push(format!("Caller context: {}", context));
    }

    vec![
        ReasoningStep {
            title: "Error type analysis".to_string(),
            description: format!(
                "Matched the failure against known {} error signatures.",
                language
            ),
            evidence: error_evidence,
            confidence: if error.is_some() { 0.9 } else { 0.5 },
        },
        ReasoningStep {
            title: "Pattern match lookup".to_string(),
            description: format!(
                "Looked up repair strategies recorded for {} defects.",
                kind.tag()
            ),
            evidence: vec![format!("Root cause: {}", kind.root_cause())],
            confidence: 0.85,
        },
        ReasoningStep {
            title: "Context understanding".to_string(),
            description: "Interpreted the surrounding code and caller intent.".to_string(),
            evidence: context_evidence,
            confidence: if context.is_some() { 0.8 } else { 0.6 },
        },
        ReasoningStep {
            title: "Solution generation".to_string(),
            description: "Applied the highest-confidence transformation for this defect class."
                .to_string(),
            evidence: vec![format!("Severity assessed as {}", kind.severity())],
            confidence: 0.8,
        },
    ]
}

// ============================================================================
// Alternatives
// ============================================================================

fn alternatives_for(kind: ErrorKind) -> Vec<AlternativeFix> {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };

    let simple_description = match kind {
        ErrorKind::NullReference => "Check the value with an if statement before each access",
        ErrorKind::UndefinedVariable => "Declare the variable inline at the point of first use",
        ErrorKind::TypeMismatch => "Convert the value manually at the failing expression",
        ErrorKind::SyntaxError => "Retype the failing statement from scratch",
        ErrorKind::IndexOutOfBounds => "Check the collection length right before the access",
        ErrorKind::MissingKey => "Test for the key before every lookup",
        ErrorKind::Unknown => "Add a print statement and narrow the failure manually",
    };

    vec![
        AlternativeFix {
            label: AlternativeLabel::Simple,
            description: simple_description.to_string(),
            pros: owned(&["Easy to review", "No new concepts for the team"]),
            cons: owned(&["Verbose when repeated", "Easy to miss one access path"]),
            confidence: 0.6,
            why_not_chosen: "The chosen fix covers the same failure with less repetition."
                .to_string(),
        },
        AlternativeFix {
            label: AlternativeLabel::Advanced,
            description: "Restructure the surrounding code so the invalid state cannot occur."
                .to_string(),
            pros: owned(&["Removes the whole defect class", "Improves long-term design"]),
            cons: owned(&["Larger diff", "Needs broader review and testing"]),
            confidence: 0.75,
            why_not_chosen: "Out of proportion to a single-site repair; worth a dedicated change."
                .to_string(),
        },
        AlternativeFix {
            label: AlternativeLabel::Temporary,
            description: "Wrap the failing section in a broad error handler and log the failure."
                .to_string(),
            pros: owned(&["Stops the crash immediately"]),
            cons: owned(&["Hides the root cause", "Accumulates as debt"]),
            confidence: 0.4,
            why_not_chosen: "Masks the defect instead of repairing it.".to_string(),
        },
    ]
}

// ============================================================================
// Impact heuristics
// ============================================================================

/// Directional estimate from textual size and known idioms, not measurement.
fn performance_impact(original: &str, fixed: &str) -> String {
    let added = |needle: &str| fixed.contains(needle) && !original.contains(needle);

    if added("try") || added("except") || added("catch") {
        "The added error handler costs nothing on the success path; the failure path \
         trades a crash for handler overhead."
            .to_string()
    } else if added("?.") || added("is not None") || added("!= null") || added("null !=") {
        "The inserted guard is a constant-time check; runtime impact is negligible."
            .to_string()
    } else if fixed.len() > original.len().saturating_mul(3) / 2 {
        "The fix grows the code noticeably; review the added section for work inside loops."
            .to_string()
    } else {
        "No measurable performance change expected.".to_string()
    }
}

/// Directional estimate from unsafe-idiom presence before and after.
fn security_implications(original: &str, fixed: &str) -> String {
    let removed = |needle: &str| original.contains(needle) && !fixed.contains(needle);
    let remains = |needle: &str| fixed.contains(needle);

    if removed("eval(") || removed("innerHTML") {
        "The fix removes a dynamic-evaluation or markup-injection surface; security posture \
         improves."
            .to_string()
    } else if remains("eval(") || remains("innerHTML") {
        "A dynamic-evaluation or markup-injection idiom remains in the fixed code; run the \
         security scan findings down separately."
            .to_string()
    } else {
        "No security-relevant idioms added or removed by this fix.".to_string()
    }
}
