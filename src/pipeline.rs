//! The bug-fix request pipeline.
//!
//! One request flows classification → root cause → security scan → quality
//! assessment (independent of each other) → candidate generation →
//! selection → outcome learning. The pipeline owns the shared pattern
//! store; everything else it touches is stateless per call.
//!
//! Failure taxonomy: bad input surfaces as a typed client error before any
//! work happens; a classification miss is not an error and degrades to the
//! generic strategy; a generation failure produces a well-formed
//! `success: false` response echoing the original code; storage problems
//! are logged and swallowed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{ClassifierRegistry, ErrorKind, Severity};
use crate::config::MenderConfig;
use crate::error::{MenderError, Result};
use crate::explain::{Explanation, ExplanationSynthesizer};
use crate::fix::{FixGenerator, FixPreferences, FixSelector, FixSuggestion};
use crate::language::Language;
use crate::learning::{JsonFileBackend, LearningExample, PatternStore};
use crate::quality::{CodeQualityMetrics, QualityAssessor};
use crate::security::{SecurityIssue, SecurityScanner};

// ============================================================================
// Request / response shapes
// ============================================================================

/// One incoming fix request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugFixRequest {
    pub code: String,
    /// Raw language tag; validated against the supported set.
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Owning team, carried through to the analytics rollups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<FixPreferences>,
}

/// Everything the analysis stages learned about one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugAnalysis {
    pub language: Language,
    pub error_type: ErrorKind,
    pub severity: Severity,
    pub root_cause: String,
    pub suggested_fixes: Vec<FixSuggestion>,
    pub security_issues: Vec<SecurityIssue>,
    pub code_quality: CodeQualityMetrics,
}

/// The complete response for one fix request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixResponse {
    pub success: bool,
    pub original_code: String,
    pub fixed_code: String,
    pub analysis: BugAnalysis,
    pub applied_fixes: Vec<FixSuggestion>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Orchestrates the full analysis-and-repair flow.
pub struct BugFixer {
    classifiers: ClassifierRegistry,
    scanner: SecurityScanner,
    assessor: QualityAssessor,
    generator: FixGenerator,
    selector: FixSelector,
    explainer: ExplanationSynthesizer,
    store: Arc<PatternStore>,
}

impl BugFixer {
    /// Build the pipeline with durable learning storage per `config`.
    pub fn new(config: &MenderConfig) -> Self {
        let backend = JsonFileBackend::new(&config.storage.data_dir);
        let store = Arc::new(PatternStore::with_backend(
            config.learning.clone(),
            Box::new(backend),
        ));
        Self::with_store(config, store)
    }

    /// Build the pipeline around an existing store. Tests use this with an
    /// in-memory store.
    pub fn with_store(config: &MenderConfig, store: Arc<PatternStore>) -> Self {
        Self {
            classifiers: ClassifierRegistry::new(),
            scanner: SecurityScanner::new(),
            assessor: QualityAssessor::new(),
            generator: FixGenerator::new(),
            selector: FixSelector::new(),
            explainer: ExplanationSynthesizer::with_capacity(config.explain.cache_capacity),
            store,
        }
    }

    /// The shared learning store.
    pub fn store(&self) -> &Arc<PatternStore> {
        &self.store
    }

    /// Supported language tags, lowercase.
    pub fn languages() -> Vec<String> {
        Language::supported_tags()
    }

    /// Run the full pipeline for one request.
    ///
    /// Returns a typed client error for invalid input; every other path
    /// yields a well-formed response. Each call feeds exactly one outcome
    /// into the learning store.
    pub fn fix(&self, request: &BugFixRequest) -> Result<FixResponse> {
        let language = validate(request)?;
        let preferences = request.preferences.clone().unwrap_or_default();

        let kind = self.classifiers.classify(language, request.error.as_deref());
        debug!(language = %language, kind = %kind.tag(), "classified request");

        let suggested_fixes = self.generator.generate(
            &request.code,
            language,
            kind,
            request.error.as_deref(),
            &preferences,
        );
        debug!(candidates = suggested_fixes.len(), "generated fix candidates");

        let analysis = BugAnalysis {
            language,
            error_type: kind,
            severity: kind.severity(),
            root_cause: kind.root_cause().to_string(),
            security_issues: self.scanner.scan(&request.code, language),
            code_quality: self.assessor.assess(&request.code, language),
            suggested_fixes,
        };

        let applied = self
            .selector
            .select(&analysis.suggested_fixes, &preferences, &request.code);
        debug!(confidence = applied.confidence, "selected fix");

        let success = applied.confidence > 0.0;
        let response = if success {
            FixResponse {
                success: true,
                original_code: request.code.clone(),
                fixed_code: applied.code.clone(),
                analysis,
                applied_fixes: vec![applied],
                warnings: Vec::new(),
                suggestions: Vec::new(),
            }
        } else {
            failure_response(request, analysis, "No applicable fix was produced")
        };

        self.learn(request, &response, language);
        Ok(response)
    }

    /// Synthesize (and cache) the explanation for a completed response.
    pub fn explain(&self, request: &BugFixRequest, response: &FixResponse) -> Option<Explanation> {
        let applied = response.applied_fixes.first()?;
        Some(self.explainer.explain(
            &applied.id,
            &response.original_code,
            &response.fixed_code,
            request.error.as_deref(),
            response.analysis.language,
            request.context.as_deref(),
        ))
    }

    /// Retrieve a previously synthesized explanation by fix id.
    pub fn cached_explanation(&self, fix_id: &str) -> Option<Explanation> {
        self.explainer.cached(fix_id)
    }

    /// Feed the single outcome record for this request into the store.
    fn learn(&self, request: &BugFixRequest, response: &FixResponse, language: Language) {
        let mut example = LearningExample::new(
            response.original_code.clone(),
            response.fixed_code.clone(),
            request.error.clone(),
            language,
            response.success,
        );
        if let Some(context) = &request.context {
            example = example.with_context(context.clone());
        }
        if let Some(team) = &request.team {
            example = example.with_team(team.clone());
        }
        self.store.learn_from_fix(example);
    }
}

/// Build the degraded response: original code echoed, nothing applied.
fn failure_response(request: &BugFixRequest, analysis: BugAnalysis, reason: &str) -> FixResponse {
    FixResponse {
        success: false,
        original_code: request.code.clone(),
        fixed_code: request.code.clone(),
        analysis,
        applied_fixes: Vec::new(),
        warnings: vec![reason.to_string()],
        suggestions: vec!["Check the code syntax and retry".to_string()],
    }
}

/// Reject missing fields and unsupported languages before any work.
fn validate(request: &BugFixRequest) -> Result<Language> {
    if request.code.trim().is_empty() {
        return Err(MenderError::invalid_request(
            "code",
            "code must be provided and non-empty",
        ));
    }
    if request.language.trim().is_empty() {
        return Err(MenderError::invalid_request(
            "language",
            "language must be provided",
        ));
    }
    request
        .language
        .parse::<Language>()
        .map_err(|e| MenderError::unsupported_language(e.input(), Language::supported_tags()))
}
