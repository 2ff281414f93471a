//! Adaptive pattern learning.
//!
//! The pattern store is the durable, keyed collection of learned fix
//! patterns. Every completed fix produces exactly one outcome record,
//! consumed exactly once by [`PatternStore::learn_from_fix`]: matching
//! patterns are updated with a running success average and a bounded
//! confidence nudge, and a missing key mints a new pattern seeded from the
//! outcome. State lives behind a mutex so the store shares cleanly behind
//! `Arc`; a key's read-modify-write is serialized by construction.
//!
//! Per-pattern state machine: absent → created → updated* (loop). Patterns
//! are never deleted individually, only capped by FIFO eviction of the
//! oldest window entries.

pub mod persistence;

pub use persistence::{JsonFileBackend, LearningBackend, LearningSnapshot, MemoryBackend};

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classify::{ClassifierRegistry, ErrorKind};
use crate::language::Language;

// ============================================================================
// Configuration
// ============================================================================

/// Tuning constants for the learning store.
///
/// The deltas and seeds are product knobs rather than derived values, so
/// they are configuration with the historical values as defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Confidence added after a successful outcome.
    pub success_delta: f64,
    /// Confidence removed after a failed outcome.
    pub failure_delta: f64,
    /// Seed confidence for a pattern minted from a success.
    pub seed_success_confidence: f64,
    /// Seed confidence for a pattern minted from a failure.
    pub seed_failure_confidence: f64,
    /// Lower clamp for nudged confidence.
    pub confidence_floor: f64,
    /// Per-pattern example window size.
    pub example_window: usize,
    /// Global example history cap.
    pub example_cap: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            success_delta: 0.05,
            failure_delta: 0.10,
            seed_success_confidence: 0.8,
            seed_failure_confidence: 0.3,
            confidence_floor: 0.1,
            example_window: 10,
            example_cap: 1000,
        }
    }
}

// ============================================================================
// Data types
// ============================================================================

/// Composite key identifying a learned pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub language: Language,
    pub error_kind: ErrorKind,
}

impl PatternKey {
    pub fn new(language: Language, error_kind: ErrorKind) -> Self {
        Self {
            language,
            error_kind,
        }
    }
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.language.tag(), self.error_kind.tag())
    }
}

/// The success/failure record of one applied fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningExample {
    pub id: String,
    pub original_code: String,
    pub fixed_code: String,
    pub error: Option<String>,
    pub language: Language,
    pub context: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LearningExample {
    pub fn new(
        original_code: impl Into<String>,
        fixed_code: impl Into<String>,
        error: Option<String>,
        language: Language,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_code: original_code.into(),
            fixed_code: fixed_code.into(),
            error,
            language,
            context: None,
            team: None,
            success,
            feedback: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// A learned, keyed record summarizing historical fix success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPattern {
    pub key: PatternKey,
    /// Recognizable idiom this pattern's fixes apply (derived from diffs).
    pub signature: String,
    /// Trust in this pattern, clamped to [0.1, 1.0] after nudges.
    pub confidence: f64,
    /// Running average of outcomes, exact over the pattern's history.
    pub success_rate: f64,
    pub usage_count: u64,
    pub last_updated: DateTime<Utc>,
    /// Bounded window of recent examples; insertion evicts the oldest.
    pub examples: VecDeque<LearningExample>,
}

impl LearningPattern {
    fn record_outcome(&mut self, example: &LearningExample, config: &LearningConfig) {
        let outcome = if example.success { 1.0 } else { 0.0 };
        let n = self.usage_count as f64;
        self.success_rate = (self.success_rate * n + outcome) / (n + 1.0);
        self.usage_count += 1;

        self.confidence = if example.success {
            self.confidence + config.success_delta
        } else {
            self.confidence - config.failure_delta
        }
        .clamp(config.confidence_floor, 1.0);

        self.examples.push_back(example.clone());
        while self.examples.len() > config.example_window {
            self.examples.pop_front();
        }
        self.last_updated = Utc::now();
    }
}

/// Counters rolled into the durable snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningMetrics {
    pub total_events: u64,
    pub successful_events: u64,
    pub patterns_created: u64,
}

// ============================================================================
// Store
// ============================================================================

struct StoreState {
    patterns: HashMap<PatternKey, LearningPattern>,
    examples: VecDeque<LearningExample>,
    metrics: LearningMetrics,
}

/// The meta-learning store: consumes fix outcomes, serves trusted patterns.
pub struct PatternStore {
    config: LearningConfig,
    classifiers: ClassifierRegistry,
    backend: Option<Box<dyn LearningBackend>>,
    state: Mutex<StoreState>,
}

impl PatternStore {
    /// Create an in-memory store with no durable backend.
    pub fn new(config: LearningConfig) -> Self {
        Self {
            config,
            classifiers: ClassifierRegistry::new(),
            backend: None,
            state: Mutex::new(StoreState {
                patterns: HashMap::new(),
                examples: VecDeque::new(),
                metrics: LearningMetrics::default(),
            }),
        }
    }

    /// Create a store over a durable backend, restoring any saved snapshot.
    ///
    /// A failed or corrupted load is logged and the store starts fresh;
    /// startup never fails on storage problems.
    pub fn with_backend(config: LearningConfig, backend: Box<dyn LearningBackend>) -> Self {
        let snapshot = match backend.load() {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to load learning snapshot, starting fresh: {}", e);
                None
            }
        };

        let state = match snapshot {
            Some(snapshot) => StoreState {
                patterns: snapshot
                    .patterns
                    .into_iter()
                    .map(|p| (p.key, p))
                    .collect(),
                examples: snapshot.examples.into(),
                metrics: snapshot.metrics,
            },
            None => StoreState {
                patterns: HashMap::new(),
                examples: VecDeque::new(),
                metrics: LearningMetrics::default(),
            },
        };

        Self {
            config,
            classifiers: ClassifierRegistry::new(),
            backend: Some(backend),
            state: Mutex::new(state),
        }
    }

    /// Consume one fix outcome.
    ///
    /// Updates every existing pattern of the example's language whose kind
    /// judges the error text similar, then mints a pattern for the derived
    /// (language, kind) key if none exists. Finally persists best-effort.
    pub fn learn_from_fix(&self, example: LearningExample) {
        let kind = self
            .classifiers
            .classify(example.language, example.error.as_deref());
        let key = PatternKey::new(example.language, kind);

        {
            let mut state = match self.state.lock() {
                Ok(s) => s,
                Err(poisoned) => poisoned.into_inner(),
            };

            // Update all similar patterns for this language.
            if let Some(error) = example.error.as_deref() {
                for pattern in state.patterns.values_mut() {
                    if pattern.key.language == example.language
                        && pattern.key.error_kind.matches_error_text(error)
                    {
                        pattern.record_outcome(&example, &self.config);
                    }
                }
            }

            // Mint a pattern for the derived key when absent.
            if !state.patterns.contains_key(&key) {
                let pattern = self.mint_pattern(key, &example);
                debug!(key = %key, signature = %pattern.signature, "minted learning pattern");
                state.patterns.insert(key, pattern);
                state.metrics.patterns_created += 1;
            }

            state.metrics.total_events += 1;
            if example.success {
                state.metrics.successful_events += 1;
            }

            state.examples.push_back(example);
            while state.examples.len() > self.config.example_cap {
                state.examples.pop_front();
            }
        }

        self.persist();
    }

    /// Patterns trustworthy enough to prioritize future generation:
    /// confidence > 0.5 and success rate > 0.7, best first.
    pub fn optimized_patterns(&self) -> Vec<LearningPattern> {
        let mut patterns: Vec<LearningPattern> = self
            .lock_state()
            .patterns
            .values()
            .filter(|p| p.confidence > 0.5 && p.success_rate > 0.7)
            .cloned()
            .collect();
        patterns.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        patterns
    }

    /// All patterns, unsorted.
    pub fn patterns(&self) -> Vec<LearningPattern> {
        self.lock_state().patterns.values().cloned().collect()
    }

    /// Look up one pattern by key.
    pub fn pattern(&self, key: &PatternKey) -> Option<LearningPattern> {
        self.lock_state().patterns.get(key).cloned()
    }

    /// Current counters.
    pub fn metrics(&self) -> LearningMetrics {
        self.lock_state().metrics.clone()
    }

    /// Number of stored examples.
    pub fn example_count(&self) -> usize {
        self.lock_state().examples.len()
    }

    /// The capped global example history, oldest first.
    pub fn examples(&self) -> Vec<LearningExample> {
        self.lock_state().examples.iter().cloned().collect()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn mint_pattern(&self, key: PatternKey, example: &LearningExample) -> LearningPattern {
        let (confidence, success_rate) = if example.success {
            (self.config.seed_success_confidence, 1.0)
        } else {
            (self.config.seed_failure_confidence, 0.0)
        };

        let mut examples = VecDeque::new();
        examples.push_back(example.clone());

        LearningPattern {
            key,
            signature: derive_signature(&example.original_code, &example.fixed_code),
            confidence,
            success_rate,
            usage_count: 1,
            last_updated: Utc::now(),
            examples,
        }
    }

    /// Write the snapshot through the backend, logging and swallowing
    /// failures.
    fn persist(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        let snapshot = {
            let state = self.lock_state();
            LearningSnapshot::new(
                state.patterns.values().cloned().collect(),
                state.examples.iter().cloned().collect(),
                state.metrics.clone(),
            )
        };

        if let Err(e) = backend.save(&snapshot) {
            warn!("Failed to persist learning snapshot: {}", e);
        }
    }
}

/// Derive a pattern signature from the difference between original and
/// fixed text, looking for recognizable repair idioms.
fn derive_signature(original: &str, fixed: &str) -> String {
    let added = |needle: &str| fixed.contains(needle) && !original.contains(needle);

    if added("?.") {
        "optional-chaining-guard"
    } else if added("is not None") || added("!= null") {
        "null-guard-insertion"
    } else if added("try") || added("except") || added("catch") {
        "error-handling-wrap"
    } else if added(".get(") {
        "safe-key-lookup"
    } else if added("len(") || added(".length") {
        "bounds-guard"
    } else if added("===") || added("str(") || added(": unknown") {
        "type-normalization"
    } else if added("let ") || added(" = None") || added("Object ") {
        "declaration-insertion"
    } else {
        "generic-transformation"
    }
    .to_string()
}
