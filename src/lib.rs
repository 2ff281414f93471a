//! Mender - Heuristic Code Repair Pipeline
//!
//! A pattern-matching bug analysis and repair advisor: given source code
//! and an optional error message it classifies the defect, scores security
//! and quality risk, generates and ranks candidate fixes, applies the best
//! one, explains the reasoning, and feeds the outcome back into a
//! continuously updated pattern library.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`classify`] - Error classification and root cause resolution
//! - [`security`] - Static unsafe-idiom scanning
//! - [`quality`] - Code quality scoring
//! - [`fix`] - Candidate generation and selection
//! - [`pipeline`] - The end-to-end fix request flow
//! - [`learning`] - Adaptive pattern store with durable persistence
//! - [`explain`] - On-demand explanation synthesis
//! - [`analytics`] - Outcome aggregation and insight derivation
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Custom error types and handling
//!
//! # Example
//!
//! ```rust,ignore
//! use mender::config::MenderConfig;
//! use mender::pipeline::{BugFixRequest, BugFixer};
//!
//! let config = MenderConfig::load(None)?;
//! let fixer = BugFixer::new(&config);
//!
//! let response = fixer.fix(&BugFixRequest {
//!     code: "user.name".to_string(),
//!     language: "javascript".to_string(),
//!     error: Some("TypeError: Cannot read property 'name' of undefined".to_string()),
//!     context: None,
//!     team: None,
//!     preferences: None,
//! })?;
//! println!("{}", response.fixed_code);
//! ```

pub mod analytics;
pub mod classify;
pub mod config;
pub mod error;
pub mod explain;
pub mod fix;
pub mod language;
pub mod learning;
pub mod pipeline;
pub mod quality;
pub mod security;

// Re-export commonly used types
pub use error::{MenderError, Result};

// Re-export pipeline types
pub use pipeline::{BugAnalysis, BugFixRequest, BugFixer, FixResponse};

// Re-export classification types
pub use classify::{ClassifierRegistry, ErrorKind, Severity};
pub use language::Language;

// Re-export fix types
pub use fix::{FixPreferences, FixSelector, FixStyle, FixSuggestion};

// Re-export learning types
pub use learning::{
    JsonFileBackend, LearningBackend, LearningConfig, LearningExample, LearningPattern,
    PatternKey, PatternStore,
};

// Re-export explanation types
pub use explain::{Explanation, ExplanationSynthesizer};

// Re-export analytics types
pub use analytics::{
    task::AnalyticsTask, AnalyticsAggregator, AnalyticsConfig, AnalyticsInsight, FixDataSource,
    FixRecord, InsightKind, StoreDataSource,
};
