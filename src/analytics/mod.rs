//! Fix outcome aggregation and insight derivation.
//!
//! The aggregator is decoupled from the request path: it reads historical
//! fix records from an injected [`FixDataSource`] and recomputes the full
//! rollup on every tick. Insights derived from the rollup are retained
//! FIFO, capped at the most recent ten.

pub mod task;

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classify::ErrorKind;
use crate::error::Result;
use crate::language::Language;

// ============================================================================
// Configuration
// ============================================================================

/// Tuning knobs for the aggregator and its schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Seconds between scheduled rollups.
    pub interval_secs: u64,
    /// Total fixes above which a growth-trend insight fires.
    pub growth_threshold: u64,
    /// Today's volume must exceed this multiple of the trailing 7-day
    /// average for the anomaly insight.
    pub anomaly_factor: f64,
    /// Languages with success rate below this get a recommendation.
    pub recommendation_threshold: f64,
    /// Retained insight cap.
    pub insight_cap: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            growth_threshold: 100,
            anomaly_factor: 1.5,
            recommendation_threshold: 0.8,
            insight_cap: 10,
        }
    }
}

// ============================================================================
// Data source
// ============================================================================

/// One historical fix outcome as seen by analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixRecord {
    pub language: Language,
    pub error_kind: ErrorKind,
    pub success: bool,
    pub project: Option<String>,
    pub team: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Supplies the records each rollup aggregates. In production this reads
/// the durable store; tests substitute an in-memory fake.
pub trait FixDataSource: Send + Sync {
    fn fix_records(&self) -> Result<Vec<FixRecord>>;
}

/// In-memory data source, primarily for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    records: Mutex<Vec<FixRecord>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: FixRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

impl FixDataSource for MemoryDataSource {
    fn fix_records(&self) -> Result<Vec<FixRecord>> {
        Ok(self
            .records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default())
    }
}

/// Reads fix records out of the learning store's example history.
pub struct StoreDataSource {
    store: std::sync::Arc<crate::learning::PatternStore>,
    classifiers: crate::classify::ClassifierRegistry,
}

impl StoreDataSource {
    pub fn new(store: std::sync::Arc<crate::learning::PatternStore>) -> Self {
        Self {
            store,
            classifiers: crate::classify::ClassifierRegistry::new(),
        }
    }
}

impl FixDataSource for StoreDataSource {
    fn fix_records(&self) -> Result<Vec<FixRecord>> {
        Ok(self
            .store
            .examples()
            .into_iter()
            .map(|example| FixRecord {
                language: example.language,
                error_kind: self
                    .classifiers
                    .classify(example.language, example.error.as_deref()),
                success: example.success,
                project: example.context.clone(),
                team: example.team.clone(),
                timestamp: example.timestamp,
            })
            .collect())
    }
}

// ============================================================================
// Rollup output
// ============================================================================

/// Per-bucket fix counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub total: u64,
    pub successful: u64,
}

impl BucketStats {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64
        }
    }
}

/// One day of the 30-day series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub fixes: u64,
    pub successes: u64,
}

/// The full recomputed rollup from one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_fixes: u64,
    pub successful_fixes: u64,
    pub by_language: HashMap<Language, BucketStats>,
    pub by_error_kind: HashMap<ErrorKind, BucketStats>,
    /// Oldest day first, 30 entries ending today.
    pub daily_series: Vec<DailyCount>,
    pub by_project: HashMap<String, BucketStats>,
    pub by_team: HashMap<String, BucketStats>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Trend,
    Anomaly,
    Recommendation,
    Achievement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightImpact {
    Low,
    Medium,
    High,
}

/// One derived cross-cutting observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsInsight {
    pub id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: InsightImpact,
    pub actionable: bool,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsInsight {
    fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: InsightImpact,
        actionable: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            description: description.into(),
            impact,
            actionable,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Aggregator
// ============================================================================

struct AggregatorState {
    last_report: Option<AnalyticsReport>,
    insights: VecDeque<AnalyticsInsight>,
    ticks: u64,
}

/// Recomputes the rollup and derives insights on each tick.
pub struct AnalyticsAggregator {
    config: AnalyticsConfig,
    source: Box<dyn FixDataSource>,
    state: Mutex<AggregatorState>,
}

impl AnalyticsAggregator {
    pub fn new(config: AnalyticsConfig, source: Box<dyn FixDataSource>) -> Self {
        Self {
            config,
            source,
            state: Mutex::new(AggregatorState {
                last_report: None,
                insights: VecDeque::new(),
                ticks: 0,
            }),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run one full rollup: recompute the report and derive insights.
    ///
    /// A data-source failure is logged and the previous report stands.
    pub fn tick(&self) {
        let records = match self.source.fix_records() {
            Ok(records) => records,
            Err(e) => {
                warn!("Analytics data source failed, keeping previous rollup: {}", e);
                return;
            }
        };

        let report = build_report(&records, Utc::now());
        let insights = self.derive_insights(&report);
        debug!(
            total = report.total_fixes,
            insights = insights.len(),
            "analytics rollup complete"
        );

        let mut state = match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        for insight in insights {
            state.insights.push_back(insight);
        }
        while state.insights.len() > self.config.insight_cap {
            state.insights.pop_front();
        }
        state.last_report = Some(report);
        state.ticks += 1;
    }

    /// Retained insights, oldest first.
    pub fn insights(&self) -> Vec<AnalyticsInsight> {
        self.lock_state().insights.iter().cloned().collect()
    }

    /// The most recent rollup, if any tick has run.
    pub fn last_report(&self) -> Option<AnalyticsReport> {
        self.lock_state().last_report.clone()
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.lock_state().ticks
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AggregatorState> {
        match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn derive_insights(&self, report: &AnalyticsReport) -> Vec<AnalyticsInsight> {
        let mut insights = Vec::new();

        if report.total_fixes > self.config.growth_threshold {
            insights.push(AnalyticsInsight::new(
                InsightKind::Trend,
                "Fix volume is growing",
                format!(
                    "{} fixes recorded, above the {}-fix growth threshold.",
                    report.total_fixes, self.config.growth_threshold
                ),
                InsightImpact::Medium,
                false,
            ));
        }

        let best = report
            .by_language
            .iter()
            .filter(|(_, stats)| stats.total > 0)
            .max_by(|a, b| {
                a.1.success_rate()
                    .partial_cmp(&b.1.success_rate())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some((language, stats)) = best {
            insights.push(AnalyticsInsight::new(
                InsightKind::Achievement,
                format!("Strongest results in {}", language.tag()),
                format!(
                    "{} fixes succeed {:.0}% of the time, the best rate across languages.",
                    language.tag(),
                    stats.success_rate() * 100.0
                ),
                InsightImpact::Low,
                false,
            ));
        }

        let worst = report
            .by_language
            .iter()
            .filter(|(_, stats)| stats.total > 0)
            .min_by(|a, b| {
                a.1.success_rate()
                    .partial_cmp(&b.1.success_rate())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some((language, stats)) = worst {
            if stats.success_rate() < self.config.recommendation_threshold {
                insights.push(AnalyticsInsight::new(
                    InsightKind::Recommendation,
                    format!("Review {} fix strategies", language.tag()),
                    format!(
                        "{} fixes succeed only {:.0}% of the time, below the {:.0}% target.",
                        language.tag(),
                        stats.success_rate() * 100.0,
                        self.config.recommendation_threshold * 100.0
                    ),
                    InsightImpact::High,
                    true,
                ));
            }
        }

        if let Some(anomaly) = self.anomaly_insight(report) {
            insights.push(anomaly);
        }

        insights
    }

    /// Today's volume compared against the trailing 7-day average.
    fn anomaly_insight(&self, report: &AnalyticsReport) -> Option<AnalyticsInsight> {
        let series = &report.daily_series;
        let today = series.last()?;
        if series.len() < 8 {
            return None;
        }

        let trailing = &series[series.len() - 8..series.len() - 1];
        let avg = trailing.iter().map(|d| d.fixes).sum::<u64>() as f64 / trailing.len() as f64;
        if avg > 0.0 && today.fixes as f64 > self.config.anomaly_factor * avg {
            return Some(AnalyticsInsight::new(
                InsightKind::Anomaly,
                "Unusual fix volume today",
                format!(
                    "{} fixes today against a trailing 7-day average of {:.1}.",
                    today.fixes, avg
                ),
                InsightImpact::Medium,
                true,
            ));
        }
        None
    }
}

/// Recompute the full rollup from raw records.
fn build_report(records: &[FixRecord], now: DateTime<Utc>) -> AnalyticsReport {
    let mut by_language: HashMap<Language, BucketStats> = HashMap::new();
    let mut by_error_kind: HashMap<ErrorKind, BucketStats> = HashMap::new();
    let mut by_project: HashMap<String, BucketStats> = HashMap::new();
    let mut by_team: HashMap<String, BucketStats> = HashMap::new();
    let mut successful = 0u64;

    let today = now.date_naive();
    let mut daily: HashMap<NaiveDate, DailyCount> = HashMap::new();
    for offset in 0..30 {
        let date = today - Duration::days(offset);
        daily.insert(
            date,
            DailyCount {
                date,
                fixes: 0,
                successes: 0,
            },
        );
    }

    for record in records {
        let bump = |stats: &mut BucketStats| {
            stats.total += 1;
            if record.success {
                stats.successful += 1;
            }
        };
        bump(by_language.entry(record.language).or_default());
        bump(by_error_kind.entry(record.error_kind).or_default());
        if let Some(project) = &record.project {
            bump(by_project.entry(project.clone()).or_default());
        }
        if let Some(team) = &record.team {
            bump(by_team.entry(team.clone()).or_default());
        }
        if record.success {
            successful += 1;
        }

        if let Some(day) = daily.get_mut(&record.timestamp.date_naive()) {
            day.fixes += 1;
            if record.success {
                day.successes += 1;
            }
        }
    }

    let mut daily_series: Vec<DailyCount> = daily.into_values().collect();
    daily_series.sort_by_key(|d| d.date);

    AnalyticsReport {
        total_fixes: records.len() as u64,
        successful_fixes: successful,
        by_language,
        by_error_kind,
        daily_series,
        by_project,
        by_team,
        generated_at: now,
    }
}
