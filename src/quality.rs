//! Code quality assessment.
//!
//! Deterministic, stateless scoring of the submitted source text. Nothing
//! here parses the code; complexity is approximated by counting branching
//! and logical-operator occurrences, which tracks cyclomatic complexity
//! closely enough for an advisory score.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::Language;

// ============================================================================
// Metrics
// ============================================================================

/// Derived quality scores for a piece of source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeQualityMetrics {
    /// Approximate cyclomatic complexity (always >= 1).
    pub complexity: u32,
    /// 0-100, penalized by complexity and length.
    pub maintainability: u32,
    /// 0-100, penalized by long lines, rewarded by comment density.
    pub readability: u32,
    /// 0-100, penalized for known-slow idioms.
    pub performance: u32,
}

// ============================================================================
// Assessor
// ============================================================================

/// Computes [`CodeQualityMetrics`] from source text.
pub struct QualityAssessor {
    branch_pattern: Regex,
    slow_idioms: Vec<(Regex, u32)>,
}

impl QualityAssessor {
    /// Build the assessor with its fixed heuristic tables.
    pub fn new() -> Self {
        let re = |p: &str| {
            Regex::new(p).unwrap_or_else(|e| panic!("invalid quality pattern '{}': {}", p, e))
        };
        Self {
            branch_pattern: re(
                r"\b(if|else if|elif|for|while|case|when|catch|except)\b|&&|\|\||\?\s*[^.:]",
            ),
            // Known-slow idioms and their score penalty.
            slow_idioms: vec![
                // Dynamic code evaluation
                (re(r"\beval\s*\(|new\s+Function\s*\("), 30),
                // Repeated uncached lookups inside loops
                (
                    re(r"for\s*\([^)]*\.length|while\s*\([^)]*\.length"),
                    15,
                ),
                // DOM queries in loops are a classic hot spot
                (re(r"(for|while)[\s\S]{0,120}querySelector"), 20),
                // String building by += in a loop
                (re(r"(for|while)[\s\S]{0,120}\+="), 10),
                // Synchronous filesystem calls
                (re(r"readFileSync|writeFileSync"), 10),
            ],
        }
    }

    /// Assess `code` and return its metrics.
    ///
    /// All four values are deterministic functions of the text; the
    /// `language` parameter exists so future tables can specialize, and is
    /// currently unused by the formulas.
    pub fn assess(&self, code: &str, _language: Language) -> CodeQualityMetrics {
        let complexity = self.complexity(code);
        let line_count = code.lines().count() as u32;

        let maintainability = 100u32
            .saturating_sub(complexity.saturating_mul(10))
            .saturating_sub(line_count / 10);

        CodeQualityMetrics {
            complexity,
            maintainability,
            readability: self.readability(code),
            performance: self.performance(code),
        }
    }

    /// 1 + number of branching/logical-operator occurrences.
    fn complexity(&self, code: &str) -> u32 {
        1 + self.branch_pattern.find_iter(code).count() as u32
    }

    /// Penalizes long average line length, rewards comment density.
    fn readability(&self, code: &str) -> u32 {
        let lines: Vec<&str> = code.lines().collect();
        if lines.is_empty() {
            return 100;
        }

        let total_len: usize = lines.iter().map(|l| l.len()).sum();
        let avg_len = total_len as f64 / lines.len() as f64;

        let comment_lines = lines
            .iter()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with("//") || t.starts_with('#') || t.starts_with("/*") || t.starts_with('*')
            })
            .count();
        let comment_density = comment_lines as f64 / lines.len() as f64;

        // Every 2 chars of average line length over 60 costs a point;
        // comment density buys back up to 20 points.
        let length_penalty = ((avg_len - 60.0).max(0.0) / 2.0).min(50.0);
        let comment_bonus = (comment_density * 100.0).min(20.0);

        (100.0 - length_penalty + comment_bonus).clamp(0.0, 100.0) as u32
    }

    /// Starts at 100 and subtracts a fixed penalty per matched slow idiom.
    fn performance(&self, code: &str) -> u32 {
        let mut score = 100u32;
        for (pattern, penalty) in &self.slow_idioms {
            if pattern.is_match(code) {
                score = score.saturating_sub(*penalty);
            }
        }
        score
    }
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self::new()
    }
}
