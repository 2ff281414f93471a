//! Supported languages for the repair pipeline.
//!
//! The classifier, fix strategies, and security battery all carry
//! language-specific rule tables, so the supported set is a closed enum
//! rather than a free-form string. Requests naming anything outside this
//! set are rejected up front with the supported list attached.
//!
//! # Example
//!
//! ```rust
//! use mender::Language;
//!
//! let lang: Language = "js".parse().unwrap();
//! assert_eq!(lang, Language::JavaScript);
//! assert_eq!(lang.tag(), "javascript");
//! assert!(Language::supported_tags().contains(&"python".to_string()));
//! ```

use std::fmt;
use std::str::FromStr;

/// A programming language the pipeline can analyze and repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
    /// Python
    Python,
    /// Java
    Java,
}

/// Static array of all supported languages for iteration
static ALL_LANGUAGES: &[Language] = &[
    Language::JavaScript,
    Language::TypeScript,
    Language::Python,
    Language::Java,
];

impl Language {
    /// Returns all supported languages.
    pub fn all() -> &'static [Language] {
        ALL_LANGUAGES
    }

    /// Returns the canonical lowercase tag used in requests and responses.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
        }
    }

    /// Returns the canonical tags of every supported language.
    ///
    /// This is the list surfaced to callers when they request an
    /// unsupported language.
    pub fn supported_tags() -> Vec<String> {
        ALL_LANGUAGES.iter().map(|l| l.tag().to_string()).collect()
    }

    /// Returns the comment prefix used when fix strategies inject
    /// explanatory comments.
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Language::Python => "#",
            _ => "//",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Java => "Java",
        };
        write!(f, "{}", name)
    }
}

/// Error returned when parsing an unsupported language name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    input: String,
}

impl ParseLanguageError {
    /// The rejected input string.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language: '{}'", self.input)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            _ => Err(ParseLanguageError {
                input: s.to_string(),
            }),
        }
    }
}
