#![forbid(unsafe_code)]

//! confusion-scan: detect Apache Confusion Attack patterns
//!
//! Scans Apache HTTP Server configuration text for rewrite and access-control
//! patterns known to enable Filename Confusion and DocumentRoot Confusion
//! attacks, and renders a markdown report with risk ratings, exploitation
//! hints and remediation advice.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{AnalyzeError, ConfigError, RuleError, ScanError};

// Re-export core domain types for convenient access
pub use engine::{Analysis, Analyzer, ScanResult};
pub use types::{Category, GlobPattern, RiskLevel, RuleId, VulnClass};

use report::MarkdownFormatter;
use rules::RuleRegistry;

/// Analyze one configuration snippet with the built-in rules
///
/// Returns the markdown report. Blank input yields a short message asking
/// for configuration content instead of a report.
///
/// # Errors
///
/// Returns `ScanError::Rule` if the built-in catalog fails to load.
pub fn analyze_config(text: &str) -> Result<String, ScanError> {
    let analyzer = Analyzer::new(RuleRegistry::with_builtin_rules()?);
    let formatter = MarkdownFormatter::new();

    match analyzer.analyze(None, text) {
        Ok(analysis) => Ok(formatter.format(&analysis)),
        Err(AnalyzeError::EmptyInput) => Ok(formatter.empty_input()),
    }
}
