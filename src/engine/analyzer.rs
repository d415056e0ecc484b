#![forbid(unsafe_code)]

//! Single-pass analyzer
//!
//! The Analyzer applies every rule of a registry to a piece of configuration
//! text and folds the matches into an [`Analysis`]. Multi-file scans run one
//! analysis per file in parallel using rayon.

use crate::error::AnalyzeError;
use crate::rules::{Finding, RuleRegistry, ScanContext};
use crate::types::{RiskLevel, VulnClass};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of analyzing one piece of configuration text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// File the text came from, None for stdin or in-memory text
    pub source: Option<PathBuf>,

    /// Findings in registry order, then in order of position
    pub findings: Vec<Finding>,

    /// Highest risk among the findings, `Safe` when there are none
    pub risk_level: RiskLevel,
}

impl Analysis {
    /// Builds an analysis from findings, deriving the overall risk level
    pub fn new(source: Option<PathBuf>, findings: Vec<Finding>) -> Self {
        let risk_level = findings
            .iter()
            .map(|f| f.risk)
            .max()
            .unwrap_or(RiskLevel::Safe);

        Self {
            source,
            findings,
            risk_level,
        }
    }

    /// An analysis without findings
    pub fn clean(source: Option<PathBuf>) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns true if any finding belongs to `class`
    pub fn has_class(&self, class: VulnClass) -> bool {
        self.findings.iter().any(|f| f.class == class)
    }

    /// Returns true if the analysis has a finding at or above `threshold`
    pub fn exceeds(&self, threshold: RiskLevel) -> bool {
        !self.is_clean() && self.risk_level >= threshold
    }

    /// Group findings by vulnerability class
    ///
    /// Groups appear in the order their first finding appears; findings keep
    /// their relative order inside a group.
    pub fn grouped_by_class(&self) -> Vec<(VulnClass, Vec<&Finding>)> {
        let mut groups: Vec<(VulnClass, Vec<&Finding>)> = Vec::new();

        for finding in &self.findings {
            match groups.iter_mut().find(|(class, _)| *class == finding.class) {
                Some((_, members)) => members.push(finding),
                None => groups.push((finding.class, vec![finding])),
            }
        }

        groups
    }
}

/// A file that could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of analyzing several files
#[derive(Debug, Default)]
pub struct ScanResult {
    /// One analysis per readable input, in input order
    pub analyses: Vec<Analysis>,

    /// Inputs that could not be read
    pub skipped: Vec<SkippedFile>,
}

impl ScanResult {
    /// Highest risk over every analysis
    pub fn risk_level(&self) -> RiskLevel {
        self.analyses
            .iter()
            .map(|a| a.risk_level)
            .max()
            .unwrap_or(RiskLevel::Safe)
    }

    pub fn total_findings(&self) -> usize {
        self.analyses.iter().map(|a| a.findings.len()).sum()
    }

    /// Returns true if any analysis has a finding at or above `threshold`
    pub fn exceeds(&self, threshold: RiskLevel) -> bool {
        self.analyses.iter().any(|a| a.exceeds(threshold))
    }
}

/// Analyzer that applies a rule registry to configuration text
pub struct Analyzer {
    registry: Arc<RuleRegistry>,
}

impl Analyzer {
    /// Creates a new Analyzer with the provided rule registry
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Analyze a piece of configuration text
    ///
    /// Every rule runs over the whole text; findings are collected rule by
    /// rule in registry order.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError::EmptyInput` if the text is empty or whitespace only.
    pub fn analyze(&self, source: Option<&Path>, content: &str) -> Result<Analysis, AnalyzeError> {
        if content.trim().is_empty() {
            return Err(AnalyzeError::EmptyInput);
        }

        let ctx = ScanContext::new(source, content);
        let findings: Vec<Finding> = self
            .registry
            .iter_rules()
            .flat_map(|rule| rule.execute(&ctx))
            .collect();

        let analysis = Analysis::new(source.map(Path::to_path_buf), findings);
        debug!(
            source = %source.map(|p| p.display().to_string()).unwrap_or_else(|| "<input>".to_string()),
            findings = analysis.findings.len(),
            risk = %analysis.risk_level,
            "analysis complete"
        );
        Ok(analysis)
    }

    /// Analyze files in parallel
    ///
    /// Analyses come back in input order. Unreadable files are recorded in
    /// `skipped`; blank files produce a clean analysis.
    pub fn analyze_files(&self, files: &[PathBuf]) -> ScanResult {
        let outcomes: Vec<Result<Analysis, SkippedFile>> = files
            .par_iter()
            .map(|path| self.analyze_file(path))
            .collect();

        let mut result = ScanResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(analysis) => result.analyses.push(analysis),
                Err(skipped) => result.skipped.push(skipped),
            }
        }
        result
    }

    fn analyze_file(&self, path: &Path) -> Result<Analysis, SkippedFile> {
        let content = fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to read file");
            SkippedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        match self.analyze(Some(path), &content) {
            Ok(analysis) => Ok(analysis),
            Err(AnalyzeError::EmptyInput) => {
                debug!(path = %path.display(), "file is empty");
                Ok(Analysis::clean(Some(path.to_path_buf())))
            }
        }
    }
}
