#![forbid(unsafe_code)]

//! Core Rule trait and related types for defining and executing rules

use crate::types::{Category, RiskLevel, RuleId, VulnClass};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Input handed to every rule during a scan
///
/// Line start offsets are computed once here so that each rule can turn
/// byte offsets into positions without rescanning the text.
#[derive(Debug)]
pub struct ScanContext<'a> {
    /// File the text came from, if any
    pub source: Option<&'a Path>,

    /// Full configuration text
    pub content: &'a str,

    line_offsets: Vec<usize>,
}

impl<'a> ScanContext<'a> {
    pub fn new(source: Option<&'a Path>, content: &'a str) -> Self {
        Self {
            source,
            content,
            line_offsets: compute_line_offsets(content),
        }
    }

    /// Convert a byte offset into 1-indexed (line, column)
    ///
    /// The line equals the number of newlines before `offset`, plus one.
    /// The column counts characters, not bytes.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        offset_to_line_col(self.content, offset, &self.line_offsets)
    }
}

/// Compute line start offsets
///
/// Returns a vector where each element is the byte offset of the start of a line.
/// Line 0 starts at offset 0.
fn compute_line_offsets(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Binary search on precomputed line offsets
fn offset_to_line_col(content: &str, offset: usize, line_offsets: &[usize]) -> (u32, u32) {
    let line_idx = line_offsets
        .partition_point(|&o| o <= offset)
        .saturating_sub(1);
    let line_start = line_offsets[line_idx];

    // Offsets that split a character fall back to the byte distance
    let chars_before = content
        .get(line_start..offset)
        .map_or(offset.saturating_sub(line_start), |prefix| prefix.chars().count());

    ((line_idx + 1) as u32, (chars_before + 1) as u32)
}

/// A single pattern match reported by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// ID of the rule that matched
    pub rule_id: RuleId,

    /// Vulnerability class of the rule
    pub class: VulnClass,

    /// Sub-category of the rule inside its class
    pub category: Category,

    /// Risk rating of the rule
    pub risk: RiskLevel,

    /// File the match was found in, if the text came from a file
    pub file: Option<PathBuf>,

    /// Line number where the match starts (1-indexed)
    pub line: u32,

    /// Column number where the match starts (1-indexed, in characters)
    pub column: u32,

    /// Line number where the match ends (1-indexed)
    pub end_line: u32,

    /// Column just past the end of the match (1-indexed, in characters)
    pub end_column: u32,

    /// Exact matched text
    pub snippet: String,

    /// Why the matched configuration is dangerous
    pub description: String,

    /// Example request exploiting the weakness
    pub example: String,
}

/// Trait that all rules must implement
///
/// The trait is `Send + Sync` so one registry can be shared by parallel file scans.
pub trait Rule: Send + Sync {
    /// Returns the unique identifier for this rule
    fn id(&self) -> &RuleId;

    fn class(&self) -> VulnClass;

    fn category(&self) -> &Category;

    fn risk(&self) -> RiskLevel;

    /// Returns a human-readable description of the weakness
    fn description(&self) -> &str;

    /// Returns an example exploitation payload
    fn example(&self) -> &str;

    /// Executes the rule against the provided context
    ///
    /// Returns every match in order of position, or an empty vector.
    fn execute(&self, ctx: &ScanContext) -> Vec<Finding>;
}
