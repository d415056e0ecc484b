#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All finding records (sorted by file, line, rule)
//! 2. One summary record per analysis, in input order
//! 3. One status record

use crate::engine::ScanResult;
use crate::types::RiskLevel;
use serde::Serialize;
use std::path::PathBuf;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a scan result as JSONL
    ///
    /// `fail_on` decides the `passed` flag of the status record.
    pub fn format(&self, result: &ScanResult, fail_on: RiskLevel) -> String {
        let mut output = String::new();

        let mut findings: Vec<FindingRecord> = result
            .analyses
            .iter()
            .flat_map(|analysis| analysis.findings.iter())
            .map(|finding| FindingRecord {
                record_type: "finding",
                rule: finding.rule_id.as_str().to_string(),
                class: finding.class.as_str(),
                category: finding.category.as_str().to_string(),
                risk: finding.risk.as_str(),
                file: finding.file.clone(),
                line: finding.line,
                column: finding.column,
                end_line: finding.end_line,
                end_column: finding.end_column,
                snippet: finding.snippet.clone(),
                description: finding.description.clone(),
                example: finding.example.clone(),
            })
            .collect();

        findings.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.line.cmp(&b.line))
                .then_with(|| a.rule.cmp(&b.rule))
        });

        for finding in findings {
            push_record(&mut output, &finding);
        }

        for analysis in &result.analyses {
            push_record(
                &mut output,
                &SummaryRecord {
                    record_type: "summary",
                    file: analysis.source.clone(),
                    findings: analysis.findings.len() as u64,
                    risk: analysis.risk_level.as_str(),
                },
            );
        }

        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: !result.exceeds(fail_on),
                files_scanned: result.analyses.len() as u64,
                files_skipped: result.skipped.len() as u64,
                total_findings: result.total_findings() as u64,
                risk: result.risk_level().as_str(),
            },
        );

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

/// Finding record for JSONL output
#[derive(Debug, Serialize)]
struct FindingRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: String,
    class: &'static str,
    category: String,
    risk: &'static str,
    file: Option<PathBuf>,
    line: u32,
    column: u32,
    end_line: u32,
    end_column: u32,
    snippet: String,
    description: String,
    example: String,
}

/// Summary record for JSONL output
#[derive(Debug, Serialize)]
struct SummaryRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    file: Option<PathBuf>,
    findings: u64,
    risk: &'static str,
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    files_scanned: u64,
    files_skipped: u64,
    total_findings: u64,
    risk: &'static str,
}
