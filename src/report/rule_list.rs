#![forbid(unsafe_code)]

//! Rule listing formatters
//!
//! Formatters for the `confusion-scan list` command, in human-readable and
//! JSONL form.

use crate::rules::{RuleRegistry, RuleSource};
use serde::Serialize;

/// Listing entry for a single registered rule
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub rule_id: String,
    pub class: String,
    pub category: String,
    pub risk: String,
    pub source: RuleSource,
    pub description: String,
}

impl RuleInfo {
    /// Collect listing entries for every rule in the registry, in registry order
    pub fn from_registry(registry: &RuleRegistry) -> Vec<RuleInfo> {
        registry
            .iter_with_source()
            .map(|(rule, source)| RuleInfo {
                rule_id: rule.id().as_str().to_string(),
                class: rule.class().display_name().to_string(),
                category: rule.category().as_str().to_string(),
                risk: rule.risk().as_str().to_string(),
                source,
                description: rule.description().to_string(),
            })
            .collect()
    }
}

/// Human-readable formatter for the rule listing
pub struct RuleListHumanFormatter;

impl RuleListHumanFormatter {
    pub fn new() -> Self {
        RuleListHumanFormatter
    }

    pub fn format(&self, rules: &[RuleInfo]) -> String {
        let mut output = String::new();

        output.push_str(&format!("Rules ({} enabled):\n", rules.len()));
        output.push('\n');

        for rule in rules {
            output.push_str(&format!("{} ({})\n", rule.rule_id, rule.source.as_str()));
            output.push_str(&format!("  Class: {}\n", rule.class));
            output.push_str(&format!("  Category: {}\n", rule.category));
            output.push_str(&format!("  Risk: {}\n", rule.risk));
            output.push_str(&format!("  Description: {}\n", rule.description));
            output.push('\n');
        }

        output
    }
}

impl Default for RuleListHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct JsonlRuleInfo<'a> {
    rule_id: &'a str,
    source: &'static str,
    class: &'a str,
    category: &'a str,
    risk: &'a str,
    description: &'a str,
}

/// JSONL formatter for the rule listing
pub struct RuleListJsonlFormatter;

impl RuleListJsonlFormatter {
    pub fn new() -> Self {
        RuleListJsonlFormatter
    }

    /// One JSON object per line for each rule
    pub fn format(&self, rules: &[RuleInfo]) -> String {
        let mut output = String::new();

        for rule in rules {
            let record = JsonlRuleInfo {
                rule_id: &rule.rule_id,
                source: rule.source.as_str(),
                class: &rule.class,
                category: &rule.category,
                risk: &rule.risk,
                description: &rule.description,
            };

            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }

        output
    }
}

impl Default for RuleListJsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}
