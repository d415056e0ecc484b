//! List command implementation
//!
//! This module implements the `confusion-scan list` command, which prints
//! every enabled rule with its class, category, risk and source.

use crate::cli::args::ListFormat;
use crate::cli::common::{EXIT_CLEAN, build_registry, exit_code_for, load_config};
use crate::error::ScanError;
use crate::report::{RuleInfo, RuleListHumanFormatter, RuleListJsonlFormatter};
use crate::rules::RuleRegistry;
use std::path::Path;

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
/// - 3: Parse error in the configuration or a rule file
pub fn run_list(format: ListFormat, config: Option<&Path>) -> i32 {
    match load_registry(config) {
        Ok(registry) => {
            print!("{}", format_rules(&registry, format));
            EXIT_CLEAN
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}

fn load_registry(config: Option<&Path>) -> Result<RuleRegistry, ScanError> {
    let loaded = load_config(config)?;
    Ok(build_registry(&loaded)?)
}

fn format_rules(registry: &RuleRegistry, format: ListFormat) -> String {
    let rules = RuleInfo::from_registry(registry);
    match format {
        ListFormat::Human if rules.is_empty() => "No rules are enabled.\n".to_string(),
        ListFormat::Human => RuleListHumanFormatter::new().format(&rules),
        ListFormat::Jsonl => RuleListJsonlFormatter::new().format(&rules),
    }
}
