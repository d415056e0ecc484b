#![forbid(unsafe_code)]

//! Built-in rules embedded at compile time
//!
//! The catalog is compiled into the binary with `include_str!`, so the
//! scanner is self-contained. Order matters: reports list findings in the
//! order the rules appear here.

use crate::error::RuleError;
use crate::rules::{PatternRule, Rule};
use crate::types::RuleId;
use tracing::debug;

/// Type alias for a list of rules with their IDs
type RuleList = Vec<(RuleId, Box<dyn Rule>)>;

/// Filename Confusion rules
const BUILTIN_FILENAME_RULES: &[(&str, &str)] = &[
    (
        "rewrite-capture-truncation",
        include_str!("../../builtin-rules/filename-confusion/rewrite-capture-truncation.toml"),
    ),
    (
        "rewrite-php-handler-flag",
        include_str!("../../builtin-rules/filename-confusion/rewrite-php-handler-flag.toml"),
    ),
    (
        "rewrite-extension-handler-flag",
        include_str!("../../builtin-rules/filename-confusion/rewrite-extension-handler-flag.toml"),
    ),
    (
        "files-auth-bypass",
        include_str!("../../builtin-rules/filename-confusion/files-auth-bypass.toml"),
    ),
    (
        "files-access-control",
        include_str!("../../builtin-rules/filename-confusion/files-access-control.toml"),
    ),
];

/// DocumentRoot Confusion rules
const BUILTIN_DOCUMENTROOT_RULES: &[(&str, &str)] = &[
    (
        "docroot-capture-to-root",
        include_str!("../../builtin-rules/documentroot-confusion/docroot-capture-to-root.toml"),
    ),
    (
        "docroot-html-prefix",
        include_str!("../../builtin-rules/documentroot-confusion/docroot-html-prefix.toml"),
    ),
    (
        "docroot-static-prefix",
        include_str!("../../builtin-rules/documentroot-confusion/docroot-static-prefix.toml"),
    ),
];

/// Load the built-in catalog from embedded resources
///
/// Returns (rule_id, boxed rule) pairs, Filename Confusion rules first.
///
/// # Errors
///
/// Returns `RuleError` if an embedded definition fails to parse.
pub fn load_builtin_rules() -> Result<RuleList, RuleError> {
    let mut rules = Vec::new();

    for (rule_name, toml_content) in BUILTIN_FILENAME_RULES
        .iter()
        .chain(BUILTIN_DOCUMENTROOT_RULES)
    {
        let rule = PatternRule::from_toml(toml_content).map_err(|e| {
            RuleError::InvalidDefinition(format!(
                "Failed to parse built-in rule '{}': {}",
                rule_name, e
            ))
        })?;

        debug!(rule = *rule_name, risk = %rule.risk(), "loaded built-in rule");
        let rule_id = rule.id().clone();
        rules.push((rule_id, Box::new(rule) as Box<dyn Rule>));
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RiskLevel, VulnClass};

    #[test]
    fn test_load_builtin_rules() {
        let rules = load_builtin_rules().unwrap();
        assert_eq!(rules.len(), 8);

        let rule_ids: Vec<&str> = rules.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec![
                "rewrite-capture-truncation",
                "rewrite-php-handler-flag",
                "rewrite-extension-handler-flag",
                "files-auth-bypass",
                "files-access-control",
                "docroot-capture-to-root",
                "docroot-html-prefix",
                "docroot-static-prefix",
            ]
        );
    }

    #[test]
    fn test_embedded_names_match_rule_ids() {
        for (rule_id, rule) in load_builtin_rules().unwrap() {
            assert_eq!(rule.id(), &rule_id);
            assert!(!rule.description().is_empty());
            assert!(!rule.example().is_empty());
        }
    }

    #[test]
    fn test_builtin_classes_and_risks() {
        let rules = load_builtin_rules().unwrap();
        let lookup = |id: &str| {
            rules
                .iter()
                .find(|(rule_id, _)| rule_id.as_str() == id)
                .map(|(_, rule)| (rule.class(), rule.category().as_str().to_string(), rule.risk()))
                .unwrap()
        };

        assert_eq!(
            lookup("rewrite-capture-truncation"),
            (VulnClass::FilenameConfusion, "path_truncation".to_string(), RiskLevel::High)
        );
        assert_eq!(
            lookup("rewrite-extension-handler-flag"),
            (VulnClass::FilenameConfusion, "rewrite_flag_bypass".to_string(), RiskLevel::Medium)
        );
        assert_eq!(
            lookup("files-access-control"),
            (VulnClass::FilenameConfusion, "auth_bypass".to_string(), RiskLevel::Medium)
        );
        assert_eq!(
            lookup("docroot-capture-to-root"),
            (VulnClass::DocumentRootConfusion, "dangerous_rewrites".to_string(), RiskLevel::Critical)
        );
    }
}
