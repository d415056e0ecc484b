#![forbid(unsafe_code)]

//! Regex-based catalog rule
//!
//! A PatternRule pairs one regular expression with the vulnerability
//! metadata printed when it matches.

use crate::error::RuleError;
use crate::rules::{Finding, Rule, ScanContext};
use crate::types::{Category, RiskLevel, RuleId, VulnClass};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

/// TOML structure for rule definitions
///
/// Deserialized from the embedded files in builtin-rules/ and from the
/// custom rules directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternRuleDefinition {
    rule: RuleSection,
    #[serde(rename = "match")]
    match_section: MatchSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSection {
    id: String,
    class: VulnClass,
    category: String,
    risk: RiskLevel,
    description: String,
    example: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchSection {
    pattern: String,
    #[serde(default = "default_true")]
    case_insensitive: bool,
    #[serde(default)]
    dot_matches_newline: bool,
}

fn default_true() -> bool {
    true
}

/// A rule that flags configuration text matching a regular expression
///
/// The pattern always runs in multi-line mode, so `^` and `$` anchor at
/// line boundaries.
pub struct PatternRule {
    id: RuleId,
    class: VulnClass,
    category: Category,
    risk: RiskLevel,
    description: String,
    example: String,
    pattern: Regex,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("category", &self.category)
            .field("risk", &self.risk)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl PatternRule {
    /// Parse a PatternRule from TOML content
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` if:
    /// - TOML syntax is invalid or a field is missing or unknown
    /// - The rule ID or category key is invalid
    /// - The risk is `safe`, which no rule may report
    ///
    /// Returns `RuleError::InvalidRegex` if the pattern does not compile.
    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let def: PatternRuleDefinition = toml::from_str(content)
            .map_err(|e| RuleError::InvalidDefinition(format!("Failed to parse TOML: {}", e)))?;

        let id = RuleId::new(def.rule.id.clone()).ok_or_else(|| {
            RuleError::InvalidDefinition(format!("Invalid rule ID: {}", def.rule.id))
        })?;

        let category = Category::new(def.rule.category.clone()).ok_or_else(|| {
            RuleError::InvalidDefinition(format!(
                "Invalid category '{}' for rule {} (expected a snake_case key)",
                def.rule.category, id
            ))
        })?;

        if def.rule.risk == RiskLevel::Safe {
            return Err(RuleError::InvalidDefinition(format!(
                "Rule {} cannot use risk 'safe'",
                id
            )));
        }

        let pattern = RegexBuilder::new(&def.match_section.pattern)
            .multi_line(true)
            .case_insensitive(def.match_section.case_insensitive)
            .dot_matches_new_line(def.match_section.dot_matches_newline)
            .build()
            .map_err(|e| {
                RuleError::InvalidRegex(format!(
                    "Failed to compile pattern '{}': {}",
                    def.match_section.pattern, e
                ))
            })?;

        Ok(PatternRule {
            id,
            class: def.rule.class,
            category,
            risk: def.rule.risk,
            description: def.rule.description,
            example: def.rule.example,
            pattern,
        })
    }

    /// Parse a PatternRule from a TOML file path
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuleError::InvalidDefinition(format!("Failed to read file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            RuleError::InvalidRegex(msg) => {
                RuleError::InvalidRegex(format!("{} (in {})", msg, path.display()))
            }
            other => RuleError::InvalidDefinition(format!("{}: {}", path.display(), other)),
        })
    }
}

impl Rule for PatternRule {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn class(&self) -> VulnClass {
        self.class
    }

    fn category(&self) -> &Category {
        &self.category
    }

    fn risk(&self) -> RiskLevel {
        self.risk
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn example(&self) -> &str {
        &self.example
    }

    fn execute(&self, ctx: &ScanContext) -> Vec<Finding> {
        self.pattern
            .find_iter(ctx.content)
            .map(|m| {
                let (line, column) = ctx.position(m.start());
                let (end_line, end_column) = ctx.position(m.end());

                Finding {
                    rule_id: self.id.clone(),
                    class: self.class,
                    category: self.category.clone(),
                    risk: self.risk,
                    file: ctx.source.map(Path::to_path_buf),
                    line,
                    column,
                    end_line,
                    end_column,
                    snippet: m.as_str().to_string(),
                    description: self.description.clone(),
                    example: self.example.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_RULE: &str = r#"
[rule]
id = "test-rule"
class = "documentroot-confusion"
category = "dangerous_rewrites"
risk = "high"
description = "Test description"
example = "curl http://server/html/etc/passwd%3F"

[match]
pattern = '''RewriteRule\s+["']?\^/html/'''
"#;

    #[test]
    fn test_from_toml_simple() {
        let rule = PatternRule::from_toml(SIMPLE_RULE).unwrap();
        assert_eq!(rule.id.as_str(), "test-rule");
        assert_eq!(rule.class, VulnClass::DocumentRootConfusion);
        assert_eq!(rule.category.as_str(), "dangerous_rewrites");
        assert_eq!(rule.risk, RiskLevel::High);
        assert_eq!(rule.description, "Test description");
        assert_eq!(rule.example, "curl http://server/html/etc/passwd%3F");
    }

    #[test]
    fn test_from_toml_invalid_rule_id() {
        let toml = SIMPLE_RULE.replace("\"test-rule\"", "\"invalid rule!\"");
        let result = PatternRule::from_toml(&toml);
        assert!(matches!(result, Err(RuleError::InvalidDefinition(_))));
    }

    #[test]
    fn test_from_toml_invalid_category() {
        let toml = SIMPLE_RULE.replace("\"dangerous_rewrites\"", "\"Dangerous Rewrites\"");
        let result = PatternRule::from_toml(&toml);
        assert!(matches!(result, Err(RuleError::InvalidDefinition(_))));
    }

    #[test]
    fn test_from_toml_rejects_safe_risk() {
        let toml = SIMPLE_RULE.replace("risk = \"high\"", "risk = \"safe\"");
        let result = PatternRule::from_toml(&toml);
        assert!(matches!(result, Err(RuleError::InvalidDefinition(_))));
    }

    #[test]
    fn test_from_toml_unknown_class() {
        let toml = SIMPLE_RULE.replace("documentroot-confusion", "handler-confusion");
        assert!(PatternRule::from_toml(&toml).is_err());
    }

    #[test]
    fn test_from_toml_invalid_regex() {
        let toml = r#"
[rule]
id = "bad-regex"
class = "filename-confusion"
category = "auth_bypass"
risk = "low"
description = "Test"
example = "n/a"

[match]
pattern = "[unclosed"
"#;

        let result = PatternRule::from_toml(toml);
        assert!(matches!(result, Err(RuleError::InvalidRegex(_))));
    }

    #[test]
    fn test_from_toml_missing_field() {
        let toml = SIMPLE_RULE.replace("example = \"curl http://server/html/etc/passwd%3F\"", "");
        assert!(PatternRule::from_toml(&toml).is_err());
    }

    #[test]
    fn test_execute_reports_positions() {
        let rule = PatternRule::from_toml(SIMPLE_RULE).unwrap();
        let content = "RewriteEngine On\n  RewriteRule \"^/html/(.*)$\" \"/$1\"\n";
        let ctx = ScanContext::new(Some(Path::new("site.conf")), content);

        let findings = rule.execute(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].column, 3);
        assert_eq!(findings[0].end_line, 2);
        assert_eq!(findings[0].snippet, "RewriteRule \"^/html/");
        assert_eq!(findings[0].file.as_deref(), Some(Path::new("site.conf")));
        assert_eq!(findings[0].risk, RiskLevel::High);
    }

    #[test]
    fn test_execute_is_case_insensitive_by_default() {
        let rule = PatternRule::from_toml(SIMPLE_RULE).unwrap();
        let ctx = ScanContext::new(None, "rewriterule ^/html/a /b\nREWRITERULE ^/html/c /d");

        let findings = rule.execute(&ctx);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[1].line, 2);
    }

    #[test]
    fn test_execute_case_sensitive_when_requested() {
        let toml = SIMPLE_RULE.replace(
            "pattern = '''",
            "case_insensitive = false\npattern = '''",
        );
        let rule = PatternRule::from_toml(&toml).unwrap();
        let ctx = ScanContext::new(None, "rewriterule ^/html/a /b");

        assert!(rule.execute(&ctx).is_empty());
    }

    #[test]
    fn test_dot_matches_newline_flag() {
        let single_line = r#"
[rule]
id = "files-block"
class = "filename-confusion"
category = "auth_bypass"
risk = "medium"
description = "Test"
example = "n/a"

[match]
pattern = '''<Files[^>]*>\s*.*?Require all denied'''
"#;
        let content = "<Files \".env\">\n  Order allow,deny\n  Require all denied\n</Files>";

        let rule = PatternRule::from_toml(single_line).unwrap();
        assert!(rule.execute(&ScanContext::new(None, content)).is_empty());

        let dot_all = single_line.replace("pattern = '''", "dot_matches_newline = true\npattern = '''");
        let rule = PatternRule::from_toml(&dot_all).unwrap();
        let findings = rule.execute(&ScanContext::new(None, content));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[0].end_line, 3);
    }

    #[test]
    fn test_execute_no_match() {
        let rule = PatternRule::from_toml(SIMPLE_RULE).unwrap();
        let ctx = ScanContext::new(None, "DocumentRoot /var/www/html\n");
        assert!(rule.execute(&ctx).is_empty());
    }
}
