#![forbid(unsafe_code)]

//! Markdown report formatter
//!
//! Renders an [`Analysis`] as the human-readable report: risk banner,
//! findings grouped by vulnerability class, exploitation hints, payload
//! examples and remediation advice.

use crate::engine::{Analysis, ScanResult};
use crate::report::guidance;
use crate::rules::Finding;
use crate::types::VulnClass;

/// Number of payload examples listed at the end of a report
const MAX_PAYLOAD_EXAMPLES: usize = 3;

/// Markdown report formatter
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Creates a new MarkdownFormatter
    pub fn new() -> Self {
        MarkdownFormatter
    }

    /// Message rendered when there was nothing to analyze
    pub fn empty_input(&self) -> String {
        guidance::EMPTY_INPUT.to_string()
    }

    /// Format one analysis as a markdown report
    pub fn format(&self, analysis: &Analysis) -> String {
        let mut output = String::new();

        output.push_str("# 🔍 **Vulnerability Scan Results**\n\n");
        output.push_str(&format!(
            "**Risk Level:** {} **{}**\n\n",
            analysis.risk_level.icon(),
            analysis.risk_level.display_name()
        ));

        if let Some(source) = &analysis.source {
            output.push_str(&format!("**Source:** `{}`\n\n", source.display()));
        }

        if analysis.is_clean() {
            output.push_str(guidance::NO_FINDINGS);
            return output;
        }

        output.push_str("## 📋 **Potential Vulnerabilities**\n\n");
        for (class, findings) in analysis.grouped_by_class() {
            output.push_str(&format!("### {}\n\n", class.display_name()));
            for (index, finding) in findings.iter().enumerate() {
                output.push_str(&format_finding(index + 1, finding));
            }
        }

        output.push_str(guidance::HINTS_HEADER);
        if analysis.has_class(VulnClass::FilenameConfusion) {
            output.push_str(guidance::FILENAME_CONFUSION_HINTS);
        }
        if analysis.has_class(VulnClass::DocumentRootConfusion) {
            output.push_str(guidance::DOCUMENTROOT_CONFUSION_HINTS);
        }

        output.push_str(guidance::COMMON_TARGETS);
        for example in payload_examples(&analysis.findings) {
            output.push_str(&format!("- `{}`\n", example));
        }

        output.push_str(guidance::REMEDIATION);
        output
    }

    /// Format every analysis of a scan, separated by horizontal rules
    pub fn format_all(&self, result: &ScanResult) -> String {
        result
            .analyses
            .iter()
            .map(|analysis| self.format(analysis))
            .collect::<Vec<_>>()
            .join("\n---\n\n")
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_finding(number: usize, finding: &Finding) -> String {
    format!(
        "**{}. {}** {}\n\n\
         - **Risk Level:** {}\n\
         - **Location:** line {}\n\
         - **Code:** `{}`\n\
         - **Description:** {}\n\
         - **Example Attack:** `{}`\n\n",
        number,
        finding.category.title(),
        finding.risk.icon(),
        finding.risk.display_name(),
        finding.line,
        finding.snippet,
        finding.description,
        finding.example,
    )
}

/// Example payloads of the first findings, repeats included
fn payload_examples(findings: &[Finding]) -> Vec<&str> {
    findings
        .iter()
        .take(MAX_PAYLOAD_EXAMPLES)
        .map(|f| f.example.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, RiskLevel, RuleId};
    use std::path::PathBuf;

    fn finding(
        rule_id: &str,
        class: VulnClass,
        category: &str,
        risk: RiskLevel,
        line: u32,
        example: &str,
    ) -> Finding {
        Finding {
            rule_id: RuleId::new(rule_id).unwrap(),
            class,
            category: Category::new(category).unwrap(),
            risk,
            file: None,
            line,
            column: 1,
            end_line: line,
            end_column: 10,
            snippet: "RewriteRule ^/html/".to_string(),
            description: format!("{} description", rule_id),
            example: example.to_string(),
        }
    }

    #[test]
    fn test_clean_report() {
        let formatter = MarkdownFormatter::new();
        let output = formatter.format(&Analysis::clean(None));

        assert!(output.starts_with("# 🔍 **Vulnerability Scan Results**\n\n"));
        assert!(output.contains("**Risk Level:** ✅ **Safe**"));
        assert!(output.contains("No known Confusion Attack patterns found"));
        assert!(output.contains("3. Running security reviews regularly"));
        assert!(!output.contains("Potential Vulnerabilities"));
        assert!(!output.contains("Remediation"));
        assert!(!output.contains("**Source:**"));
    }

    #[test]
    fn test_source_line() {
        let formatter = MarkdownFormatter::new();
        let output = formatter.format(&Analysis::clean(Some(PathBuf::from("conf/httpd.conf"))));
        assert!(output.contains("**Source:** `conf/httpd.conf`"));
    }

    #[test]
    fn test_finding_block() {
        let formatter = MarkdownFormatter::new();
        let analysis = Analysis::new(
            None,
            vec![finding(
                "docroot-html-prefix",
                VulnClass::DocumentRootConfusion,
                "dangerous_rewrites",
                RiskLevel::High,
                3,
                "curl http://server/html/etc/passwd%3F",
            )],
        );

        let output = formatter.format(&analysis);
        assert!(output.contains("**Risk Level:** 🟠 **High**"));
        assert!(output.contains("### DocumentRoot Confusion\n\n**1. Dangerous Rewrites** 🟠\n\n"));
        assert!(output.contains("- **Risk Level:** High\n"));
        assert!(output.contains("- **Location:** line 3\n"));
        assert!(output.contains("- **Code:** `RewriteRule ^/html/`\n"));
        assert!(output.contains("- **Description:** docroot-html-prefix description\n"));
        assert!(output.contains("- **Example Attack:** `curl http://server/html/etc/passwd%3F`\n"));
    }

    #[test]
    fn test_hints_follow_classes() {
        let formatter = MarkdownFormatter::new();

        let docroot_only = Analysis::new(
            None,
            vec![finding(
                "docroot-static-prefix",
                VulnClass::DocumentRootConfusion,
                "dangerous_rewrites",
                RiskLevel::Medium,
                1,
                "try /static/../etc/passwd",
            )],
        );
        let output = formatter.format(&docroot_only);
        assert!(output.contains("#### DocumentRoot Confusion Attacks"));
        assert!(!output.contains("#### Filename Confusion Attacks"));

        let filename_only = Analysis::new(
            None,
            vec![finding(
                "files-auth-bypass",
                VulnClass::FilenameConfusion,
                "auth_bypass",
                RiskLevel::High,
                1,
                "curl http://server/admin.php%3Fooo.php",
            )],
        );
        let output = formatter.format(&filename_only);
        assert!(output.contains("#### Filename Confusion Attacks"));
        assert!(!output.contains("#### DocumentRoot Confusion Attacks"));
    }

    #[test]
    fn test_numbering_restarts_per_class() {
        let formatter = MarkdownFormatter::new();
        let analysis = Analysis::new(
            None,
            vec![
                finding("a", VulnClass::FilenameConfusion, "path_truncation", RiskLevel::High, 1, "e1"),
                finding("b", VulnClass::FilenameConfusion, "auth_bypass", RiskLevel::Medium, 2, "e2"),
                finding("c", VulnClass::DocumentRootConfusion, "dangerous_rewrites", RiskLevel::Critical, 3, "e3"),
            ],
        );

        let output = formatter.format(&analysis);
        assert!(output.contains("**1. Path Truncation** 🟠"));
        assert!(output.contains("**2. Auth Bypass** 🟡"));
        assert!(output.contains("**1. Dangerous Rewrites** 🔴"));
        assert!(output.contains("**Risk Level:** 🔴 **Critical**"));

        let filename = output.find("### Filename Confusion").unwrap();
        let docroot = output.find("### DocumentRoot Confusion").unwrap();
        assert!(filename < docroot);
    }

    #[test]
    fn test_payload_examples_capped_with_repeats() {
        let findings = vec![
            finding("a", VulnClass::FilenameConfusion, "path_truncation", RiskLevel::High, 1, "e1"),
            finding("b", VulnClass::FilenameConfusion, "path_truncation", RiskLevel::High, 2, "e1"),
            finding("c", VulnClass::FilenameConfusion, "auth_bypass", RiskLevel::High, 3, "e2"),
            finding("d", VulnClass::FilenameConfusion, "auth_bypass", RiskLevel::High, 4, "e3"),
            finding("e", VulnClass::FilenameConfusion, "auth_bypass", RiskLevel::High, 5, "e4"),
        ];

        assert_eq!(payload_examples(&findings), vec!["e1", "e1", "e2"]);

        let output = MarkdownFormatter::new().format(&Analysis::new(None, findings));
        let payloads = output.split("### Payload Examples\n").nth(1).unwrap();
        assert!(payloads.starts_with("- `e1`\n- `e1`\n- `e2`\n\n"));
        assert!(!payloads.contains("`e3`"));
    }

    #[test]
    fn test_report_ends_with_remediation() {
        let analysis = Analysis::new(
            None,
            vec![finding("a", VulnClass::FilenameConfusion, "path_truncation", RiskLevel::High, 1, "e1")],
        );
        let output = MarkdownFormatter::new().format(&analysis);

        assert!(output.contains("## ⚠️ **Remediation**"));
        assert!(output.contains("5. **Stay updated**"));
        assert!(output.trim_end().ends_with('*'));
    }

    #[test]
    fn test_format_all_joins_reports() {
        let result = ScanResult {
            analyses: vec![
                Analysis::clean(Some(PathBuf::from("a.conf"))),
                Analysis::clean(Some(PathBuf::from("b.conf"))),
            ],
            skipped: vec![],
        };

        let output = MarkdownFormatter::new().format_all(&result);
        assert_eq!(output.matches("# 🔍 **Vulnerability Scan Results**").count(), 2);
        assert!(output.contains("\n---\n\n# 🔍"));
    }

    #[test]
    fn test_empty_input_message() {
        let formatter = MarkdownFormatter::default();
        assert!(formatter.empty_input().contains("Please provide Apache configuration content"));
    }
}
