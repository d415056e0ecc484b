#![forbid(unsafe_code)]

//! Rule registry for managing and loading rules
//!
//! The RuleRegistry is responsible for:
//! - Loading the built-in catalog
//! - Loading custom rules from a directory of TOML files
//! - Disabling rules and overriding their risk based on configuration
//! - Keeping rules in a stable order, which is the order findings are reported in

use crate::config::Config;
use crate::error::RuleError;
use crate::rules::{Finding, PatternRule, Rule, ScanContext, load_builtin_rules};
use crate::types::{Category, RiskLevel, RuleId, VulnClass};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Where a registered rule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Builtin,
    Custom,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSource::Builtin => "builtin",
            RuleSource::Custom => "custom",
        }
    }
}

struct Entry {
    rule: Box<dyn Rule>,
    source: RuleSource,
}

/// Ordered registry of rules
///
/// Built-in rules come first in catalog order, followed by custom rules
/// sorted by file name. Rule IDs are unique.
pub struct RuleRegistry {
    entries: Vec<Entry>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a registry holding the built-in catalog
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if an embedded rule fails to parse.
    pub fn with_builtin_rules() -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for (_, rule) in load_builtin_rules()? {
            registry.add(rule, RuleSource::Builtin)?;
        }
        Ok(registry)
    }

    /// Build the registry a scan should use
    ///
    /// This method:
    /// 1. Loads the built-in catalog
    /// 2. Loads custom rules from `custom_dir`, if given
    /// 3. Applies the `[rules]` section of the configuration
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if any rule fails to load or a rule ID is duplicated.
    pub fn build_from_config(config: &Config, custom_dir: Option<&Path>) -> Result<Self, RuleError> {
        let mut registry = Self::with_builtin_rules()?;

        if let Some(dir) = custom_dir {
            registry.load_custom_rules(dir)?;
        }

        registry.apply_config(config);
        Ok(registry)
    }

    /// Register a rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` if a rule with the same ID is
    /// already registered.
    pub fn add(&mut self, rule: Box<dyn Rule>, source: RuleSource) -> Result<(), RuleError> {
        if self.get_rule(rule.id()).is_some() {
            return Err(RuleError::InvalidDefinition(format!(
                "Duplicate rule ID '{}'",
                rule.id().as_str()
            )));
        }
        self.entries.push(Entry { rule, source });
        Ok(())
    }

    /// Load custom rules from a directory
    ///
    /// Every `.toml` file directly inside `dir` is loaded as a PatternRule,
    /// in file name order. A missing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if:
    /// - A TOML file cannot be parsed
    /// - A rule definition is invalid
    /// - A rule ID is already registered
    /// - The directory cannot be read
    pub fn load_custom_rules(&mut self, dir: &Path) -> Result<(), RuleError> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "custom rule directory does not exist");
            return Ok(());
        }

        if !dir.is_dir() {
            return Err(RuleError::InvalidDefinition(format!(
                "Path is not a directory: {}",
                dir.display()
            )));
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            RuleError::InvalidDefinition(format!(
                "Failed to read directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RuleError::InvalidDefinition(format!(
                    "Failed to read directory entry in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let rule = PatternRule::from_path(&path)?;
            let rule_id = rule.id().clone();

            self.add(Box::new(rule), RuleSource::Custom).map_err(|_| {
                RuleError::InvalidDefinition(format!(
                    "Duplicate rule ID '{}' in file {}",
                    rule_id.as_str(),
                    path.display()
                ))
            })?;
            debug!(rule = %rule_id, path = %path.display(), "loaded custom rule");
        }

        Ok(())
    }

    /// Apply the `[rules]` section of the configuration
    ///
    /// Rules set to `false` are removed. Rules with a `risk` setting report
    /// that risk instead of their own. Rules are enabled by default.
    pub fn apply_config(&mut self, config: &Config) {
        for rule_id in config.rules.keys() {
            if self.get_rule(rule_id).is_none() {
                warn!(rule = %rule_id, "configuration refers to an unknown rule");
            }
        }

        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter(|entry| config.is_rule_enabled(entry.rule.id()))
            .map(|entry| match config.risk_override(entry.rule.id()) {
                Some(risk) if risk != entry.rule.risk() => Entry {
                    rule: Box::new(RiskOverride {
                        inner: entry.rule,
                        risk,
                    }),
                    source: entry.source,
                },
                _ => entry,
            })
            .collect();
    }

    /// Get a rule by its ID
    pub fn get_rule(&self, id: &RuleId) -> Option<&dyn Rule> {
        self.entries
            .iter()
            .find(|entry| entry.rule.id() == id)
            .map(|entry| entry.rule.as_ref())
    }

    /// Iterate over all rules in registry order
    pub fn iter_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.entries.iter().map(|entry| entry.rule.as_ref())
    }

    /// Iterate over all rules together with their source
    pub fn iter_with_source(&self) -> impl Iterator<Item = (&dyn Rule, RuleSource)> {
        self.entries
            .iter()
            .map(|entry| (entry.rule.as_ref(), entry.source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A rule whose reported risk was changed by configuration
struct RiskOverride {
    inner: Box<dyn Rule>,
    risk: RiskLevel,
}

impl Rule for RiskOverride {
    fn id(&self) -> &RuleId {
        self.inner.id()
    }

    fn class(&self) -> VulnClass {
        self.inner.class()
    }

    fn category(&self) -> &Category {
        self.inner.category()
    }

    fn risk(&self) -> RiskLevel {
        self.risk
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn example(&self) -> &str {
        self.inner.example()
    }

    fn execute(&self, ctx: &ScanContext) -> Vec<Finding> {
        self.inner
            .execute(ctx)
            .into_iter()
            .map(|mut finding| {
                finding.risk = self.risk;
                finding
            })
            .collect()
    }
}
