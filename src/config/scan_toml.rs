//! Parsing and validation for confusion-scan.toml configuration files

use crate::error::ConfigError;
use crate::types::{GlobPattern, RiskLevel, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "confusion-scan.toml";

/// Main configuration struct for confusion-scan.toml
///
/// Every section is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File discovery and exit status settings
    #[serde(default)]
    pub scan: ScanSettings,

    /// Per-rule overrides keyed by rule ID
    #[serde(default)]
    pub rules: HashMap<RuleId, RuleValue>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file, or defaults if the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the override configured for a rule, if any
    pub fn rule_value(&self, id: &RuleId) -> Option<&RuleValue> {
        self.rules.get(id)
    }

    /// Returns false only if the rule is explicitly disabled
    pub fn is_rule_enabled(&self, id: &RuleId) -> bool {
        !matches!(self.rules.get(id), Some(RuleValue::Enabled(false)))
    }

    /// Returns the risk override configured for a rule
    pub fn risk_override(&self, id: &RuleId) -> Option<RiskLevel> {
        match self.rules.get(id) {
            Some(RuleValue::Settings(settings)) => settings.risk,
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.scan.version
            )));
        }

        if self.scan.fail_on == RiskLevel::Safe {
            return Err(ConfigError::Validation(
                "fail_on cannot be 'safe'; use 'low' to fail on any finding".to_string(),
            ));
        }

        for pattern in &self.scan.include {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid include glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for pattern in &self.scan.exclude {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid exclude glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for (rule_id, rule_value) in &self.rules {
            if let RuleValue::Settings(settings) = rule_value
                && settings.risk == Some(RiskLevel::Safe)
            {
                return Err(ConfigError::Validation(format!(
                    "Rule '{}' cannot be downgraded to risk 'safe'; disable it instead",
                    rule_id.as_str()
                )));
            }
        }

        Ok(())
    }
}

/// `[scan]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSettings {
    /// Configuration version (must be "1")
    #[serde(default = "default_version")]
    pub version: String,

    /// Files picked up when a directory is scanned
    #[serde(default = "default_include")]
    pub include: Vec<GlobPattern>,

    /// Files skipped when a directory is scanned
    #[serde(default)]
    pub exclude: Vec<GlobPattern>,

    /// Lowest risk that makes the scan exit with a failure status
    #[serde(default = "default_fail_on")]
    pub fail_on: RiskLevel,

    /// Directory holding custom rule files, relative to the config file
    #[serde(default = "default_custom_rules")]
    pub custom_rules: PathBuf,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            include: default_include(),
            exclude: Vec::new(),
            fail_on: default_fail_on(),
            custom_rules: default_custom_rules(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_include() -> Vec<GlobPattern> {
    vec![
        GlobPattern::new("**/*.conf"),
        GlobPattern::new("**/.htaccess"),
        GlobPattern::new("**/*.htaccess"),
    ]
}

fn default_fail_on() -> RiskLevel {
    RiskLevel::Low
}

fn default_custom_rules() -> PathBuf {
    PathBuf::from("confusion-rules")
}

/// A rule can be enabled with a boolean or configured with settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Simple boolean enable/disable
    Enabled(bool),
    /// Settings table for the rule
    Settings(RuleSettings),
}

/// Settings for individual rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSettings {
    /// Risk reported for this rule instead of its catalog risk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown report
    #[default]
    Markdown,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
