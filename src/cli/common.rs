//! Common helper functions shared across CLI commands
//!
//! This module provides shared functionality for loading configuration,
//! discovering files, and building rule registries.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::engine::file_walker::FileWalker;
use crate::error::{ConfigError, RuleError, ScanError};
use crate::rules::RuleRegistry;
use std::io;
use std::path::{Path, PathBuf};

/// Process exit codes
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Path argument that stands for standard input
pub const STDIN_PATH: &str = "-";

/// Configuration together with the file it was read from
#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

impl LoadedConfig {
    /// Directory custom rules are loaded from, relative to the config file
    pub fn custom_rules_dir(&self) -> PathBuf {
        let base = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        base.join(&self.config.scan.custom_rules)
    }
}

/// Load confusion-scan.toml
///
/// An explicitly named file must exist. Without one, `./confusion-scan.toml`
/// is used when present and defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigError::Io` if an explicit config file cannot be read.
/// Returns `ConfigError::Parse` or `ConfigError::Validation` if the file is invalid.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    match explicit {
        Some(path) => Ok(LoadedConfig {
            config: Config::load(path)?,
            path: path.to_path_buf(),
        }),
        None => {
            let path = PathBuf::from(CONFIG_FILE_NAME);
            Ok(LoadedConfig {
                config: Config::load_or_default(&path)?,
                path,
            })
        }
    }
}

/// Build rule registry from configuration
///
/// Loads the built-in catalog, then custom rules next to the config file,
/// then applies the `[rules]` section.
///
/// # Errors
///
/// Returns `RuleError` if there is an error loading or building rules.
pub(crate) fn build_registry(loaded: &LoadedConfig) -> Result<RuleRegistry, RuleError> {
    RuleRegistry::build_from_config(&loaded.config, Some(&loaded.custom_rules_dir()))
}

/// Inputs named on the command line
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Inputs {
    /// `-` was given
    pub stdin: bool,
    /// Files to analyze, in discovery order
    pub files: Vec<PathBuf>,
}

/// Resolve command-line paths into inputs
///
/// `-` selects stdin. Files named explicitly are always scanned; directories
/// are walked and filtered by the include/exclude patterns of the configuration.
///
/// # Errors
///
/// Returns `ScanError::Io` if a path does not exist and `ScanError::FileWalker`
/// if walking a directory fails.
pub(crate) fn discover_files(paths: &[String], config: &Config) -> Result<Inputs, ScanError> {
    let mut inputs = Inputs::default();

    for path_str in paths {
        if path_str == STDIN_PATH {
            inputs.stdin = true;
            continue;
        }

        let path = Path::new(path_str);
        if path.is_file() {
            inputs.files.push(path.to_path_buf());
        } else if path.is_dir() {
            let walker = FileWalker::new(path, &config.scan.include, &config.scan.exclude)?;
            let mut found = Vec::new();
            for result in walker.walk() {
                found.push(result?);
            }
            found.sort();
            inputs.files.extend(found);
        } else {
            return Err(ScanError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("path not found: {}", path_str),
            )));
        }
    }

    Ok(inputs)
}

/// Map an error to the process exit code
pub(crate) fn exit_code_for(error: &ScanError) -> i32 {
    match error {
        ScanError::Config(ConfigError::Parse(_) | ConfigError::Validation(_)) => EXIT_PARSE_ERROR,
        ScanError::Rule(_) => EXIT_PARSE_ERROR,
        _ => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exit_codes() {
        assert_eq!(EXIT_CLEAN, 0);
        assert_eq!(EXIT_FINDINGS, 1);
        assert_eq!(EXIT_ERROR, 2);
        assert_eq!(EXIT_PARSE_ERROR, 3);
    }

    #[test]
    fn test_load_config_explicit_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config(Some(&temp_dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_explicit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.toml");
        fs::write(&path, "[scan]\nfail_on = \"high\"\ncustom_rules = \"extra\"\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.config.scan.fail_on, crate::types::RiskLevel::High);
        assert_eq!(loaded.custom_rules_dir(), temp_dir.path().join("extra"));
    }

    #[test]
    fn test_custom_rules_dir_for_bare_file_name() {
        let loaded = LoadedConfig {
            config: Config::default(),
            path: PathBuf::from(CONFIG_FILE_NAME),
        };
        assert_eq!(loaded.custom_rules_dir(), Path::new(".").join("confusion-rules"));
    }

    #[test]
    fn test_discover_files_with_empty_paths() {
        let inputs = discover_files(&[], &Config::default()).unwrap();
        assert_eq!(inputs, Inputs::default());
    }

    #[test]
    fn test_discover_files_mixed_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("conf.d")).unwrap();
        fs::write(root.join("conf.d/b.conf"), "x").unwrap();
        fs::write(root.join("conf.d/a.conf"), "x").unwrap();
        fs::write(root.join("conf.d/readme.txt"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let paths = vec![
            "-".to_string(),
            root.join("notes.txt").to_string_lossy().to_string(),
            root.join("conf.d").to_string_lossy().to_string(),
        ];
        let inputs = discover_files(&paths, &Config::default()).unwrap();

        assert!(inputs.stdin);
        assert_eq!(
            inputs.files,
            vec![
                root.join("notes.txt"),
                root.join("conf.d").join("a.conf"),
                root.join("conf.d").join("b.conf"),
            ]
        );
    }

    #[test]
    fn test_discover_files_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = vec![temp_dir.path().join("nope.conf").to_string_lossy().to_string()];
        let result = discover_files(&paths, &Config::default());
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn test_exit_code_for_errors() {
        let parse = ScanError::Config(ConfigError::Validation("bad".to_string()));
        assert_eq!(exit_code_for(&parse), EXIT_PARSE_ERROR);

        let regex = ScanError::Rule(RuleError::InvalidRegex("(".to_string()));
        assert_eq!(exit_code_for(&regex), EXIT_PARSE_ERROR);

        let definition = ScanError::Rule(RuleError::InvalidDefinition("no id".to_string()));
        assert_eq!(exit_code_for(&definition), EXIT_PARSE_ERROR);

        let io = ScanError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(exit_code_for(&io), EXIT_ERROR);
    }
}
