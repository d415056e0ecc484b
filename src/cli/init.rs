//! Initialize a confusion-scan project
//!
//! Creates the configuration file and the custom rule directory.

use crate::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

/// Default content for confusion-scan.toml
const DEFAULT_CONFIG_TOML: &str = r#"[scan]
version = "1"

# Files picked up when a directory is scanned
# include = ["**/*.conf", "**/.htaccess", "**/*.htaccess"]

# Files skipped when a directory is scanned
# exclude = ["**/backup/**"]

# Lowest risk that fails the scan: low, medium, high or critical
fail_on = "low"

# Directory with extra rule files, relative to this file
custom_rules = "confusion-rules"

[rules]
# Built-in rules are enabled by default
# Disable a rule: docroot-static-prefix = false
# Override a rule's risk: files-access-control = { risk = "high" }

[output]
format = "markdown"
"#;

/// Directory created for custom rule files
const CUSTOM_RULES_DIR: &str = "confusion-rules";

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result of init command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitResult {
    /// Files that were created
    pub created: Vec<String>,
    /// Files that were skipped (already existed)
    pub skipped: Vec<String>,
    /// Files that were overwritten
    pub overwritten: Vec<String>,
}

/// Run the init command in `root`
///
/// Creates `confusion-scan.toml` and the `confusion-rules/` directory.
///
/// # Arguments
/// * `root` - Directory to initialize
/// * `force` - If true, overwrite an existing config. If false, leave it alone.
pub fn run_init(root: &Path, force: bool) -> Result<InitResult, InitError> {
    let mut result = InitResult::default();

    handle_file(root, CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML, force, &mut result)?;
    create_directory(root, CUSTOM_RULES_DIR, &mut result)?;

    Ok(result)
}

fn handle_file(
    root: &Path,
    name: &str,
    content: &str,
    force: bool,
    result: &mut InitResult,
) -> Result<(), InitError> {
    let path = root.join(name);

    if path.exists() {
        if force {
            fs::write(&path, content)?;
            result.overwritten.push(name.to_string());
        } else {
            result.skipped.push(name.to_string());
        }
    } else {
        fs::write(&path, content)?;
        result.created.push(name.to_string());
    }

    Ok(())
}

fn create_directory(root: &Path, name: &str, result: &mut InitResult) -> Result<(), InitError> {
    let dir_path = root.join(name);

    if dir_path.exists() {
        if dir_path.is_dir() {
            Ok(())
        } else {
            Err(InitError::Path(format!(
                "Path '{}' exists but is not a directory",
                name
            )))
        }
    } else {
        fs::create_dir_all(&dir_path)?;
        result.created.push(format!("{}/", name));
        Ok(())
    }
}
