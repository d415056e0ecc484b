//! Test utilities for confusion-scan integration tests

#![allow(dead_code)]

use confusion_scan::Analyzer;
use confusion_scan::rules::RuleRegistry;
use std::fs;
use std::path::PathBuf;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Path of a file under tests/fixtures/<group>/
pub fn fixture_path(group: &str, filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(group)
        .join(filename)
}

/// Contents of an Apache config fixture
pub fn apache_fixture(filename: &str) -> String {
    fs::read_to_string(fixture_path("apache", filename))
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", filename, e))
}

/// Analyzer holding the built-in catalog
pub fn builtin_analyzer() -> Analyzer {
    Analyzer::new(RuleRegistry::with_builtin_rules().expect("built-in rules should load"))
}
