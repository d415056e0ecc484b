//! Configuration file parsing and validation

pub mod scan_toml;

pub use scan_toml::{
    CONFIG_FILE_NAME, ColorOption, Config, OutputConfig, OutputFormat, RuleSettings, RuleValue,
    ScanSettings,
};
