//! CLI argument parsing and command dispatch

pub mod args;
pub mod common;
pub mod init;
pub mod list;
pub mod scan;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, ListFormat, ReportFormat};
pub use scan::ScanOptions;
