//! Analysis engine and configuration file discovery

pub mod analyzer;
pub mod file_walker;

pub use analyzer::{Analysis, Analyzer, ScanResult, SkippedFile};
pub use file_walker::{FileWalker, FileWalkerError};
