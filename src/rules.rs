#![forbid(unsafe_code)]

//! Rule catalog: rule trait, regex rules, built-ins and the registry

pub mod builtin;
mod pattern_rule;
mod registry;
mod rule;

pub use builtin::load_builtin_rules;
pub use pattern_rule::PatternRule;
pub use registry::{RuleRegistry, RuleSource};
pub use rule::{Finding, Rule, ScanContext};
