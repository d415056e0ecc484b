//! Report formatters (markdown, JSONL and rule listings)

pub mod guidance;
pub mod jsonl;
pub mod markdown;
pub mod rule_list;

pub use jsonl::JsonlFormatter;
pub use markdown::MarkdownFormatter;
pub use rule_list::{RuleInfo, RuleListHumanFormatter, RuleListJsonlFormatter};
