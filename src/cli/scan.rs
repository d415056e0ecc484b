//! Scan command implementation
//!
//! This module implements the `confusion-scan scan` command, which:
//! - Loads configuration and builds the rule registry
//! - Reads stdin and discovers files to scan
//! - Analyzes every input in parallel
//! - Prints the markdown or JSONL report to stdout
//! - Returns an exit code based on the `fail_on` threshold

use crate::cli::args::{ColorChoice, ReportFormat};
use crate::cli::common::{
    EXIT_CLEAN, EXIT_ERROR, EXIT_FINDINGS, build_registry, discover_files, exit_code_for,
    load_config,
};
use crate::config::{ColorOption, OutputFormat};
use crate::engine::{Analysis, Analyzer, ScanResult};
use crate::error::{AnalyzeError, ScanError};
use crate::report::{JsonlFormatter, MarkdownFormatter};
use crate::types::RiskLevel;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// Options for a scan run
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub paths: Vec<String>,
    pub format: Option<ReportFormat>,
    pub fail_on: Option<RiskLevel>,
    pub config: Option<PathBuf>,
    pub color: ColorChoice,
}

/// Run the scan command
///
/// # Returns
///
/// Exit code:
/// - 0: No finding at or above the threshold
/// - 1: At least one finding at or above the threshold
/// - 2: Error (I/O error, empty input)
/// - 3: Parse error (invalid configuration or rule file)
pub fn run_scan(options: &ScanOptions) -> i32 {
    match run_scan_inner(options) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}

fn run_scan_inner(options: &ScanOptions) -> Result<i32, ScanError> {
    let loaded = load_config(options.config.as_deref())?;
    let registry = build_registry(&loaded)?;

    let format = options
        .format
        .unwrap_or(match loaded.config.output.format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Jsonl => ReportFormat::Jsonl,
        });
    let fail_on = options.fail_on.unwrap_or(loaded.config.scan.fail_on);

    if registry.is_empty() {
        eprintln!("Warning: No rules are enabled. Nothing to scan.");
        return Ok(EXIT_CLEAN);
    }

    let inputs = discover_files(&options.paths, &loaded.config)?;
    let analyzer = Analyzer::new(registry);

    let mut result = ScanResult::default();
    if inputs.stdin {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;

        match analyzer.analyze(None, &content) {
            Ok(analysis) => result.analyses.push(analysis),
            // Nothing else to report on: show the usage hint instead of an empty report
            Err(AnalyzeError::EmptyInput) if inputs.files.is_empty() => {
                if format == ReportFormat::Markdown {
                    print!("{}", MarkdownFormatter::new().empty_input());
                } else {
                    eprintln!("Error: {}", AnalyzeError::EmptyInput);
                }
                return Ok(EXIT_ERROR);
            }
            Err(AnalyzeError::EmptyInput) => result.analyses.push(Analysis::clean(None)),
        }
    }

    if !inputs.files.is_empty() {
        if format == ReportFormat::Markdown {
            eprintln!(
                "Scanning {} files with {} rules...",
                inputs.files.len(),
                analyzer.registry().len()
            );
        }
        let files_result = analyzer.analyze_files(&inputs.files);
        result.analyses.extend(files_result.analyses);
        result.skipped.extend(files_result.skipped);
    }

    for skipped in &result.skipped {
        eprintln!(
            "Warning: skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }

    if result.analyses.is_empty() {
        eprintln!("Warning: No files found to scan.");
        return Ok(EXIT_CLEAN);
    }

    let mut stdout = io::stdout().lock();
    match format {
        ReportFormat::Markdown => {
            write!(stdout, "{}", MarkdownFormatter::new().format_all(&result))?;
            stdout.flush()?;
            let color = resolve_color(options.color, loaded.config.output.color);
            print_risk_summary(&result, fail_on, color)?;
        }
        ReportFormat::Jsonl => {
            write!(stdout, "{}", JsonlFormatter::new().format(&result, fail_on))?;
            stdout.flush()?;
        }
    }

    Ok(if result.exceeds(fail_on) {
        EXIT_FINDINGS
    } else {
        EXIT_CLEAN
    })
}

/// Combine the command-line color flag with the configured default
fn resolve_color(flag: ColorChoice, configured: ColorOption) -> termcolor::ColorChoice {
    let choice = match flag {
        ColorChoice::Auto => match configured {
            ColorOption::Auto => ColorChoice::Auto,
            ColorOption::Always => ColorChoice::Always,
            ColorOption::Never => ColorChoice::Never,
        },
        other => other,
    };

    match choice {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if io::stderr().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    }
}

fn risk_color(risk: RiskLevel) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match risk {
        RiskLevel::Critical => spec.set_fg(Some(Color::Red)).set_bold(true),
        RiskLevel::High => spec.set_fg(Some(Color::Red)),
        RiskLevel::Medium => spec.set_fg(Some(Color::Yellow)),
        RiskLevel::Low | RiskLevel::Safe => spec.set_fg(Some(Color::Green)),
    };
    spec
}

/// Print the final risk line to stderr
fn print_risk_summary(
    result: &ScanResult,
    fail_on: RiskLevel,
    color: termcolor::ColorChoice,
) -> io::Result<()> {
    let risk = result.risk_level();
    let mut stderr = StandardStream::stderr(color);

    writeln!(stderr)?;
    write!(stderr, "Overall risk: ")?;
    stderr.set_color(&risk_color(risk))?;
    write!(stderr, "{} {}", risk.icon(), risk.display_name())?;
    stderr.reset()?;
    writeln!(
        stderr,
        " ({} findings in {} inputs)",
        result.total_findings(),
        result.analyses.len()
    )?;

    if result.exceeds(fail_on) {
        writeln!(
            stderr,
            "Scan FAILED: findings at or above {}",
            fail_on.display_name()
        )?;
    }

    Ok(())
}
