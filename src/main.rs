//! confusion-scan CLI entry point

use clap::Parser;
use confusion_scan::cli::{Cli, Command, ScanOptions};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Init { force } => match confusion_scan::cli::init::run_init(Path::new("."), force) {
            Ok(result) => {
                for name in &result.created {
                    println!("Created {}", name);
                }
                for name in &result.overwritten {
                    println!("Overwrote {}", name);
                }
                for name in &result.skipped {
                    println!("Skipped {} (already exists, use --force to overwrite)", name);
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                2
            }
        },
        Command::Scan {
            paths,
            format,
            fail_on,
            config,
        } => confusion_scan::cli::scan::run_scan(&ScanOptions {
            paths,
            format,
            fail_on,
            config,
            color: cli.color,
        }),
        Command::List { format, config } => {
            confusion_scan::cli::list::run_list(format, config.as_deref())
        }
    };

    process::exit(exit_code);
}
