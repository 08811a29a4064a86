use crate::args::Args;
use crate::files::{source_files, SourceFile};
use clap::Parser;
use eyre::{eyre, WrapErr};
use mpl_parsing::{parse_source, tokenize, ParseConfig};
use owo_colors::{OwoColorize, Stream};
use std::fs;
use std::io;
use tracing::metadata::LevelFilter;
use tracing::{debug, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

mod args;
mod files;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting mplc with args: {args:?}");
    debug!("mplc version: {}", env!("CARGO_PKG_VERSION"));

    let to_parse = source_files(&args.paths)?;
    debug!("paths to parse: {to_parse:#?}");

    let config = args.config();
    let mut summary = Summary::default();
    for file in &to_parse {
        let passed = check_file(file, &args, &config)?;
        summary.record(passed);
    }
    println!(
        "\nResults: {} passed, {} failed",
        summary.passed, summary.failed
    );

    if summary.failed > 0 {
        Err(eyre!(
            "{} of {} files failed to parse",
            summary.failed,
            summary.passed + summary.failed
        ))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Summary {
    passed: usize,
    failed: usize,
}

impl Summary {
    fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Parses one file and prints its result. Returns whether it parsed.
fn check_file(file: &SourceFile, args: &Args, config: &ParseConfig) -> eyre::Result<bool> {
    let source = fs::read_to_string(&file.path)
        .wrap_err_with(|| format!("could not read {}", file.path.display()))?;

    if args.tokens {
        match tokenize(&source, config.mode) {
            Ok(tokens) => {
                println!("{}:", file.name);
                for token in tokens {
                    println!("  {token:?}");
                }
            }
            Err(diagnostics) => debug!("{} has lexical errors: {diagnostics}", file.name),
        }
    }

    match parse_source(&source, config) {
        Ok(program) => {
            println!(
                "{} ... {}",
                file.name,
                "✓ PASS".if_supports_color(Stream::Stdout, |text| text.green())
            );
            if args.dump_ast {
                println!("{program}");
            }
            Ok(true)
        }
        Err(diagnostics) => {
            println!(
                "{} ... {}",
                file.name,
                "✗ FAIL".if_supports_color(Stream::Stdout, |text| text.red())
            );
            println!("{}", diagnostics.render(&source));
            Ok(false)
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().compact().without_time())
                .with_writer(io::stderr)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
