//! the args for running mplc

use mpl_cli_common::LoggingArgs;
use mpl_parsing::{ErrorMode, ParseConfig};
use std::path::PathBuf;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Parses MPL source files and reports their syntax errors")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Source files to parse. Directories are searched for `.mpl` files.
    #[clap(required = true, value_name = "path", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,
    /// Keep going after the first error and report every error in a file
    #[clap(long)]
    pub collect: bool,
    /// The deepest nesting of grammar productions allowed
    #[clap(long, env = "MPLC_MAX_DEPTH", default_value_t = ParseConfig::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Print the syntax tree of every file that parses
    #[clap(long)]
    pub dump_ast: bool,
    /// Print the tokens of every file before parsing it
    #[clap(long)]
    pub tokens: bool,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    /// The parser configuration these args ask for
    pub fn config(&self) -> ParseConfig {
        let mode = if self.collect {
            ErrorMode::CollectAll
        } else {
            ErrorMode::FailFast
        };
        ParseConfig::default()
            .with_mode(mode)
            .with_max_depth(self.max_depth)
    }
}
