#![doc = include_str!("../README.md")]

use crate::diagnostics::Diagnostics;
use crate::lexer::Scanner;
use crate::parser::Parser;
use mpl_ast::Program;
use mpl_tokens::token::{Token, TokenStream};

pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use config::{ErrorMode, ParseConfig};

/// Scans all of `source`. The tokens end with EOF.
///
/// In [ErrorMode::FailFast] only the first lexical error is reported, otherwise all of them are.
pub fn tokenize(source: &str, mode: ErrorMode) -> Result<Vec<Token>, Diagnostics> {
    let mut tokens = vec![];
    let mut diagnostics = Diagnostics::new();
    for result in Scanner::new(source, mode) {
        match result {
            Ok(token) => tokens.push(token),
            Err(error) => diagnostics.record(error),
        }
    }
    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(diagnostics)
    }
}

/// Parses an already scanned token sequence
pub fn parse_program(
    tokens: impl IntoIterator<Item = Token>,
    config: &ParseConfig,
) -> Result<Program, Diagnostics> {
    let stream = tokens.into_iter().collect::<TokenStream>();
    Parser::new(stream, config.clone()).parse_program()
}

/// Scans and parses `source` in one pass
pub fn parse_source(source: &str, config: &ParseConfig) -> Result<Program, Diagnostics> {
    let scanner = Scanner::new(source, config.mode);
    Parser::new(scanner, config.clone()).parse_program()
}
