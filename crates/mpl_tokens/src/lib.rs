#![doc = include_str!("../README.md")]

use crate::spanned::{LineReader, Span};
use std::fmt::{Display, Formatter};

pub mod spanned;
pub mod symbols;
pub mod token;

/// A rendering of the source lines around a span, underlining the span itself
#[derive(Debug, Clone, Copy)]
pub struct SourceSnippet<'s> {
    source: &'s str,
    location: Span,
}

impl<'s> SourceSnippet<'s> {
    pub fn new(source: &'s str, location: Span) -> Self {
        Self { source, location }
    }
}

impl Display for SourceSnippet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (lines, base_line) = LineReader::new(2, 2).lines(self.source, &self.location);
        let width = lines.iter().map(|line| line.line).max().unwrap_or(0) / 10 + 1;
        // underline only the part of the span on its first line
        let underline = self
            .location
            .source_text(self.source)
            .map(|text| text.chars().take_while(|&c| c != '\n').count())
            .unwrap_or(0);
        for line in &lines {
            writeln!(f, "{:width$} | {}", line.line, line.src.trim_end())?;
            if line.line == base_line {
                if underline > 0 {
                    writeln!(
                        f,
                        "{}{}{}",
                        " ".repeat(width + 3),
                        " ".repeat(line.col),
                        "~".repeat(underline)
                    )?;
                } else {
                    writeln!(f, "{}{}^", " ".repeat(width + 3), "-".repeat(line.col))?;
                }
            }
        }
        Ok(())
    }
}
