//! Collected errors, and how they are reported

use crate::lexer::LexError;
use crate::parser::error::SyntaxError;
use itertools::Itertools;
use mpl_tokens::spanned::{Span, Spanned};
use mpl_tokens::SourceSnippet;
use std::fmt::{Display, Formatter};
use strum::{EnumIter, IntoStaticStr};

/// A flat classification of every error the front end can report
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, EnumIter, IntoStaticStr)]
pub enum ErrorCode {
    UnterminatedString,
    UnterminatedRawString,
    UnterminatedComment,
    UnknownEscape,
    InvalidEscape,
    MalformedNumber,
    UnexpectedCharacter,
    UnexpectedToken,
    UnmatchedDelimiter,
    MissingProduction,
    AmbiguousBlockForm,
    NestingTooDeep,
}

impl ErrorCode {
    /// Whether this error is found by the scanner rather than the parser
    pub fn is_lexical(&self) -> bool {
        use ErrorCode::*;
        matches!(
            self,
            UnterminatedString
                | UnterminatedRawString
                | UnterminatedComment
                | UnknownEscape
                | InvalidEscape
                | MalformedNumber
                | UnexpectedCharacter
        )
    }
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// The grammar productions being parsed when the problem was found, outermost first
    pub context: Vec<&'static str>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            context: vec![],
        }
    }

    /// `line L:C message`, with a 1-based line and 0-based column
    pub fn report_line(&self) -> String {
        let start = self.span.start();
        format!("line {}:{} {}", start.line, start.column, self.message)
    }

    /// Renders this diagnostic with the source lines around it
    pub fn render(&self, source: &str) -> String {
        let mut rendered = format!(
            "error[{}]: {}\n  --> {}\n{}",
            self.code,
            self.message,
            self.span.start(),
            SourceSnippet::new(source, self.span)
        );
        if !self.context.is_empty() {
            rendered.push_str(&format!(
                "  while parsing: {}\n",
                self.context.iter().join(" > ")
            ));
        }
        rendered
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.report_line())
    }
}

impl Spanned for Diagnostic {
    fn span(&self) -> Span {
        self.span
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        Self::new(error.kind.code(), error.kind.to_string(), error.span)
    }
}

impl From<SyntaxError> for Diagnostic {
    fn from(error: SyntaxError) -> Self {
        Self {
            code: error.kind.code(),
            message: error.kind.to_string(),
            span: error.span,
            context: error.non_terminal_stack,
        }
    }
}

/// Collects diagnostics in the order they are found.
///
/// Reports list them in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic
    pub fn record(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.entries.push(diagnostic.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The diagnostics in source order
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .sorted_by_key(|diagnostic| diagnostic.span.offset())
            .collect()
    }

    /// The first diagnostic in source order
    pub fn first(&self) -> Option<&Diagnostic> {
        self.entries.iter().min_by_key(|d| d.span.offset())
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.sorted().into_iter().map(|d| d.code).collect()
    }

    /// `line L:C message` for every diagnostic, in source order
    pub fn to_report(&self) -> Vec<String> {
        self.sorted()
            .into_iter()
            .map(Diagnostic::report_line)
            .collect()
    }

    /// Renders every diagnostic with its source snippet
    pub fn render(&self, source: &str) -> String {
        self.sorted()
            .into_iter()
            .map(|diagnostic| diagnostic.render(source))
            .join("\n")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_report().join("\n"))
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexErrorKind;
    use mpl_tokens::spanned::Position;
    use strum::IntoEnumIterator;
    use test_log::test;

    fn span_at(offset: usize, line: usize, column: usize, len: usize) -> Span {
        let start = Position::new(line, column);
        Span::new(offset, len, start, Position::new(line, column + len))
    }

    #[test]
    fn test_report_is_in_source_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(Diagnostic::new(
            ErrorCode::UnexpectedToken,
            "second",
            span_at(10, 2, 3, 1),
        ));
        diagnostics.record(LexError::new(
            LexErrorKind::UnterminatedString,
            span_at(2, 1, 2, 1),
        ));
        assert_eq!(
            diagnostics.to_report(),
            ["line 1:2 unterminated string literal", "line 2:3 second"]
        );
        assert_eq!(
            diagnostics.codes(),
            [ErrorCode::UnterminatedString, ErrorCode::UnexpectedToken]
        );
        assert_eq!(diagnostics.first().map(|d| d.code), Some(ErrorCode::UnterminatedString));
    }

    #[test]
    fn test_render() {
        let source = "x ← 1 y ← 2";
        let offset = source.find('y').unwrap();
        let diagnostic = Diagnostic::new(
            ErrorCode::UnexpectedToken,
            "mismatched input 'y' expecting ';'",
            span_at(offset, 1, 6, 1),
        );
        assert_eq!(
            diagnostic.render(source),
            "error[UnexpectedToken]: mismatched input 'y' expecting ';'\n  --> 1:6\n1 | x ← 1 y ← 2\n          ~\n"
        );
    }

    #[test]
    fn test_lexical_codes() {
        assert_eq!(ErrorCode::iter().filter(ErrorCode::is_lexical).count(), 7);
        assert!(!ErrorCode::NestingTooDeep.is_lexical());
    }
}
