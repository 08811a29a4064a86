use crate::diagnostics::ErrorCode;
use crate::lexer::{LexError, LexErrorKind};
use itertools::Itertools;
use mpl_tokens::spanned::{Span, Spanned};
use mpl_tokens::token::{Token, TokenKind};
use std::fmt::{Display, Formatter};

/// Represents an error occurring during parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub span: Span,
    pub non_terminal_stack: Vec<&'static str>,
}

impl SyntaxError {
    /// Creates a new error
    pub fn new(kind: ErrorKind, span: Span, non_terminals: Vec<&'static str>) -> Self {
        Self {
            kind,
            span,
            non_terminal_stack: non_terminals,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "syntax error at {}: {}", self.span.start(), self.kind)?;
        if !self.non_terminal_stack.is_empty() {
            write!(f, " (in {})", self.non_terminal_stack.iter().join(" > "))?;
        }
        Ok(())
    }
}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        self.span
    }
}

impl From<LexError> for SyntaxError {
    fn from(value: LexError) -> Self {
        Self::new(ErrorKind::Lex(value.kind), value.span, vec![])
    }
}

/// [SyntaxError] kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("mismatched input {found} expecting {}", expected_list(.expected))]
    UnexpectedToken { expected: Vec<String>, found: String },
    #[error("unmatched delimiter '{}'{}", delimiter_text(.delimiter), missing_closer(.missing))]
    UnmatchedDelimiter {
        delimiter: TokenKind,
        /// The closing delimiter that never came, when `delimiter` is an opening one
        missing: Option<TokenKind>,
    },
    #[error("missing {what} at {found}")]
    MissingProduction { what: &'static str, found: String },
    #[error("ambiguous {form}: ',' and ';' can not be mixed")]
    AmbiguousBlockForm { form: &'static str },
    #[error("nesting is deeper than the limit of {0}")]
    NestingTooDeep(usize),
    #[error(transparent)]
    Lex(LexErrorKind),
}

impl ErrorKind {
    pub fn expected_token(
        token_kinds: impl IntoIterator<Item = impl AsRef<str>>,
        found: &Token,
    ) -> Self {
        Self::UnexpectedToken {
            expected: token_kinds
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            found: found.to_string(),
        }
    }

    pub fn expected_kinds(kinds: &[TokenKind], found: &Token) -> Self {
        Self::expected_token(kinds.iter().map(|kind| kind.to_string()), found)
    }

    pub fn missing(what: &'static str, found: &Token) -> Self {
        Self::MissingProduction {
            what,
            found: found.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ErrorKind::UnexpectedToken { .. } => ErrorCode::UnexpectedToken,
            ErrorKind::UnmatchedDelimiter { .. } => ErrorCode::UnmatchedDelimiter,
            ErrorKind::MissingProduction { .. } => ErrorCode::MissingProduction,
            ErrorKind::AmbiguousBlockForm { .. } => ErrorCode::AmbiguousBlockForm,
            ErrorKind::NestingTooDeep(_) => ErrorCode::NestingTooDeep,
            ErrorKind::Lex(lex) => lex.code(),
        }
    }
}

fn expected_list(expected: &[String]) -> String {
    match expected {
        [single] => single.clone(),
        many => format!("{{{}}}", many.iter().join(", ")),
    }
}

fn delimiter_text(delimiter: &TokenKind) -> String {
    delimiter.to_string().trim_matches('\'').to_string()
}

fn missing_closer(missing: &Option<TokenKind>) -> String {
    missing
        .map(|closer| format!(", missing {closer}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpl_tokens::spanned::Position;
    use test_log::test;

    #[test]
    fn test_messages() {
        let span = Span::empty_at(0, Position::start());
        let y = Token::new(TokenKind::Identifier, "y", span);
        assert_eq!(
            ErrorKind::expected_kinds(&[TokenKind::Semi], &y).to_string(),
            "mismatched input 'y' expecting ';'"
        );
        assert_eq!(
            ErrorKind::expected_kinds(&[TokenKind::Semi, TokenKind::RBrace], &Token::eof(span))
                .to_string(),
            "mismatched input <EOF> expecting {';', '}'}"
        );
        assert_eq!(
            ErrorKind::UnmatchedDelimiter {
                delimiter: TokenKind::LParen,
                missing: Some(TokenKind::RParen)
            }
            .to_string(),
            "unmatched delimiter '(', missing ')'"
        );
        assert_eq!(
            ErrorKind::missing("lambda parameter", &Token::new(TokenKind::Colon, ":", span))
                .to_string(),
            "missing lambda parameter at ':'"
        );
    }
}
