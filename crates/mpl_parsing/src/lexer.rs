//! Responsible for converting source text into a token stream

use crate::config::ErrorMode;
use crate::diagnostics::ErrorCode;
use crate::lexer::token_parsing::{parse_insignificant, parse_token, TokenError};
use mpl_common::nom_helpers::consumed_between;
use mpl_tokens::spanned::{Position, Span, Spanned};
use mpl_tokens::token::{Token, TokenKind};
use thiserror::Error;
use tracing::{debug, trace};

mod token_parsing;

/// Converts source text into tokens, one token per call to [`next_token`](Scanner::next_token).
///
/// Once the end of input is reached, every further call returns an EOF token again.
#[derive(Debug, Clone)]
pub struct Scanner<'s> {
    source: &'s str,
    offset: usize,
    position: Position,
    mode: ErrorMode,
    state: State,
    /// A token scanned while recovering from an error, handed out by the next call
    pending: Option<Token>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Scanning,
    /// Stopped after an error in fail fast mode
    Failed,
    /// The EOF token has been produced
    Finished,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner at the start of `source`
    pub fn new(source: &'s str, mode: ErrorMode) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::start(),
            mode,
            state: State::Scanning,
            pending: None,
        }
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Moves back to the start of the source
    pub fn reset(&mut self) {
        self.offset = 0;
        self.position = Position::start();
        self.state = State::Scanning;
        self.pending = None;
    }

    /// Whether the EOF token has been produced
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Scans the next token.
    ///
    /// In [ErrorMode::FailFast] the first error ends scanning and only EOF follows it. In
    /// [ErrorMode::CollectAll] the scanner skips past the bad text and keeps going.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.pending.take() {
            return Ok(token);
        }
        if self.state != State::Scanning {
            self.state = State::Finished;
            return Ok(Token::eof(self.span_of("")));
        }
        let rest = self.rest();
        match parse_insignificant(rest) {
            Ok((after, ())) => self.advance(consumed_between(rest, after)),
            Err(e) => return Err(self.recover(rest, e)),
        }

        let rest = self.rest();
        if rest.is_empty() {
            self.state = State::Finished;
            return Ok(Token::eof(self.span_of("")));
        }
        match parse_token(rest) {
            Ok((after, kind)) => {
                let lexeme = consumed_between(rest, after);
                let token = Token::new(kind, lexeme, self.span_of(lexeme));
                self.advance(lexeme);
                trace!("scanned {token:?}");
                Ok(token)
            }
            Err(e) => Err(self.recover(rest, e)),
        }
    }

    fn rest(&self) -> &'s str {
        &self.source[self.offset..]
    }

    fn span_of(&self, text: &str) -> Span {
        Span::covering(self.offset, self.position, text)
    }

    fn advance(&mut self, text: &str) {
        self.offset += text.len();
        self.position.advance(text);
    }

    /// Converts a token parser error into a [LexError], then either stops or skips ahead
    /// depending on the mode
    fn recover(&mut self, rest: &'s str, error: nom::Err<TokenError<'s>>) -> LexError {
        let (input, len, kind) = match error {
            nom::Err::Error(e) | nom::Err::Failure(e) => (e.input, e.len, e.kind),
            nom::Err::Incomplete(_) => (rest, 0, None),
        };
        let kind = kind.unwrap_or_else(|| {
            LexErrorKind::UnexpectedCharacter(input.chars().next().unwrap_or('\0'))
        });
        let (token_offset, token_position) = (self.offset, self.position);
        self.advance(consumed_between(rest, input));
        let text = input.get(..len).unwrap_or(input);
        let error = LexError::new(kind, self.span_of(text));
        debug!("lexical error at {}: {}", error.span.start(), error.kind);

        match self.mode {
            ErrorMode::FailFast => self.state = State::Failed,
            ErrorMode::CollectAll => {
                if let LexErrorKind::InvalidEscape(_) = error.kind {
                    self.finish_string(text, token_offset, token_position);
                } else {
                    self.resynchronize(&error.kind, text);
                }
            }
        }
        error
    }

    /// Skips the rest of a string holding an invalid escape. When the string is closed on the
    /// same line it still becomes a [TokenKind::String] token, which the next call returns.
    fn finish_string(&mut self, error_text: &str, token_offset: usize, token_position: Position) {
        let rest = self.rest();
        let after_error = &rest[error_text.len().min(rest.len())..];
        let mut end = None;
        let mut chars = after_error.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    end = Some(i + 1);
                    break;
                }
                '\\' => {
                    if let Some((j, '\n')) = chars.next() {
                        self.advance(&rest[..rest.len() - after_error.len() + j]);
                        return;
                    }
                }
                '\n' => {
                    self.advance(&rest[..rest.len() - after_error.len() + i]);
                    return;
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            self.advance(rest);
            return;
        };
        self.advance(&rest[..rest.len() - after_error.len() + end]);
        let lexeme = &self.source[token_offset..self.offset];
        let token = Token::new(
            TokenKind::String,
            lexeme,
            Span::covering(token_offset, token_position, lexeme),
        );
        trace!("kept {token:?} despite its invalid escape");
        self.pending = Some(token);
    }

    /// Skips the text of an error and whatever follows it up to the next whitespace or
    /// delimiter
    fn resynchronize(&mut self, kind: &LexErrorKind, error_text: &str) {
        let rest = self.rest();
        let skipped = match kind {
            LexErrorKind::UnterminatedComment | LexErrorKind::UnterminatedRawString => rest,
            LexErrorKind::UnterminatedString => {
                let end = rest.find('\n').unwrap_or(rest.len());
                &rest[..end]
            }
            _ => {
                let after_error = &rest[error_text.len().max(1).min(rest.len())..];
                let end = after_error
                    .find(|c: char| c.is_whitespace() || "()[]{};,".contains(c))
                    .unwrap_or(after_error.len());
                &rest[..rest.len() - after_error.len() + end]
            }
        };
        trace!("skipping {skipped:?} to resynchronize");
        self.advance(skipped);
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    /// Yields every token including EOF, then stops
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            None
        } else {
            Some(self.next_token())
        }
    }
}

/// Decodes the escapes of a string lexeme's contents
pub fn unescape(contents: &str) -> String {
    let mut decoded = String::with_capacity(contents.len());
    let mut chars = contents.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some(other) => decoded.push(other),
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// An error found while scanning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Spanned for LexError {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind of a [LexError]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unknown escape \\{0}")]
    UnknownEscape(String),
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("malformed number")]
    MalformedNumber,
    #[error("token recognition error at: {0:?}")]
    UnexpectedCharacter(char),
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::UnterminatedString => ErrorCode::UnterminatedString,
            LexErrorKind::UnterminatedRawString => ErrorCode::UnterminatedRawString,
            LexErrorKind::UnterminatedComment => ErrorCode::UnterminatedComment,
            LexErrorKind::UnknownEscape(_) => ErrorCode::UnknownEscape,
            LexErrorKind::InvalidEscape(_) => ErrorCode::InvalidEscape,
            LexErrorKind::MalformedNumber => ErrorCode::MalformedNumber,
            LexErrorKind::UnexpectedCharacter(_) => ErrorCode::UnexpectedCharacter,
        }
    }
}
