//! The parser, which turns a token sequence into a [Program]

use crate::config::{ErrorMode, ParseConfig};
use crate::diagnostics::Diagnostics;
use crate::lexer::{LexError, Scanner};
use mpl_ast::Program;
use mpl_tokens::spanned::{Span, Spanned};
use mpl_tokens::token::{Token, TokenKind, TokenStream};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Stack left before a non-terminal moves onto a freshly allocated segment
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT_SIZE: usize = 1024 * 1024;

mod atoms;
pub mod error;
mod expr;
mod statement;

pub use error::{ErrorKind, SyntaxError};

pub type SyntaxResult<T = ()> = Result<T, SyntaxError>;

/// Something the parser can pull tokens from
pub trait TokenSource {
    /// Gets the next token. After the end of input this keeps returning EOF.
    fn next_token(&mut self) -> Result<Token, LexError>;
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Scanner::next_token(self)
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Ok(self.next().unwrap_or_else(|| Token::eof(Span::default())))
    }
}

/// Creates a [Program] from a token source, with at most two tokens of lookahead.
///
/// # Examples
/// ```
/// # use mpl_parsing::config::ParseConfig;
/// # use mpl_parsing::lexer::Scanner;
/// # use mpl_parsing::parser::Parser;
/// let config = ParseConfig::default();
/// let scanner = Scanner::new("f x;", config.mode);
/// let program = Parser::new(scanner, config).parse_program().unwrap();
/// assert_eq!(program.to_string(), "App(f, x)");
/// ```
#[derive(Debug)]
pub struct Parser<S: TokenSource> {
    source: S,
    lookahead: VecDeque<Token>,
    /// Set once the source produced EOF
    eof: Option<Token>,
    last_span: Option<Span>,
    non_terminals: Vec<&'static str>,
    config: ParseConfig,
    diagnostics: Diagnostics,
}

impl<S: TokenSource> Parser<S> {
    /// Creates a new parser over a token source
    pub fn new(source: S, config: ParseConfig) -> Self {
        Self {
            source,
            lookahead: VecDeque::with_capacity(2),
            eof: None,
            last_span: None,
            non_terminals: vec![],
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parses a whole program.
    ///
    /// Returns the tree only if no diagnostics were recorded at all.
    pub fn parse_program(mut self) -> Result<Program, Diagnostics> {
        match self.program() {
            Ok(program) if self.diagnostics.is_empty() => Ok(program),
            Ok(_) => Err(self.diagnostics),
            Err(error) => {
                self.diagnostics.record(error);
                Err(self.diagnostics)
            }
        }
    }

    /// Pulls tokens from the source until there are at least `n` tokens of lookahead
    fn fill(&mut self, n: usize) -> SyntaxResult {
        while self.lookahead.len() < n {
            if let Some(eof) = &self.eof {
                self.lookahead.push_back(eof.clone());
                continue;
            }
            match self.source.next_token() {
                Ok(token) => {
                    if token.is_eof() {
                        self.eof = Some(token.clone());
                    }
                    self.lookahead.push_back(token);
                }
                Err(error) => match self.config.mode {
                    ErrorMode::FailFast => return Err(error.into()),
                    ErrorMode::CollectAll => {
                        debug!("recording lexical error: {error}");
                        self.diagnostics.record(error);
                    }
                },
            }
        }
        Ok(())
    }

    /// Peeks the current lookahead
    pub(crate) fn peek(&mut self) -> SyntaxResult<&Token> {
        self.peek_nth(0)
    }

    /// Peeks `n` tokens past the current lookahead, `n` being 0 or 1
    pub(crate) fn peek_nth(&mut self, n: usize) -> SyntaxResult<&Token> {
        self.fill(n + 1)?;
        Ok(&self.lookahead[n])
    }

    pub(crate) fn peek_kind(&mut self) -> SyntaxResult<TokenKind> {
        Ok(self.peek()?.kind())
    }

    pub(crate) fn peek_nth_kind(&mut self, n: usize) -> SyntaxResult<TokenKind> {
        Ok(self.peek_nth(n)?.kind())
    }

    /// Checks the kind of the current lookahead
    pub(crate) fn at(&mut self, kind: TokenKind) -> SyntaxResult<bool> {
        Ok(self.peek_kind()? == kind)
    }

    pub(crate) fn consume(&mut self) -> SyntaxResult<Token> {
        self.fill(1)?;
        let token = self
            .lookahead
            .pop_front()
            .unwrap_or_else(|| Token::eof(self.last_span().after()));
        trace!("consumed {token:?}");
        self.last_span = Some(token.span());
        Ok(token)
    }

    /// Consumes the lookahead if it matches the predicate
    pub(crate) fn consume_if<F>(&mut self, predicate: F) -> SyntaxResult<Option<Token>>
    where
        F: FnOnce(&Token) -> bool,
    {
        if predicate(self.peek()?) {
            self.consume().map(Some)
        } else {
            Ok(None)
        }
    }

    pub(crate) fn consume_kind(&mut self, kind: TokenKind) -> SyntaxResult<Option<Token>> {
        self.consume_if(|token| token.kind() == kind)
    }

    /// Consumes a token of the given kind, or fails with an unexpected token error
    pub(crate) fn expect(&mut self, kind: TokenKind) -> SyntaxResult<Token> {
        match self.consume_kind(kind)? {
            Some(token) => Ok(token),
            None => {
                let found = self.peek()?.clone();
                Err(self.error(ErrorKind::expected_kinds(&[kind], &found)))
            }
        }
    }

    /// Consumes the delimiter closing `open`
    pub(crate) fn expect_closing(&mut self, open: &Token) -> SyntaxResult<Token> {
        let Some(closer) = open.kind().closing_delimiter() else {
            return self.expect(open.kind());
        };
        match self.consume_kind(closer)? {
            Some(token) => Ok(token),
            None => Err(self.closing_error(open, &[closer])),
        }
    }

    /// The error for a bracketed form that can not continue with the lookahead.
    ///
    /// Running into EOF or into a closing delimiter means the brackets are unbalanced,
    /// anything else is unexpected.
    pub(crate) fn closing_error(&mut self, open: &Token, expected: &[TokenKind]) -> SyntaxError {
        let found = match self.peek() {
            Ok(found) => found.clone(),
            Err(error) => return error,
        };
        if found.is_eof() {
            self.error_at(
                ErrorKind::UnmatchedDelimiter {
                    delimiter: open.kind(),
                    missing: open.kind().closing_delimiter(),
                },
                open.span(),
            )
        } else if found.kind().is_closing_delimiter() {
            self.stray_closer(&found)
        } else {
            self.error(ErrorKind::expected_kinds(expected, &found))
        }
    }

    /// Fails when the form opened by `open` is cut short by the end of input, or by a closing
    /// delimiter that belongs to something else
    pub(crate) fn ensure_open(&mut self, open: &Token) -> SyntaxResult {
        let kind = self.peek_kind()?;
        let closer = open.kind().closing_delimiter();
        if kind == TokenKind::Eof || (kind.is_closing_delimiter() && Some(kind) != closer) {
            return Err(self.closing_error(open, closer.as_slice()));
        }
        Ok(())
    }

    pub(crate) fn stray_closer(&self, found: &Token) -> SyntaxError {
        self.error_at(
            ErrorKind::UnmatchedDelimiter {
                delimiter: found.kind(),
                missing: None,
            },
            found.span(),
        )
    }

    /// Wrapper function for parsing a non-terminal.
    ///
    /// Tracks the non-terminal stack for error reports, and fails once the stack is deeper than
    /// the configured limit. The call stack grows onto the heap when it runs low, so any depth
    /// up to the limit is safe on small thread stacks.
    pub(crate) fn parse<O, F>(&mut self, non_terminal: &'static str, parser: F) -> SyntaxResult<O>
    where
        F: FnOnce(&mut Self) -> SyntaxResult<O>,
    {
        if self.non_terminals.len() >= self.config.max_depth {
            return Err(self.error(ErrorKind::NestingTooDeep(self.config.max_depth)));
        }
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            trace!("starting parsing {non_terminal}");
            self.non_terminals.push(non_terminal);
            let result = parser(self);
            trace!("after parsing {non_terminal}, ok={}", result.is_ok());
            self.non_terminals.pop();
            result
        })
    }

    /// Creates an error at the current lookahead
    pub(crate) fn error(&self, kind: ErrorKind) -> SyntaxError {
        let span = self
            .lookahead
            .front()
            .map(|token| token.span())
            .or_else(|| self.last_span.map(|span| span.after()))
            .unwrap_or_default();
        self.error_at(kind, span)
    }

    pub(crate) fn error_at(&self, kind: ErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.non_terminals.clone())
    }

    /// The span of the last consumed token
    pub(crate) fn last_span(&self) -> Span {
        self.last_span.unwrap_or_default()
    }

    pub(crate) fn mode(&self) -> ErrorMode {
        self.config.mode
    }

    /// Records an error and skips past the next `;`, so parsing can continue with the next
    /// statement
    pub(crate) fn recover(&mut self, error: SyntaxError) -> SyntaxResult {
        debug!("recovering from {error}");
        self.diagnostics.record(error);
        self.non_terminals.clear();
        loop {
            match self.peek_kind()? {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semi => {
                    self.consume()?;
                    return Ok(());
                }
                _ => {
                    self.consume()?;
                }
            }
        }
    }
}
