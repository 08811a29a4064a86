//! programs, statements and blocks

use crate::config::ErrorMode;
use crate::parser::atoms::is_name;
use crate::parser::{ErrorKind, Parser, SyntaxResult, TokenSource};
use mpl_ast::statement::{Definition, ModuleDef};
use mpl_ast::{Block, Program, Statement};
use mpl_tokens::spanned::Spanned;
use mpl_tokens::token::{Token, TokenKind};

impl<S: TokenSource> Parser<S> {
    /// `program := statement (';' statement)* ';'?`
    pub(super) fn program(&mut self) -> SyntaxResult<Program> {
        let start = self.peek()?.span();
        let mut statements = vec![];
        while !self.at(TokenKind::Eof)? {
            match self.top_level_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) if self.mode() == ErrorMode::CollectAll => self.recover(error)?,
                Err(error) => return Err(error),
            }
        }
        let span = match self.last_span {
            Some(last) => start.join(last),
            None => start,
        };
        Ok(Program { statements, span })
    }

    /// A statement followed by a `;`, or by the end of the file
    fn top_level_statement(&mut self) -> SyntaxResult<Statement> {
        let statement = self.statement()?;
        let found = self.peek()?.clone();
        match found.kind() {
            TokenKind::Semi => {
                self.consume()?;
            }
            TokenKind::Eof => {}
            kind if kind.is_closing_delimiter() => return Err(self.stray_closer(&found)),
            _ => {
                return Err(self.error(ErrorKind::expected_kinds(&[TokenKind::Semi], &found)));
            }
        }
        Ok(statement)
    }

    /// `statement := moduleDef | definition | expression`
    pub(super) fn statement(&mut self) -> SyntaxResult<Statement> {
        self.parse("statement", |parser| {
            let kind = parser.peek_kind()?;
            if kind == TokenKind::Module {
                return parser.module_def().map(Statement::Module);
            }
            if is_name(kind) && parser.peek_nth_kind(1)? == TokenKind::Definition {
                return parser.definition().map(Statement::Definition);
            }
            parser.expression().map(Statement::Expr)
        })
    }

    fn definition(&mut self) -> SyntaxResult<Definition> {
        self.parse("definition", |parser| {
            let name = parser.name("definition name")?;
            parser.expect(TokenKind::Definition)?;
            let body = parser.expression()?;
            Ok(Definition::new(name, body))
        })
    }

    fn module_def(&mut self) -> SyntaxResult<ModuleDef> {
        self.parse("module", |parser| {
            let sigil = parser.expect(TokenKind::Module)?;
            let name = parser.name("module name")?;
            parser.expect(TokenKind::DoubleArrow)?;
            let body = parser.block()?;
            let span = sigil.span().join(body.span);
            Ok(ModuleDef { name, body, span })
        })
    }

    /// A strict statement block, which never turns into a set or record
    pub(super) fn block(&mut self) -> SyntaxResult<Block> {
        self.parse("block", |parser| {
            let open = parser.expect(TokenKind::LBrace)?;
            if let Some(close) = parser.consume_kind(TokenKind::RBrace)? {
                return Ok(empty_block(&open, &close));
            }
            parser.ensure_open(&open)?;
            let first = parser.statement()?;
            parser.block_rest(&open, first)
        })
    }

    /// Parses the rest of a block whose first statement is already parsed.
    ///
    /// Every statement but the last needs a `;`. When the last one has none it is the value of
    /// the block.
    pub(super) fn block_rest(&mut self, open: &Token, first: Statement) -> SyntaxResult<Block> {
        let mut statements = vec![first];
        let (close, trailing_value) = loop {
            if let Some(close) = self.consume_kind(TokenKind::RBrace)? {
                break (close, true);
            }
            if self.consume_kind(TokenKind::Semi)?.is_none() {
                return Err(self.closing_error(open, &[TokenKind::Semi, TokenKind::RBrace]));
            }
            if let Some(close) = self.consume_kind(TokenKind::RBrace)? {
                break (close, false);
            }
            self.ensure_open(open)?;
            statements.push(self.statement()?);
        };
        Ok(Block {
            statements,
            trailing_value,
            span: open.span().join(close.span()),
        })
    }

    /// Parses `;` separated statements up to `closer`, a trailing `;` allowed. `first` is
    /// already parsed.
    pub(super) fn statement_list(
        &mut self,
        open: &Token,
        closer: TokenKind,
        first: Statement,
        form: &'static str,
    ) -> SyntaxResult<(Vec<Statement>, Token)> {
        let mut statements = vec![first];
        let close = loop {
            match self.peek_kind()? {
                TokenKind::Semi => {
                    self.consume()?;
                    if let Some(close) = self.consume_kind(closer)? {
                        break close;
                    }
                    self.ensure_open(open)?;
                    statements.push(self.statement()?);
                }
                kind if kind == closer => break self.consume()?,
                TokenKind::Comma => return Err(self.error(ErrorKind::AmbiguousBlockForm { form })),
                _ => return Err(self.closing_error(open, &[TokenKind::Semi, closer])),
            }
        };
        Ok((statements, close))
    }
}

pub(super) fn empty_block(open: &Token, close: &Token) -> Block {
    Block {
        statements: vec![],
        trailing_value: false,
        span: open.span().join(close.span()),
    }
}
