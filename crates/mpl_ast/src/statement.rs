//! Statements, blocks and whole programs

use crate::expr::Expr;
use crate::identifier::Ident;
use mpl_tokens::spanned::{Span, Spanned};

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name ≜ body`
    Definition(Definition),
    /// `𝓜 name ⇒ { ... }`
    Module(ModuleDef),
    Expr(Expr),
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Definition(d) => d.span,
            Statement::Module(m) => m.span,
            Statement::Expr(e) => e.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: Ident,
    pub body: Expr,
    pub span: Span,
}

impl Definition {
    pub fn new(name: Ident, body: Expr) -> Self {
        let span = name.span.join(body.span());
        Self { name, body, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDef {
    pub name: Ident,
    pub body: Block,
    pub span: Span,
}

/// A braced statement list
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    /// Set when the final statement was written without a semicolon, making it the value of
    /// the block
    pub trailing_value: bool,
    pub span: Span,
}

impl Block {
    /// The value of this block, if it ends in an unterminated statement
    pub fn value(&self) -> Option<&Statement> {
        if self.trailing_value {
            self.statements.last()
        } else {
            None
        }
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}

/// A complete source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Spanned for Program {
    fn span(&self) -> Span {
        self.span
    }
}
