//! primary expressions

use crate::lexer::{unescape, LexErrorKind};
use crate::parser::statement::empty_block;
use crate::parser::{ErrorKind, Parser, SyntaxResult, TokenSource};
use mpl_ast::expr::{
    AssignExpr, AtomicExpr, ChoiceExpr, CodeQuoteExpr, CodeUnquoteExpr, CollectionExpr,
    ForallExpr, LambdaExpr, LiteralExpr, ParenExpr, PathExpr, RecordExpr, RecordField,
    ResourceBinding, ResourceExpr, SequenceExpr, TypeExpr, TypeSymbol,
};
use mpl_ast::identifier::Ident;
use mpl_ast::literal::{LiteralValue, Number};
use mpl_ast::{Expr, Statement};
use mpl_tokens::spanned::Spanned;
use mpl_tokens::symbols::AliasMap;
use mpl_tokens::token::{Token, TokenKind};

/// Whether a token of this kind can name something
pub(super) fn is_name(kind: TokenKind) -> bool {
    kind == TokenKind::Identifier || kind.is_greek()
}

/// Whether a token of this kind begins a primary expression
pub(super) fn starts_atom(kind: TokenKind) -> bool {
    use TokenKind::*;
    is_name(kind)
        || kind.is_type_symbol()
        || matches!(
            kind,
            Number
                | String
                | RawString
                | True
                | False
                | EmptySet
                | Bottom
                | LParen
                | LBrack
                | LBrace
                | LAngle
                | LCeil
                | LRaii
                | LQuote
                | LUnquote
                | LambdaVar
                | Forall
                | Path
        )
}

fn type_symbol(kind: TokenKind) -> Option<TypeSymbol> {
    Some(match kind {
        TokenKind::Nat => TypeSymbol::Nat,
        TokenKind::Int => TypeSymbol::Int,
        TokenKind::Rat => TypeSymbol::Rat,
        TokenKind::Real => TypeSymbol::Real,
        TokenKind::Complex => TypeSymbol::Complex,
        TokenKind::Bool => TypeSymbol::Bool,
        _ => return None,
    })
}

/// The identifier a name token stands for. Greek letters are always named by their glyph, so
/// `α` and `\alpha` are the same variable.
fn ident_of(token: &Token) -> Ident {
    let name = AliasMap::global()
        .symbol(token.kind())
        .map(|symbol| symbol.glyph.to_string())
        .unwrap_or_else(|| token.lexeme().to_string());
    Ident::new(name, token.span())
}

/// A label written directly after `token`, as in `⌈...⌉_lock`
fn adjacent_subscript(token: &Token, next: &Token) -> Option<Ident> {
    if next.kind() != TokenKind::Identifier || next.span().offset() != token.span().range().end {
        return None;
    }
    next.lexeme()
        .strip_prefix('_')
        .filter(|name| !name.is_empty())
        .map(|name| Ident::new(name, next.span()))
}

impl<S: TokenSource> Parser<S> {
    pub(super) fn primary(&mut self) -> SyntaxResult<Expr> {
        let token = self.peek()?.clone();
        let kind = token.kind();
        match kind {
            TokenKind::LParen => self.parenthesized(),
            TokenKind::LBrack => self.list(),
            TokenKind::LBrace => self.braced(),
            TokenKind::LAngle => self.choice(),
            TokenKind::LCeil => self.atomic(),
            TokenKind::LRaii => self.resource(),
            TokenKind::LQuote => self.code_quote(),
            TokenKind::LUnquote => self.code_unquote(),
            TokenKind::LambdaVar => self.lambda(),
            TokenKind::Forall => self.forall(),
            TokenKind::Path => self.path(),
            TokenKind::EmptySet => {
                self.consume()?;
                Ok(Expr::Set(CollectionExpr {
                    elements: vec![],
                    span: token.span(),
                }))
            }
            TokenKind::Number
            | TokenKind::String
            | TokenKind::RawString
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Bottom => {
                let value = self.literal_value(&token)?;
                self.consume()?;
                Ok(Expr::Literal(LiteralExpr {
                    value,
                    span: token.span(),
                }))
            }
            kind if is_name(kind) => {
                self.consume()?;
                Ok(Expr::Identifier(ident_of(&token)))
            }
            kind => match type_symbol(kind) {
                Some(symbol) => {
                    self.consume()?;
                    Ok(Expr::Type(TypeExpr {
                        symbol,
                        span: token.span(),
                    }))
                }
                None => Err(self.error(ErrorKind::expected_token(["expression"], &token))),
            },
        }
    }

    fn literal_value(&self, token: &Token) -> SyntaxResult<LiteralValue> {
        let lexeme = token.lexeme();
        Ok(match token.kind() {
            TokenKind::Number => Number::from_lexeme(lexeme).map(LiteralValue::Number).map_err(
                |_| self.error_at(ErrorKind::Lex(LexErrorKind::MalformedNumber), token.span()),
            )?,
            TokenKind::String => {
                let contents = lexeme
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(lexeme);
                LiteralValue::String(unescape(contents))
            }
            TokenKind::RawString => {
                let contents = lexeme
                    .strip_prefix(r#"""""#)
                    .and_then(|s| s.strip_suffix(r#"""""#))
                    .unwrap_or(lexeme);
                LiteralValue::RawString(contents.to_string())
            }
            TokenKind::True => LiteralValue::Bool(true),
            TokenKind::False => LiteralValue::Bool(false),
            TokenKind::Bottom => LiteralValue::Bottom,
            _ => return Err(self.error(ErrorKind::expected_token(["literal"], token))),
        })
    }

    /// Consumes a name, reporting `what` as missing otherwise
    pub(super) fn name(&mut self, what: &'static str) -> SyntaxResult<Ident> {
        let token = self.peek()?.clone();
        if !is_name(token.kind()) {
            return Err(self.error(ErrorKind::missing(what, &token)));
        }
        self.consume()?;
        Ok(ident_of(&token))
    }

    /// `()`, `(e)`, `(a, b)` or `(s1; s2)`
    fn parenthesized(&mut self) -> SyntaxResult<Expr> {
        self.parse("parentheses", |parser| {
            let open = parser.expect(TokenKind::LParen)?;
            if let Some(close) = parser.consume_kind(TokenKind::RParen)? {
                return Ok(Expr::Tuple(CollectionExpr {
                    elements: vec![],
                    span: open.span().join(close.span()),
                }));
            }
            parser.ensure_open(&open)?;
            let first = parser.statement()?;
            match parser.peek_kind()? {
                TokenKind::RParen => {
                    let close = parser.consume()?;
                    let span = open.span().join(close.span());
                    Ok(match first {
                        Statement::Expr(inner) => Expr::Paren(ParenExpr {
                            inner: Box::new(inner),
                            span,
                        }),
                        other => Expr::Sequence(SequenceExpr {
                            statements: vec![other],
                            span,
                        }),
                    })
                }
                TokenKind::Comma => {
                    let first = match first {
                        Statement::Expr(first) => first,
                        other => {
                            return Err(parser.error_at(
                                ErrorKind::AmbiguousBlockForm { form: "tuple" },
                                other.span(),
                            ))
                        }
                    };
                    let (elements, close) =
                        parser.comma_list(&open, TokenKind::RParen, vec![first], "tuple")?;
                    Ok(Expr::Tuple(CollectionExpr {
                        elements,
                        span: open.span().join(close.span()),
                    }))
                }
                TokenKind::Semi => {
                    let (statements, close) =
                        parser.statement_list(&open, TokenKind::RParen, first, "sequence")?;
                    Ok(Expr::Sequence(SequenceExpr {
                        statements,
                        span: open.span().join(close.span()),
                    }))
                }
                _ => Err(parser.closing_error(&open, &[TokenKind::RParen])),
            }
        })
    }

    fn list(&mut self) -> SyntaxResult<Expr> {
        self.parse("list", |parser| {
            let open = parser.expect(TokenKind::LBrack)?;
            let (elements, close) = parser.comma_list(&open, TokenKind::RBrack, vec![], "list")?;
            Ok(Expr::List(CollectionExpr {
                elements,
                span: open.span().join(close.span()),
            }))
        })
    }

    /// A block, a set or a record.
    ///
    /// `{ name: ...` starts a record, and a `,` after the first element makes a set.
    fn braced(&mut self) -> SyntaxResult<Expr> {
        self.parse("braces", |parser| {
            let open = parser.expect(TokenKind::LBrace)?;
            if let Some(close) = parser.consume_kind(TokenKind::RBrace)? {
                return Ok(Expr::Block(empty_block(&open, &close)));
            }
            parser.ensure_open(&open)?;
            if is_name(parser.peek_kind()?) && parser.peek_nth_kind(1)? == TokenKind::Colon {
                return parser.record_rest(&open);
            }
            let first = parser.statement()?;
            if !parser.at(TokenKind::Comma)? {
                return parser.block_rest(&open, first).map(Expr::Block);
            }
            let first = match first {
                Statement::Expr(first) => first,
                other => {
                    return Err(parser.error_at(
                        ErrorKind::AmbiguousBlockForm { form: "set" },
                        other.span(),
                    ))
                }
            };
            let (elements, close) =
                parser.comma_list(&open, TokenKind::RBrace, vec![first], "set")?;
            Ok(Expr::Set(CollectionExpr {
                elements,
                span: open.span().join(close.span()),
            }))
        })
    }

    fn record_rest(&mut self, open: &Token) -> SyntaxResult<Expr> {
        let mut fields = vec![];
        let close = loop {
            let name = self.name("record field")?;
            self.expect(TokenKind::Colon)?;
            let value = self.expression()?;
            fields.push(RecordField { name, value });
            match self.peek_kind()? {
                TokenKind::Comma => {
                    self.consume()?;
                    if let Some(close) = self.consume_kind(TokenKind::RBrace)? {
                        break close;
                    }
                }
                TokenKind::RBrace => break self.consume()?,
                TokenKind::Semi => {
                    return Err(self.error(ErrorKind::AmbiguousBlockForm { form: "record" }))
                }
                _ => return Err(self.closing_error(open, &[TokenKind::Comma, TokenKind::RBrace])),
            }
        };
        Ok(Expr::Record(RecordExpr {
            fields,
            span: open.span().join(close.span()),
        }))
    }

    /// Parses `,` separated expressions up to `closer`, a trailing `,` allowed. When `elements`
    /// is not empty the lookahead is the token after its last element.
    fn comma_list(
        &mut self,
        open: &Token,
        closer: TokenKind,
        mut elements: Vec<Expr>,
        form: &'static str,
    ) -> SyntaxResult<(Vec<Expr>, Token)> {
        loop {
            let kind = self.peek_kind()?;
            if kind == closer {
                return Ok((elements, self.consume()?));
            }
            if !elements.is_empty() {
                match kind {
                    TokenKind::Comma => {
                        self.consume()?;
                        if self.at(closer)? {
                            continue;
                        }
                    }
                    TokenKind::Semi => {
                        return Err(self.error(ErrorKind::AmbiguousBlockForm { form }))
                    }
                    _ => return Err(self.closing_error(open, &[TokenKind::Comma, closer])),
                }
            }
            self.ensure_open(open)?;
            elements.push(self.expression()?);
        }
    }

    /// `λx ∈ domain: body`, exactly one parameter
    fn lambda(&mut self) -> SyntaxResult<Expr> {
        self.parse("lambda", |parser| {
            let binder = parser.expect(TokenKind::LambdaVar)?;
            let param = parser.name("lambda parameter")?;
            let domain = match parser.consume_kind(TokenKind::In)? {
                Some(_) => Some(Box::new(parser.expression()?)),
                None => None,
            };
            parser.expect(TokenKind::Colon)?;
            let body = parser.expression()?;
            Ok(Expr::Lambda(LambdaExpr {
                param,
                domain,
                span: binder.span().join(body.span()),
                body: Box::new(body),
            }))
        })
    }

    /// `∀n ∈ domain: body`
    fn forall(&mut self) -> SyntaxResult<Expr> {
        self.parse("forall", |parser| {
            let quantifier = parser.expect(TokenKind::Forall)?;
            let binder = parser.name("quantified variable")?;
            parser.expect(TokenKind::In)?;
            let domain = parser.expression()?;
            parser.expect(TokenKind::Colon)?;
            let body = parser.expression()?;
            Ok(Expr::Forall(ForallExpr {
                binder,
                domain: Box::new(domain),
                span: quantifier.span().join(body.span()),
                body: Box::new(body),
            }))
        })
    }

    /// `⟨a | b⟩`
    fn choice(&mut self) -> SyntaxResult<Expr> {
        self.parse("choice", |parser| {
            let open = parser.expect(TokenKind::LAngle)?;
            let left = parser.or()?;
            if parser.consume_kind(TokenKind::Bar)?.is_none() {
                return Err(parser.closing_error(&open, &[TokenKind::Bar]));
            }
            let right = parser.or()?;
            let close = parser.expect_closing(&open)?;
            Ok(Expr::Choice(ChoiceExpr {
                left: Box::new(left),
                right: Box::new(right),
                span: open.span().join(close.span()),
            }))
        })
    }

    /// `⌈ s1; s2 ⌉` with an optional `_label` directly after it
    fn atomic(&mut self) -> SyntaxResult<Expr> {
        self.parse("atomic", |parser| {
            let open = parser.expect(TokenKind::LCeil)?;
            if parser.at(TokenKind::RCeil)? {
                let found = parser.peek()?.clone();
                return Err(parser.error(ErrorKind::missing("atomic body", &found)));
            }
            parser.ensure_open(&open)?;
            let first = parser.statement()?;
            let (body, close) = if parser.at(TokenKind::RCeil)? {
                (vec![first], parser.consume()?)
            } else {
                parser.statement_list(&open, TokenKind::RCeil, first, "atomic section")?
            };
            let next = parser.peek()?.clone();
            let label = adjacent_subscript(&close, &next);
            let mut span = open.span().join(close.span());
            if let Some(label) = &label {
                parser.consume()?;
                span = span.join(label.span);
            }
            Ok(Expr::Atomic(AtomicExpr { body, label, span }))
        })
    }

    /// `〔 r ← acquire; ... body 〕`
    fn resource(&mut self) -> SyntaxResult<Expr> {
        self.parse("resource", |parser| {
            let open = parser.expect(TokenKind::LRaii)?;
            let mut bindings = vec![];
            let body = loop {
                let binds = is_name(parser.peek_kind()?)
                    && parser.peek_nth_kind(1)? == TokenKind::LeftArrow;
                if !binds {
                    let body = parser.expression()?;
                    parser.consume_kind(TokenKind::Semi)?;
                    break body;
                }
                let name = parser.name("resource name")?;
                parser.expect(TokenKind::LeftArrow)?;
                let value = parser.expression()?;
                let terminated = parser.consume_kind(TokenKind::Semi)?.is_some();
                if parser.at(TokenKind::RRaii)? {
                    // the last binding is the body itself
                    break Expr::Assign(AssignExpr::new(Expr::Identifier(name), value));
                }
                if !terminated {
                    return Err(parser.closing_error(&open, &[TokenKind::Semi, TokenKind::RRaii]));
                }
                bindings.push(ResourceBinding {
                    span: name.span.join(value.span()),
                    name,
                    value,
                });
            };
            let close = parser.expect_closing(&open)?;
            Ok(Expr::Resource(ResourceExpr {
                bindings,
                body: Box::new(body),
                span: open.span().join(close.span()),
            }))
        })
    }

    /// `⌜ expr ⌝`
    fn code_quote(&mut self) -> SyntaxResult<Expr> {
        self.parse("code quote", |parser| {
            let open = parser.expect(TokenKind::LQuote)?;
            let body = parser.expression()?;
            let close = parser.expect_closing(&open)?;
            Ok(Expr::CodeQuote(CodeQuoteExpr {
                body: Box::new(body),
                span: open.span().join(close.span()),
            }))
        })
    }

    /// `⌞ name ⌟`
    fn code_unquote(&mut self) -> SyntaxResult<Expr> {
        self.parse("code unquote", |parser| {
            let open = parser.expect(TokenKind::LUnquote)?;
            let name = parser.name("quoted name")?;
            let close = parser.expect_closing(&open)?;
            Ok(Expr::CodeUnquote(CodeUnquoteExpr {
                name,
                span: open.span().join(close.span()),
            }))
        })
    }

    /// `🖫 "some/file"`
    fn path(&mut self) -> SyntaxResult<Expr> {
        self.parse("path", |parser| {
            let glyph = parser.expect(TokenKind::Path)?;
            let target = parser.peek()?.clone();
            let target = match target.kind() {
                TokenKind::String | TokenKind::RawString => {
                    let value = parser.literal_value(&target)?;
                    parser.consume()?;
                    Expr::Literal(LiteralExpr {
                        value,
                        span: target.span(),
                    })
                }
                kind if is_name(kind) => {
                    parser.consume()?;
                    Expr::Identifier(ident_of(&target))
                }
                _ => return Err(parser.error(ErrorKind::missing("path target", &target))),
            };
            Ok(Expr::Path(PathExpr {
                span: glyph.span().join(target.span()),
                target: Box::new(target),
            }))
        })
    }
}
