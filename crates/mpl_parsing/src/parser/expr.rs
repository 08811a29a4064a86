//! The expression grammar, from assignment down to application.
//!
//! Each level parses operands of the next tighter binding level. Only the levels that recurse
//! into themselves are wrapped in [`Parser::parse`], so the non-terminal stack grows with
//! nesting depth rather than with the number of precedence levels.

use crate::parser::atoms::starts_atom;
use crate::parser::{ErrorKind, Parser, SyntaxResult, TokenSource};
use mpl_ast::expr::{
    ApplicationExpr, AssignExpr, BinOp, BinaryExpr, ChannelExpr, ConditionalExpr, EffectExpr,
    HandleExpr, HandlerArm, ParallelExpr, UnaryExpr, UnaryOp,
};
use mpl_ast::identifier::Ident;
use mpl_ast::Expr;
use mpl_tokens::spanned::Spanned;
use mpl_tokens::token::TokenKind;

type Level<S> = fn(&mut Parser<S>) -> SyntaxResult<Expr>;

impl<S: TokenSource> Parser<S> {
    pub(super) fn expression(&mut self) -> SyntaxResult<Expr> {
        self.parse("expression", Self::assignment)
    }

    /// `target ← value`, right associative
    fn assignment(&mut self) -> SyntaxResult<Expr> {
        let target = self.parallel()?;
        if self.consume_kind(TokenKind::LeftArrow)?.is_none() {
            return Ok(target);
        }
        let value = self.parse("assignment", Self::assignment)?;
        Ok(Expr::Assign(AssignExpr::new(target, value)))
    }

    /// `a ‖ b ‖ c`, flattened into one node
    fn parallel(&mut self) -> SyntaxResult<Expr> {
        let first = self.handled()?;
        if !self.at(TokenKind::Parallel)? {
            return Ok(first);
        }
        let mut span = first.span();
        let mut branches = vec![first];
        while self.consume_kind(TokenKind::Parallel)?.is_some() {
            let branch = self.handled()?;
            span = span.join(branch.span());
            branches.push(branch);
        }
        Ok(Expr::Parallel(ParallelExpr { branches, span }))
    }

    /// `expr ↴ { ↯ pattern ⇒ body ... }`, any number of handlers
    fn handled(&mut self) -> SyntaxResult<Expr> {
        let mut expr = self.conditional()?;
        while self.at(TokenKind::Handle)? {
            expr = self.parse("handler", |parser| parser.handler(expr))?;
        }
        Ok(expr)
    }

    fn handler(&mut self, expr: Expr) -> SyntaxResult<Expr> {
        self.expect(TokenKind::Handle)?;
        let open = self.expect(TokenKind::LBrace)?;
        let mut arms = vec![];
        let close = loop {
            let found = self.peek()?.clone();
            match found.kind() {
                TokenKind::RBrace => break self.consume()?,
                TokenKind::Raise => {
                    let raise = self.consume()?;
                    let pattern = self.application()?;
                    self.expect(TokenKind::DoubleArrow)?;
                    let body = self.expression()?;
                    arms.push(HandlerArm {
                        span: raise.span().join(body.span()),
                        pattern,
                        body,
                    });
                    if self.consume_kind(TokenKind::Semi)?.is_none() {
                        self.consume_kind(TokenKind::Comma)?;
                    }
                }
                TokenKind::Eof => {
                    return Err(self.closing_error(&open, &[TokenKind::Raise, TokenKind::RBrace]))
                }
                _ => return Err(self.error(ErrorKind::missing("handler arm", &found))),
            }
        };
        let span = expr.span().join(close.span());
        Ok(Expr::Handle(HandleExpr {
            expr: Box::new(expr),
            arms,
            span,
        }))
    }

    /// `test ⟹ then | else`.
    ///
    /// Without the `| else` part this is an implication, and `a | b` without a `⟹` is a guarded
    /// alternative. Neither chains, a second `⟹` needs parentheses.
    fn conditional(&mut self) -> SyntaxResult<Expr> {
        let test = self.or()?;
        if self.consume_kind(TokenKind::Implies)?.is_some() {
            let then_branch = self.or()?;
            if self.consume_kind(TokenKind::Bar)?.is_none() {
                return Ok(Expr::Binary(BinaryExpr::new(
                    BinOp::Implies,
                    test,
                    then_branch,
                )));
            }
            let else_branch = self.or()?;
            let span = test.span().join(else_branch.span());
            Ok(Expr::Conditional(ConditionalExpr {
                test: Box::new(test),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
                span,
            }))
        } else if self.consume_kind(TokenKind::Bar)?.is_some() {
            let alternative = self.or()?;
            Ok(Expr::Binary(BinaryExpr::new(
                BinOp::Otherwise,
                test,
                alternative,
            )))
        } else {
            Ok(test)
        }
    }

    pub(super) fn or(&mut self) -> SyntaxResult<Expr> {
        self.left_assoc(Self::and, |kind| match kind {
            TokenKind::Or => Some(BinOp::Or),
            _ => None,
        })
    }

    fn and(&mut self) -> SyntaxResult<Expr> {
        self.left_assoc(Self::comparison, |kind| match kind {
            TokenKind::And => Some(BinOp::And),
            _ => None,
        })
    }

    /// At most one comparison, `a < b < c` is an error
    fn comparison(&mut self) -> SyntaxResult<Expr> {
        let left = self.arrow()?;
        let op = match self.peek_kind()? {
            TokenKind::Eq => BinOp::Eq,
            TokenKind::Neq => BinOp::Neq,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Leq => BinOp::Leq,
            TokenKind::Geq => BinOp::Geq,
            TokenKind::Approx => BinOp::Approx,
            TokenKind::Sim => BinOp::Sim,
            _ => return Ok(left),
        };
        self.consume()?;
        let right = self.arrow()?;
        Ok(Expr::Binary(BinaryExpr::new(op, left, right)))
    }

    /// `a → b → c` is `a → (b → c)`
    fn arrow(&mut self) -> SyntaxResult<Expr> {
        let left = self.additive()?;
        if self.consume_kind(TokenKind::Arrow)?.is_none() {
            return Ok(left);
        }
        let right = self.parse("arrow", Self::arrow)?;
        Ok(Expr::Binary(BinaryExpr::new(BinOp::Arrow, left, right)))
    }

    fn additive(&mut self) -> SyntaxResult<Expr> {
        self.left_assoc(Self::multiplicative, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> SyntaxResult<Expr> {
        self.left_assoc(Self::composition, |kind| match kind {
            TokenKind::Times => Some(BinOp::Mul),
            TokenKind::Div => Some(BinOp::Div),
            TokenKind::Ast => Some(BinOp::Star),
            _ => None,
        })
    }

    fn composition(&mut self) -> SyntaxResult<Expr> {
        self.left_assoc(Self::unary, |kind| match kind {
            TokenKind::Compose => Some(BinOp::Compose),
            _ => None,
        })
    }

    fn left_assoc(
        &mut self,
        operand: Level<S>,
        operator: fn(TokenKind) -> Option<BinOp>,
    ) -> SyntaxResult<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = operator(self.peek_kind()?) {
            self.consume()?;
            let right = operand(self)?;
            left = Expr::Binary(BinaryExpr::new(op, left, right));
        }
        Ok(left)
    }

    /// Prefix operators
    fn unary(&mut self) -> SyntaxResult<Expr> {
        let kind = self.peek_kind()?;
        match kind {
            TokenKind::Minus | TokenKind::Not => {
                let op_token = self.consume()?;
                let operand = self.parse("unary", Self::unary)?;
                let op = match kind {
                    TokenKind::Minus => UnaryOp::Neg,
                    _ => UnaryOp::Not,
                };
                Ok(Expr::Unary(UnaryExpr {
                    op,
                    span: op_token.span().join(operand.span()),
                    operand: Box::new(operand),
                }))
            }
            TokenKind::Raise | TokenKind::Trace | TokenKind::Delay | TokenKind::Periodic => {
                let op_token = self.consume()?;
                let operand = self.parse("effect", Self::unary)?;
                let effect = EffectExpr {
                    span: op_token.span().join(operand.span()),
                    operand: Box::new(operand),
                };
                Ok(match kind {
                    TokenKind::Raise => Expr::Raise(effect),
                    TokenKind::Trace => Expr::Trace(effect),
                    TokenKind::Delay => Expr::Delay(effect),
                    _ => Expr::Periodic(effect),
                })
            }
            TokenKind::Receive | TokenKind::Send => {
                self.parse("channel", |parser| parser.channel(kind))
            }
            _ => self.postfix(),
        }
    }

    /// `↽_chan x` and `⇀_chan x`, the subscript written directly after the glyph
    fn channel(&mut self, kind: TokenKind) -> SyntaxResult<Expr> {
        let op_token = self.consume()?;
        let subscript = self.peek()?.clone();
        let channel = subscript
            .lexeme()
            .strip_prefix('_')
            .filter(|name| {
                subscript.kind() == TokenKind::Identifier
                    && !name.is_empty()
                    && subscript.span().offset() == op_token.span().range().end
            })
            .map(|name| Ident::new(name, subscript.span()));
        let Some(channel) = channel else {
            return Err(self.error(ErrorKind::missing("channel subscript", &subscript)));
        };
        self.consume()?;
        let operand = self.unary()?;
        let expr = ChannelExpr {
            channel,
            span: op_token.span().join(operand.span()),
            operand: Box::new(operand),
        };
        Ok(match kind {
            TokenKind::Receive => Expr::Receive(expr),
            _ => Expr::Send(expr),
        })
    }

    /// `expr ⊕` and `expr ⊖`
    fn postfix(&mut self) -> SyntaxResult<Expr> {
        let mut expr = self.application()?;
        loop {
            let wrap: fn(EffectExpr) -> Expr = match self.peek_kind()? {
                TokenKind::Alloc => Expr::Alloc,
                TokenKind::Release => Expr::Release,
                _ => return Ok(expr),
            };
            let op_token = self.consume()?;
            expr = wrap(EffectExpr {
                span: expr.span().join(op_token.span()),
                operand: Box::new(expr),
            });
        }
    }

    /// Juxtaposition, `f x y` is `(f x) y`. Scalar literals never take arguments.
    pub(super) fn application(&mut self) -> SyntaxResult<Expr> {
        let mut callee = self.primary()?;
        while !callee.is_scalar_literal() && starts_atom(self.peek_kind()?) {
            let argument = self.primary()?;
            callee = Expr::Application(ApplicationExpr::new(callee, argument));
        }
        Ok(callee)
    }
}
