//! Constructor style printing of trees, e.g. `Lambda(x, Nat, Mul(x, 2))`.
//!
//! Parentheses used only for grouping are not printed, their effect is already visible in the
//! shape of the tree.

use crate::expr::{Expr, HandlerArm, ResourceBinding};
use crate::statement::{Block, Program, Statement};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit.value),
            Expr::Identifier(id) => write!(f, "{id}"),
            Expr::Type(ty) => write!(f, "{}", ty.symbol),
            Expr::Application(app) => write!(f, "App({}, {})", app.callee, app.argument),
            Expr::Binary(bin) => write!(f, "{}({}, {})", bin.op, bin.left, bin.right),
            Expr::Unary(unary) => write!(f, "{}({})", unary.op, unary.operand),
            Expr::Assign(assign) => write!(f, "Assign({}, {})", assign.target, assign.value),
            Expr::Lambda(lambda) => match &lambda.domain {
                Some(domain) => write!(f, "Lambda({}, {}, {})", lambda.param, domain, lambda.body),
                None => write!(f, "Lambda({}, {})", lambda.param, lambda.body),
            },
            Expr::Forall(forall) => write!(
                f,
                "Forall({}, {}, {})",
                forall.binder, forall.domain, forall.body
            ),
            Expr::Conditional(cond) => write!(
                f,
                "Conditional({}, {}, {})",
                cond.test, cond.then_branch, cond.else_branch
            ),
            Expr::Choice(choice) => write!(f, "Choice({}, {})", choice.left, choice.right),
            Expr::List(list) => write!(f, "List[{}]", list.elements.iter().format(", ")),
            Expr::Set(set) => write!(f, "Set{{{}}}", set.elements.iter().format(", ")),
            Expr::Record(record) => write!(
                f,
                "Record{{{}}}",
                record
                    .fields
                    .iter()
                    .format_with(", ", |field, f| f(&format_args!(
                        "{}: {}",
                        field.name, field.value
                    )))
            ),
            Expr::Tuple(tuple) => write!(f, "Tuple({})", tuple.elements.iter().format(", ")),
            Expr::Paren(paren) => write!(f, "{}", paren.inner),
            Expr::Sequence(seq) => write!(f, "Seq({})", seq.statements.iter().format("; ")),
            Expr::Block(block) => write!(f, "{block}"),
            Expr::Raise(e) => write!(f, "Raise({})", e.operand),
            Expr::Handle(handle) => write!(
                f,
                "Handle({}, [{}])",
                handle.expr,
                handle.arms.iter().format(", ")
            ),
            Expr::Trace(e) => write!(f, "Trace({})", e.operand),
            Expr::Delay(e) => write!(f, "Delay({})", e.operand),
            Expr::Periodic(e) => write!(f, "Periodic({})", e.operand),
            Expr::Receive(chan) => write!(f, "Receive({}, {})", chan.channel, chan.operand),
            Expr::Send(chan) => write!(f, "Send({}, {})", chan.channel, chan.operand),
            Expr::Alloc(e) => write!(f, "Alloc({})", e.operand),
            Expr::Release(e) => write!(f, "Release({})", e.operand),
            Expr::Parallel(par) => write!(f, "Parallel({})", par.branches.iter().format(", ")),
            Expr::Atomic(atomic) => {
                write!(f, "Atomic")?;
                if let Some(label) = &atomic.label {
                    write!(f, "[{label}]")?;
                }
                write!(f, "({})", atomic.body.iter().format("; "))
            }
            Expr::Resource(resource) => {
                write!(f, "Resource(")?;
                for binding in &resource.bindings {
                    write!(f, "{binding}; ")?;
                }
                write!(f, "{})", resource.body)
            }
            Expr::CodeQuote(quote) => write!(f, "Quote({})", quote.body),
            Expr::CodeUnquote(unquote) => write!(f, "Unquote({})", unquote.name),
            Expr::Path(path) => write!(f, "Path({})", path.target),
        }
    }
}

impl Display for HandlerArm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} => {}", self.pattern, self.body)
    }
}

impl Display for ResourceBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ← {}", self.name, self.value)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({})", self.statements.iter().format("; "))
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Definition(def) => write!(f, "Def({}, {})", def.name, def.body),
            Statement::Module(module) => write!(f, "Module({}, {})", module.name, module.body),
            Statement::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

/// One statement per line
impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.statements.iter().format("\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{
        BinOp, BinaryExpr, Expr, LambdaExpr, LiteralExpr, TypeExpr, TypeSymbol,
    };
    use crate::identifier::Ident;
    use crate::literal::{LiteralValue, Number};
    use crate::statement::{Block, Statement};
    use mpl_tokens::spanned::Span;

    fn int(i: u64) -> Expr {
        Expr::Literal(LiteralExpr {
            value: LiteralValue::Number(Number::Integer(i)),
            span: Span::default(),
        })
    }

    fn var(name: &str) -> Expr {
        Expr::Identifier(Ident::new(name, Span::default()))
    }

    #[test]
    fn test_nested_binary() {
        let expr = Expr::Binary(BinaryExpr::new(
            BinOp::Add,
            int(1),
            Expr::Binary(BinaryExpr::new(BinOp::Mul, int(2), int(3))),
        ));
        assert_eq!(expr.to_string(), "Add(1, Mul(2, 3))");
    }

    #[test]
    fn test_lambda() {
        let lambda = Expr::Lambda(LambdaExpr {
            param: Ident::new("x", Span::default()),
            domain: Some(Box::new(Expr::Type(TypeExpr {
                symbol: TypeSymbol::Nat,
                span: Span::default(),
            }))),
            body: Box::new(Expr::Binary(BinaryExpr::new(BinOp::Mul, var("x"), int(2)))),
            span: Span::default(),
        });
        assert_eq!(lambda.to_string(), "Lambda(x, Nat, Mul(x, 2))");
    }

    #[test]
    fn test_block() {
        let block = Block {
            statements: vec![Statement::Expr(var("a")), Statement::Expr(var("b"))],
            trailing_value: true,
            span: Span::default(),
        };
        assert_eq!(block.to_string(), "Block(a; b)");
        assert_eq!(block.value().map(|s| s.to_string()), Some("b".to_string()));
    }
}
