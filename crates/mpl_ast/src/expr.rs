//! Expressions

use crate::identifier::Ident;
use crate::literal::LiteralValue;
use crate::statement::{Block, Statement};
use mpl_tokens::spanned::{Span, Spanned};
use strum::{Display, IntoStaticStr};

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(Ident),
    /// A type symbol such as `ℕ`
    Type(TypeExpr),
    Application(ApplicationExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Assign(AssignExpr),
    Lambda(LambdaExpr),
    Forall(ForallExpr),
    Conditional(ConditionalExpr),
    Choice(ChoiceExpr),
    List(CollectionExpr),
    /// `{a, b}`, or `∅` for the empty set
    Set(CollectionExpr),
    Record(RecordExpr),
    /// `()` or `(a, b, ...)`
    Tuple(CollectionExpr),
    /// `(e)`
    Paren(ParenExpr),
    /// `(s1; s2; ...)`
    Sequence(SequenceExpr),
    Block(Block),
    Raise(EffectExpr),
    Handle(HandleExpr),
    Trace(EffectExpr),
    Delay(EffectExpr),
    Periodic(EffectExpr),
    Receive(ChannelExpr),
    Send(ChannelExpr),
    Alloc(EffectExpr),
    Release(EffectExpr),
    Parallel(ParallelExpr),
    Atomic(AtomicExpr),
    Resource(ResourceExpr),
    CodeQuote(CodeQuoteExpr),
    CodeUnquote(CodeUnquoteExpr),
    Path(PathExpr),
}

impl Expr {
    /// Whether this is a number, string, boolean, `⊥` or `∅`.
    ///
    /// Scalar literals never act as the callee of an application.
    pub fn is_scalar_literal(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Set(set) => set.elements.is_empty(),
            _ => false,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Type(e) => e.span,
            Expr::Application(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::Forall(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::Choice(e) => e.span,
            Expr::List(e) | Expr::Set(e) | Expr::Tuple(e) => e.span,
            Expr::Record(e) => e.span,
            Expr::Paren(e) => e.span,
            Expr::Sequence(e) => e.span,
            Expr::Block(e) => e.span,
            Expr::Raise(e)
            | Expr::Trace(e)
            | Expr::Delay(e)
            | Expr::Periodic(e)
            | Expr::Alloc(e)
            | Expr::Release(e) => e.span,
            Expr::Handle(e) => e.span,
            Expr::Receive(e) | Expr::Send(e) => e.span,
            Expr::Parallel(e) => e.span,
            Expr::Atomic(e) => e.span,
            Expr::Resource(e) => e.span,
            Expr::CodeQuote(e) => e.span,
            Expr::CodeUnquote(e) => e.span,
            Expr::Path(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub span: Span,
}

/// The built in number and boolean types
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TypeSymbol {
    Nat,
    Int,
    Rat,
    Real,
    Complex,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub symbol: TypeSymbol,
    pub span: Span,
}

/// `callee argument`, one link of a juxtaposition chain
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationExpr {
    pub callee: Box<Expr>,
    pub argument: Box<Expr>,
    pub span: Span,
}

impl ApplicationExpr {
    pub fn new(callee: Expr, argument: Expr) -> Self {
        let span = callee.span().join(argument.span());
        Self {
            callee: Box::new(callee),
            argument: Box::new(argument),
            span,
        }
    }
}

/// A binary operator. Displays as the constructor name used when printing trees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `∗`
    Star,
    Compose,
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    Approx,
    Sim,
    And,
    Or,
    /// `a ⟹ b` with no alternative
    Implies,
    /// `a | b` with no guard
    Otherwise,
    /// `a → b`
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

impl BinaryExpr {
    pub fn new(op: BinOp, left: Expr, right: Expr) -> Self {
        let span = left.span().join(right.span());
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `target ← value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

impl AssignExpr {
    pub fn new(target: Expr, value: Expr) -> Self {
        let span = target.span().join(value.span());
        Self {
            target: Box::new(target),
            value: Box::new(value),
            span,
        }
    }
}

/// `λ param ∈ domain : body`
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub param: Ident,
    pub domain: Option<Box<Expr>>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// `∀ binder ∈ domain : body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForallExpr {
    pub binder: Ident,
    pub domain: Box<Expr>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// `test ⟹ then_branch | else_branch`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
    pub span: Span,
}

/// `⟨left | right⟩`
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// The elements of a list, set or tuple
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: Ident,
    pub value: Expr,
}

impl Spanned for RecordField {
    fn span(&self) -> Span {
        self.name.span.join(self.value.span())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordExpr {
    pub fields: Vec<RecordField>,
    pub span: Span,
}

impl RecordExpr {
    /// Gets a field by name
    pub fn field(&self, name: &str) -> Option<&Expr> {
        self.fields
            .iter()
            .find(|field| field.name.as_str() == name)
            .map(|field| &field.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpr {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// An effect or resource operator applied to a single operand
#[derive(Debug, Clone, PartialEq)]
pub struct EffectExpr {
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `↯ pattern ⇒ body`
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerArm {
    pub pattern: Expr,
    pub body: Expr,
    pub span: Span,
}

/// `expr ↴ { arms }`
#[derive(Debug, Clone, PartialEq)]
pub struct HandleExpr {
    pub expr: Box<Expr>,
    pub arms: Vec<HandlerArm>,
    pub span: Span,
}

/// A channel operator, `↽_channel operand` or `⇀_channel operand`
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelExpr {
    /// The channel name, without its leading underscore
    pub channel: Ident,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `a ‖ b ‖ c`, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelExpr {
    pub branches: Vec<Expr>,
    pub span: Span,
}

/// `⌈ statements ⌉_label`
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicExpr {
    pub body: Vec<Statement>,
    /// The lock name, without its leading underscore
    pub label: Option<Ident>,
    pub span: Span,
}

/// `name ← value;` inside a resource block
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBinding {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `〔 bindings body 〕`
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceExpr {
    pub bindings: Vec<ResourceBinding>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// `⌜ body ⌝`
#[derive(Debug, Clone, PartialEq)]
pub struct CodeQuoteExpr {
    pub body: Box<Expr>,
    pub span: Span,
}

/// `⌞ name ⌟`
#[derive(Debug, Clone, PartialEq)]
pub struct CodeUnquoteExpr {
    pub name: Ident,
    pub span: Span,
}

/// `🖫 target`, where the target is a string or an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub target: Box<Expr>,
    pub span: Span,
}
