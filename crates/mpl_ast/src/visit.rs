//! Uniform, read-only access to the nodes of a tree

use crate::expr::{Expr, HandlerArm, RecordField, ResourceBinding};
use crate::identifier::Ident;
use crate::statement::{Block, Program, Statement};
use mpl_tokens::spanned::{Span, Spanned};

/// A reference to any node of a tree
#[derive(Debug, Copy, Clone)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a Block),
    Expr(&'a Expr),
    Ident(&'a Ident),
    Field(&'a RecordField),
    Arm(&'a HandlerArm),
    Binding(&'a ResourceBinding),
}

impl<'a> NodeRef<'a> {
    /// The direct children of this node, in source order
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Program(program) => program.statements.iter().map(NodeRef::from).collect(),
            NodeRef::Block(block) => block.statements.iter().map(NodeRef::from).collect(),
            NodeRef::Statement(stmt) => match stmt {
                Statement::Definition(def) => vec![(&def.name).into(), (&def.body).into()],
                Statement::Module(module) => vec![(&module.name).into(), (&module.body).into()],
                Statement::Expr(expr) => NodeRef::Expr(expr).children(),
            },
            NodeRef::Expr(expr) => expr_children(expr),
            NodeRef::Ident(_) => vec![],
            NodeRef::Field(field) => vec![(&field.name).into(), (&field.value).into()],
            NodeRef::Arm(arm) => vec![(&arm.pattern).into(), (&arm.body).into()],
            NodeRef::Binding(binding) => vec![(&binding.name).into(), (&binding.value).into()],
        }
    }

    /// Visits this node and every node below it, parents before children
    pub fn walk(&self, visitor: &mut impl FnMut(NodeRef<'a>)) {
        visitor(*self);
        for child in self.children() {
            child.walk(visitor);
        }
    }
}

fn expr_children(expr: &Expr) -> Vec<NodeRef<'_>> {
    match expr {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::Type(_) => vec![],
        Expr::Application(app) => vec![(&*app.callee).into(), (&*app.argument).into()],
        Expr::Binary(bin) => vec![(&*bin.left).into(), (&*bin.right).into()],
        Expr::Unary(unary) => vec![(&*unary.operand).into()],
        Expr::Assign(assign) => vec![(&*assign.target).into(), (&*assign.value).into()],
        Expr::Lambda(lambda) => {
            let mut children = vec![NodeRef::Ident(&lambda.param)];
            children.extend(lambda.domain.as_deref().map(NodeRef::Expr));
            children.push((&*lambda.body).into());
            children
        }
        Expr::Forall(forall) => vec![
            (&forall.binder).into(),
            (&*forall.domain).into(),
            (&*forall.body).into(),
        ],
        Expr::Conditional(cond) => vec![
            (&*cond.test).into(),
            (&*cond.then_branch).into(),
            (&*cond.else_branch).into(),
        ],
        Expr::Choice(choice) => vec![(&*choice.left).into(), (&*choice.right).into()],
        Expr::List(c) | Expr::Set(c) | Expr::Tuple(c) => {
            c.elements.iter().map(NodeRef::from).collect()
        }
        Expr::Record(record) => record.fields.iter().map(NodeRef::Field).collect(),
        Expr::Paren(paren) => vec![(&*paren.inner).into()],
        Expr::Sequence(seq) => seq.statements.iter().map(NodeRef::from).collect(),
        Expr::Block(block) => vec![block.into()],
        Expr::Raise(e)
        | Expr::Trace(e)
        | Expr::Delay(e)
        | Expr::Periodic(e)
        | Expr::Alloc(e)
        | Expr::Release(e) => vec![(&*e.operand).into()],
        Expr::Handle(handle) => {
            let mut children = vec![NodeRef::Expr(&handle.expr)];
            children.extend(handle.arms.iter().map(NodeRef::Arm));
            children
        }
        Expr::Receive(chan) | Expr::Send(chan) => {
            vec![(&chan.channel).into(), (&*chan.operand).into()]
        }
        Expr::Parallel(par) => par.branches.iter().map(NodeRef::from).collect(),
        Expr::Atomic(atomic) => {
            let mut children: Vec<_> = atomic.body.iter().map(NodeRef::from).collect();
            children.extend(atomic.label.as_ref().map(NodeRef::Ident));
            children
        }
        Expr::Resource(resource) => {
            let mut children: Vec<_> = resource.bindings.iter().map(NodeRef::Binding).collect();
            children.push((&*resource.body).into());
            children
        }
        Expr::CodeQuote(quote) => vec![(&*quote.body).into()],
        Expr::CodeUnquote(unquote) => vec![(&unquote.name).into()],
        Expr::Path(path) => vec![(&*path.target).into()],
    }
}

impl Spanned for NodeRef<'_> {
    fn span(&self) -> Span {
        match self {
            NodeRef::Program(n) => n.span(),
            NodeRef::Statement(n) => n.span(),
            NodeRef::Block(n) => n.span(),
            NodeRef::Expr(n) => n.span(),
            NodeRef::Ident(n) => n.span(),
            NodeRef::Field(n) => n.span(),
            NodeRef::Arm(n) => n.span,
            NodeRef::Binding(n) => n.span,
        }
    }
}

macro_rules! node_ref_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
        impl<'a> From<&'a $ty> for NodeRef<'a> {
            fn from(value: &'a $ty) -> Self {
                NodeRef::$variant(value)
            }
        }
        )*
    };
}

node_ref_from! {
    Program => Program,
    Statement => Statement,
    Block => Block,
    Expr => Expr,
    Ident => Ident,
    RecordField => Field,
    HandlerArm => Arm,
    ResourceBinding => Binding,
}
