#![doc = include_str!("../README.md")]

pub mod display;
pub mod expr;
pub mod identifier;
pub mod literal;
pub mod statement;
pub mod visit;

pub use expr::Expr;
pub use statement::{Block, Program, Statement};
