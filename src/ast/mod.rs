//! Syntax tree types consumed by the checker.
//!
//! Everything here is data only: there is no lexer or parser in this crate,
//! only the node shapes a parser would hand the checker (spec contract,
//! not an implementation). The checker treats every value here as
//! read-only input.

mod expr;
mod pattern;
mod stmt;
mod type_expr;

pub use expr::{BinaryOp, Block, Expr, ExprKind, MatchArm, UnaryOp};
pub use pattern::Pattern;
pub use stmt::{Param, Stmt, StmtKind, TypeDef};
pub use type_expr::TypeExpr;
