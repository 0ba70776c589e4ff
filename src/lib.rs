//! Hindley-Milner style type inference and checking core for a small
//! statically typed language.
//!
//! This crate consumes a syntax tree (see [`ast`]) built by an external
//! parser and reports whether it type-checks, assigning a [`typechecker::types::Type`]
//! to every expression along the way. It does not lex, parse, generate
//! code, or drive a REPL — see [`typechecker::Checker`] for the entry point.

pub mod ast;
pub mod source;
pub mod typechecker;

pub use typechecker::types::Type;
pub use typechecker::Checker;
