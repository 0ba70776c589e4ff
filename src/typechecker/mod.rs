//! The type-checking core: a [`Checker`] that walks an AST produced by an
//! external parser, assigns types to every expression, verifies every
//! statement, and reports diagnostics through [`error::Diagnostics`].
//!
//! Submodules split the checker's behavior the way a single large struct's
//! implementation is split across files: [`types`] is the representation,
//! [`env`] the scope stack, [`unify`]/[`instantiate`] the HM machinery,
//! [`builtins`] the signature catalog, [`resolve`] the annotation resolver,
//! and [`infer`]/[`check`]/[`pattern`] the three `impl Checker` blocks that
//! do the actual walking.

pub mod builtins;
pub mod env;
pub mod error;
mod infer;
mod pattern;
mod resolve;
pub mod types;
pub mod unify;

mod check;
mod instantiate;

use std::collections::HashMap;

use env::TypeEnv;
use error::Diagnostics;
use types::Type;

pub use instantiate::{instantiate, substitute};

/// What a registered sum-type constructor looks like: the name of the type
/// it belongs to, and the types of its positional arguments.
#[derive(Debug, Clone)]
pub struct ConstructorInfo {
    pub type_name: String,
    pub arg_types: Vec<Type>,
}

/// The type-inference and type-checking core (spec §6.1).
///
/// Not `Sync`: a `Checker` is scoped to a single check, matching spec §5's
/// "all other state is per-checker instance" requirement. The fresh
/// type-variable counter backing [`types::fresh_var_id`] is process-wide and
/// atomic, so creating checkers on separate threads remains sound even
/// though any one checker's internal graph is single-threaded only.
pub struct Checker {
    env: TypeEnv,
    diags: Diagnostics,
    constructors: HashMap<String, ConstructorInfo>,
    record_fields: HashMap<String, Vec<(String, Type)>>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        log::debug!("initializing checker");
        Checker {
            env: TypeEnv::new(),
            diags: Diagnostics::new(),
            constructors: HashMap::new(),
            record_fields: HashMap::new(),
        }
    }

    pub fn infer_expr(&mut self, expr: &crate::ast::Expr) -> Type {
        self.infer(expr)
    }

    pub fn check_stmt(&mut self, stmt: &crate::ast::Stmt) -> bool {
        self.check_one_stmt(stmt)
    }

    pub fn check_stmts(&mut self, stmts: &[crate::ast::Stmt]) -> bool {
        self.check_stmts_two_pass(stmts)
    }

    pub fn has_errors(&self) -> bool {
        self.diags.has_errors()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.diags.first_error()
    }

    pub fn clear_errors(&mut self) {
        self.diags.clear();
    }

    pub fn all_errors(&self) -> Vec<String> {
        self.diags.all()
    }

    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut TypeEnv {
        &mut self.env
    }
}
