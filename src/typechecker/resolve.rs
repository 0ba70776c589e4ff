//! Converts syntactic type annotations into internal types (spec §4.10).
//!
//! Grounded on `why_lib::typechecker::types::Type`'s
//! `TryFrom<(TypeName, &Context)>` impl (primitive-name match, recursive
//! resolution of nested shapes, env lookup for bare names), split here
//! into a forgiving entry point (`resolve`) and a strict one
//! (`resolve_strict`) since spec §4.10 requires both to coexist.

use crate::ast::TypeExpr;
use crate::source::SourceLoc;

use super::env::TypeEnv;
use super::error::{Diagnostics, TypeErrorKind, UndefinedType};
use super::types::Type;

fn well_known_arity(name: &str) -> Option<usize> {
    match name {
        "List" | "Option" => Some(1),
        "Result" | "Map" => Some(2),
        _ => None,
    }
}

fn ground(name: &str) -> Option<Type> {
    match name {
        "Int" => Some(Type::Int),
        "Float" => Some(Type::Float),
        "String" => Some(Type::String),
        "Bool" => Some(Type::Bool),
        _ => None,
    }
}

/// Forgiving resolution: unknown bare names become `Con(name, [])`, useful
/// for user-defined types that may be declared elsewhere in the program.
pub fn resolve(expr: &TypeExpr, env: &TypeEnv) -> Type {
    match expr {
        TypeExpr::Named { name, args } => {
            if args.is_empty() {
                if let Some(t) = ground(name) {
                    return t;
                }
                if let Some(t) = env.lookup_type(name) {
                    return t;
                }
                return Type::Con(name.clone(), vec![]);
            }
            let resolved_args: Vec<Type> = args.iter().map(|a| resolve(a, env)).collect();
            if let Some(arity) = well_known_arity(name) {
                if arity == resolved_args.len() {
                    return Type::Con(name.clone(), resolved_args);
                }
            }
            Type::Con(name.clone(), resolved_args)
        }
        TypeExpr::Fn { params, result } => Type::Fn(
            params.iter().map(|p| resolve(p, env)).collect(),
            Box::new(resolve(result, env)),
        ),
        TypeExpr::Tuple(elements) => {
            Type::tuple(elements.iter().map(|e| resolve(e, env)).collect())
        }
    }
}

/// Strict resolution: errors on any unknown bare name instead of
/// constructing a placeholder `Con`. Used when validating variant/record
/// field annotations (spec §4.7).
pub fn resolve_strict(
    expr: &TypeExpr,
    env: &TypeEnv,
    diags: &mut Diagnostics,
    loc: &SourceLoc,
) -> Type {
    match expr {
        TypeExpr::Named { name, args } => {
            if args.is_empty() {
                if let Some(t) = ground(name) {
                    return t;
                }
                if let Some(t) = env.lookup_type(name) {
                    return t;
                }
                return diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::UndefinedType(UndefinedType { name: name.clone() }),
                );
            }
            let resolved_args: Vec<Type> = args
                .iter()
                .map(|a| resolve_strict(a, env, diags, loc))
                .collect();
            Type::Con(name.clone(), resolved_args)
        }
        TypeExpr::Fn { params, result } => Type::Fn(
            params
                .iter()
                .map(|p| resolve_strict(p, env, diags, loc))
                .collect(),
            Box::new(resolve_strict(result, env, diags, loc)),
        ),
        TypeExpr::Tuple(elements) => Type::tuple(
            elements
                .iter()
                .map(|e| resolve_strict(e, env, diags, loc))
                .collect(),
        ),
    }
}
