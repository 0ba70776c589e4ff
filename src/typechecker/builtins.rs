//! The built-in signature catalog (spec §4.5).
//!
//! Every entry is a zero-argument factory closure that builds a brand new
//! `Type` (with brand new `Var`s) on each call, so every lookup through
//! this module is already instantiated — independent of, and in addition
//! to, the `instantiate()` call `Call` performs on whatever type its
//! callee expression produced (spec §4.6).
//!
//! No `original_source/` material was retrievable for this spec (see
//! DESIGN.md), so the exact historical signatures could not be reproduced
//! bit-for-bit; this catalog is a best-effort, internally consistent
//! reconstruction from the names and module set spec §4.5 lists.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::types::Type;

type Factory = fn() -> Type;

fn unary_poly(mk_result: fn(Type) -> Type) -> Type {
    let a = Type::fresh_var("a");
    Fn1(a.clone(), mk_result(a))
}

#[allow(non_snake_case)]
fn Fn1(param: Type, result: Type) -> Type {
    Type::Fn(vec![param], Box::new(result))
}

#[allow(non_snake_case)]
fn Fn2(p1: Type, p2: Type, result: Type) -> Type {
    Type::Fn(vec![p1, p2], Box::new(result))
}

#[allow(non_snake_case)]
fn Fn3(p1: Type, p2: Type, p3: Type, result: Type) -> Type {
    Type::Fn(vec![p1, p2, p3], Box::new(result))
}

static TOP_LEVEL: Lazy<HashMap<&'static str, Factory>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Factory> = HashMap::new();

    m.insert("print", || unary_poly(|_| Type::Unit));
    m.insert("println", || unary_poly(|_| Type::Unit));

    m.insert("str_len", || Fn1(Type::String, Type::Int));
    m.insert("str_concat", || Fn2(Type::String, Type::String, Type::String));
    m.insert("str_eq", || Fn2(Type::String, Type::String, Type::Bool));
    m.insert("str_starts_with", || Fn2(Type::String, Type::String, Type::Bool));
    m.insert("str_ends_with", || Fn2(Type::String, Type::String, Type::Bool));
    m.insert("str_contains", || Fn2(Type::String, Type::String, Type::Bool));
    m.insert("str_slice", || Fn3(Type::String, Type::Int, Type::Int, Type::String));
    m.insert("str_trim", || Fn1(Type::String, Type::String));
    m.insert("str_trim_start", || Fn1(Type::String, Type::String));
    m.insert("str_trim_end", || Fn1(Type::String, Type::String));
    m.insert("str_to_upper", || Fn1(Type::String, Type::String));
    m.insert("str_to_lower", || Fn1(Type::String, Type::String));
    m.insert("str_replace", || Fn3(Type::String, Type::String, Type::String, Type::String));
    m.insert("str_repeat", || Fn2(Type::String, Type::Int, Type::String));
    m.insert("str_is_empty", || Fn1(Type::String, Type::Bool));

    m.insert("list_len", || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a), Type::Int)
    });
    m.insert("list_get", || {
        let a = Type::fresh_var("a");
        Fn2(Type::list(a.clone()), Type::Int, Type::option(a))
    });
    m.insert("list_push", || {
        let a = Type::fresh_var("a");
        Fn2(Type::list(a.clone()), a.clone(), Type::list(a))
    });
    m.insert("list_reverse", || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a.clone()), Type::list(a))
    });
    m.insert("list_concat", || {
        let a = Type::fresh_var("a");
        Fn2(Type::list(a.clone()), Type::list(a.clone()), Type::list(a))
    });
    m.insert("list_head", || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a.clone()), Type::option(a))
    });
    m.insert("list_tail", || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a.clone()), Type::list(a))
    });
    m.insert("list_is_empty", || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a), Type::Bool)
    });

    m.insert("read_file", || Fn1(Type::String, Type::result(Type::String, Type::String)));
    m.insert("write_file", || {
        Fn2(Type::String, Type::String, Type::result(Type::Unit, Type::String))
    });
    m.insert("append_file", || {
        Fn2(Type::String, Type::String, Type::result(Type::Unit, Type::String))
    });
    m.insert("file_exists", || Fn1(Type::String, Type::Bool));
    m.insert("delete_file", || Fn1(Type::String, Type::result(Type::Unit, Type::String)));
    m.insert("file_size", || Fn1(Type::String, Type::result(Type::Int, Type::String)));

    m.insert("Ok", || {
        let a = Type::fresh_var("a");
        let e = Type::fresh_var("e");
        Fn1(a.clone(), Type::result(a, e))
    });
    m.insert("Err", || {
        let a = Type::fresh_var("a");
        let e = Type::fresh_var("e");
        Fn1(e.clone(), Type::result(a, e))
    });
    m.insert("Some", || {
        let a = Type::fresh_var("a");
        Fn1(a.clone(), Type::option(a))
    });
    m.insert("None", || Type::option(Type::fresh_var("a")));

    m
});

static MODULE_FNS: Lazy<HashMap<(&'static str, &'static str), Factory>> = Lazy::new(|| {
    let mut m: HashMap<(&'static str, &'static str), Factory> = HashMap::new();

    m.insert(("String", "len"), || Fn1(Type::String, Type::Int));
    m.insert(("String", "concat"), || Fn2(Type::String, Type::String, Type::String));
    m.insert(("String", "starts_with"), || Fn2(Type::String, Type::String, Type::Bool));
    m.insert(("String", "ends_with"), || Fn2(Type::String, Type::String, Type::Bool));
    m.insert(("String", "contains"), || Fn2(Type::String, Type::String, Type::Bool));
    m.insert(("String", "trim"), || Fn1(Type::String, Type::String));
    m.insert(("String", "to_upper"), || Fn1(Type::String, Type::String));
    m.insert(("String", "to_lower"), || Fn1(Type::String, Type::String));
    m.insert(("String", "split"), || Fn2(Type::String, Type::String, Type::list(Type::String)));

    m.insert(("List", "len"), || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a), Type::Int)
    });
    m.insert(("List", "get"), || {
        let a = Type::fresh_var("a");
        Fn2(Type::list(a.clone()), Type::Int, Type::option(a))
    });
    m.insert(("List", "push"), || {
        let a = Type::fresh_var("a");
        Fn2(Type::list(a.clone()), a.clone(), Type::list(a))
    });
    m.insert(("List", "map"), || {
        let a = Type::fresh_var("a");
        let b = Type::fresh_var("b");
        Fn2(
            Type::Fn(vec![a.clone()], Box::new(b.clone())),
            Type::list(a),
            Type::list(b),
        )
    });
    m.insert(("List", "filter"), || {
        let a = Type::fresh_var("a");
        Fn2(
            Type::Fn(vec![a.clone()], Box::new(Type::Bool)),
            Type::list(a.clone()),
            Type::list(a),
        )
    });
    m.insert(("List", "reverse"), || {
        let a = Type::fresh_var("a");
        Fn1(Type::list(a.clone()), Type::list(a))
    });

    m.insert(("File", "read"), || Fn1(Type::String, Type::result(Type::String, Type::String)));
    m.insert(("File", "write"), || {
        Fn2(Type::String, Type::String, Type::result(Type::Unit, Type::String))
    });
    m.insert(("File", "exists"), || Fn1(Type::String, Type::Bool));

    m.insert(("System", "args"), || Fn1(Type::Unit, Type::list(Type::String)));
    m.insert(("System", "env"), || Fn1(Type::String, Type::option(Type::String)));
    m.insert(("System", "exit"), || Fn1(Type::Int, Type::Unit));
    m.insert(("System", "now"), || Fn1(Type::Unit, Type::Int));

    m.insert(("Regex", "is_match"), || Fn2(Type::String, Type::String, Type::Bool));
    m.insert(("Regex", "find"), || Fn2(Type::String, Type::String, Type::option(Type::String)));
    m.insert(("Regex", "replace"), || {
        Fn3(Type::String, Type::String, Type::String, Type::String)
    });

    m.insert(("Result", "map"), || {
        let a = Type::fresh_var("a");
        let b = Type::fresh_var("b");
        let e = Type::fresh_var("e");
        Fn2(
            Type::Fn(vec![a.clone()], Box::new(b.clone())),
            Type::result(a, e.clone()),
            Type::result(b, e),
        )
    });
    m.insert(("Result", "unwrap_or"), || {
        let a = Type::fresh_var("a");
        let e = Type::fresh_var("e");
        Fn2(Type::result(a.clone(), e), a.clone(), a)
    });
    m.insert(("Result", "is_ok"), || {
        let a = Type::fresh_var("a");
        let e = Type::fresh_var("e");
        Fn1(Type::result(a, e), Type::Bool)
    });
    m.insert(("Result", "is_err"), || {
        let a = Type::fresh_var("a");
        let e = Type::fresh_var("e");
        Fn1(Type::result(a, e), Type::Bool)
    });

    m.insert(("Option", "map"), || {
        let a = Type::fresh_var("a");
        let b = Type::fresh_var("b");
        Fn2(
            Type::Fn(vec![a.clone()], Box::new(b.clone())),
            Type::option(a),
            Type::option(b),
        )
    });
    m.insert(("Option", "unwrap_or"), || {
        let a = Type::fresh_var("a");
        Fn2(Type::option(a.clone()), a.clone(), a)
    });
    m.insert(("Option", "is_some"), || {
        let a = Type::fresh_var("a");
        Fn1(Type::option(a), Type::Bool)
    });
    m.insert(("Option", "is_none"), || {
        let a = Type::fresh_var("a");
        Fn1(Type::option(a), Type::Bool)
    });

    m.insert(("Tui.Term", "clear"), || Fn1(Type::Unit, Type::Unit));
    m.insert(("Tui.Term", "size"), || {
        Fn1(Type::Unit, Type::tuple(vec![Type::Int, Type::Int]))
    });

    m.insert(("Tui.Progress", "new"), || Fn1(Type::Int, Type::Int));
    m.insert(("Tui.Progress", "update"), || Fn2(Type::Int, Type::Int, Type::Unit));
    m.insert(("Tui.Progress", "finish"), || Fn1(Type::Int, Type::Unit));

    m.insert(("Tui.Spinner", "start"), || Fn1(Type::String, Type::Int));
    m.insert(("Tui.Spinner", "stop"), || Fn1(Type::Int, Type::Unit));

    m.insert(("Tui.Prompt", "ask"), || Fn1(Type::String, Type::String));
    m.insert(("Tui.Prompt", "confirm"), || Fn1(Type::String, Type::Bool));
    m.insert(("Tui.Prompt", "select"), || {
        Fn2(Type::String, Type::list(Type::String), Type::String)
    });

    m.insert(("Tui.Panel", "render"), || Fn1(Type::String, Type::Unit));

    m.insert(("Tui.Table", "render"), || {
        Fn1(Type::list(Type::list(Type::String)), Type::Unit)
    });

    m.insert(("Tui.Style", "bold"), || Fn1(Type::String, Type::String));
    m.insert(("Tui.Style", "color"), || Fn2(Type::String, Type::String, Type::String));

    m.insert(("Tui.Status", "set"), || Fn1(Type::String, Type::Unit));

    m.insert(("Tui.Live", "refresh"), || Fn1(Type::Unit, Type::Unit));

    m
});

static KNOWN_MODULES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "String",
        "List",
        "File",
        "System",
        "Regex",
        "Result",
        "Option",
        "Tui.Term",
        "Tui.Progress",
        "Tui.Spinner",
        "Tui.Prompt",
        "Tui.Panel",
        "Tui.Table",
        "Tui.Style",
        "Tui.Status",
        "Tui.Live",
    ]
    .into_iter()
    .collect()
});

/// Looks up a bare top-level identifier (a function or value constructor).
/// Returns an already-fresh `Type` on every call.
pub fn lookup_identifier(name: &str) -> Option<Type> {
    TOP_LEVEL.get(name).map(|factory| factory())
}

/// Looks up a `(module, function)` pair. Returns an already-fresh `Type`
/// on every call.
pub fn lookup_module_fn(module: &str, name: &str) -> Option<Type> {
    let hit = MODULE_FNS.get(&(module, name)).map(|factory| factory());
    if hit.is_none() {
        log::trace!("dotted path '{module}.{name}' did not resolve to a known module function");
    }
    hit
}

pub fn is_known_module(path: &str) -> bool {
    KNOWN_MODULES.contains(path)
}

/// Walks a dotted identifier chain (`A.B.C.name`) and returns the full
/// dotted path string, or `None` if any segment isn't a bare identifier
/// (e.g. the left side is itself a call or other runtime expression).
pub fn build_module_path(expr: &crate::ast::Expr) -> Option<String> {
    use crate::ast::ExprKind;
    match &expr.kind {
        ExprKind::Ident(name) => Some(name.clone()),
        ExprKind::Dot { object, field } => {
            build_module_path(object).map(|base| format!("{base}.{field}"))
        }
        _ => None,
    }
}
