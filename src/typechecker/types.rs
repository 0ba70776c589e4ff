//! The internal type representation (spec §3.1, §4.1).
//!
//! `Type::Var` carries an `Rc<RefCell<VarSlot>>` so that unification's
//! in-place binding is observable everywhere the variable is shared — the
//! same interior-mutability technique the teacher's `TypeInformation` uses
//! for its `type_id: Rc<RefCell<Option<Type>>>` slots.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Hands out the next type-variable id. Process-wide and atomic per spec
/// §5: distinctness across concurrently running checkers only requires the
/// counter itself to be shared, never the checkers' other state.
pub fn fresh_var_id() -> u64 {
    NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct VarSlot {
    pub id: u64,
    pub hint: String,
    pub binding: Option<Type>,
}

/// The type of an expression, statement result, or declared signature.
#[derive(Debug, Clone)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Unit,
    /// Sentinel carrying a diagnostic message; short-circuits inference
    /// without unwinding the call stack.
    Error(String),
    Var(Rc<RefCell<VarSlot>>),
    Con(String, Vec<Type>),
    Fn(Vec<Type>, Box<Type>),
    Tuple(Vec<Type>),
}

impl Type {
    pub fn fresh_var(hint: impl Into<String>) -> Type {
        Type::Var(Rc::new(RefCell::new(VarSlot {
            id: fresh_var_id(),
            hint: hint.into(),
            binding: None,
        })))
    }

    pub fn error(message: impl Into<String>) -> Type {
        Type::Error(message.into())
    }

    pub fn list(elem: Type) -> Type {
        Type::Con("List".to_string(), vec![elem])
    }

    pub fn option(elem: Type) -> Type {
        Type::Con("Option".to_string(), vec![elem])
    }

    pub fn result(ok: Type, err: Type) -> Type {
        Type::Con("Result".to_string(), vec![ok, err])
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Con("Map".to_string(), vec![key, value])
    }

    pub fn range(elem: Type) -> Type {
        Type::Con("Range".to_string(), vec![elem])
    }

    /// Arity-0 collapses to `Unit`, per spec §3.1.
    pub fn tuple(elements: Vec<Type>) -> Type {
        if elements.is_empty() {
            Type::Unit
        } else {
            Type::Tuple(elements)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error(_))
    }

    /// Follows a `Var`'s binding chain to its representative: an unbound
    /// `Var`, or the concrete type it was eventually bound to.
    pub fn prune(&self) -> Type {
        match self {
            Type::Var(slot) => {
                let binding = slot.borrow().binding.clone();
                match binding {
                    Some(bound) => bound.prune(),
                    None => self.clone(),
                }
            }
            other => other.clone(),
        }
    }

    pub fn is_comparable(&self) -> bool {
        matches!(self.prune(), Type::Int | Type::Float | Type::String | Type::Bool)
    }

    pub fn is_result(&self) -> bool {
        matches!(self.prune(), Type::Con(name, args) if name == "Result" && args.len() == 2)
    }

    /// The occurs check: does expanding this type's bound chains ever reach
    /// the unbound variable `id`?
    pub fn contains_var(&self, id: u64) -> bool {
        match self {
            Type::Var(slot) => {
                let slot_ref = slot.borrow();
                if slot_ref.id == id {
                    return true;
                }
                match &slot_ref.binding {
                    Some(bound) => bound.contains_var(id),
                    None => false,
                }
            }
            Type::Con(_, args) => args.iter().any(|a| a.contains_var(id)),
            Type::Fn(params, result) => {
                params.iter().any(|p| p.contains_var(id)) || result.contains_var(id)
            }
            Type::Tuple(elements) => elements.iter().any(|e| e.contains_var(id)),
            _ => false,
        }
    }

    /// Strict structural equality: two distinct unbound variables compare
    /// unequal even if they could be unified (spec §4.1).
    pub fn equals(&self, other: &Type) -> bool {
        let a = self.prune();
        let b = other.prune();
        match (&a, &b) {
            (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::String, Type::String)
            | (Type::Bool, Type::Bool)
            | (Type::Unit, Type::Unit) => true,
            (Type::Error(x), Type::Error(y)) => x == y,
            (Type::Var(v1), Type::Var(v2)) => v1.borrow().id == v2.borrow().id,
            (Type::Con(n1, a1), Type::Con(n2, a2)) => {
                n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| x.equals(y))
            }
            (Type::Fn(p1, r1), Type::Fn(p2, r2)) => {
                p1.len() == p2.len() && p1.iter().zip(p2).all(|(x, y)| x.equals(y)) && r1.equals(r2)
            }
            (Type::Tuple(e1), Type::Tuple(e2)) => {
                e1.len() == e2.len() && e1.iter().zip(e2).all(|(x, y)| x.equals(y))
            }
            _ => false,
        }
    }

    /// Like `equals`, but two unbound variables are always considered equal
    /// to one another, ignoring their ids (spec §3.1).
    pub fn structurally_equal(&self, other: &Type) -> bool {
        let a = self.prune();
        let b = other.prune();
        match (&a, &b) {
            (Type::Var(_), Type::Var(_)) => true,
            (Type::Con(n1, a1), Type::Con(n2, a2)) => {
                n1 == n2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(x, y)| x.structurally_equal(y))
            }
            (Type::Fn(p1, r1), Type::Fn(p2, r2)) => {
                p1.len() == p2.len()
                    && p1.iter().zip(p2).all(|(x, y)| x.structurally_equal(y))
                    && r1.structurally_equal(r2)
            }
            (Type::Tuple(e1), Type::Tuple(e2)) => {
                e1.len() == e2.len() && e1.iter().zip(e2).all(|(x, y)| x.structurally_equal(y))
            }
            (x, y) => x.equals(y),
        }
    }

    pub fn to_printable_string(&self) -> String {
        format!("{self}")
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::String => write!(f, "String"),
            Type::Bool => write!(f, "Bool"),
            Type::Unit => write!(f, "()"),
            Type::Error(msg) => write!(f, "<error: {msg}>"),
            Type::Var(slot) => {
                let slot_ref = slot.borrow();
                match &slot_ref.binding {
                    Some(bound) => write!(f, "{bound}"),
                    None if slot_ref.hint.is_empty() => write!(f, "t{}", slot_ref.id),
                    None => write!(f, "{}", slot_ref.hint),
                }
            }
            Type::Con(name, args) => {
                if args.is_empty() {
                    write!(f, "{name}")
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "{name}({})", rendered.join(", "))
                }
            }
            Type::Fn(params, result) => {
                let rendered: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "({}) -> {result}", rendered.join(", "))
            }
            Type::Tuple(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "({})", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_unbound_vars_are_unequal() {
        let a = Type::fresh_var("a");
        let b = Type::fresh_var("b");
        assert!(!a.equals(&b));
        assert!(a.structurally_equal(&b));
    }

    #[test]
    fn occurs_check_sees_through_bindings() {
        let a = Type::fresh_var("a");
        let b = Type::fresh_var("b");
        if let Type::Var(slot) = &a {
            slot.borrow_mut().binding = Some(b.clone());
        }
        let id = if let Type::Var(slot) = &b {
            slot.borrow().id
        } else {
            unreachable!()
        };
        assert!(a.contains_var(id));
    }

    #[test]
    fn printable_string_for_constructors() {
        let t = Type::result(Type::Int, Type::String);
        assert_eq!(t.to_printable_string(), "Result(Int, String)");
    }

    #[test]
    fn tuple_of_zero_elements_is_unit() {
        assert!(matches!(Type::tuple(vec![]), Type::Unit));
    }

    #[test]
    fn is_result_sees_through_binding() {
        let v = Type::fresh_var("r");
        if let Type::Var(slot) = &v {
            slot.borrow_mut().binding = Some(Type::result(Type::Int, Type::String));
        }
        assert!(v.is_result());
    }
}
