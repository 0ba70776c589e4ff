//! Structural unification with the occurs check (spec §4.3).
//!
//! This is the only mechanism in the checker allowed to bind a `Var`'s
//! slot. Cross-checked against the classic algorithm-W `unify` in
//! `examples/other_examples/30609db4_kevinbarabash-cricket__crates-escalier_hm-src-lib.rs.rs`,
//! adapted from that file's arena-of-`Type` representation to this crate's
//! `Rc<RefCell<VarSlot>>` nodes.

use std::cell::RefCell;
use std::rc::Rc;

use super::types::{Type, VarSlot};

/// Attempts to make `a` and `b` structurally identical by binding unbound
/// variables in place. Returns `false` on occurs-check violation or
/// structural mismatch; the caller is responsible for turning that into a
/// diagnostic (unify itself never reports anything).
pub fn unify(a: &Type, b: &Type) -> bool {
    let a = a.prune();
    let b = b.prune();

    match (&a, &b) {
        (Type::Error(_), _) | (_, Type::Error(_)) => false,

        (Type::Var(slot), _) => bind(slot, &b),
        (_, Type::Var(slot)) => bind(slot, &a),

        (Type::Int, Type::Int)
        | (Type::Float, Type::Float)
        | (Type::String, Type::String)
        | (Type::Bool, Type::Bool)
        | (Type::Unit, Type::Unit) => true,

        (Type::Con(n1, args1), Type::Con(n2, args2)) => {
            n1 == n2 && args1.len() == args2.len() && unify_all(args1, args2)
        }

        (Type::Fn(params1, ret1), Type::Fn(params2, ret2)) => {
            params1.len() == params2.len() && unify_all(params1, params2) && unify(ret1, ret2)
        }

        (Type::Tuple(elems1), Type::Tuple(elems2)) => {
            elems1.len() == elems2.len() && unify_all(elems1, elems2)
        }

        _ => false,
    }
}

fn unify_all(xs: &[Type], ys: &[Type]) -> bool {
    xs.iter().zip(ys).all(|(x, y)| unify(x, y))
}

fn bind(slot: &Rc<RefCell<VarSlot>>, other: &Type) -> bool {
    if let Type::Var(other_slot) = other {
        if Rc::ptr_eq(slot, other_slot) {
            return true;
        }
    }

    let id = slot.borrow().id;
    if other.contains_var(id) {
        log::trace!(
            "occurs check failed: t{id} occurs in {}",
            other.to_printable_string()
        );
        return false;
    }

    log::trace!("binding t{id} := {}", other.to_printable_string());
    slot.borrow_mut().binding = Some(other.clone());
    true
}
