//! Instantiation and substitution (spec §4.4).

use std::collections::HashMap;

use super::types::Type;

/// Produces a copy of `t` with every unbound `Var` replaced by a fresh one,
/// such that all occurrences of the same source variable in `t` share the
/// same fresh variable. This is what gives let-polymorphism at use sites:
/// the returned type shares no unbound variables with any previously
/// produced type.
pub fn instantiate(t: &Type) -> Type {
    let mut mapping: HashMap<u64, Type> = HashMap::new();
    instantiate_rec(t, &mut mapping)
}

fn instantiate_rec(t: &Type, mapping: &mut HashMap<u64, Type>) -> Type {
    match t {
        Type::Var(slot) => {
            let (id, hint, binding) = {
                let slot_ref = slot.borrow();
                (slot_ref.id, slot_ref.hint.clone(), slot_ref.binding.clone())
            };
            match binding {
                Some(bound) => instantiate_rec(&bound, mapping),
                None => mapping
                    .entry(id)
                    .or_insert_with(|| Type::fresh_var(hint))
                    .clone(),
            }
        }
        Type::Con(name, args) => Type::Con(
            name.clone(),
            args.iter().map(|a| instantiate_rec(a, mapping)).collect(),
        ),
        Type::Fn(params, result) => Type::Fn(
            params.iter().map(|p| instantiate_rec(p, mapping)).collect(),
            Box::new(instantiate_rec(result, mapping)),
        ),
        Type::Tuple(elements) => Type::Tuple(
            elements.iter().map(|e| instantiate_rec(e, mapping)).collect(),
        ),
        other => other.clone(),
    }
}

/// Produces a rebuilt copy of `t` where every `Var` is replaced by its
/// binding chain's tail. Unbound variables are preserved as-is. Used after
/// unification so callers see the most specific type the unifier learned.
pub fn substitute(t: &Type) -> Type {
    match t {
        Type::Var(_) => t.prune(),
        Type::Con(name, args) => Type::Con(name.clone(), args.iter().map(substitute).collect()),
        Type::Fn(params, result) => Type::Fn(
            params.iter().map(substitute).collect(),
            Box::new(substitute(result)),
        ),
        Type::Tuple(elements) => Type::Tuple(elements.iter().map(substitute).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_preserves_shared_identity() {
        let a = Type::fresh_var("a");
        let id_sig = Type::Fn(vec![a.clone()], Box::new(a));
        let fresh = instantiate(&id_sig);
        if let Type::Fn(params, result) = &fresh {
            assert!(params[0].equals(result));
        } else {
            panic!("expected Fn");
        }
    }

    #[test]
    fn two_instantiations_are_disjoint() {
        let a = Type::fresh_var("a");
        let id_sig = Type::Fn(vec![a.clone()], Box::new(a));
        let i1 = instantiate(&id_sig);
        let i2 = instantiate(&id_sig);
        assert!(!i1.equals(&i2));
    }

    #[test]
    fn substitute_follows_bindings() {
        let a = Type::fresh_var("a");
        crate::typechecker::unify::unify(&a, &Type::Int);
        assert!(substitute(&a).equals(&Type::Int));
    }

    #[test]
    fn substitute_is_idempotent() {
        let a = Type::fresh_var("a");
        crate::typechecker::unify::unify(&a, &Type::list(Type::Int));
        let once = substitute(&a);
        let twice = substitute(&once);
        assert!(once.equals(&twice));
    }

    #[test]
    fn substitute_preserves_unbound_vars() {
        let a = Type::fresh_var("a");
        let subst = substitute(&a);
        assert!(matches!(subst, Type::Var(_)));
    }
}
