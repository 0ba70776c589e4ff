//! Pattern binding (spec §4.8): introduces name bindings in the current
//! scope from a pattern matched against a known scrutinee type.

use crate::ast::Pattern;
use crate::source::SourceLoc;

use super::error::{
    NonTupleDestructure, TypeErrorKind, UnknownConstructor,
};
use super::types::Type;
use super::unify::unify;
use super::Checker;

impl Checker {
    /// Returns `false` on a binding failure (a diagnostic is always
    /// recorded in that case). The caller decides whether a failed arm or
    /// let-binding aborts just that construct or the whole statement.
    pub(crate) fn bind_pattern(&mut self, pattern: &Pattern, ty: &Type, loc: &SourceLoc) -> bool {
        match pattern {
            Pattern::Ident(name) => {
                self.env.define(name.clone(), ty.clone());
                true
            }
            Pattern::Wildcard => true,
            Pattern::Rest => true,

            Pattern::IntLit(_) => self.check_literal_matches(ty, Type::Int, loc),
            Pattern::FloatLit(_) => self.check_literal_matches(ty, Type::Float, loc),
            Pattern::StringLit(_) => self.check_literal_matches(ty, Type::String, loc),
            Pattern::BoolLit(_) => self.check_literal_matches(ty, Type::Bool, loc),

            Pattern::Tuple(sub_patterns) => {
                let fresh: Vec<Type> = sub_patterns
                    .iter()
                    .map(|_| Type::fresh_var("tuple_elem"))
                    .collect();
                let candidate = Type::tuple(fresh.clone());
                if !unify(ty, &candidate) {
                    self.diags.add_at(
                        Some(loc.clone()),
                        TypeErrorKind::NonTupleDestructure(NonTupleDestructure {
                            ty: ty.to_printable_string(),
                            expected_arity: Some(sub_patterns.len()),
                            found_arity: None,
                        }),
                    );
                    return false;
                }
                let mut ok = true;
                for (sub, elem) in sub_patterns.iter().zip(fresh.iter()) {
                    if !self.bind_pattern(sub, &elem.prune(), loc) {
                        ok = false;
                    }
                }
                ok
            }

            Pattern::Constructor { name, args } => self.bind_constructor_pattern(name, args, ty, loc),
        }
    }

    fn check_literal_matches(&mut self, scrutinee: &Type, literal_ty: Type, loc: &SourceLoc) -> bool {
        if unify(scrutinee, &literal_ty) {
            true
        } else {
            self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::mismatch("pattern literal", &literal_ty, scrutinee),
            );
            false
        }
    }

    fn bind_constructor_pattern(
        &mut self,
        name: &str,
        args: &[Pattern],
        ty: &Type,
        loc: &SourceLoc,
    ) -> bool {
        let pruned = ty.prune();

        if let Type::Con(con_name, type_args) = &pruned {
            if con_name == "Option" && type_args.len() == 1 {
                return match name {
                    "Some" if args.len() == 1 => self.bind_pattern(&args[0], &type_args[0], loc),
                    "None" if args.is_empty() => true,
                    _ => self.unknown_constructor(name, loc),
                };
            }
            if con_name == "Result" && type_args.len() == 2 {
                return match name {
                    "Ok" if args.len() == 1 => self.bind_pattern(&args[0], &type_args[0], loc),
                    "Err" if args.len() == 1 => self.bind_pattern(&args[0], &type_args[1], loc),
                    _ => self.unknown_constructor(name, loc),
                };
            }
        }

        let Some(info) = self.constructors.get(name).cloned() else {
            return self.unknown_constructor(name, loc);
        };

        let expected = Type::Con(info.type_name.clone(), vec![]);
        if !unify(&pruned, &expected) && !matches!(pruned, Type::Var(_)) {
            self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::mismatch(format!("pattern '{name}'"), &expected, &pruned),
            );
            return false;
        }

        if info.arg_types.len() != args.len() {
            self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::ArityMismatch(super::error::ArityMismatch {
                    context: format!("constructor pattern '{name}'"),
                    expected: info.arg_types.len(),
                    found: args.len(),
                }),
            );
            return false;
        }

        let mut ok = true;
        for (sub, field_ty) in args.iter().zip(info.arg_types.iter()) {
            if !self.bind_pattern(sub, field_ty, loc) {
                ok = false;
            }
        }
        ok
    }

    fn unknown_constructor(&mut self, name: &str, loc: &SourceLoc) -> bool {
        self.diags.add_at(
            Some(loc.clone()),
            TypeErrorKind::UnknownConstructor(UnknownConstructor { name: name.to_string() }),
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typechecker::ConstructorInfo;

    fn loc() -> SourceLoc {
        SourceLoc::at(1, 1)
    }

    #[test]
    fn ident_pattern_binds_name() {
        let mut checker = Checker::new();
        assert!(checker.bind_pattern(&Pattern::Ident("x".into()), &Type::Int, &loc()));
        assert!(matches!(checker.env().lookup("x"), Some(Type::Int)));
    }

    #[test]
    fn wildcard_never_fails() {
        let mut checker = Checker::new();
        assert!(checker.bind_pattern(&Pattern::Wildcard, &Type::Int, &loc()));
    }

    #[test]
    fn int_literal_pattern_requires_matching_scrutinee() {
        let mut checker = Checker::new();
        assert!(checker.bind_pattern(&Pattern::IntLit(1), &Type::Int, &loc()));
        let mut checker2 = Checker::new();
        assert!(!checker2.bind_pattern(&Pattern::IntLit(1), &Type::String, &loc()));
    }

    #[test]
    fn tuple_pattern_destructures_matching_arity() {
        let mut checker = Checker::new();
        let scrutinee = Type::tuple(vec![Type::Int, Type::Bool]);
        let pattern = Pattern::Tuple(vec![Pattern::Ident("a".into()), Pattern::Ident("b".into())]);
        assert!(checker.bind_pattern(&pattern, &scrutinee, &loc()));
        assert!(matches!(checker.env().lookup("a"), Some(Type::Int)));
        assert!(matches!(checker.env().lookup("b"), Some(Type::Bool)));
    }

    #[test]
    fn tuple_pattern_rejects_wrong_arity() {
        let mut checker = Checker::new();
        let scrutinee = Type::tuple(vec![Type::Int, Type::Bool, Type::String]);
        let pattern = Pattern::Tuple(vec![Pattern::Ident("a".into()), Pattern::Ident("b".into())]);
        assert!(!checker.bind_pattern(&pattern, &scrutinee, &loc()));
    }

    #[test]
    fn some_constructor_binds_option_payload() {
        let mut checker = Checker::new();
        let scrutinee = Type::option(Type::Int);
        let pattern = Pattern::Constructor { name: "Some".into(), args: vec![Pattern::Ident("n".into())] };
        assert!(checker.bind_pattern(&pattern, &scrutinee, &loc()));
        assert!(matches!(checker.env().lookup("n"), Some(Type::Int)));
    }

    #[test]
    fn none_constructor_is_a_no_op() {
        let mut checker = Checker::new();
        let scrutinee = Type::option(Type::Int);
        let pattern = Pattern::Constructor { name: "None".into(), args: vec![] };
        assert!(checker.bind_pattern(&pattern, &scrutinee, &loc()));
    }

    #[test]
    fn ok_err_constructors_bind_result_payload() {
        let mut checker = Checker::new();
        let scrutinee = Type::result(Type::Int, Type::String);
        let ok_pattern = Pattern::Constructor { name: "Ok".into(), args: vec![Pattern::Ident("v".into())] };
        assert!(checker.bind_pattern(&ok_pattern, &scrutinee, &loc()));
        assert!(matches!(checker.env().lookup("v"), Some(Type::Int)));
    }

    #[test]
    fn user_defined_constructor_binds_registered_fields() {
        let mut checker = Checker::new();
        checker.constructors.insert(
            "Point".into(),
            ConstructorInfo { type_name: "Shape".into(), arg_types: vec![Type::Int, Type::Int] },
        );
        let scrutinee = Type::Con("Shape".into(), vec![]);
        let pattern = Pattern::Constructor {
            name: "Point".into(),
            args: vec![Pattern::Ident("x".into()), Pattern::Ident("y".into())],
        };
        assert!(checker.bind_pattern(&pattern, &scrutinee, &loc()));
        assert!(matches!(checker.env().lookup("x"), Some(Type::Int)));
        assert!(matches!(checker.env().lookup("y"), Some(Type::Int)));
    }

    #[test]
    fn unknown_constructor_name_fails() {
        let mut checker = Checker::new();
        let pattern = Pattern::Constructor { name: "Nope".into(), args: vec![] };
        assert!(!checker.bind_pattern(&pattern, &Type::Int, &loc()));
        assert!(checker.has_errors());
    }

    #[test]
    fn rest_pattern_is_a_no_op() {
        let mut checker = Checker::new();
        assert!(checker.bind_pattern(&Pattern::Rest, &Type::Int, &loc()));
    }
}
