//! The statement checker (spec §4.7): two passes over a sequence of
//! statements — hoist function signatures, then check bodies — so mutual
//! and forward recursion need no explicit forward declarations.

use crate::ast::{Param, Stmt, StmtKind, TypeDef};
use crate::source::SourceLoc;

use super::error::TypeErrorKind;
use super::resolve;
use super::types::Type;
use super::unify::unify;
use super::{Checker, ConstructorInfo};

impl Checker {
    pub(crate) fn check_stmts_two_pass(&mut self, stmts: &[Stmt]) -> bool {
        log::debug!("checking {} statement(s) (two-pass)", stmts.len());
        let before = self.diags.len();
        self.hoist_signatures(stmts);
        for stmt in stmts {
            self.check_stmt_body(stmt);
        }
        self.diags.len() == before
    }

    pub(crate) fn check_one_stmt(&mut self, stmt: &Stmt) -> bool {
        let before = self.diags.len();
        self.hoist_signatures(std::slice::from_ref(stmt));
        self.check_stmt_body(stmt);
        self.diags.len() == before
    }

    fn hoist_signatures(&mut self, stmts: &[Stmt]) {
        let mut hoisted = 0usize;
        for stmt in stmts {
            if let StmtKind::FnDef { name, params, return_annotation, .. } = &stmt.kind {
                let sig = self.build_fn_signature(name, params, return_annotation.as_ref());
                self.env.define(name.clone(), sig);
                hoisted += 1;
            }
        }
        if hoisted > 0 {
            log::debug!("hoisted {hoisted} function signature(s)");
        }
    }

    fn build_fn_signature(
        &self,
        name: &str,
        params: &[Param],
        return_annotation: Option<&crate::ast::TypeExpr>,
    ) -> Type {
        let param_types: Vec<Type> = params
            .iter()
            .map(|p| match &p.annotation {
                Some(t) => resolve::resolve(t, &self.env),
                None => Type::fresh_var(p.name.clone()),
            })
            .collect();
        let return_type = match return_annotation {
            Some(t) => resolve::resolve(t, &self.env),
            None if name == "main" => Type::Unit,
            None => Type::fresh_var("return"),
        };
        Type::Fn(param_types, Box::new(return_type))
    }

    fn check_stmt_body(&mut self, stmt: &Stmt) -> bool {
        match &stmt.kind {
            StmtKind::Let { pattern, annotation, value } => {
                self.check_let(pattern, annotation.as_ref(), value, &stmt.loc)
            }
            StmtKind::Expr(e) => {
                let before = self.diags.len();
                self.infer(e);
                self.diags.len() == before
            }
            StmtKind::FnDef { name, params, body, .. } => self.check_fn_def(name, params, body),
            StmtKind::TypeDef(td) => self.check_type_def(td, &stmt.loc),

            // Accepted as no-ops: these statement kinds carry meaning for
            // surrounding stages (parser, codegen) that this crate doesn't
            // implement (spec §4.7).
            StmtKind::Return(_)
            | StmtKind::Import(_)
            | StmtKind::Defer(_)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Trait(_)
            | StmtKind::Impl(_)
            | StmtKind::Newtype(_)
            | StmtKind::Module(_) => true,
        }
    }

    fn check_let(
        &mut self,
        pattern: &crate::ast::Pattern,
        annotation: Option<&crate::ast::TypeExpr>,
        value: &crate::ast::Expr,
        loc: &SourceLoc,
    ) -> bool {
        let value_ty = self.infer(value);
        if value_ty.is_error() {
            return false;
        }

        let bound_ty = match annotation {
            Some(ann) => {
                let ann_ty = resolve::resolve(ann, &self.env);
                if !unify(&value_ty, &ann_ty) {
                    self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("let annotation", &ann_ty, &value_ty));
                    return false;
                }
                ann_ty
            }
            None => value_ty,
        };

        self.bind_pattern(pattern, &bound_ty, loc)
    }

    fn check_fn_def(&mut self, name: &str, params: &[Param], body: &crate::ast::Expr) -> bool {
        let sig = self
            .env
            .lookup(name)
            .expect("function signatures are hoisted before bodies are checked");
        let Type::Fn(param_types, return_type) = sig else {
            unreachable!("hoist_signatures only ever defines Fn types for function names")
        };

        self.env.push_scope();
        for (p, ty) in params.iter().zip(param_types.iter()) {
            self.env.define(p.name.clone(), ty.clone());
        }
        let body_ty = self.infer(body);
        self.env.pop_scope();

        if body_ty.is_error() {
            return false;
        }
        if unify(&body_ty, &return_type) {
            true
        } else {
            self.diags.add_at(
                Some(body.loc.clone()),
                TypeErrorKind::mismatch(format!("function '{name}' return type"), &return_type, &body_ty),
            );
            false
        }
    }

    fn check_type_def(&mut self, td: &TypeDef, loc: &SourceLoc) -> bool {
        let before = self.diags.len();
        match td {
            TypeDef::Variant { name, variants } => {
                if self.env.lookup_type(name).is_some() {
                    self.diags.add_at(
                        Some(loc.clone()),
                        TypeErrorKind::RedefinedType(super::error::RedefinedType { name: name.clone() }),
                    );
                    return false;
                }
                self.env.define_type(name.clone(), Type::Con(name.clone(), vec![]));
                for (variant_name, field_annotations) in variants {
                    let arg_types: Vec<Type> = field_annotations
                        .iter()
                        .map(|t| resolve::resolve_strict(t, &self.env, &mut self.diags, loc))
                        .collect();
                    self.constructors.insert(
                        variant_name.clone(),
                        ConstructorInfo { type_name: name.clone(), arg_types },
                    );
                }
            }
            TypeDef::Record { name, fields } => {
                if self.env.lookup_type(name).is_some() {
                    self.diags.add_at(
                        Some(loc.clone()),
                        TypeErrorKind::RedefinedType(super::error::RedefinedType { name: name.clone() }),
                    );
                    return false;
                }
                self.env.define_type(name.clone(), Type::Con(name.clone(), vec![]));
                let resolved_fields: Vec<(String, Type)> = fields
                    .iter()
                    .map(|(fname, texpr)| (fname.clone(), resolve::resolve_strict(texpr, &self.env, &mut self.diags, loc)))
                    .collect();
                self.record_fields.insert(name.clone(), resolved_fields);
            }
        }
        self.diags.len() == before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Expr, ExprKind, Pattern, TypeExpr};

    fn loc() -> SourceLoc {
        SourceLoc::at(1, 1)
    }

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, loc())
    }

    fn s(kind: StmtKind) -> Stmt {
        Stmt::new(kind, loc())
    }

    #[test]
    fn let_without_annotation_binds_inferred_type() {
        let mut c = Checker::new();
        let stmt = s(StmtKind::Let {
            pattern: Pattern::Ident("x".into()),
            annotation: None,
            value: e(ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(e(ExprKind::IntLit(1))),
                right: Box::new(e(ExprKind::IntLit(2))),
            }),
        });
        assert!(c.check_stmt(&stmt));
        assert!(matches!(c.env().lookup("x"), Some(Type::Int)));
    }

    #[test]
    fn let_with_annotation_unifies_empty_list_to_declared_element_type() {
        let mut c = Checker::new();
        let xs_stmt = s(StmtKind::Let { pattern: Pattern::Ident("xs".into()), annotation: None, value: e(ExprKind::ListLit(vec![])) });
        assert!(c.check_stmt(&xs_stmt));

        let ys_stmt = s(StmtKind::Let {
            pattern: Pattern::Ident("ys".into()),
            annotation: Some(TypeExpr::Named { name: "List".into(), args: vec![TypeExpr::Named { name: "Int".into(), args: vec![] }] }),
            value: e(ExprKind::Ident("xs".into())),
        });
        assert!(c.check_stmt(&ys_stmt));

        assert!(c.env().lookup("ys").unwrap().equals(&Type::list(Type::Int)));
        assert!(c.env().lookup("xs").unwrap().equals(&Type::list(Type::Int)));
    }

    #[test]
    fn two_pass_forward_reference_type_checks() {
        let mut c = Checker::new();
        let a = s(StmtKind::FnDef {
            name: "a".into(),
            params: vec![],
            return_annotation: None,
            body: e(ExprKind::Call { callee: Box::new(e(ExprKind::Ident("b".into()))), args: vec![] }),
        });
        let b = s(StmtKind::FnDef {
            name: "b".into(),
            params: vec![],
            return_annotation: None,
            body: e(ExprKind::IntLit(1)),
        });
        assert!(c.check_stmts(&[a, b]));
        assert_eq!(c.env().depth(), 1);
    }

    #[test]
    fn recursive_function_infers_param_type_from_body_use() {
        let mut c = Checker::new();
        let loop_fn = s(StmtKind::FnDef {
            name: "loop_".into(),
            params: vec![Param { name: "x".into(), annotation: None }],
            return_annotation: None,
            body: e(ExprKind::Call {
                callee: Box::new(e(ExprKind::Ident("loop_".into()))),
                args: vec![e(ExprKind::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(e(ExprKind::Ident("x".into()))),
                    right: Box::new(e(ExprKind::IntLit(1))),
                })],
            }),
        });
        assert!(c.check_stmts(&[loop_fn]));
        match c.env().lookup("loop_").unwrap() {
            Type::Fn(params, _) => assert!(matches!(params[0].prune(), Type::Int)),
            _ => panic!("expected Fn"),
        }
    }

    #[test]
    fn main_without_annotation_defaults_to_unit_return() {
        let mut c = Checker::new();
        let main_fn = s(StmtKind::FnDef { name: "main".into(), params: vec![], return_annotation: None, body: e(ExprKind::IntLit(1)) });
        assert!(!c.check_stmts(&[main_fn]));
        assert!(c.has_errors());
    }

    #[test]
    fn variant_type_def_registers_constructors() {
        let mut c = Checker::new();
        let td = s(StmtKind::TypeDef(TypeDef::Variant {
            name: "Shape".into(),
            variants: vec![("Circle".into(), vec![TypeExpr::Named { name: "Int".into(), args: vec![] }])],
        }));
        assert!(c.check_stmt(&td));
        assert!(c.env().lookup_type("Shape").is_some());
    }

    #[test]
    fn redefining_a_type_name_is_rejected() {
        let mut c = Checker::new();
        let first = s(StmtKind::TypeDef(TypeDef::Record { name: "Point".into(), fields: vec![] }));
        let second = s(StmtKind::TypeDef(TypeDef::Record { name: "Point".into(), fields: vec![] }));
        assert!(c.check_stmt(&first));
        assert!(!c.check_stmt(&second));
    }

    #[test]
    fn reserved_statement_kinds_are_accepted_as_no_ops() {
        let mut c = Checker::new();
        assert!(c.check_stmt(&s(StmtKind::Break)));
        assert!(c.check_stmt(&s(StmtKind::Continue)));
        assert!(c.check_stmt(&s(StmtKind::Import("std".into()))));
    }
}
