//! The expression inferencer (spec §4.6): one recursive procedure that
//! returns the inferred type of any expression. Always returns a `Type`;
//! never panics on ill-typed input. Diagnostics go to the accumulator and
//! an `Error` type is returned to short-circuit the enclosing form.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::source::SourceLoc;

use super::builtins;
use super::error::{
    ArityMismatch, CannotAccessField, EmptyMatch, NonFunctionCall, NonIterable, NonResult,
    NotComparable, NotImplemented, OperandMismatch, PipeTargetNotCall, TupleIndexOutOfBounds,
    TypeErrorKind, UndefinedVariable, UnknownModuleFunction,
};
use super::instantiate::{instantiate, substitute};
use super::types::Type;
use super::unify::unify;
use super::Checker;

impl Checker {
    pub(crate) fn infer(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::IntLit(_) => Type::Int,
            ExprKind::FloatLit(_) => Type::Float,
            ExprKind::StringLit(_) => Type::String,
            ExprKind::BoolLit(_) => Type::Bool,

            ExprKind::Ident(name) => self.infer_ident(name, &expr.loc),

            ExprKind::Binary { op, left, right } => self.infer_binary(*op, left, right, &expr.loc),
            ExprKind::Unary { op, operand } => self.infer_unary(*op, operand, &expr.loc),

            ExprKind::ListLit(elems) => self.infer_list_lit(elems, &expr.loc),
            ExprKind::TupleLit(elems) => {
                let types: Vec<Type> = elems.iter().map(|e| self.infer(e)).collect();
                if types.iter().any(Type::is_error) {
                    Type::error("propagated")
                } else {
                    Type::tuple(types)
                }
            }
            ExprKind::MapLit(entries) => self.infer_map_lit(entries, &expr.loc),

            ExprKind::Call { callee, args } => {
                let callee_ty = self.infer(callee);
                self.apply_call(&callee_ty, None, args, &expr.loc)
            }

            ExprKind::If { condition, then_branch, else_branch } => {
                self.infer_if(condition, then_branch, else_branch.as_deref(), &expr.loc)
            }

            ExprKind::Block(block) => {
                self.env.push_scope();
                self.check_stmts_two_pass(&block.stmts);
                let result = match &block.final_expr {
                    Some(e) => self.infer(e),
                    None => Type::Unit,
                };
                self.env.pop_scope();
                result
            }

            ExprKind::Match { scrutinee, arms } => self.infer_match(scrutinee, arms, &expr.loc),

            ExprKind::Bind { name, value } => self.infer_bind(name, value),

            ExprKind::With { bindings, body, else_arms } => {
                self.infer_with(bindings, body, else_arms, &expr.loc)
            }

            ExprKind::Lambda { params, body } => self.infer_lambda(params, body),

            ExprKind::For { var, iterable, body } => self.infer_for(var, iterable, body, &expr.loc),

            ExprKind::Index { object, index } => self.infer_index(object, index, &expr.loc),

            ExprKind::Dot { object, field } => self.infer_dot(object, field, &expr.loc),

            ExprKind::Range { start, end, inclusive: _ } => self.infer_range(start, end, &expr.loc),

            ExprKind::ListComprehension { body, var, iterable, filter } => {
                self.infer_list_comprehension(body, var, iterable, filter.as_deref(), &expr.loc)
            }

            ExprKind::InterpolatedString(parts) => {
                for part in parts {
                    self.infer(part);
                }
                Type::String
            }

            ExprKind::Try(operand) => self.infer_try(operand, &expr.loc),

            ExprKind::Spawn(_) => self.not_implemented("spawn", &expr.loc),
            ExprKind::Send { .. } => self.not_implemented("send", &expr.loc),
            ExprKind::Receive(_) => self.not_implemented("receive", &expr.loc),
        }
    }

    fn not_implemented(&mut self, feature: &str, loc: &SourceLoc) -> Type {
        self.diags.add_at(
            Some(loc.clone()),
            TypeErrorKind::NotImplemented(NotImplemented { feature: feature.to_string() }),
        )
    }

    fn infer_ident(&mut self, name: &str, loc: &SourceLoc) -> Type {
        if let Some(t) = builtins::lookup_identifier(name) {
            return t;
        }
        if let Some(t) = self.env.lookup(name) {
            return t;
        }
        if let Some(t) = self.constructor_value_type(name) {
            return t;
        }
        self.diags.add_at(
            Some(loc.clone()),
            TypeErrorKind::UndefinedVariable(UndefinedVariable { name: name.to_string() }),
        )
    }

    /// A registered sum-type constructor used as a value: arity 0 yields the
    /// type directly, arity > 0 yields the constructor function so `Call`
    /// can apply it like any other callee (spec §9, "user-defined
    /// constructor patterns" open question — this is the construction half
    /// of the same registry the pattern binder reads).
    fn constructor_value_type(&self, name: &str) -> Option<Type> {
        let info = self.constructors.get(name)?;
        let result = Type::Con(info.type_name.clone(), vec![]);
        if info.arg_types.is_empty() {
            Some(result)
        } else {
            Some(Type::Fn(info.arg_types.clone(), Box::new(result)))
        }
    }

    fn infer_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, loc: &SourceLoc) -> Type {
        if op == BinaryOp::Pipe {
            return self.infer_pipe(left, right, loc);
        }

        let lt = self.infer(left);
        let rt = self.infer(right);
        if lt.is_error() || rt.is_error() {
            return Type::error("propagated");
        }

        if op.is_arithmetic() {
            return self.infer_arithmetic(op, lt, rt, loc);
        }
        if op.is_comparison() {
            return self.infer_comparison(op, lt, rt, loc);
        }
        if op.is_equality() {
            return self.infer_equality(op, lt, rt, loc);
        }
        if op.is_logical() {
            return self.infer_logical(op, lt, rt, loc);
        }
        unreachable!("BinaryOp::Pipe handled above; every other op is arithmetic/comparison/equality/logical")
    }

    fn operand_mismatch(&mut self, op: BinaryOp, lt: &Type, rt: &Type, loc: &SourceLoc) -> Type {
        self.diags.add_at(
            Some(loc.clone()),
            TypeErrorKind::OperandMismatch(OperandMismatch {
                op: op.symbol().to_string(),
                lhs: lt.to_printable_string(),
                rhs: rt.to_printable_string(),
            }),
        )
    }

    fn infer_arithmetic(&mut self, op: BinaryOp, lt: Type, rt: Type, loc: &SourceLoc) -> Type {
        if op == BinaryOp::Add {
            if matches!(lt.prune(), Type::String) && matches!(rt.prune(), Type::String) {
                return Type::String;
            }
        }
        if !unify(&lt, &rt) {
            return self.operand_mismatch(op, &lt, &rt, loc);
        }
        match lt.prune() {
            Type::Int | Type::Float | Type::Var(_) => lt.prune(),
            _ => self.operand_mismatch(op, &lt, &rt, loc),
        }
    }

    fn infer_comparison(&mut self, op: BinaryOp, lt: Type, rt: Type, loc: &SourceLoc) -> Type {
        if !unify(&lt, &rt) {
            return self.operand_mismatch(op, &lt, &rt, loc);
        }
        let pruned = lt.prune();
        if matches!(pruned, Type::Var(_)) || pruned.is_comparable() {
            Type::Bool
        } else {
            self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::NotComparable(NotComparable { ty: pruned.to_printable_string() }),
            )
        }
    }

    fn infer_equality(&mut self, op: BinaryOp, lt: Type, rt: Type, loc: &SourceLoc) -> Type {
        if unify(&lt, &rt) {
            Type::Bool
        } else {
            self.operand_mismatch(op, &lt, &rt, loc)
        }
    }

    fn infer_logical(&mut self, op: BinaryOp, lt: Type, rt: Type, loc: &SourceLoc) -> Type {
        if unify(&lt, &Type::Bool) && unify(&rt, &Type::Bool) {
            Type::Bool
        } else {
            self.operand_mismatch(op, &lt, &rt, loc)
        }
    }

    fn infer_pipe(&mut self, left: &Expr, right: &Expr, loc: &SourceLoc) -> Type {
        let ExprKind::Call { callee, args } = &right.kind else {
            return self.diags.add_at(Some(loc.clone()), TypeErrorKind::PipeTargetNotCall(PipeTargetNotCall));
        };
        let left_ty = self.infer(left);
        let callee_ty = self.infer(callee);
        self.apply_call(&callee_ty, Some(left_ty), args, loc)
    }

    /// Shared by `Call` and `Pipe`: instantiates `callee_ty`, checks arity
    /// (counting `prefix_arg` as argument 1 when present, matching the
    /// pipe's user-visible position numbering), and unifies each argument
    /// against the instantiated parameter.
    fn apply_call(&mut self, callee_ty: &Type, prefix_arg: Option<Type>, args: &[Expr], loc: &SourceLoc) -> Type {
        if callee_ty.is_error() {
            return Type::error("propagated");
        }
        let inst = instantiate(callee_ty);
        let (params, result) = match inst.prune() {
            Type::Fn(params, result) => (params, *result),
            other => {
                return self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::NonFunctionCall(NonFunctionCall { ty: other.to_printable_string() }),
                );
            }
        };

        let mut actual: Vec<Type> = Vec::with_capacity(params.len());
        let mut had_error = false;
        if let Some(p0) = prefix_arg {
            had_error |= p0.is_error();
            actual.push(p0);
        }
        for a in args {
            let t = self.infer(a);
            had_error |= t.is_error();
            actual.push(t);
        }

        if actual.len() != params.len() {
            return self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::ArityMismatch(ArityMismatch {
                    context: "call".to_string(),
                    expected: params.len(),
                    found: actual.len(),
                }),
            );
        }
        if had_error {
            return Type::error("propagated");
        }

        let mut ok = true;
        for (i, (p, a)) in params.iter().zip(actual.iter()).enumerate() {
            if !unify(p, a) {
                self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::mismatch(format!("argument {}", i + 1), p, a),
                );
                ok = false;
            }
        }
        if ok {
            substitute(&result)
        } else {
            Type::error("argument type mismatch")
        }
    }

    fn infer_unary(&mut self, op: UnaryOp, operand: &Expr, loc: &SourceLoc) -> Type {
        let t = self.infer(operand);
        if t.is_error() {
            return Type::error("propagated");
        }
        match (op, t.prune()) {
            (UnaryOp::Neg, Type::Int) => Type::Int,
            (UnaryOp::Neg, Type::Float) => Type::Float,
            (UnaryOp::Not, Type::Bool) => Type::Bool,
            (UnaryOp::Neg, other) => {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("unary '-'", &Type::Int, &other))
            }
            (UnaryOp::Not, other) => {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("unary 'not'", &Type::Bool, &other))
            }
        }
    }

    fn infer_list_lit(&mut self, elems: &[Expr], loc: &SourceLoc) -> Type {
        let Some((first, rest)) = elems.split_first() else {
            return Type::list(Type::fresh_var("elem"));
        };
        let first_ty = self.infer(first);
        if first_ty.is_error() {
            return Type::error("propagated");
        }
        for e in rest {
            let t = self.infer(e);
            if t.is_error() {
                return Type::error("propagated");
            }
            if !unify(&first_ty, &t) {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("list element", &first_ty, &t));
                return Type::error("list element mismatch");
            }
        }
        Type::list(substitute(&first_ty))
    }

    fn infer_map_lit(&mut self, entries: &[(Expr, Expr)], loc: &SourceLoc) -> Type {
        let Some(((first_k, first_v), rest)) = entries.split_first() else {
            return Type::map(Type::fresh_var("k"), Type::fresh_var("v"));
        };
        let k_ty = self.infer(first_k);
        let v_ty = self.infer(first_v);
        if k_ty.is_error() || v_ty.is_error() {
            return Type::error("propagated");
        }
        for (k, v) in rest {
            let kt = self.infer(k);
            let vt = self.infer(v);
            if kt.is_error() || vt.is_error() {
                return Type::error("propagated");
            }
            if !unify(&k_ty, &kt) {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("map key", &k_ty, &kt));
                return Type::error("map key mismatch");
            }
            if !unify(&v_ty, &vt) {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("map value", &v_ty, &vt));
                return Type::error("map value mismatch");
            }
        }
        Type::map(substitute(&k_ty), substitute(&v_ty))
    }

    fn infer_if(&mut self, condition: &Expr, then_branch: &Expr, else_branch: Option<&Expr>, loc: &SourceLoc) -> Type {
        let cond_ty = self.infer(condition);
        let mut ok = true;
        if cond_ty.is_error() {
            ok = false;
        } else if !unify(&cond_ty, &Type::Bool) {
            self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("if condition", &Type::Bool, &cond_ty));
            ok = false;
        }
        let then_ty = self.infer(then_branch);

        match else_branch {
            None => {
                if ok && !then_ty.is_error() {
                    Type::Unit
                } else {
                    Type::error("propagated")
                }
            }
            Some(else_expr) => {
                let else_ty = self.infer(else_expr);
                if !ok || then_ty.is_error() || else_ty.is_error() {
                    return Type::error("propagated");
                }
                if unify(&then_ty, &else_ty) {
                    substitute(&then_ty)
                } else {
                    self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("if branches", &then_ty, &else_ty))
                }
            }
        }
    }

    fn infer_match(&mut self, scrutinee: &Expr, arms: &[crate::ast::MatchArm], loc: &SourceLoc) -> Type {
        let s_ty = self.infer(scrutinee);
        if arms.is_empty() {
            return self.diags.add_at(Some(loc.clone()), TypeErrorKind::EmptyMatch(EmptyMatch));
        }

        let mut any_error = s_ty.is_error();
        let mut result_ty: Option<Type> = None;

        for arm in arms {
            self.env.push_scope();
            let mut arm_ok = self.bind_pattern(&arm.pattern, &s_ty, loc);
            if let Some(guard) = &arm.guard {
                let g_ty = self.infer(guard);
                if !g_ty.is_error() && !unify(&g_ty, &Type::Bool) {
                    self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("match guard", &Type::Bool, &g_ty));
                    arm_ok = false;
                }
            }
            let body_ty = self.infer(&arm.body);
            self.env.pop_scope();

            if !arm_ok || body_ty.is_error() {
                any_error = true;
                continue;
            }
            match &result_ty {
                None => result_ty = Some(body_ty),
                Some(expected) => {
                    if !expected.structurally_equal(&body_ty) {
                        self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("match arm", expected, &body_ty));
                        any_error = true;
                    }
                }
            }
        }

        if any_error {
            Type::error("match mismatch")
        } else {
            result_ty.unwrap_or(Type::Unit)
        }
    }

    fn infer_bind(&mut self, name: &str, value: &Expr) -> Type {
        let v_ty = self.infer(value);
        if v_ty.is_error() {
            return Type::error("propagated");
        }
        if let Type::Con(con_name, args) = v_ty.prune() {
            if con_name == "Result" && args.len() == 2 {
                let ok_ty = args[0].clone();
                self.env.define(name.to_string(), ok_ty.clone());
                return ok_ty;
            }
        }
        self.diags.add_at(
            Some(value.loc.clone()),
            TypeErrorKind::NonResult(NonResult { context: "bind".to_string(), ty: v_ty.to_printable_string() }),
        )
    }

    fn infer_with(
        &mut self,
        bindings: &[(String, Expr)],
        body: &Expr,
        else_arms: &[crate::ast::MatchArm],
        loc: &SourceLoc,
    ) -> Type {
        self.env.push_scope();
        let mut any_error = false;
        for (name, value) in bindings {
            let v_ty = self.infer(value);
            if v_ty.is_error() {
                any_error = true;
                continue;
            }
            match v_ty.prune() {
                Type::Con(con_name, args) if con_name == "Result" && args.len() == 2 => {
                    self.env.define(name.clone(), args[0].clone());
                }
                other => {
                    self.diags.add_at(
                        Some(value.loc.clone()),
                        TypeErrorKind::NonResult(NonResult { context: "with".to_string(), ty: other.to_printable_string() }),
                    );
                    any_error = true;
                }
            }
        }

        let body_ty = self.infer(body);
        if body_ty.is_error() {
            any_error = true;
        }

        // Open question (spec §9): else arms are checked like match
        // alternatives, required to agree with the body's result type.
        for arm in else_arms {
            self.env.push_scope();
            let placeholder = Type::fresh_var("with_err");
            let mut arm_ok = self.bind_pattern(&arm.pattern, &placeholder, loc);
            if let Some(guard) = &arm.guard {
                let g_ty = self.infer(guard);
                if !g_ty.is_error() && !unify(&g_ty, &Type::Bool) {
                    arm_ok = false;
                }
            }
            let arm_ty = self.infer(&arm.body);
            self.env.pop_scope();
            if !arm_ok || arm_ty.is_error() {
                any_error = true;
            } else if !body_ty.is_error() && !body_ty.structurally_equal(&arm_ty) {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("with else arm", &body_ty, &arm_ty));
                any_error = true;
            }
        }

        self.env.pop_scope();
        if any_error {
            Type::error("with mismatch")
        } else {
            body_ty
        }
    }

    fn infer_lambda(&mut self, params: &[String], body: &Expr) -> Type {
        self.env.push_scope();
        let param_types: Vec<Type> = params
            .iter()
            .map(|p| {
                let v = Type::fresh_var(p.clone());
                self.env.define(p.clone(), v.clone());
                v
            })
            .collect();
        let body_ty = self.infer(body);
        self.env.pop_scope();
        if body_ty.is_error() {
            Type::error("propagated")
        } else {
            Type::Fn(param_types, Box::new(body_ty))
        }
    }

    fn infer_for(&mut self, var: &str, iterable: &Expr, body: &Expr, loc: &SourceLoc) -> Type {
        let iter_ty = self.infer(iterable);
        if iter_ty.is_error() {
            return Type::error("propagated");
        }
        let elem_ty = match iter_ty.prune() {
            Type::Con(name, args) if (name == "List" || name == "Range") && args.len() == 1 => args[0].clone(),
            other => {
                return self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::NonIterable(NonIterable { context: "for loop".to_string(), ty: other.to_printable_string() }),
                );
            }
        };
        self.env.push_scope();
        self.env.define(var.to_string(), elem_ty);
        self.infer(body);
        self.env.pop_scope();
        Type::Unit
    }

    fn infer_index(&mut self, object: &Expr, index: &Expr, loc: &SourceLoc) -> Type {
        let obj_ty = self.infer(object);
        let idx_ty = self.infer(index);
        if obj_ty.is_error() || idx_ty.is_error() {
            return Type::error("propagated");
        }
        match obj_ty.prune() {
            Type::Con(name, args) if name == "List" && args.len() == 1 => {
                if unify(&idx_ty, &Type::Int) {
                    substitute(&args[0])
                } else {
                    self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("list index", &Type::Int, &idx_ty))
                }
            }
            Type::Con(name, args) if name == "Map" && args.len() == 2 => {
                if idx_ty.structurally_equal(&args[0]) {
                    substitute(&args[1])
                } else {
                    self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("map index", &args[0], &idx_ty))
                }
            }
            other => self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::NonIterable(NonIterable { context: "index".to_string(), ty: other.to_printable_string() }),
            ),
        }
    }

    fn infer_dot(&mut self, object: &Expr, field: &str, loc: &SourceLoc) -> Type {
        if let Some(path) = builtins::build_module_path(object) {
            if builtins::is_known_module(&path) {
                return match builtins::lookup_module_fn(&path, field) {
                    Some(t) => t,
                    None => self.diags.add_at(
                        Some(loc.clone()),
                        TypeErrorKind::UnknownModuleFunction(UnknownModuleFunction {
                            module: path,
                            name: field.to_string(),
                        }),
                    ),
                };
            }
        }

        let obj_ty = self.infer(object);
        if obj_ty.is_error() {
            return Type::error("propagated");
        }
        if let Type::Con(type_name, _) = obj_ty.prune() {
            if let Some(field_ty) = self.lookup_record_field(&type_name, field) {
                return field_ty;
            }
        }
        match obj_ty.prune() {
            Type::Tuple(elements) => match field.parse::<usize>() {
                Ok(idx) if idx < elements.len() => substitute(&elements[idx]),
                Ok(idx) => self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::TupleIndexOutOfBounds(TupleIndexOutOfBounds { index: idx, arity: elements.len() }),
                ),
                Err(_) => self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::CannotAccessField(CannotAccessField {
                        field: field.to_string(),
                        ty: Type::Tuple(elements).to_printable_string(),
                    }),
                ),
            },
            other => self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::CannotAccessField(CannotAccessField { field: field.to_string(), ty: other.to_printable_string() }),
            ),
        }
    }

    /// Spec §9 open question "record field access": looks up `field` in the
    /// field list registered for `type_name` by a `type ... { ... }`
    /// definition (§4.7's `TypeDef::Record` handling), independent of the
    /// tuple-index fallback in [`Checker::infer_dot`].
    fn lookup_record_field(&self, type_name: &str, field: &str) -> Option<Type> {
        let fields = self.record_fields.get(type_name)?;
        fields.iter().find(|(name, _)| name == field).map(|(_, ty)| ty.clone())
    }

    fn infer_range(&mut self, start: &Expr, end: &Expr, loc: &SourceLoc) -> Type {
        let s_ty = self.infer(start);
        let e_ty = self.infer(end);
        if s_ty.is_error() || e_ty.is_error() {
            return Type::error("propagated");
        }
        if unify(&s_ty, &e_ty) {
            Type::range(substitute(&s_ty))
        } else {
            self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("range bounds", &s_ty, &e_ty))
        }
    }

    fn infer_list_comprehension(
        &mut self,
        body: &Expr,
        var: &str,
        iterable: &Expr,
        filter: Option<&Expr>,
        loc: &SourceLoc,
    ) -> Type {
        let iter_ty = self.infer(iterable);
        if iter_ty.is_error() {
            return Type::error("propagated");
        }
        let elem_ty = match iter_ty.prune() {
            Type::Con(name, args) if name == "List" && args.len() == 1 => args[0].clone(),
            Type::Con(name, _) if name == "Range" => Type::Int,
            other => {
                return self.diags.add_at(
                    Some(loc.clone()),
                    TypeErrorKind::NonIterable(NonIterable { context: "list comprehension".to_string(), ty: other.to_printable_string() }),
                );
            }
        };

        self.env.push_scope();
        self.env.define(var.to_string(), elem_ty);
        let mut any_error = false;
        if let Some(f) = filter {
            let f_ty = self.infer(f);
            if f_ty.is_error() {
                any_error = true;
            } else if !unify(&f_ty, &Type::Bool) {
                self.diags.add_at(Some(loc.clone()), TypeErrorKind::mismatch("comprehension filter", &Type::Bool, &f_ty));
                any_error = true;
            }
        }
        let body_ty = self.infer(body);
        self.env.pop_scope();
        if any_error || body_ty.is_error() {
            Type::error("propagated")
        } else {
            Type::list(substitute(&body_ty))
        }
    }

    fn infer_try(&mut self, operand: &Expr, loc: &SourceLoc) -> Type {
        let t = self.infer(operand);
        if t.is_error() {
            return Type::error("propagated");
        }
        match t.prune() {
            Type::Con(name, args) if name == "Result" && args.len() == 2 => substitute(&args[0]),
            other => self.diags.add_at(
                Some(loc.clone()),
                TypeErrorKind::NonResult(NonResult { context: "try".to_string(), ty: other.to_printable_string() }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, ExprKind};
    use crate::source::SourceLoc;

    fn loc() -> SourceLoc {
        SourceLoc::at(1, 1)
    }

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, loc())
    }

    #[test]
    fn literal_types_are_trivial() {
        let mut c = Checker::new();
        assert!(matches!(c.infer(&e(ExprKind::IntLit(1))), Type::Int));
        assert!(matches!(c.infer(&e(ExprKind::FloatLit(1.0))), Type::Float));
        assert!(matches!(c.infer(&e(ExprKind::StringLit("s".into()))), Type::String));
        assert!(matches!(c.infer(&e(ExprKind::BoolLit(true))), Type::Bool));
    }

    #[test]
    fn undefined_identifier_errors() {
        let mut c = Checker::new();
        let t = c.infer(&e(ExprKind::Ident("nope".into())));
        assert!(t.is_error());
        assert!(c.has_errors());
        assert!(c.first_error().unwrap().contains("Undefined variable"));
    }

    #[test]
    fn arithmetic_add_on_ints() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(e(ExprKind::IntLit(1))),
            right: Box::new(e(ExprKind::IntLit(2))),
        });
        assert!(matches!(c.infer(&expr), Type::Int));
    }

    #[test]
    fn arithmetic_add_on_strings() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(e(ExprKind::StringLit("a".into()))),
            right: Box::new(e(ExprKind::StringLit("b".into()))),
        });
        assert!(matches!(c.infer(&expr), Type::String));
    }

    #[test]
    fn mismatched_arithmetic_operands_error_with_message() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(e(ExprKind::IntLit(1))),
            right: Box::new(e(ExprKind::StringLit("x".into()))),
        });
        let t = c.infer(&expr);
        assert!(t.is_error());
        assert!(c.first_error().unwrap().contains("Cannot apply '+' to Int and String"));
    }

    #[test]
    fn empty_list_literal_is_generic() {
        let mut c = Checker::new();
        let t = c.infer(&e(ExprKind::ListLit(vec![])));
        assert!(matches!(t, Type::Con(name, args) if name == "List" && matches!(args[0], Type::Var(_))));
    }

    #[test]
    fn if_without_else_is_unit() {
        let mut c = Checker::new();
        let expr = e(ExprKind::If {
            condition: Box::new(e(ExprKind::BoolLit(true))),
            then_branch: Box::new(e(ExprKind::IntLit(1))),
            else_branch: None,
        });
        assert!(matches!(c.infer(&expr), Type::Unit));
    }

    #[test]
    fn if_with_matching_branches() {
        let mut c = Checker::new();
        let expr = e(ExprKind::If {
            condition: Box::new(e(ExprKind::BoolLit(true))),
            then_branch: Box::new(e(ExprKind::IntLit(1))),
            else_branch: Some(Box::new(e(ExprKind::IntLit(2)))),
        });
        assert!(matches!(c.infer(&expr), Type::Int));
    }

    #[test]
    fn block_returns_final_expr_type_and_pops_scope() {
        let mut c = Checker::new();
        let depth_before = c.env().depth();
        let block = Block { stmts: vec![], final_expr: Some(Box::new(e(ExprKind::IntLit(9)))) };
        let t = c.infer(&e(ExprKind::Block(block)));
        assert!(matches!(t, Type::Int));
        assert_eq!(c.env().depth(), depth_before);
    }

    #[test]
    fn call_instantiates_polymorphic_identity_independently() {
        let mut c = Checker::new();
        let id_param = Type::fresh_var("a");
        let id_ty = Type::Fn(vec![id_param.clone()], Box::new(id_param));
        c.env_mut().define("id", id_ty);

        let call_int = e(ExprKind::Call { callee: Box::new(e(ExprKind::Ident("id".into()))), args: vec![e(ExprKind::IntLit(1))] });
        let call_str = e(ExprKind::Call { callee: Box::new(e(ExprKind::Ident("id".into()))), args: vec![e(ExprKind::StringLit("a".into()))] });

        assert!(matches!(c.infer(&call_int), Type::Int));
        assert!(matches!(c.infer(&call_str), Type::String));
    }

    #[test]
    fn pipe_requires_call_on_the_right() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Binary {
            op: BinaryOp::Pipe,
            left: Box::new(e(ExprKind::IntLit(1))),
            right: Box::new(e(ExprKind::IntLit(2))),
        });
        let t = c.infer(&expr);
        assert!(t.is_error());
        assert!(c.first_error().unwrap().contains("|>"));
    }

    #[test]
    fn try_unwraps_result_ok_type() {
        let mut c = Checker::new();
        c.env_mut().define("r", Type::result(Type::Int, Type::String));
        let expr = e(ExprKind::Try(Box::new(e(ExprKind::Ident("r".into())))));
        assert!(matches!(c.infer(&expr), Type::Int));
    }

    #[test]
    fn spawn_is_not_implemented() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Spawn(Box::new(e(ExprKind::IntLit(1)))));
        let t = c.infer(&expr);
        assert!(t.is_error());
        assert!(c.first_error().unwrap().contains("not implemented"));
    }

    #[test]
    fn dot_on_known_module_resolves_builtin() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Dot { object: Box::new(e(ExprKind::Ident("String".into()))), field: "len".into() });
        let t = c.infer(&expr);
        assert!(matches!(t, Type::Fn(_, _)));
    }

    #[test]
    fn dot_tuple_index_returns_element_type() {
        let mut c = Checker::new();
        c.env_mut().define("pair", Type::tuple(vec![Type::Int, Type::String]));
        let expr = e(ExprKind::Dot { object: Box::new(e(ExprKind::Ident("pair".into()))), field: "1".into() });
        assert!(matches!(c.infer(&expr), Type::String));
    }

    #[test]
    fn dot_on_registered_record_looks_up_field_type() {
        let mut c = Checker::new();
        c.record_fields.insert("Point".into(), vec![("x".into(), Type::Int), ("y".into(), Type::Int)]);
        c.env_mut().define("p", Type::Con("Point".into(), vec![]));
        let expr = e(ExprKind::Dot { object: Box::new(e(ExprKind::Ident("p".into()))), field: "x".into() });
        assert!(matches!(c.infer(&expr), Type::Int));
    }

    #[test]
    fn bare_constructor_with_args_is_a_callable_function() {
        let mut c = Checker::new();
        c.constructors.insert(
            "Circle".into(),
            crate::typechecker::ConstructorInfo { type_name: "Shape".into(), arg_types: vec![Type::Int] },
        );
        let call = e(ExprKind::Call {
            callee: Box::new(e(ExprKind::Ident("Circle".into()))),
            args: vec![e(ExprKind::IntLit(5))],
        });
        assert!(matches!(c.infer(&call), Type::Con(name, args) if name == "Shape" && args.is_empty()));
    }

    #[test]
    fn bare_nullary_constructor_is_its_type_directly() {
        let mut c = Checker::new();
        c.constructors.insert(
            "Empty".into(),
            crate::typechecker::ConstructorInfo { type_name: "Shape".into(), arg_types: vec![] },
        );
        let expr = e(ExprKind::Ident("Empty".into()));
        assert!(matches!(c.infer(&expr), Type::Con(name, args) if name == "Shape" && args.is_empty()));
    }

    #[test]
    fn if_with_erroring_condition_propagates_error() {
        let mut c = Checker::new();
        let expr = e(ExprKind::If {
            condition: Box::new(e(ExprKind::Ident("nope".into()))),
            then_branch: Box::new(e(ExprKind::IntLit(1))),
            else_branch: None,
        });
        assert!(c.infer(&expr).is_error());

        let mut c = Checker::new();
        let expr = e(ExprKind::If {
            condition: Box::new(e(ExprKind::Ident("nope".into()))),
            then_branch: Box::new(e(ExprKind::IntLit(1))),
            else_branch: Some(Box::new(e(ExprKind::IntLit(2)))),
        });
        assert!(c.infer(&expr).is_error());
    }

    #[test]
    fn tuple_lit_with_erroring_element_propagates_error() {
        let mut c = Checker::new();
        let expr = e(ExprKind::TupleLit(vec![e(ExprKind::IntLit(1)), e(ExprKind::Ident("nope".into()))]));
        assert!(c.infer(&expr).is_error());
    }

    #[test]
    fn lambda_with_erroring_body_propagates_error() {
        let mut c = Checker::new();
        let expr = e(ExprKind::Lambda { params: vec!["a".into()], body: Box::new(e(ExprKind::Ident("nope".into()))) });
        assert!(c.infer(&expr).is_error());
    }

    #[test]
    fn list_comprehension_with_erroring_body_propagates_error() {
        let mut c = Checker::new();
        c.env_mut().define("xs", Type::list(Type::Int));
        let expr = e(ExprKind::ListComprehension {
            body: Box::new(e(ExprKind::Ident("nope".into()))),
            var: "x".into(),
            iterable: Box::new(e(ExprKind::Ident("xs".into()))),
            filter: None,
        });
        assert!(c.infer(&expr).is_error());
    }

    #[test]
    fn list_comprehension_with_erroring_filter_propagates_error() {
        let mut c = Checker::new();
        c.env_mut().define("xs", Type::list(Type::Int));
        let expr = e(ExprKind::ListComprehension {
            body: Box::new(e(ExprKind::Ident("x".into()))),
            var: "x".into(),
            iterable: Box::new(e(ExprKind::Ident("xs".into()))),
            filter: Some(Box::new(e(ExprKind::Ident("nope".into())))),
        });
        assert!(c.infer(&expr).is_error());
    }
}
