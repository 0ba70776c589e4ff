//! Diagnostics and the error accumulator (spec §3.4, §4.9, §6.5, §7).
//!
//! Grounded on `why_lib::typechecker::error::TypeCheckError` for the
//! taxonomy shape (one variant per payload struct, each payload its own
//! `Display`) and `y-lang::typechecker::error::TypeError` for the
//! location-qualified rendering, adapted to the `file:line:col: ` prefix
//! format spec §6.5 requires instead of the teacher's trailing suffix.

use std::error::Error;
use std::fmt;

use crate::source::SourceLoc;

use super::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub context: String,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected '{}' but found '{}'",
            self.context, self.expected, self.found
        )
    }
}
impl Error for TypeMismatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedVariable {
    pub name: String,
}
impl fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Undefined variable: {}", self.name)
    }
}
impl Error for UndefinedVariable {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedType {
    pub name: String,
}
impl fmt::Display for UndefinedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Undefined type: {}", self.name)
    }
}
impl Error for UndefinedType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModuleFunction {
    pub module: String,
    pub name: String,
}
impl fmt::Display for UnknownModuleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown function '{}' in module '{}'", self.name, self.module)
    }
}
impl Error for UnknownModuleFunction {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityMismatch {
    pub context: String,
    pub expected: usize,
    pub found: usize,
}
impl fmt::Display for ArityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {} argument(s) but found {}",
            self.context, self.expected, self.found
        )
    }
}
impl Error for ArityMismatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandMismatch {
    pub op: String,
    pub lhs: String,
    pub rhs: String,
}
impl fmt::Display for OperandMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot apply '{}' to {} and {}", self.op, self.lhs, self.rhs)
    }
}
impl Error for OperandMismatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotComparable {
    pub ty: String,
}
impl fmt::Display for NotComparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type '{}' is not comparable", self.ty)
    }
}
impl Error for NotComparable {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonFunctionCall {
    pub ty: String,
}
impl fmt::Display for NonFunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot call a value of type '{}'", self.ty)
    }
}
impl Error for NonFunctionCall {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonIterable {
    pub context: String,
    pub ty: String,
}
impl fmt::Display for NonIterable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: type '{}' is not iterable", self.context, self.ty)
    }
}
impl Error for NonIterable {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonResult {
    pub context: String,
    pub ty: String,
}
impl fmt::Display for NonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected a Result but found '{}'", self.context, self.ty)
    }
}
impl Error for NonResult {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTupleDestructure {
    pub ty: String,
    pub expected_arity: Option<usize>,
    pub found_arity: Option<usize>,
}
impl fmt::Display for NonTupleDestructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.expected_arity, self.found_arity) {
            (Some(expected), Some(found)) => write!(
                f,
                "Cannot destructure tuple of arity {found} against pattern of arity {expected}"
            ),
            _ => write!(f, "Cannot destructure a value of type '{}' as a tuple", self.ty),
        }
    }
}
impl Error for NonTupleDestructure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleIndexOutOfBounds {
    pub index: usize,
    pub arity: usize,
}
impl fmt::Display for TupleIndexOutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tuple index {} out of bounds for tuple of arity {}",
            self.index, self.arity
        )
    }
}
impl Error for TupleIndexOutOfBounds {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannotAccessField {
    pub field: String,
    pub ty: String,
}
impl fmt::Display for CannotAccessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot access field '{}' on type '{}'", self.field, self.ty)
    }
}
impl Error for CannotAccessField {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyMatch;
impl fmt::Display for EmptyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match expression must have at least one arm")
    }
}
impl Error for EmptyMatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeTargetNotCall;
impl fmt::Display for PipeTargetNotCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Right-hand side of '|>' must be a function call")
    }
}
impl Error for PipeTargetNotCall {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotImplemented {
    pub feature: String,
}
impl fmt::Display for NotImplemented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not implemented", self.feature)
    }
}
impl Error for NotImplemented {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedefinedType {
    pub name: String,
}
impl fmt::Display for RedefinedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type '{}' has already been defined", self.name)
    }
}
impl Error for RedefinedType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConstructor {
    pub name: String,
}
impl fmt::Display for UnknownConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown constructor '{}'", self.name)
    }
}
impl Error for UnknownConstructor {}

/// The taxonomy of diagnostics the checker distinguishes (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeErrorKind {
    UndefinedVariable(UndefinedVariable),
    UndefinedType(UndefinedType),
    UnknownModuleFunction(UnknownModuleFunction),
    ArityMismatch(ArityMismatch),
    OperandMismatch(OperandMismatch),
    NotComparable(NotComparable),
    TypeMismatch(TypeMismatch),
    NonFunctionCall(NonFunctionCall),
    NonIterable(NonIterable),
    NonResult(NonResult),
    NonTupleDestructure(NonTupleDestructure),
    TupleIndexOutOfBounds(TupleIndexOutOfBounds),
    CannotAccessField(CannotAccessField),
    EmptyMatch(EmptyMatch),
    PipeTargetNotCall(PipeTargetNotCall),
    NotImplemented(NotImplemented),
    RedefinedType(RedefinedType),
    UnknownConstructor(UnknownConstructor),
}

impl fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeErrorKind::UndefinedVariable(e) => e.fmt(f),
            TypeErrorKind::UndefinedType(e) => e.fmt(f),
            TypeErrorKind::UnknownModuleFunction(e) => e.fmt(f),
            TypeErrorKind::ArityMismatch(e) => e.fmt(f),
            TypeErrorKind::OperandMismatch(e) => e.fmt(f),
            TypeErrorKind::NotComparable(e) => e.fmt(f),
            TypeErrorKind::TypeMismatch(e) => e.fmt(f),
            TypeErrorKind::NonFunctionCall(e) => e.fmt(f),
            TypeErrorKind::NonIterable(e) => e.fmt(f),
            TypeErrorKind::NonResult(e) => e.fmt(f),
            TypeErrorKind::NonTupleDestructure(e) => e.fmt(f),
            TypeErrorKind::TupleIndexOutOfBounds(e) => e.fmt(f),
            TypeErrorKind::CannotAccessField(e) => e.fmt(f),
            TypeErrorKind::EmptyMatch(e) => e.fmt(f),
            TypeErrorKind::PipeTargetNotCall(e) => e.fmt(f),
            TypeErrorKind::NotImplemented(e) => e.fmt(f),
            TypeErrorKind::RedefinedType(e) => e.fmt(f),
            TypeErrorKind::UnknownConstructor(e) => e.fmt(f),
        }
    }
}

impl TypeErrorKind {
    pub fn mismatch(context: impl Into<String>, expected: &Type, found: &Type) -> Self {
        TypeErrorKind::TypeMismatch(TypeMismatch {
            context: context.into(),
            expected: expected.to_printable_string(),
            found: found.to_printable_string(),
        })
    }
}

/// A diagnostic qualified with the location it was produced at. `rendered`
/// caches the fully formatted `file:line:col: message` text computed at
/// push time, so callers can borrow it without reformatting on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub loc: Option<SourceLoc>,
    rendered: String,
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered)
    }
}
impl Error for TypeError {}

/// Append-only diagnostic list (spec §3.4). Every `add_at` call both
/// records a formatted message and returns the `Error` sentinel type in
/// one step, matching `error-at`'s contract in spec §4.9.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<TypeError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_at(&mut self, loc: Option<SourceLoc>, kind: TypeErrorKind) -> Type {
        let rendered = match &loc {
            Some(l) => format!("{}{}", l.prefix(), kind),
            None => kind.to_string(),
        };
        let message = kind.to_string();
        self.entries.push(TypeError { kind, loc, rendered });
        Type::error(message)
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.entries.first().map(|e| e.rendered.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn all(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.rendered.clone()).collect()
    }

    pub fn kinds(&self) -> &[TypeError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_filename() {
        let mut diags = Diagnostics::new();
        diags.add_at(
            Some(SourceLoc::new(Some("main.lang".into()), 1, 5)),
            TypeErrorKind::UndefinedVariable(UndefinedVariable { name: "x".into() }),
        );
        assert_eq!(diags.first_error().unwrap(), "main.lang:1:5: Undefined variable: x");
    }

    #[test]
    fn formats_without_location() {
        let mut diags = Diagnostics::new();
        diags.add_at(
            None,
            TypeErrorKind::UndefinedVariable(UndefinedVariable { name: "x".into() }),
        );
        assert_eq!(diags.first_error().unwrap(), "Undefined variable: x");
    }

    #[test]
    fn accumulates_in_order() {
        let mut diags = Diagnostics::new();
        diags.add_at(None, TypeErrorKind::EmptyMatch(EmptyMatch));
        diags.add_at(None, TypeErrorKind::PipeTargetNotCall(PipeTargetNotCall));
        assert_eq!(diags.all().len(), 2);
        assert!(diags.all()[1].contains("|>"));
    }

    #[test]
    fn clear_allows_reuse() {
        let mut diags = Diagnostics::new();
        diags.add_at(None, TypeErrorKind::EmptyMatch(EmptyMatch));
        assert!(diags.has_errors());
        diags.clear();
        assert!(!diags.has_errors());
    }
}
