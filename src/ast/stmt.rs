use crate::ast::{Expr, Pattern, TypeExpr};
use crate::source::SourceLoc;

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: SourceLoc,
}

impl Stmt {
    pub fn new(kind: StmtKind, loc: SourceLoc) -> Self {
        Stmt { kind, loc }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub enum TypeDef {
    Variant {
        name: String,
        variants: Vec<(String, Vec<TypeExpr>)>,
    },
    Record {
        name: String,
        fields: Vec<(String, TypeExpr)>,
    },
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Let {
        pattern: Pattern,
        annotation: Option<TypeExpr>,
        value: Expr,
    },
    Expr(Expr),
    FnDef {
        name: String,
        params: Vec<Param>,
        return_annotation: Option<TypeExpr>,
        body: Expr,
    },
    TypeDef(TypeDef),

    // Accepted as no-ops per the checker's contract; surrounding stages
    // (parser, codegen) give these meaning.
    Return(Option<Expr>),
    Import(String),
    Defer(Expr),
    Break,
    Continue,
    Trait(String),
    Impl(String),
    Newtype(String),
    Module(String),
}
