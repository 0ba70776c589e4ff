/// A syntactic type annotation, as written by the user.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Named {
        name: String,
        args: Vec<TypeExpr>,
    },
    Fn {
        params: Vec<TypeExpr>,
        result: Box<TypeExpr>,
    },
    Tuple(Vec<TypeExpr>),
}
