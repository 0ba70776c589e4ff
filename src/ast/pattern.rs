/// A pattern appearing in a `let` binding or a `match` arm.
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(String),
    Wildcard,
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    BoolLit(bool),
    Tuple(Vec<Pattern>),
    Constructor { name: String, args: Vec<Pattern> },
    Rest,
}
