//! Hand-builds a tiny program's AST and runs it through the checker,
//! printing every diagnostic. There is no parser in this crate, so the
//! tree below is exactly what a parser would have produced.

use verity_check::ast::{BinaryOp, Expr, ExprKind, Param, Pattern, Stmt, StmtKind};
use verity_check::source::SourceLoc;
use verity_check::Checker;

fn e(kind: ExprKind) -> Expr {
    Expr::new(kind, SourceLoc::at(0, 0))
}

fn s(kind: StmtKind) -> Stmt {
    Stmt::new(kind, SourceLoc::at(0, 0))
}

fn main() {
    simple_logger::SimpleLogger::new().init().expect("logger already initialized");

    // fn id(x): x
    let id_def = s(StmtKind::FnDef {
        name: "id".to_string(),
        params: vec![Param { name: "x".to_string(), annotation: None }],
        return_annotation: None,
        body: e(ExprKind::Ident("x".to_string())),
    });

    // let a = id(1)
    let a_let = s(StmtKind::Let {
        pattern: Pattern::Ident("a".to_string()),
        annotation: None,
        value: e(ExprKind::Call {
            callee: Box::new(e(ExprKind::Ident("id".to_string()))),
            args: vec![e(ExprKind::IntLit(1))],
        }),
    });

    // let b = id("hello")
    let b_let = s(StmtKind::Let {
        pattern: Pattern::Ident("b".to_string()),
        annotation: None,
        value: e(ExprKind::Call {
            callee: Box::new(e(ExprKind::Ident("id".to_string()))),
            args: vec![e(ExprKind::StringLit("hello".to_string()))],
        }),
    });

    // let broken = 1 + "oops"
    let broken_let = s(StmtKind::Let {
        pattern: Pattern::Ident("broken".to_string()),
        annotation: None,
        value: e(ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(e(ExprKind::IntLit(1))),
            right: Box::new(e(ExprKind::StringLit("oops".to_string()))),
        }),
    });

    let program = vec![id_def, a_let, b_let, broken_let];

    let mut checker = Checker::new();
    let ok = checker.check_stmts(&program);

    println!("id(1)      : {}", checker.env().lookup("a").unwrap());
    println!("id(\"hello\"): {}", checker.env().lookup("b").unwrap());

    if ok {
        println!("program type-checks with no errors");
    } else {
        println!("program has {} error(s):", checker.all_errors().len());
        for message in checker.all_errors() {
            println!("  {message}");
        }
    }
}
