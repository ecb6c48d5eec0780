//! AST for Sable programs.
//!
//! The tree is serde-serializable: compiled units on disk are an encoded
//! form of this AST (see [`crate::codec`]).

use serde::{Deserialize, Serialize};

/// A compiled program: the statement list of one module body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `name = expr`
    Assign { name: String, value: Expr },
    /// `import a.b.c`; `target` keeps the dotted form
    Import { target: String },
    /// A bare expression, evaluated for effect and discarded
    Expr(Expr),
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    /// Name lookup in the module namespace
    Name(String),
    /// Attribute access, e.g. `mod.value`
    Attr { base: Box<Expr>, attr: String },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
}

impl BinOp {
    /// Surface syntax for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
}
