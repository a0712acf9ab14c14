//! Statement nodes.
//!
//! Statements always resolve to `Void`; only their expression children
//! carry types.

use crate::{lexer::tokens::Token, Span};

use super::expressions::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Compound(CompoundStmt),
    Assign(AssignStmt),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    Read(ReadStmt),
    Write(WriteStmt),
    Call(CallStmt),
}

/// `begin ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `name := expr`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: Token,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_stmt: Box<Stmt>,
    pub else_stmt: Option<Box<Stmt>>,
}

/// `for var := start to|downto end do body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var: Token,
    pub start: Expr,
    pub end: Expr,
    pub ascending: bool,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// `repeat stmts until condition`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub stmts: Vec<Stmt>,
    pub condition: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadStmt {
    pub vars: Vec<Token>,
    pub new_line: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteStmt {
    pub exprs: Vec<Expr>,
    pub new_line: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub name: Token,
    pub args: Vec<Expr>,
}
