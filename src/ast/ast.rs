use crate::{lexer::tokens::Token, Span};

use super::{statements::CompoundStmt, types::Type};

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Option<Token>,
    pub block: Block,
    pub span: Span,
}

/// Declarations followed by the executable body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub declarations: Declarations,
    pub body: CompoundStmt,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declarations {
    pub vars: Vec<VarDecl>,
    pub routines: Vec<RoutineDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub ty: Type,
}

/// A function, or a procedure when `return_type` is `Void`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDecl {
    pub name: Token,
    pub params: Vec<VarDecl>,
    pub return_type: Type,
    pub block: Block,
}

impl RoutineDecl {
    pub fn is_procedure(&self) -> bool {
        self.return_type == Type::Void
    }
}
