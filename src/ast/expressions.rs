use crate::{lexer::tokens::{Token, TokenKind}, Span};

use super::types::{Literal, Type};

/// An expression node.
///
/// `ty` is empty until the type checker resolves it. Children are owned, so
/// a child can be wrapped in a cast by replacing it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<Type>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Cast(CastExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Literal,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: Token,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// A call used as an expression. Shares its argument rules with call statements.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: Token,
    pub args: Vec<Expr>,
}

/// Conversion of `expr` to the type stored on the enclosing node.
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Dash => Some(UnaryOp::Negate),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    And,
    Or,
}

impl BinaryOp {
    /// `div` and `/` share the division category.
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Dash => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash | TokenKind::Div => Some(BinaryOp::Div),
            TokenKind::Mod => Some(BinaryOp::Mod),
            TokenKind::Equals => Some(BinaryOp::Eq),
            TokenKind::NotEquals => Some(BinaryOp::Neq),
            TokenKind::Less => Some(BinaryOp::Lt),
            TokenKind::LessEquals => Some(BinaryOp::Leq),
            TokenKind::Greater => Some(BinaryOp::Gt),
            TokenKind::GreaterEquals => Some(BinaryOp::Geq),
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Geq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Leq | BinaryOp::Gt | BinaryOp::Geq)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Neq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Default for Expr {
    /// A `false` literal with no location; only used as a stand-in while a
    /// node is being moved.
    fn default() -> Self {
        Expr::literal(Literal::Boolean(false), Span::null())
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, ty: None, span }
    }

    pub fn literal(value: Literal, span: Span) -> Self {
        Expr::new(ExprKind::Literal(LiteralExpr { value, initialized: false }), span)
    }

    pub fn identifier(name: Token) -> Self {
        let span = name.span.clone();
        Expr::new(ExprKind::Identifier(IdentifierExpr { name, initialized: false }), span)
    }

    pub fn unary(operator: Token, op: UnaryOp, expr: Expr) -> Self {
        let span = operator.span.to(&expr.span);
        Expr::new(ExprKind::Unary(UnaryExpr { op, operator, expr: Box::new(expr) }), span)
    }

    pub fn binary(left: Expr, operator: Token, op: BinaryOp, right: Expr) -> Self {
        let span = left.span.to(&right.span);
        Expr::new(
            ExprKind::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                operator,
                right: Box::new(right),
            }),
            span,
        )
    }

    pub fn call(name: Token, args: Vec<Expr>, span: Span) -> Self {
        Expr::new(ExprKind::Call(CallExpr { name, args }), span)
    }

    /// Builds a cast of `expr` already annotated with `target`.
    pub fn cast(expr: Expr, target: Type) -> Self {
        Expr {
            span: expr.span.clone(),
            kind: ExprKind::Cast(CastExpr { expr: Box::new(expr) }),
            ty: Some(target),
        }
    }

    /// Replaces this node with a cast to `target` that owns the original node.
    pub fn wrap_in_cast(&mut self, target: Type) {
        let inner = std::mem::take(self);
        *self = Expr::cast(inner, target);
    }

    pub fn is_cast(&self) -> bool {
        matches!(self.kind, ExprKind::Cast(_))
    }
}
