//! Type system definitions for the AST.
//!
//! The language has a closed set of scalar types; there are no user-defined
//! types. `Error` is a sentinel the checker produces when no typing rule
//! matches and always turns into a reported failure.

use std::fmt::Display;

/// Resolved or declared type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Real,
    Boolean,
    Char,
    String,
    Void,
    Error,
}

impl Type {
    /// Looks up a type by its (case-insensitive) source name.
    pub fn from_name(name: &str) -> Option<Type> {
        match name.to_ascii_lowercase().as_str() {
            "integer" => Some(Type::Integer),
            "real" => Some(Type::Real),
            "boolean" => Some(Type::Boolean),
            "char" => Some(Type::Char),
            "string" => Some(Type::String),
            _ => None,
        }
    }

    /// Spelling used when printing declarations.
    pub fn keyword(&self) -> &'static str {
        match self {
            Type::Integer => "integer",
            Type::Real => "real",
            Type::Boolean => "boolean",
            Type::Char => "char",
            Type::String => "string",
            Type::Void => "void",
            Type::Error => "error",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Value of a literal as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Char(char),
    String(String),
}

impl Literal {
    pub fn get_type(&self) -> Type {
        match self {
            Literal::Integer(_) => Type::Integer,
            Literal::Real(_) => Type::Real,
            Literal::Boolean(_) => Type::Boolean,
            Literal::Char(_) => Type::Char,
            Literal::String(_) => Type::String,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Real(value) => {
                // `{:?}` drops the fraction in exponent form (`1e16`).
                let text = format!("{:?}", value);
                match text.split_once('e') {
                    Some((mantissa, exponent)) if !mantissa.contains('.') => {
                        write!(f, "{}.0e{}", mantissa, exponent)
                    }
                    _ => write!(f, "{}", text),
                }
            }
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Char(value) if *value == '\'' => write!(f, "''''"),
            Literal::Char(value) => write!(f, "'{}'", value),
            Literal::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}
