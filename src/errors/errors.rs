use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

/// A single failure from any phase, paired with the span of the offending token.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::DuplicateSymbol { .. } => "DuplicateSymbol",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::NotAssignable { .. } => "NotAssignable",
            ErrorImpl::UninitializedUse { .. } => "UninitializedUse",
            ErrorImpl::IncompatibleOperands { .. } => "IncompatibleOperands",
            ErrorImpl::IncompatibleTypes { .. } => "IncompatibleTypes",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::Internal { .. } => "Internal",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::DuplicateSymbol { name, is_routine } => {
                let what = if *is_routine { "Function" } else { "Identifier" };
                ErrorTip::Suggestion(format!(
                    "{} with name `{}` already exists in current scope",
                    what, name
                ))
            }
            ErrorImpl::UnknownVariable { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not declared", name))
            }
            ErrorImpl::UnknownFunction { name } => {
                ErrorTip::Suggestion(format!("Function `{}` is not declared", name))
            }
            ErrorImpl::NotAssignable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a variable and cannot be assigned", name))
            }
            ErrorImpl::UninitializedUse { name } => {
                ErrorTip::Suggestion(format!("Using uninitialized variable `{}`", name))
            }
            ErrorImpl::IncompatibleOperands { operator, left, right } => {
                ErrorTip::Suggestion(format!(
                    "Operator `{}` cannot be applied to `{}` and `{}`",
                    operator, left, right
                ))
            }
            ErrorImpl::IncompatibleTypes { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::TypeMismatch { found } => ErrorTip::Suggestion(format!(
                "Expecting Boolean condition, found `{}`",
                found
            )),
            ErrorImpl::ArityMismatch { function, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` expects {} arguments, received {}",
                    function, expected, received
                ))
            }
            ErrorImpl::ArgumentTypeMismatch { position, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument {} of type `{}`, received `{}`",
                    position, expected, received
                ))
            }
            ErrorImpl::Internal { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("symbol {name:?} already exists in current scope")]
    DuplicateSymbol { name: String, is_routine: bool },
    #[error("unknown variable {name:?}")]
    UnknownVariable { name: String },
    #[error("unknown function {name:?}")]
    UnknownFunction { name: String },
    #[error("{name:?} is not assignable")]
    NotAssignable { name: String },
    #[error("using uninitialized variable {name:?}")]
    UninitializedUse { name: String },
    #[error("invalid operands for {operator:?}: {left} and {right}")]
    IncompatibleOperands { operator: String, left: String, right: String },
    #[error("incompatible types: expected {expected}, received {received}")]
    IncompatibleTypes { expected: String, received: String },
    #[error("expecting Boolean condition, found {found}")]
    TypeMismatch { found: String },
    #[error("wrong number of parameters specified for {function:?}: expected {expected}, found {received}")]
    ArityMismatch { function: String, expected: usize, received: usize },
    #[error("incompatible type for parameter {position}: expected {expected}, found {received}")]
    ArgumentTypeMismatch { position: usize, expected: String, received: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}
