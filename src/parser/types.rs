//! Type annotation parsing.
//!
//! Only the built-in scalar type names are accepted, case-insensitively.

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let error = parser.unexpected("expected a type name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Type::from_name(&token.value).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            token.span.clone(),
        )
    })
}
