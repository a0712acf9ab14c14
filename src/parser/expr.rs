use crate::{ast::{expressions::{BinaryOp, Expr, UnaryOp}, types::Literal}, errors::errors::{Error, ErrorImpl}, lexer::tokens::TokenKind};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // Each operator folded into `left` deepens the tree by one level as well
    parser.nest("expression")?;
    let mut levels = 1;

    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected an expression")
        }, parser.current_token().span.clone()));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(next_bp) = parser.get_bp_lookup().get(&parser.current_token_kind()).copied() {
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&parser.current_token_kind()).copied() else {
            break;
        };

        parser.nest("expression")?;
        levels += 1;
        left = led(parser, left, next_bp)?;
    }

    parser.unnest(levels);
    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let value = match token.kind {
        TokenKind::Integer => match token.value.parse::<i64>() {
            Ok(value) => Literal::Integer(value),
            Err(_) => return Err(Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.clone())),
        },
        TokenKind::Real => match token.value.parse::<f64>() {
            Ok(value) if value.is_finite() => Literal::Real(value),
            _ => return Err(Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.clone())),
        },
        TokenKind::True => Literal::Boolean(true),
        TokenKind::False => Literal::Boolean(false),
        TokenKind::Char => Literal::Char(token.value.chars().next().unwrap_or_default()),
        TokenKind::String => Literal::String(token.value.clone()),
        _ => {
            return Err(Error::new(ErrorImpl::UnexpectedToken { token: token.value.clone() }, token.span.clone()))
        }
    };

    Ok(Expr::literal(value, token.span))
}

/// A bare name, or a function call when followed by `(`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::identifier(name));
    }

    let (args, close) = parse_arguments(parser)?;
    let span = name.span.to(&close);

    Ok(Expr::call(name, args, span))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(op) = BinaryOp::from_token_kind(operator_token.kind) else {
        return Err(Error::new(ErrorImpl::UnexpectedToken { token: operator_token.value.clone() }, operator_token.span.clone()));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::binary(left, operator_token, op, right))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(op) = UnaryOp::from_token_kind(operator_token.kind) else {
        return Err(Error::new(ErrorImpl::UnexpectedToken { token: operator_token.value.clone() }, operator_token.span.clone()));
    };

    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::unary(operator_token, op, rhs))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `( expr {, expr} )`, returning the arguments and the span of the closing paren.
pub fn parse_arguments(parser: &mut Parser) -> Result<(Vec<Expr>, crate::Span), Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok((args, close.span))
}
