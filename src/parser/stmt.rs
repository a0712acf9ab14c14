use crate::{ast::{ast::{Block, Declarations, Program, RoutineDecl, VarDecl}, statements::{AssignStmt, CallStmt, CompoundStmt, ForStmt, IfStmt, ReadStmt, RepeatStmt, Stmt, WhileStmt, WriteStmt}, types::Type}, errors::errors::Error, lexer::tokens::{Token, TokenKind}, parser::{expr::{parse_arguments, parse_expr}, lookups::BindingPower}};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() else {
        return Err(parser.unexpected("expected a statement"));
    };

    parser.nest("statement")?;
    let stmt = handler(parser)?;
    parser.unnest(1);

    Ok(stmt)
}

/// `[program name;] block .`
pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let start = parser.current_token().span.clone();

    let name = if parser.current_token_kind() == TokenKind::Program {
        parser.advance();
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Semicolon)?;
        Some(name)
    } else {
        None
    };

    let block = parse_block(parser)?;
    let dot = parser.expect(TokenKind::Dot)?;

    if parser.current_token_kind() != TokenKind::EOF {
        return Err(parser.unexpected("expected end of file after the final `.`"));
    }

    Ok(Program {
        name,
        block,
        span: start.to(&dot.span),
    })
}

/// Any number of `var` sections and routines, then `begin ... end`.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let mut declarations = Declarations::default();

    loop {
        match parser.current_token_kind() {
            TokenKind::Var => parse_var_section(parser, &mut declarations.vars)?,
            TokenKind::Function | TokenKind::Procedure => {
                declarations.routines.push(parse_routine_decl(parser)?)
            }
            _ => break,
        }
    }

    let body = parse_compound(parser)?;

    Ok(Block { declarations, body })
}

pub fn parse_var_section(parser: &mut Parser, vars: &mut Vec<VarDecl>) -> Result<(), Error> {
    parser.expect(TokenKind::Var)?;

    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.unexpected("expected identifier during variable declaration"));
    }

    while parser.current_token_kind() == TokenKind::Identifier {
        vars.extend(parse_var_group(parser)?);
        parser.expect(TokenKind::Semicolon)?;
    }

    Ok(())
}

/// `a, b, c: type`
fn parse_var_group(parser: &mut Parser) -> Result<Vec<VarDecl>, Error> {
    let names = parse_identifier_list(parser)?;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    Ok(names.into_iter().map(|name| VarDecl { name, ty }).collect())
}

fn parse_identifier_list(parser: &mut Parser) -> Result<Vec<Token>, Error> {
    let mut names = vec![parser.expect(TokenKind::Identifier)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect(TokenKind::Identifier)?);
    }

    Ok(names)
}

pub fn parse_routine_decl(parser: &mut Parser) -> Result<RoutineDecl, Error> {
    let is_function = parser.advance().kind == TokenKind::Function;

    let name = parser.expect(TokenKind::Identifier)?;

    let mut params = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();

        if parser.current_token_kind() != TokenKind::CloseParen {
            loop {
                params.extend(parse_var_group(parser)?);

                if parser.current_token_kind() == TokenKind::Semicolon {
                    parser.advance();
                } else {
                    break;
                }
            }
        }

        parser.expect(TokenKind::CloseParen)?;
    }

    let return_type = if is_function {
        parser.expect(TokenKind::Colon)?;
        parse_type(parser)?
    } else {
        Type::Void
    };

    parser.expect(TokenKind::Semicolon)?;
    parser.nest("routine")?;
    let block = parse_block(parser)?;
    parser.unnest(1);
    parser.expect(TokenKind::Semicolon)?;

    Ok(RoutineDecl {
        name,
        params,
        return_type,
        block,
    })
}

/// Statements separated by `;` up to (not including) `terminator`.
fn parse_stmt_list(parser: &mut Parser, terminator: TokenKind) -> Result<Vec<Stmt>, Error> {
    let mut stmts = vec![];

    while parser.current_token_kind() != terminator {
        stmts.push(parse_stmt(parser)?);

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        } else {
            break;
        }
    }

    Ok(stmts)
}

pub fn parse_compound(parser: &mut Parser) -> Result<CompoundStmt, Error> {
    let start = parser.expect(TokenKind::Begin)?.span;
    let stmts = parse_stmt_list(parser, TokenKind::End)?;
    let end = parser.expect(TokenKind::End)?.span;

    Ok(CompoundStmt {
        stmts,
        span: start.to(&end),
    })
}

pub fn parse_compound_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Compound(parse_compound(parser)?))
}

/// Assignment, or a procedure call with or without arguments.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance();
            let expr = parse_expr(parser, BindingPower::Default)?;
            Ok(Stmt::Assign(AssignStmt { name, expr }))
        }
        TokenKind::OpenParen => {
            let (args, _) = parse_arguments(parser)?;
            Ok(Stmt::Call(CallStmt { name, args }))
        }
        _ => Ok(Stmt::Call(CallStmt { name, args: vec![] })),
    }
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::If)?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_stmt = Box::new(parse_stmt(parser)?);

    let else_stmt = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_stmt,
        else_stmt,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::While)?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::While(WhileStmt { condition, body }))
}

pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Repeat)?;

    let stmts = parse_stmt_list(parser, TokenKind::Until)?;
    parser.expect(TokenKind::Until)?;
    let condition = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Repeat(RepeatStmt { stmts, condition }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::For)?;

    let var = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let start = parse_expr(parser, BindingPower::Default)?;

    let ascending = match parser.current_token_kind() {
        TokenKind::To => true,
        TokenKind::Downto => false,
        _ => return Err(parser.unexpected("expected `to` or `downto`")),
    };
    parser.advance();

    let end = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::For(ForStmt {
        var,
        start,
        end,
        ascending,
        body,
    }))
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let new_line = parser.advance().kind == TokenKind::ReadLn;

    let mut vars = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        vars = parse_identifier_list(parser)?;
        parser.expect(TokenKind::CloseParen)?;
    }

    Ok(Stmt::Read(ReadStmt { vars, new_line }))
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let new_line = parser.advance().kind == TokenKind::WriteLn;

    let exprs = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_arguments(parser)?.0
    } else {
        vec![]
    };

    Ok(Stmt::Write(WriteStmt { exprs, new_line }))
}
