use log::debug;

use crate::{
    ast::{
        ast::{Block, Declarations, Program, RoutineDecl, VarDecl},
        expressions::{BinaryExpr, BinaryOp, Expr, ExprKind, IdentifierExpr},
        statements::Stmt,
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::symbol_table::{
    RoutineSymbol, ScopeGuard, Scoped, Symbol, SymbolKind, SymbolTable, VariableSymbol,
};

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub symbols: SymbolTable,
}

impl Scoped for TypeChecker {
    fn symbol_table(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            symbols: SymbolTable::new(),
        }
    }

    /// Fails if `name` is already taken in the current scope, as either a
    /// variable or a routine.
    fn validate_symbol(&self, name: &Token) -> Result<(), Error> {
        match self.symbols.find_in_current_scope(&name.value) {
            Some(existing) => Err(Error::new(
                ErrorImpl::DuplicateSymbol {
                    name: name.value.clone(),
                    is_routine: existing.kind() == SymbolKind::Routine,
                },
                name.span.clone(),
            )),
            None => Ok(()),
        }
    }

    /// Resolves the variable written by an assignment, `for` or `read`.
    fn resolve_target(&mut self, name: &Token) -> Result<&mut VariableSymbol, Error> {
        let names_routine = self
            .symbols
            .lookup(&name.value, SymbolKind::Variable, true)
            .is_none()
            && self.symbols.lookup_routine(&name.value).is_some();

        let error = if names_routine {
            ErrorImpl::NotAssignable {
                name: name.value.clone(),
            }
        } else {
            ErrorImpl::UnknownVariable {
                name: name.value.clone(),
            }
        };

        self.symbols
            .lookup_variable_mut(&name.value)
            .ok_or_else(|| Error::new(error, name.span.clone()))
    }

    fn mark_initialized(&mut self, name: &Token) -> Result<(), Error> {
        self.resolve_target(name)?.initialized = true;
        Ok(())
    }
}

/// Checks `program` with a fresh symbol table, annotating and rewriting it
/// in place. Stops at the first error.
pub fn type_check(program: &mut Program) -> Result<(), Error> {
    let mut type_checker = TypeChecker::new();
    check_program(&mut type_checker, program)
}

pub fn check_program(type_checker: &mut TypeChecker, program: &mut Program) -> Result<(), Error> {
    let mut scope = ScopeGuard::new(type_checker);
    type_check_block(&mut scope, &mut program.block)?;

    debug!(
        "Checked program{}",
        program
            .name
            .as_ref()
            .map(|name| format!(" `{}`", name.value))
            .unwrap_or_default()
    );
    Ok(())
}

pub fn type_check_block(type_checker: &mut TypeChecker, block: &mut Block) -> Result<(), Error> {
    type_check_decls(type_checker, &mut block.declarations)?;

    for stmt in block.body.stmts.iter_mut() {
        type_check_stmt(type_checker, stmt)?;
    }

    Ok(())
}

/// Variables are registered before routines, whatever their source order.
pub fn type_check_decls(
    type_checker: &mut TypeChecker,
    declarations: &mut Declarations,
) -> Result<(), Error> {
    for var in declarations.vars.iter() {
        type_check_var_decl(type_checker, var)?;
    }

    for routine in declarations.routines.iter_mut() {
        type_check_routine_decl(type_checker, routine)?;
    }

    Ok(())
}

pub fn type_check_var_decl(type_checker: &mut TypeChecker, var: &VarDecl) -> Result<Type, Error> {
    type_checker.validate_symbol(&var.name)?;
    type_checker.symbols.declare(Symbol::Variable(VariableSymbol {
        name: var.name.value.clone(),
        ty: var.ty,
        initialized: false,
        span: var.name.span.clone(),
    }))?;

    Ok(var.ty)
}

pub fn type_check_routine_decl(
    type_checker: &mut TypeChecker,
    routine: &mut RoutineDecl,
) -> Result<Type, Error> {
    type_checker.validate_symbol(&routine.name)?;
    type_checker.symbols.declare(Symbol::Routine(RoutineSymbol {
        name: routine.name.value.clone(),
        params: routine
            .params
            .iter()
            .map(|param| (param.name.value.clone(), param.ty))
            .collect(),
        return_type: routine.return_type,
        span: routine.name.span.clone(),
    }))?;

    let mut scope = ScopeGuard::new(type_checker);

    // The result is returned by assigning to the routine's own name
    if !routine.is_procedure() {
        scope.symbols.declare(Symbol::Variable(VariableSymbol {
            name: routine.name.value.clone(),
            ty: routine.return_type,
            initialized: false,
            span: routine.name.span.clone(),
        }))?;
    }

    for param in routine.params.iter() {
        type_check_var_decl(&mut scope, param)?;
        scope.mark_initialized(&param.name)?;
    }

    type_check_block(&mut scope, &mut routine.block)?;
    debug!("Checked routine `{}`", routine.name.value);

    Ok(routine.return_type)
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &mut Stmt) -> Result<Type, Error> {
    match stmt {
        Stmt::Compound(compound) => {
            for stmt in compound.stmts.iter_mut() {
                type_check_stmt(type_checker, stmt)?;
            }
        }
        Stmt::Assign(assign) => {
            let target = type_checker.resolve_target(&assign.name)?.ty;
            type_check_expr(type_checker, &mut assign.expr)?;
            type_checker.mark_initialized(&assign.name)?;
            add_type_cast(&mut assign.expr, target)?;
        }
        Stmt::If(if_stmt) => {
            type_check_condition(type_checker, &mut if_stmt.condition)?;
            type_check_stmt(type_checker, &mut if_stmt.then_stmt)?;
            if let Some(else_stmt) = if_stmt.else_stmt.as_mut() {
                type_check_stmt(type_checker, else_stmt)?;
            }
        }
        Stmt::For(for_stmt) => {
            type_checker.mark_initialized(&for_stmt.var)?;
            type_check_expr(type_checker, &mut for_stmt.start)?;
            type_check_expr(type_checker, &mut for_stmt.end)?;
            type_check_stmt(type_checker, &mut for_stmt.body)?;
        }
        Stmt::While(while_stmt) => {
            type_check_condition(type_checker, &mut while_stmt.condition)?;
            type_check_stmt(type_checker, &mut while_stmt.body)?;
        }
        Stmt::Repeat(repeat) => {
            for stmt in repeat.stmts.iter_mut() {
                type_check_stmt(type_checker, stmt)?;
            }
            type_check_condition(type_checker, &mut repeat.condition)?;
        }
        Stmt::Read(read) => {
            for var in read.vars.iter() {
                type_checker.mark_initialized(var)?;
            }
        }
        Stmt::Write(write) => {
            for expr in write.exprs.iter_mut() {
                type_check_expr(type_checker, expr)?;
            }
        }
        Stmt::Call(call) => {
            type_check_call(type_checker, &call.name, &mut call.args)?;
        }
    }

    Ok(Type::Void)
}

/// Conditions of `if`, `while` and `repeat` must be Boolean.
fn type_check_condition(type_checker: &mut TypeChecker, condition: &mut Expr) -> Result<(), Error> {
    let ty = type_check_expr(type_checker, condition)?;

    if ty != Type::Boolean {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                found: ty.to_string(),
            },
            condition.span.clone(),
        ));
    }

    Ok(())
}

/// Resolves the type of `expr`, records it on the node and returns it.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &mut Expr) -> Result<Type, Error> {
    let ty = match &mut expr.kind {
        ExprKind::Literal(literal) => {
            literal.initialized = true;
            literal.value.get_type()
        }
        ExprKind::Identifier(identifier) => type_check_identifier(type_checker, identifier)?,
        ExprKind::Unary(unary) => type_check_expr(type_checker, &mut unary.expr)?,
        ExprKind::Binary(binary) => type_check_binary(type_checker, binary)?,
        ExprKind::Call(call) => type_check_call(type_checker, &call.name, &mut call.args)?,
        ExprKind::Cast(cast) => {
            type_check_expr(type_checker, &mut cast.expr)?;
            expr.ty.ok_or_else(|| {
                Error::new(
                    ErrorImpl::Internal {
                        message: String::from("cast node without a target type"),
                    },
                    expr.span.clone(),
                )
            })?
        }
    };

    expr.ty = Some(ty);
    Ok(ty)
}

fn type_check_identifier(
    type_checker: &mut TypeChecker,
    identifier: &mut IdentifierExpr,
) -> Result<Type, Error> {
    let name = &identifier.name;

    match type_checker
        .symbols
        .lookup(&name.value, SymbolKind::Variable, true)
    {
        Some(Symbol::Variable(variable)) if variable.initialized => {
            identifier.initialized = true;
            Ok(variable.ty)
        }
        Some(_) => Err(Error::new(
            ErrorImpl::UninitializedUse {
                name: name.value.clone(),
            },
            name.span.clone(),
        )),
        None => Err(Error::new(
            ErrorImpl::UnknownVariable {
                name: name.value.clone(),
            },
            name.span.clone(),
        )),
    }
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &mut BinaryExpr) -> Result<Type, Error> {
    let left = type_check_expr(type_checker, &mut binary.left)?;
    let right = type_check_expr(type_checker, &mut binary.right)?;

    let result = binary_result_type(binary.op, left, right);
    if result == Type::Error {
        return Err(Error::new(
            ErrorImpl::IncompatibleOperands {
                operator: binary.operator.value.clone(),
                left: left.to_string(),
                right: right.to_string(),
            },
            binary.operator.span.clone(),
        ));
    }

    // At most one operand is widened
    match (left, right) {
        (Type::Integer, Type::Real) => binary.left.wrap_in_cast(Type::Real),
        (Type::Real, Type::Integer) => binary.right.wrap_in_cast(Type::Real),
        (Type::String, other) if other != Type::String => binary.right.wrap_in_cast(Type::String),
        (other, Type::String) if other != Type::String => binary.left.wrap_in_cast(Type::String),
        _ => return Ok(result),
    }

    debug!(
        "Widened operand of `{}` ({} {} {})",
        binary.op.symbol(),
        left,
        binary.op.symbol(),
        right
    );
    Ok(result)
}

/// Result type of `left op right`, or `Type::Error` when no rule applies.
///
/// Rules are tried in order and the first match wins.
pub fn binary_result_type(op: BinaryOp, left: Type, right: Type) -> Type {
    let both_numeric = left.is_numeric() && right.is_numeric();

    if op.is_arithmetic() && both_numeric {
        return if left == right { left } else { Type::Real };
    }

    if op == BinaryOp::Mod && left == Type::Integer && right == Type::Integer {
        return Type::Integer;
    }

    if op == BinaryOp::Add && (left == Type::String || right == Type::String) {
        return Type::String;
    }

    if op.is_relational() {
        if both_numeric {
            return Type::Boolean;
        }
        let comparable = matches!(left, Type::Integer | Type::Real | Type::String | Type::Char);
        if comparable && left == right {
            return Type::Boolean;
        }
    }

    if op.is_equality() && (left == right || both_numeric) {
        return Type::Boolean;
    }

    if op.is_logical() && left == right && matches!(left, Type::Integer | Type::Boolean) {
        return left;
    }

    Type::Error
}

/// Resolves a call against the routines in scope, widening arguments to the
/// parameter types where allowed. Returns the routine's return type.
pub fn type_check_call(
    type_checker: &mut TypeChecker,
    name: &Token,
    args: &mut [Expr],
) -> Result<Type, Error> {
    let routine = type_checker
        .symbols
        .lookup_routine(&name.value)
        .cloned()
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownFunction {
                    name: name.value.clone(),
                },
                name.span.clone(),
            )
        })?;

    if routine.params.len() != args.len() {
        return Err(Error::new(
            ErrorImpl::ArityMismatch {
                function: name.value.clone(),
                expected: routine.params.len(),
                received: args.len(),
            },
            name.span.clone(),
        ));
    }

    for (index, (arg, (_, expected))) in args.iter_mut().zip(routine.params.iter()).enumerate() {
        let found = type_check_expr(type_checker, arg)?;
        let span = arg.span.clone();

        if let Err(error) = add_type_cast(arg, *expected) {
            if found != *expected {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMismatch {
                        position: index + 1,
                        expected: expected.to_string(),
                        received: found.to_string(),
                    },
                    span,
                ));
            }
            return Err(error);
        }
    }

    Ok(routine.return_type)
}

/// Wraps `expr` in a cast to `target` when its type differs.
///
/// Only Integer to Real, Char to Integer and Char to String are implicit.
pub fn add_type_cast(expr: &mut Expr, target: Type) -> Result<(), Error> {
    let source = expr.ty.ok_or_else(|| {
        Error::new(
            ErrorImpl::Internal {
                message: String::from("expression was not type checked"),
            },
            expr.span.clone(),
        )
    })?;

    if source == target {
        return Ok(());
    }

    match (source, target) {
        (Type::Integer, Type::Real) | (Type::Char, Type::Integer) | (Type::Char, Type::String) => {
            debug!("Inserted cast {} -> {}", source, target);
            expr.wrap_in_cast(target);
            Ok(())
        }
        _ => Err(Error::new(
            ErrorImpl::IncompatibleTypes {
                expected: target.to_string(),
                received: source.to_string(),
            },
            expr.span.clone(),
        )),
    }
}
