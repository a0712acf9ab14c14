//! Unit tests for the symbol table and the type checker.

use std::rc::Rc;

use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, Expr, ExprKind},
        statements::Stmt,
        types::{Literal, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Span,
};

use super::{
    symbol_table::{RoutineSymbol, ScopeGuard, Symbol, SymbolKind, SymbolTable, VariableSymbol},
    type_checker::{add_type_cast, binary_result_type, check_program, type_check, TypeChecker},
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.pas".to_string())).unwrap();
    parse(tokens, Rc::new("test.pas".to_string())).unwrap()
}

fn check(source: &str) -> Result<Program, Error> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut program = parse_source(source);
    type_check(&mut program)?;
    Ok(program)
}

fn check_err(source: &str) -> Error {
    match check(source) {
        Ok(_) => panic!("expected `{}` to fail", source),
        Err(error) => error,
    }
}

fn variable(name: &str, ty: Type) -> Symbol {
    Symbol::Variable(VariableSymbol {
        name: name.to_string(),
        ty,
        initialized: false,
        span: Span::null(),
    })
}

/// Right-hand side of the `index`th top-level statement, which must be an assignment.
fn assigned_expr(program: &Program, index: usize) -> &Expr {
    match &program.block.body.stmts[index] {
        Stmt::Assign(assign) => &assign.expr,
        other => panic!("expected an assignment, found {:?}", other),
    }
}

fn cast_inner(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Cast(cast) => &cast.expr,
        other => panic!("expected a cast, found {:?}", other),
    }
}

#[test]
fn test_symbol_table_declare_and_lookup() {
    let mut table = SymbolTable::new();
    table.declare(variable("x", Type::Integer)).unwrap();

    let found = table.lookup("x", SymbolKind::Variable, true).unwrap();
    assert!(matches!(found, Symbol::Variable(v) if v.ty == Type::Integer));
    assert!(table.lookup("x", SymbolKind::Routine, true).is_none());
    assert!(table.lookup("X", SymbolKind::Variable, true).is_none());
}

#[test]
fn test_symbol_table_duplicate_in_same_scope() {
    let mut table = SymbolTable::new();
    table.declare(variable("x", Type::Integer)).unwrap();

    let error = table.declare(variable("x", Type::Real)).unwrap_err();
    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: false } if name == "x"
    ));
}

#[test]
fn test_symbol_table_shadowing() {
    let mut table = SymbolTable::new();
    table.declare(variable("x", Type::Integer)).unwrap();

    table.enter_scope();
    table.declare(variable("x", Type::Real)).unwrap();
    assert!(matches!(
        table.lookup("x", SymbolKind::Variable, true),
        Some(Symbol::Variable(v)) if v.ty == Type::Real
    ));

    table.exit_scope();
    assert!(matches!(
        table.lookup("x", SymbolKind::Variable, true),
        Some(Symbol::Variable(v)) if v.ty == Type::Integer
    ));
}

#[test]
fn test_symbol_table_lookup_without_recursion() {
    let mut table = SymbolTable::new();
    table.declare(variable("outer", Type::Char)).unwrap();
    table.enter_scope();

    assert!(table.lookup("outer", SymbolKind::Variable, false).is_none());
    assert!(table.lookup("outer", SymbolKind::Variable, true).is_some());
}

#[test]
fn test_symbol_table_never_pops_root() {
    let mut table = SymbolTable::new();
    table.exit_scope();
    table.exit_scope();

    assert_eq!(table.depth(), 1);
    table.declare(variable("x", Type::Boolean)).unwrap();
}

#[test]
fn test_scope_guard_restores_depth() {
    let mut table = SymbolTable::new();

    {
        let mut guard = ScopeGuard::new(&mut table);
        assert_eq!(guard.depth(), 2);
        guard.declare(variable("inner", Type::Integer)).unwrap();
    }

    assert_eq!(table.depth(), 1);
    assert!(table.lookup("inner", SymbolKind::Variable, true).is_none());
}

#[test]
fn test_scope_guard_unwinds_on_error() {
    fn fails_inside_scope(table: &mut SymbolTable) -> Result<(), Error> {
        let mut guard = ScopeGuard::new(table);
        guard.declare(variable("x", Type::Integer))?;
        guard.declare(variable("x", Type::Integer))?;
        Ok(())
    }

    let mut table = SymbolTable::new();
    assert!(fails_inside_scope(&mut table).is_err());
    assert_eq!(table.depth(), 1);
}

#[test]
fn test_checker_scope_restored_after_nested_failure() {
    let mut program = parse_source(
        "procedure p; procedure q; begin x := 1 end; begin end; begin end.",
    );
    let mut type_checker = TypeChecker::new();

    let error = check_program(&mut type_checker, &mut program).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownVariable");
    assert_eq!(type_checker.symbols.depth(), 1);
}

#[test]
fn test_binary_result_table() {
    use BinaryOp::*;

    assert_eq!(binary_result_type(Add, Type::Integer, Type::Integer), Type::Integer);
    assert_eq!(binary_result_type(Div, Type::Integer, Type::Integer), Type::Integer);
    assert_eq!(binary_result_type(Mul, Type::Real, Type::Integer), Type::Real);
    assert_eq!(binary_result_type(Mod, Type::Integer, Type::Integer), Type::Integer);
    assert_eq!(binary_result_type(Mod, Type::Real, Type::Integer), Type::Error);
    assert_eq!(binary_result_type(Add, Type::String, Type::Char), Type::String);
    assert_eq!(binary_result_type(Sub, Type::String, Type::String), Type::Error);
    assert_eq!(binary_result_type(Lt, Type::Integer, Type::Real), Type::Boolean);
    assert_eq!(binary_result_type(Geq, Type::Char, Type::Char), Type::Boolean);
    assert_eq!(binary_result_type(Gt, Type::String, Type::Char), Type::Error);
    assert_eq!(binary_result_type(Lt, Type::Boolean, Type::Boolean), Type::Error);
    assert_eq!(binary_result_type(Eq, Type::Boolean, Type::Boolean), Type::Boolean);
    assert_eq!(binary_result_type(Neq, Type::Real, Type::Integer), Type::Boolean);
    assert_eq!(binary_result_type(Eq, Type::Char, Type::String), Type::Error);
    assert_eq!(binary_result_type(And, Type::Boolean, Type::Boolean), Type::Boolean);
    assert_eq!(binary_result_type(Or, Type::Integer, Type::Integer), Type::Integer);
    assert_eq!(binary_result_type(And, Type::Integer, Type::Boolean), Type::Error);
}

#[test]
fn test_assignment_widens_integer_to_real() {
    let program = check("var a: integer; var b: real; begin a := 5; b := a; end.").unwrap();

    let expr = assigned_expr(&program, 1);
    assert_eq!(expr.ty, Some(Type::Real));
    let inner = cast_inner(expr);
    assert!(matches!(&inner.kind, ExprKind::Identifier(id) if id.name.value == "a"));
    assert_eq!(inner.ty, Some(Type::Integer));
}

#[test]
fn test_assignment_without_cast_when_types_match() {
    let program = check("var a: integer; begin a := 5 end.").unwrap();

    let expr = assigned_expr(&program, 0);
    assert!(!expr.is_cast());
    assert_eq!(expr.ty, Some(Type::Integer));
}

#[test]
fn test_assignment_char_widenings() {
    let program = check("var i: integer; s: string; begin i := 'a'; s := 'b' end.").unwrap();

    let to_integer = assigned_expr(&program, 0);
    assert_eq!(to_integer.ty, Some(Type::Integer));
    assert_eq!(cast_inner(to_integer).ty, Some(Type::Char));

    let to_string = assigned_expr(&program, 1);
    assert_eq!(to_string.ty, Some(Type::String));
    assert_eq!(cast_inner(to_string).ty, Some(Type::Char));
}

#[test]
fn test_assignment_incompatible_types() {
    for source in [
        "var i: integer; begin i := 1.5 end.",
        "var c: char; begin c := 1 end.",
        "var b: boolean; begin b := 1 end.",
        "var s: string; begin s := 1 end.",
        "var c: char; begin c := 'ab' end.",
    ] {
        let error = check_err(source);
        assert_eq!(error.get_error_name(), "IncompatibleTypes", "{}", source);
    }
}

#[test]
fn test_add_type_cast_requires_resolved_type() {
    let mut expr = Expr::literal(Literal::Integer(1), Span::null());

    let error = add_type_cast(&mut expr, Type::Real).unwrap_err();
    assert_eq!(error.get_error_name(), "Internal");
}

#[test]
fn test_binary_mixed_numeric_casts_integer_side() {
    let program = check("var r: real; i: integer; begin i := 1; r := 2.0; r := i * r; r := r - i end.").unwrap();

    let ExprKind::Binary(left_int) = &assigned_expr(&program, 2).kind else {
        panic!("expected a binary expression");
    };
    assert!(left_int.left.is_cast());
    assert_eq!(left_int.left.ty, Some(Type::Real));
    assert!(!left_int.right.is_cast());

    let ExprKind::Binary(right_int) = &assigned_expr(&program, 3).kind else {
        panic!("expected a binary expression");
    };
    assert!(!right_int.left.is_cast());
    assert!(right_int.right.is_cast());
    assert_eq!(assigned_expr(&program, 3).ty, Some(Type::Real));
}

#[test]
fn test_binary_comparison_casts_operand() {
    let program = check("var b: boolean; begin b := 1 < 2.5 end.").unwrap();

    let expr = assigned_expr(&program, 0);
    assert_eq!(expr.ty, Some(Type::Boolean));
    let ExprKind::Binary(binary) = &expr.kind else {
        panic!("expected a binary expression");
    };
    assert!(binary.left.is_cast());
    assert!(!binary.right.is_cast());
}

#[test]
fn test_binary_string_concatenation_casts_other_side() {
    let program = check("var s: string; begin s := 'n = ' + 42; s := 'x' + s end.").unwrap();

    let ExprKind::Binary(binary) = &assigned_expr(&program, 0).kind else {
        panic!("expected a binary expression");
    };
    assert!(!binary.left.is_cast());
    assert_eq!(binary.right.ty, Some(Type::String));
    assert_eq!(cast_inner(&binary.right).ty, Some(Type::Integer));

    let ExprKind::Binary(binary) = &assigned_expr(&program, 1).kind else {
        panic!("expected a binary expression");
    };
    assert!(binary.left.is_cast());
    assert_eq!(cast_inner(&binary.left).ty, Some(Type::Char));
}

#[test]
fn test_binary_invalid_operands_points_at_operator() {
    let error = check_err("var b: boolean; begin b := true + 1 end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::IncompatibleOperands { operator, left, right }
            if operator == "+" && left == "Boolean" && right == "Integer"
    ));
    assert_eq!(error.get_position().0, 32);
}

#[test]
fn test_unary_keeps_operand_type() {
    let program = check("var r: real; b: boolean; begin r := -1.5; b := not true end.").unwrap();

    assert_eq!(assigned_expr(&program, 0).ty, Some(Type::Real));
    assert_eq!(assigned_expr(&program, 1).ty, Some(Type::Boolean));
}

#[test]
fn test_uninitialized_use_in_own_assignment() {
    let source = "var x: integer; begin x := x + 1; end.";
    let error = check_err(source);

    assert!(matches!(error.get_error(), ErrorImpl::UninitializedUse { name } if name == "x"));
    assert_eq!(error.get_position().0, source.find("x + 1").unwrap() as u32);
}

#[test]
fn test_initialized_by_assignment_read_and_for() {
    check("var a, b: integer; begin a := 1; b := a end.").unwrap();
    check("var a, b: integer; begin read(a); b := a end.").unwrap();
    check("var i, b: integer; begin for i := 1 to 3 do b := i; b := i end.").unwrap();
}

#[test]
fn test_identifier_marked_initialized_after_check() {
    let program = check("var a, b: integer; begin a := 1; b := a end.").unwrap();

    assert!(matches!(
        &assigned_expr(&program, 1).kind,
        ExprKind::Identifier(id) if id.initialized
    ));
    assert!(matches!(
        &assigned_expr(&program, 0).kind,
        ExprKind::Literal(literal) if literal.initialized
    ));
}

#[test]
fn test_unknown_variable() {
    let error = check_err("begin y := 1 end.");
    assert!(matches!(error.get_error(), ErrorImpl::UnknownVariable { name } if name == "y"));

    let error = check_err("var x: integer; begin x := y end.");
    assert!(matches!(error.get_error(), ErrorImpl::UnknownVariable { name } if name == "y"));
}

#[test]
fn test_assigning_to_procedure_is_not_assignable() {
    let error = check_err("procedure p; begin end; begin p := 1 end.");
    assert!(matches!(error.get_error(), ErrorImpl::NotAssignable { name } if name == "p"));

    let error = check_err("procedure p; begin end; begin read(p) end.");
    assert_eq!(error.get_error_name(), "NotAssignable");
}

#[test]
fn test_duplicate_variable_in_same_scope() {
    let error = check_err("var x: integer; x: real; begin end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: false } if name == "x"
    ));
}

#[test]
fn test_duplicate_between_variable_and_routine() {
    let error = check_err("var f: integer; function f: integer; begin f := 1 end; begin end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: false } if name == "f"
    ));
}

#[test]
fn test_duplicate_routine() {
    let error = check_err("procedure p; begin end; procedure p; begin end; begin end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: true } if name == "p"
    ));
    assert_eq!(
        error.get_tip().to_string(),
        "Function with name `p` already exists in current scope"
    );
}

#[test]
fn test_local_variable_collides_with_parameter() {
    let error = check_err("procedure p(a: integer); var a: real; begin end; begin p(1) end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: false } if name == "a"
    ));
}

#[test]
fn test_symbol_table_duplicate_routine() {
    let routine = || {
        Symbol::Routine(RoutineSymbol {
            name: "f".to_string(),
            params: vec![],
            return_type: Type::Integer,
            span: Span::null(),
        })
    };

    let mut table = SymbolTable::new();
    table.declare(routine()).unwrap();
    table.declare(variable("f", Type::Integer)).unwrap();

    let error = table.declare(routine()).unwrap_err();
    assert!(matches!(
        error.get_error(),
        ErrorImpl::DuplicateSymbol { name, is_routine: true } if name == "f"
    ));
}

#[test]
fn test_duplicate_parameter() {
    let error = check_err("procedure p(a: integer; a: real); begin end; begin end.");
    assert_eq!(error.get_error_name(), "DuplicateSymbol");

    let error = check_err("function f(f: integer): integer; begin f := 1 end; begin end.");
    assert_eq!(error.get_error_name(), "DuplicateSymbol");
}

#[test]
fn test_shadowing_in_routine_succeeds() {
    let source = "var x: integer;
        procedure p(x: real);
        var y: real;
        begin y := x end;
        begin x := 1; p(x) end.";

    check(source).unwrap();
}

#[test]
fn test_routine_scope_does_not_leak() {
    let error = check_err("procedure p; var local: integer; begin local := 1 end; begin local := 2 end.");

    assert!(matches!(error.get_error(), ErrorImpl::UnknownVariable { name } if name == "local"));
}

#[test]
fn test_parameters_are_initialized() {
    check("function twice(n: integer): integer; begin twice := n * 2 end; begin end.").unwrap();
}

#[test]
fn test_function_result_variable_starts_uninitialized() {
    let error = check_err("function f: integer; var y: integer; begin y := f end; begin end.");

    assert_eq!(error.get_error_name(), "UninitializedUse");
}

#[test]
fn test_recursive_call() {
    let source = "function fact(n: integer): integer;
        begin
            if n <= 1 then fact := 1 else fact := n * fact(n - 1)
        end;
        var r: integer;
        begin r := fact(5) end.";

    check(source).unwrap();
}

#[test]
fn test_call_unknown_function() {
    let error = check_err("var x: integer; begin x := g(1) end.");
    assert!(matches!(error.get_error(), ErrorImpl::UnknownFunction { name } if name == "g"));

    let error = check_err("begin g end.");
    assert_eq!(error.get_error_name(), "UnknownFunction");
}

#[test]
fn test_variable_is_not_callable() {
    let error = check_err("var x: integer; begin x := 1; x(1) end.");
    assert_eq!(error.get_error_name(), "UnknownFunction");
}

#[test]
fn test_call_arity_mismatch() {
    let error = check_err("procedure p(a, b: integer); begin end; begin p(1) end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::ArityMismatch { function, expected: 2, received: 1 } if function == "p"
    ));
}

#[test]
fn test_call_widens_argument() {
    let program = check("procedure p(r: real; s: string); begin end; begin p(1, 'c') end.").unwrap();

    let Stmt::Call(call) = &program.block.body.stmts[0] else {
        panic!("expected a call statement");
    };
    assert_eq!(call.args[0].ty, Some(Type::Real));
    assert_eq!(cast_inner(&call.args[0]).ty, Some(Type::Integer));
    assert_eq!(call.args[1].ty, Some(Type::String));
    assert_eq!(cast_inner(&call.args[1]).ty, Some(Type::Char));
}

#[test]
fn test_call_argument_type_mismatch() {
    let error = check_err("procedure p(a: integer; b: boolean); begin end; begin p(1, 2) end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::ArgumentTypeMismatch { position: 2, expected, received }
            if expected == "Boolean" && received == "Integer"
    ));
}

#[test]
fn test_procedure_call_has_void_type() {
    let error = check_err("procedure p; begin end; var x: integer; begin x := p() end.");

    assert!(matches!(
        error.get_error(),
        ErrorImpl::IncompatibleTypes { expected, received } if expected == "Integer" && received == "Void"
    ));
}

#[test]
fn test_conditions_must_be_boolean() {
    for source in [
        "var i: integer; begin i := 1; if i then i := 2 end.",
        "var i: integer; begin i := 1; while i do i := 2 end.",
        "var i: integer; begin i := 1; repeat i := 2 until i + 1 end.",
    ] {
        let error = check_err(source);
        assert!(
            matches!(error.get_error(), ErrorImpl::TypeMismatch { found } if found == "Integer"),
            "{}",
            source
        );
    }
}

#[test]
fn test_condition_error_points_at_condition() {
    let source = "var i: integer; begin i := 1; if i + 1 then i := 2 end.";
    let error = check_err(source);

    assert_eq!(error.get_position().0, source.find("i + 1").unwrap() as u32);
    assert_eq!(error.to_string(), "expecting Boolean condition, found Integer");
}

#[test]
fn test_write_accepts_any_expression() {
    check("var c: char; r: real; begin c := 'x'; r := 1; writeln(c, r, 'done', true) end.").unwrap();
}

#[test]
fn test_write_checks_its_expressions() {
    let error = check_err("var c: char; begin writeln(c) end.");
    assert_eq!(error.get_error_name(), "UninitializedUse");
}

#[test]
fn test_variables_checked_before_routines() {
    let source = "procedure reset; begin total := 0 end;
        var total: integer;
        begin reset; writeln(total) end.";

    check(source).unwrap();
}

#[test]
fn test_existing_cast_is_transparent() {
    let mut program = parse_source("var a: integer; r: real; begin a := 1; r := a end.");
    type_check(&mut program).unwrap();

    let Stmt::Assign(assign) = &program.block.body.stmts[1] else {
        panic!("expected an assignment");
    };
    let mut expr = assign.expr.clone();

    let mut type_checker = TypeChecker::new();
    type_checker
        .symbols
        .declare(Symbol::Variable(VariableSymbol {
            name: String::from("a"),
            ty: Type::Integer,
            initialized: true,
            span: Span::null(),
        }))
        .unwrap();

    let ty = super::type_checker::type_check_expr(&mut type_checker, &mut expr).unwrap();
    assert_eq!(ty, Type::Real);
    assert!(expr.is_cast());
}

#[test]
fn test_cast_without_type_is_internal_error() {
    let inner = Expr::literal(Literal::Integer(1), Span::null());
    let mut expr = Expr::cast(inner, Type::Real);
    expr.ty = None;

    let mut type_checker = TypeChecker::new();
    let error = super::type_checker::type_check_expr(&mut type_checker, &mut expr).unwrap_err();
    assert_eq!(error.get_error_name(), "Internal");
}

#[test]
fn test_end_to_end_function_call_result_widened() {
    let source = "function f(a: integer; b: integer): integer; begin f := a + b; end; var y: real; begin y := f(1, 2); end.";
    let program = check(source).unwrap();

    let expr = assigned_expr(&program, 0);
    assert_eq!(expr.ty, Some(Type::Real));
    let ExprKind::Call(call) = &cast_inner(expr).kind else {
        panic!("expected a call under the cast");
    };
    assert_eq!(cast_inner(expr).ty, Some(Type::Integer));
    assert!(call.args.iter().all(|arg| !arg.is_cast() && arg.ty == Some(Type::Integer)));

    let Stmt::Assign(body) = &program.block.declarations.routines[0].block.body.stmts[0] else {
        panic!("expected an assignment in the function body");
    };
    assert_eq!(body.expr.ty, Some(Type::Integer));
}

