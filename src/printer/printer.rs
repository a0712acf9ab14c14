use crate::ast::{
    ast::{Block, Declarations, Program, RoutineDecl, VarDecl},
    expressions::{Expr, ExprKind, UnaryOp},
    statements::{CompoundStmt, Stmt},
    types::Type,
};

const INDENT: &str = "    ";

pub struct Printer {
    out: String,
    indent: usize,
    /// Render inserted casts as `type(expr)` instead of hiding them.
    show_casts: bool,
}

impl Printer {
    pub fn new(show_casts: bool) -> Self {
        Printer {
            out: String::new(),
            indent: 0,
            show_casts,
        }
    }

    /// Starts a new line at the current indentation.
    fn line(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        if !text.is_empty() {
            self.out.push_str(&INDENT.repeat(self.indent));
            self.out.push_str(text);
        }
    }

    /// Continues the current line.
    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }
}

/// Renders `program` back to Pascal source.
///
/// Binary expressions are fully parenthesised. Variables of a section are
/// grouped by type. Cast nodes are printed as their operand unless
/// `show_casts` is set.
pub fn print_program(program: &Program, show_casts: bool) -> String {
    let mut printer = Printer::new(show_casts);

    if let Some(name) = &program.name {
        printer.line(&format!("program {};", name.value));
    }

    print_block(&mut printer, &program.block);
    printer.write(".\n");

    printer.out
}

fn print_block(printer: &mut Printer, block: &Block) {
    print_decls(printer, &block.declarations);
    print_compound(printer, &block.body);
}

fn print_decls(printer: &mut Printer, declarations: &Declarations) {
    if !declarations.vars.is_empty() {
        printer.line("var");
        printer.indent += 1;
        for (ty, names) in group_by_type(&declarations.vars) {
            printer.line(&format!("{}: {};", names.join(", "), ty.keyword()));
        }
        printer.indent -= 1;
    }

    for routine in declarations.routines.iter() {
        print_routine(printer, routine);
    }
}

/// Groups names by type, in order of each type's first appearance.
fn group_by_type(vars: &[VarDecl]) -> Vec<(Type, Vec<&str>)> {
    let mut groups: Vec<(Type, Vec<&str>)> = vec![];

    for var in vars {
        match groups.iter_mut().find(|(ty, _)| *ty == var.ty) {
            Some((_, names)) => names.push(var.name.value.as_str()),
            None => groups.push((var.ty, vec![var.name.value.as_str()])),
        }
    }

    groups
}

fn print_routine(printer: &mut Printer, routine: &RoutineDecl) {
    let params = format_params(&routine.params);
    let header = if routine.is_procedure() {
        format!("procedure {}{};", routine.name.value, params)
    } else {
        format!(
            "function {}{}: {};",
            routine.name.value,
            params,
            routine.return_type.keyword()
        )
    };

    printer.line("");
    printer.line(&header);
    print_block(printer, &routine.block);
    printer.write(";");
}

/// Only neighbouring parameters of the same type share a group, so the
/// signature keeps its order.
fn format_params(params: &[VarDecl]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut groups: Vec<(Type, Vec<&str>)> = vec![];
    for param in params {
        match groups.last_mut() {
            Some((ty, names)) if *ty == param.ty => names.push(param.name.value.as_str()),
            _ => groups.push((param.ty, vec![param.name.value.as_str()])),
        }
    }

    let groups: Vec<String> = groups
        .iter()
        .map(|(ty, names)| format!("{}: {}", names.join(", "), ty.keyword()))
        .collect();

    format!("({})", groups.join("; "))
}

fn print_compound(printer: &mut Printer, compound: &CompoundStmt) {
    printer.line("begin");
    print_stmt_list(printer, &compound.stmts);
    printer.line("end");
}

fn print_stmt_list(printer: &mut Printer, stmts: &[Stmt]) {
    printer.indent += 1;
    for stmt in stmts {
        print_stmt(printer, stmt);
        printer.write(";");
    }
    printer.indent -= 1;
}

/// Body of `if`, `while` and `for`, one level deeper.
fn print_nested(printer: &mut Printer, stmt: &Stmt) {
    printer.indent += 1;
    print_stmt(printer, stmt);
    printer.indent -= 1;
}

fn print_stmt(printer: &mut Printer, stmt: &Stmt) {
    match stmt {
        Stmt::Compound(compound) => print_compound(printer, compound),
        Stmt::Assign(assign) => {
            let expr = format_expr(printer, &assign.expr);
            printer.line(&format!("{} := {}", assign.name.value, expr));
        }
        Stmt::If(if_stmt) => {
            let condition = format_expr(printer, &if_stmt.condition);
            printer.line(&format!("if {} then", condition));
            print_nested(printer, &if_stmt.then_stmt);

            if let Some(else_stmt) = &if_stmt.else_stmt {
                printer.line("else");
                print_nested(printer, else_stmt);
            }
        }
        Stmt::For(for_stmt) => {
            let start = format_expr(printer, &for_stmt.start);
            let end = format_expr(printer, &for_stmt.end);
            let direction = if for_stmt.ascending { "to" } else { "downto" };
            printer.line(&format!(
                "for {} := {} {} {} do",
                for_stmt.var.value, start, direction, end
            ));
            print_nested(printer, &for_stmt.body);
        }
        Stmt::While(while_stmt) => {
            let condition = format_expr(printer, &while_stmt.condition);
            printer.line(&format!("while {} do", condition));
            print_nested(printer, &while_stmt.body);
        }
        Stmt::Repeat(repeat) => {
            printer.line("repeat");
            print_stmt_list(printer, &repeat.stmts);
            let condition = format_expr(printer, &repeat.condition);
            printer.line(&format!("until {}", condition));
        }
        Stmt::Read(read) => {
            let keyword = if read.new_line { "readln" } else { "read" };
            let names: Vec<&str> = read.vars.iter().map(|var| var.value.as_str()).collect();
            if names.is_empty() {
                printer.line(keyword);
            } else {
                printer.line(&format!("{}({})", keyword, names.join(", ")));
            }
        }
        Stmt::Write(write) => {
            let keyword = if write.new_line { "writeln" } else { "write" };
            if write.exprs.is_empty() {
                printer.line(keyword);
            } else {
                let args = format_arguments(printer, &write.exprs);
                printer.line(&format!("{}({})", keyword, args));
            }
        }
        Stmt::Call(call) => {
            if call.args.is_empty() {
                printer.line(&call.name.value);
            } else {
                let args = format_arguments(printer, &call.args);
                printer.line(&format!("{}({})", call.name.value, args));
            }
        }
    }
}

fn format_arguments(printer: &Printer, args: &[Expr]) -> String {
    args.iter()
        .map(|arg| format_expr(printer, arg))
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn format_expr(printer: &Printer, expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(literal) => literal.value.to_string(),
        ExprKind::Identifier(identifier) => identifier.name.value.clone(),
        ExprKind::Unary(unary) => {
            let operator = match unary.op {
                UnaryOp::Negate => "-",
                UnaryOp::Plus => "+",
                UnaryOp::Not => "not ",
            };
            format!("{}{}", operator, format_expr(printer, &unary.expr))
        }
        ExprKind::Binary(binary) => format!(
            "({} {} {})",
            format_expr(printer, &binary.left),
            binary.operator.value.to_lowercase(),
            format_expr(printer, &binary.right)
        ),
        ExprKind::Call(call) => format!("{}({})", call.name.value, format_arguments(printer, &call.args)),
        ExprKind::Cast(cast) => {
            let inner = format_expr(printer, &cast.expr);
            match expr.ty {
                Some(ty) if printer.show_casts => format!("{}({})", ty.keyword(), inner),
                _ => inner,
            }
        }
    }
}
