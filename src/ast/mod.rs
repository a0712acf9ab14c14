/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, block and declaration nodes
/// - expressions: Expression nodes and operator categories
/// - statements: Statement nodes
/// - types: The scalar types and literal values
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
