//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with Pascal's
//! four precedence levels and handles:
//!
//! - Program headers, `var` sections, functions and procedures
//! - Statement parsing (assignment, calls, control flow, read/write)
//! - Expression parsing (binary and unary operators, calls, literals)
//! - Type names in declarations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
