//! Lexical analysis module.
//!
//! Converts Pascal source text into a stream of tokens for parsing. It
//! handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Case-insensitive keywords, case-sensitive identifiers
//! - Integer, real, char and string literals
//! - `{ }`, `(* *)` and `//` comments
//! - Token position tracking for error reporting

pub mod lexer;
pub mod tokens;
