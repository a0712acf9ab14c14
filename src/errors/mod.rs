//! Error types and error handling for the front end.
//!
//! This module defines the single error value every phase reports. It
//! includes:
//!
//! - An error structure carrying the span of the offending token
//! - Error variants for lexing, parsing and semantic analysis
//! - Short suggestions used by the diagnostic printer

pub mod errors;
