//! Pascal source printer.
//!
//! Turns a (possibly type checked) `Program` back into Pascal text. Cast
//! nodes inserted by the type checker are transparent by default.

pub mod printer;
