//! Type checking and semantic analysis module.
//!
//! This module performs semantic analysis on a parsed `Program`, in place:
//!
//! - Resolving variable and routine references through a scoped symbol table
//! - Tracking whether variables have been initialized before they are read
//! - Computing the type of every expression and recording it on the node
//! - Checking call arity and argument types
//! - Materialising implicit widenings as explicit cast nodes
//!
//! Checking stops at the first error; scopes opened along the way are closed
//! by their guards as the error propagates.

pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
