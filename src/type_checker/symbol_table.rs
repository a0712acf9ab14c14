//! Lexically scoped symbol table.
//!
//! A stack of scopes, each holding the variables and the routines declared
//! at one lexical level. Names are case-sensitive. A name may appear once
//! per kind in a scope; inner scopes may shadow outer ones.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use log::trace;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Routine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub initialized: bool,
    pub span: Span,
}

/// Signature of a declared function or procedure. The body stays in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineSymbol {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub return_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(VariableSymbol),
    Routine(RoutineSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(variable) => &variable.name,
            Symbol::Routine(routine) => &routine.name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Variable(_) => SymbolKind::Variable,
            Symbol::Routine(_) => SymbolKind::Routine,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Symbol::Variable(variable) => &variable.span,
            Symbol::Routine(routine) => &routine.span,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<String, Symbol>,
    routines: HashMap<String, Symbol>,
}

impl Scope {
    fn table(&self, kind: SymbolKind) -> &HashMap<String, Symbol> {
        match kind {
            SymbolKind::Variable => &self.variables,
            SymbolKind::Routine => &self.routines,
        }
    }

    fn table_mut(&mut self, kind: SymbolKind) -> &mut HashMap<String, Symbol> {
        match kind {
            SymbolKind::Variable => &mut self.variables,
            SymbolKind::Routine => &mut self.routines,
        }
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    /// Creates a table holding only the root scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Number of open scopes, counting the root.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("Entered scope {}", self.scopes.len());
    }

    /// Closes the innermost scope. The root scope is never closed.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            trace!("Leaving scope {}", self.scopes.len());
            self.scopes.pop();
        }
    }

    /// Adds `symbol` to the innermost scope.
    ///
    /// Fails with `DuplicateSymbol` when that scope already holds a symbol
    /// of the same kind and name.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), Error> {
        let kind = symbol.kind();
        let scope = self.innermost_mut();

        if scope.table(kind).contains_key(symbol.name()) {
            return Err(Error::new(
                ErrorImpl::DuplicateSymbol {
                    name: symbol.name().to_string(),
                    is_routine: kind == SymbolKind::Routine,
                },
                symbol.span().clone(),
            ));
        }

        trace!("Declared {:?} `{}`", kind, symbol.name());
        scope.table_mut(kind).insert(symbol.name().to_string(), symbol);
        Ok(())
    }

    /// Finds the nearest symbol of `kind` named `name`, searching outward
    /// from the innermost scope when `recurse` is set.
    pub fn lookup(&self, name: &str, kind: SymbolKind, recurse: bool) -> Option<&Symbol> {
        let depth = if recurse { self.scopes.len() } else { 1 };

        self.scopes
            .iter()
            .rev()
            .take(depth)
            .find_map(|scope| scope.table(kind).get(name))
    }

    pub fn lookup_variable_mut(&mut self, name: &str) -> Option<&mut VariableSymbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| match scope.variables.get_mut(name) {
                Some(Symbol::Variable(variable)) => Some(variable),
                _ => None,
            })
    }

    pub fn lookup_routine(&self, name: &str) -> Option<&RoutineSymbol> {
        match self.lookup(name, SymbolKind::Routine, true) {
            Some(Symbol::Routine(routine)) => Some(routine),
            _ => None,
        }
    }

    /// Any symbol named `name` in the innermost scope, variables first.
    pub fn find_in_current_scope(&self, name: &str) -> Option<&Symbol> {
        self.lookup(name, SymbolKind::Variable, false)
            .or_else(|| self.lookup(name, SymbolKind::Routine, false))
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

/// Anything that owns a symbol table a `ScopeGuard` can open scopes in.
pub trait Scoped {
    fn symbol_table(&mut self) -> &mut SymbolTable;
}

impl Scoped for SymbolTable {
    fn symbol_table(&mut self) -> &mut SymbolTable {
        self
    }
}

/// Opens a scope on creation and closes it when dropped, including when a
/// failure is propagated with `?` while the guard is alive.
pub struct ScopeGuard<'a, T: Scoped> {
    owner: &'a mut T,
}

impl<'a, T: Scoped> ScopeGuard<'a, T> {
    pub fn new(owner: &'a mut T) -> Self {
        owner.symbol_table().enter_scope();
        ScopeGuard { owner }
    }
}

impl<T: Scoped> Deref for ScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.owner
    }
}

impl<T: Scoped> DerefMut for ScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.owner
    }
}

impl<T: Scoped> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.symbol_table().exit_scope();
    }
}
