use super::types::Type;
use std::ops::{Index, IndexMut};

/// Handle to a [Symbol] in the table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolId(usize);

/// Handle to a scope in the table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// A declared name.  The offset is assigned by the code generator: bytes
/// relative to `%ebp`, with zero meaning a global.
#[derive(Debug)]
pub struct Symbol {
    name: String,
    sym_type: Type,
    pub offset: i32,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sym_type(&self) -> &Type {
        &self.sym_type
    }
}

#[derive(Debug)]
struct ScopeData {
    enclosing: Option<ScopeId>,
    symbols: Vec<SymbolId>,
}

/// Scopes and symbols for one compilation unit, held in arenas and referred
/// to by index.  Scopes form a chain toward the outermost through their
/// enclosing index; symbols are owned by the table and never reparented.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<ScopeData>,
    current: Option<ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a fresh scope with the current scope as its enclosing one.  The
    /// first scope ever opened becomes the outermost.
    pub fn open_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeData {
            enclosing: self.current,
            symbols: Vec::new(),
        });
        self.current = Some(id);
        id
    }

    /// Pop the current scope, making its enclosing scope current again, and
    /// return the popped scope so the caller may attach it to a block.
    pub fn close_scope(&mut self) -> ScopeId {
        let closed = self.current.expect("no scope is open");
        self.current = self.scopes[closed.0].enclosing;
        closed
    }

    /// Drop the symbols of a closed scope.  Used for the parameter scope of
    /// a function declaration, whose parameter types have already been
    /// cloned into the declaration's type.
    pub fn discard_scope(&mut self, scope: ScopeId) {
        self.scopes[scope.0].symbols.clear();
    }

    pub fn current(&self) -> ScopeId {
        self.current.expect("no scope is open")
    }

    pub fn outermost(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn insert(&mut self, scope: ScopeId, name: String, sym_type: Type) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol {
            name,
            sym_type,
            offset: 0,
        });
        self.scopes[scope.0].symbols.push(id);
        id
    }

    /// Search a single scope, ignoring enclosing ones.
    pub fn find(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0]
            .symbols
            .iter()
            .copied()
            .find(|id| self[*id].name == name)
    }

    /// Search the current scope and every enclosing scope, nearest first.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.lookup_from(self.current(), name)
    }

    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut next = Some(scope);
        while let Some(scope) = next {
            if let Some(id) = self.find(scope, name) {
                return Some(id);
            }
            next = self.scopes[scope.0].enclosing;
        }
        None
    }

    /// The symbols of a scope in insertion order.  For a function scope the
    /// parameters come first, in parameter order.
    pub fn scope_symbols(&self, scope: ScopeId) -> &[SymbolId] {
        &self.scopes[scope.0].symbols
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;
    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }
}

impl IndexMut<SymbolId> for SymbolTable {
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }
}
