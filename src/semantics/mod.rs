mod declarations;
mod diagnostics;
mod expressions;
mod scope;
mod types;
#[cfg(test)]
mod types_tests;

pub use diagnostics::{Diagnostic, Reporter};
pub use scope::{ScopeId, Symbol, SymbolId, SymbolTable};
pub use types::{Parameters, Specifier, Type};

use std::collections::HashSet;

/// State of the semantic checker, threaded through the parser.  Checking is
/// not a separate pass: the parser hands every operand to a rule on this
/// type, which reports diagnostics, computes the result type and lvalue
/// state, and builds the AST node.
#[derive(Debug, Default)]
pub struct Checker {
    pub symbols: SymbolTable,
    defined: HashSet<String>,
    pub reporter: Reporter,
    /// Nesting depth of while/for bodies, for validating break.
    pub loop_depth: u32,
    /// Declared return type of the function currently being defined,
    /// recorded when its body's opening brace is seen.
    pub return_type: Type,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_scope(&mut self) -> ScopeId {
        self.symbols.open_scope()
    }

    pub fn close_scope(&mut self) -> ScopeId {
        self.symbols.close_scope()
    }

    pub fn discard_scope(&mut self, scope: ScopeId) {
        self.symbols.discard_scope(scope);
    }
}
