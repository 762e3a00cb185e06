//! Declaration checking.  If a symbol is redeclared, the redeclaration is
//! discarded and the original declaration is retained.

use super::{Checker, Diagnostic, SymbolId, Type};

impl Checker {
    /// Declare a variable in the current scope.  An inner redeclaration is
    /// reported as such; at the outermost scope re-declaring with the same
    /// type is accepted silently and a differing type is a conflict.
    pub fn declare_variable(&mut self, name: &str, dtype: Type, ln: u64) -> SymbolId {
        let current = self.symbols.current();

        if let Some(id) = self.symbols.find(current, name) {
            if current != self.symbols.outermost() {
                self.reporter.report(ln, Diagnostic::Redeclared(name.into()));
            } else if self.symbols[id].sym_type() != &dtype {
                self.reporter
                    .report(ln, Diagnostic::Conflicting(name.into()));
            }
            id
        } else {
            self.symbols.insert(current, name.to_owned(), dtype)
        }
    }

    /// Declare a function, always in the outermost scope.  A redeclaration
    /// with a differing type is a conflict; either way the new parameter
    /// list is dropped and the original symbol kept.
    pub fn declare_function(&mut self, name: &str, ftype: Type, ln: u64) -> SymbolId {
        let outermost = self.symbols.outermost();

        if let Some(id) = self.symbols.find(outermost, name) {
            if self.symbols[id].sym_type() != &ftype {
                self.reporter
                    .report(ln, Diagnostic::Conflicting(name.into()));
            }
            id
        } else {
            self.symbols.insert(outermost, name.to_owned(), ftype)
        }
    }

    /// Define a function.  A second definition is reported and the existing
    /// symbol returned without re-declaring.
    pub fn define_function(&mut self, name: &str, ftype: Type, ln: u64) -> SymbolId {
        if !self.defined.insert(name.to_owned()) {
            self.reporter.report(ln, Diagnostic::Redefined(name.into()));
            return self
                .symbols
                .find(self.symbols.outermost(), name)
                .expect("a defined function is always declared");
        }
        self.declare_function(name, ftype, ln)
    }

    /// Check that a name used in an expression is declared.  An undeclared
    /// name is reported once and inserted with the error type, so that
    /// later uses resolve quietly.
    pub fn check_identifier(&mut self, name: &str, ln: u64) -> SymbolId {
        if let Some(id) = self.symbols.lookup(name) {
            return id;
        }
        self.reporter.report(ln, Diagnostic::Undeclared(name.into()));
        let current = self.symbols.current();
        self.symbols.insert(current, name.to_owned(), Type::Error)
    }
}
