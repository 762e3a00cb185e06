use std::fmt;

/// A semantic diagnostic.  Each variant prints with a fixed message
/// template; the checker never invents free-form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Conflicting(String),
    Redefined(String),
    Redeclared(String),
    Undeclared(String),
    InvalidBinaryOperands(&'static str),
    InvalidUnaryOperand(&'static str),
    InvalidCastOperand,
    InvalidSizeofOperand,
    ObjectNotFunction,
    InvalidArguments,
    BreakOutsideLoop,
    InvalidReturnType,
    InvalidTestExpression,
    LvalueRequired,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Conflicting(name) => write!(f, "conflicting types for '{name}'"),
            Self::Redefined(name) => write!(f, "redefinition of '{name}'"),
            Self::Redeclared(name) => write!(f, "redeclaration of '{name}'"),
            Self::Undeclared(name) => write!(f, "'{name}' undeclared"),
            Self::InvalidBinaryOperands(op) => write!(f, "invalid operands to binary {op}"),
            Self::InvalidUnaryOperand(op) => write!(f, "invalid operand to unary {op}"),
            Self::InvalidCastOperand => write!(f, "invalid operand in cast expression"),
            Self::InvalidSizeofOperand => write!(f, "invalid operand in sizeof expression"),
            Self::ObjectNotFunction => write!(f, "called object is not a function"),
            Self::InvalidArguments => write!(f, "invalid arguments to called function"),
            Self::BreakOutsideLoop => write!(f, "break statement not within loop"),
            Self::InvalidReturnType => write!(f, "invalid return type"),
            Self::InvalidTestExpression => write!(f, "invalid type for test expression"),
            Self::LvalueRequired => write!(f, "lvalue required in expression"),
        }
    }
}

/// The diagnostic sink.  Reports are collected in source order together
/// with the line they were issued on; the driver prints them to standard
/// error once parsing finishes.
#[derive(Debug, Default)]
pub struct Reporter {
    reports: Vec<(u64, Diagnostic)>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, ln: u64, diagnostic: Diagnostic) {
        self.reports.push((ln, diagnostic));
    }

    pub fn count(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn reports(&self) -> &[(u64, Diagnostic)] {
        &self.reports
    }
}
