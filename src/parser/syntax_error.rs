use std::{error, fmt};

pub type Result<T> = std::result::Result<T, SyntaxError>;

/// A syntactic failure.  The parser does no error recovery: the first
/// failure aborts compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    At { lexeme: String, ln: u64 },
    AtEof,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::At { lexeme, ln } => write!(f, "line {ln}: syntax error at '{lexeme}'"),
            Self::AtEof => write!(f, "syntax error at end of file"),
        }
    }
}

impl error::Error for SyntaxError {}
