use std::{error, fmt};

#[derive(Debug, Eq, PartialEq)]
pub enum InnerLexError {
    UnexpectedChar(char),
    BadConstantSuffix(char),
    BadFloatingPointConstant(String),
    UnterminatedString,
    UnterminatedCharacter,
    UnterminatedComment,
}

#[derive(Debug)]
pub struct LexError {
    inner: InnerLexError,
    ln: u64,
}

impl LexError {
    pub fn get_ln(&self) -> u64 {
        self.ln
    }

    pub fn get_inner(&self) -> &InnerLexError {
        &self.inner
    }
}

impl InnerLexError {
    pub(super) fn set_line(self, ln: u64) -> LexError {
        LexError { inner: self, ln }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.ln, self.inner)
    }
}

impl error::Error for LexError {}

impl fmt::Display for InnerLexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character: {c}"),
            Self::BadConstantSuffix(c) => write!(f, "bad constant suffix: {c}"),
            Self::BadFloatingPointConstant(s) => write!(f, "bad floating point constant {s}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedCharacter => write!(f, "unterminated character literal"),
            Self::UnterminatedComment => write!(f, "unterminated comment"),
        }
    }
}

impl error::Error for InnerLexError {}
