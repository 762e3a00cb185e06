use super::{Result, SyntaxError};
use crate::lexer::{LinedToken, Token};

#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [LinedToken],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [LinedToken]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(LinedToken::get_inner)
    }

    pub fn peek_2nd(&self) -> Option<&Token> {
        self.tokens
            .get(self.position + 1)
            .map(LinedToken::get_inner)
    }

    pub fn peek_is(&self, t: &Token) -> bool {
        self.peek() == Some(t)
    }

    pub fn bump(&mut self) {
        self.position += 1;
    }

    pub fn bump_if(&mut self, t: &Token) -> bool {
        let condition = self.peek_is(t);
        if condition {
            self.bump();
        }
        condition
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Line of the token at the head, or of the last token once input is
    /// exhausted.
    pub fn get_line(&self) -> u64 {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(1, LinedToken::get_line)
    }

    /// A syntax error naming the token at the head.
    pub fn error(&self) -> SyntaxError {
        match self.tokens.get(self.position) {
            Some(token) => SyntaxError::At {
                lexeme: token.get_inner().to_string(),
                ln: token.get_line(),
            },
            None => SyntaxError::AtEof,
        }
    }

    /// Match the head against the given token and advance past it.  A
    /// failure is a syntax error; the parser does not recover.
    pub fn expect(&mut self, t: &Token) -> Result<()> {
        if self.bump_if(t) {
            Ok(())
        } else {
            Err(self.error())
        }
    }
}
