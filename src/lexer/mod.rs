mod cursor;
mod lexer_error;
#[cfg(test)]
mod lexer_tests;
mod token;

use cursor::Cursor;
pub use lexer_error::{InnerLexError, LexError};
pub use token::{LinedToken, Token};

pub type Tokens = Vec<LinedToken>;

fn lex_mcharop2(first: char, second: char) -> Option<Token> {
    match (first, second) {
        ('=', '=') => Some(Token::Equal),
        ('!', '=') => Some(Token::NotEqual),
        ('<', '=') => Some(Token::LessEqual),
        ('>', '=') => Some(Token::GreaterEqual),
        ('&', '&') => Some(Token::LogicalAnd),
        ('|', '|') => Some(Token::LogicalOr),
        ('+', '+') => Some(Token::Increment),
        ('-', '-') => Some(Token::Decrement),
        _ => None,
    }
}

fn lex_operator(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    let first = cursor.take().expect("Is always Some");

    if let Some(second) = cursor.peek() {
        if let Some(op) = lex_mcharop2(first, second) {
            cursor.take();
            return Ok(op);
        }
    }

    Token::try_from(first)
}

fn lex_ellipsis(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    cursor.take();
    if cursor.bump_if('.') && cursor.bump_if('.') {
        Ok(Token::Ellipsis)
    } else {
        Err(InnerLexError::UnexpectedChar('.'))
    }
}

fn check_const_bad_suffix(cursor: &mut Cursor) -> Result<(), InnerLexError> {
    let is_bad = |c: &char| c.is_alphabetic() || *c == '_';
    if let Some(bad_suffix) = cursor.peek().filter(is_bad) {
        return Err(InnerLexError::BadConstantSuffix(bad_suffix));
    }
    Ok(())
}

fn lex_number(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    let start = cursor.as_str();
    let mut count = 0;

    while cursor.skip_if(|c| c.is_ascii_digit()) {
        count += 1;
    }

    let mut is_real = false;
    if cursor.bump_if('.') {
        is_real = true;
        count += 1;
        while cursor.skip_if(|c| c.is_ascii_digit()) {
            count += 1;
        }
    }

    if cursor.skip_if(|c| matches!(c, 'e' | 'E')) {
        is_real = true;
        count += 1;
        if cursor.skip_if(|c| matches!(c, '+' | '-')) {
            count += 1;
        }
        let mut exponent_digits = 0;
        while cursor.skip_if(|c| c.is_ascii_digit()) {
            count += 1;
            exponent_digits += 1;
        }
        if exponent_digits == 0 {
            return Err(InnerLexError::BadFloatingPointConstant(
                start[..count].to_owned(),
            ));
        }
    }

    check_const_bad_suffix(cursor)?;

    let text = start[..count].to_owned();
    if is_real {
        Ok(Token::Real(text))
    } else {
        Ok(Token::Integer(text))
    }
}

fn lex_identifier(cursor: &mut Cursor) -> Token {
    let start = cursor.as_str();
    let mut len = 0;

    let predicate = |c: char| c.is_ascii_alphanumeric() || c == '_';
    while cursor.skip_if(predicate) {
        len += 1;
    }

    Token::from(&start[..len])
}

fn lex_string(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    cursor.take();
    let mut text = String::new();

    loop {
        match cursor.take() {
            None | Some('\n') => return Err(InnerLexError::UnterminatedString),
            Some('"') => return Ok(Token::Str(text)),
            Some('\\') => {
                let escaped = cursor.take().ok_or(InnerLexError::UnterminatedString)?;
                text.push('\\');
                text.push(escaped);
            }
            Some(c) => text.push(c),
        }
    }
}

fn lex_character(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    cursor.take();
    let mut text = String::new();

    match cursor.take() {
        None | Some('\n' | '\'') => return Err(InnerLexError::UnterminatedCharacter),
        Some('\\') => {
            let escaped = cursor.take().ok_or(InnerLexError::UnterminatedCharacter)?;
            text.push('\\');
            text.push(escaped);
        }
        Some(c) => text.push(c),
    }

    if cursor.bump_if('\'') {
        Ok(Token::Character(text))
    } else {
        Err(InnerLexError::UnterminatedCharacter)
    }
}

/// Skip whitespace along with `/* ... */` and `// ...` comments.
fn skip_blanks(cursor: &mut Cursor) -> Result<(), InnerLexError> {
    loop {
        cursor.skip_whitespaces();
        match (cursor.peek(), cursor.peek_2nd()) {
            (Some('/'), Some('*')) => {
                cursor.take();
                cursor.take();
                loop {
                    match (cursor.peek(), cursor.peek_2nd()) {
                        (Some('*'), Some('/')) => {
                            cursor.take();
                            cursor.take();
                            break;
                        }
                        (None, _) => return Err(InnerLexError::UnterminatedComment),
                        _ => {
                            cursor.take();
                        }
                    }
                }
            }
            (Some('/'), Some('/')) => {
                while cursor.skip_if(|c| c != '\n') {}
            }
            _ => return Ok(()),
        }
    }
}

pub fn lex(input: &str) -> Result<Tokens, LexError> {
    let mut tokens = Tokens::new();
    let mut cursor = Cursor::new(input);

    loop {
        let ln = cursor.get_ln();
        skip_blanks(&mut cursor).map_err(|err| err.set_line(ln))?;

        let Some(peek) = cursor.peek() else {
            break;
        };
        let ln = cursor.get_ln();
        let token = match peek {
            '{' | '}' | '(' | ')' | '[' | ']' | ';' | ',' => {
                cursor.take();
                Token::try_from(peek)
            }
            '=' | '!' | '-' | '*' | '&' | '+' | '/' | '%' | '<' | '>' | '|' => {
                lex_operator(&mut cursor)
            }
            '.' => lex_ellipsis(&mut cursor),
            '"' => lex_string(&mut cursor),
            '\'' => lex_character(&mut cursor),
            '_' | 'a'..='z' | 'A'..='Z' => Ok(lex_identifier(&mut cursor)),
            '0'..='9' => lex_number(&mut cursor),
            _ => Err(InnerLexError::UnexpectedChar(peek)),
        }
        .map_err(|err| err.set_line(ln))?;
        tokens.push(LinedToken::new(token, ln));
    }

    Ok(tokens)
}
