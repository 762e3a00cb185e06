use super::*;

fn kinds(input: &str) -> Vec<Token> {
    lex(input)
        .expect("should lex")
        .into_iter()
        .map(Token::from)
        .collect()
}

#[test]
fn test_basic() {
    let input = "int main(void) { return 0; }";
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("main")),
        Token::OpenParen,
        Token::Void,
        Token::CloseParen,
        Token::OpenBrace,
        Token::Return,
        Token::Integer(String::from("0")),
        Token::Semicolon,
        Token::CloseBrace,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_operators() {
    let input = "== != <= >= && || ++ -- ... = ! - * & + / % < >";
    let expected = vec![
        Token::Equal,
        Token::NotEqual,
        Token::LessEqual,
        Token::GreaterEqual,
        Token::LogicalAnd,
        Token::LogicalOr,
        Token::Increment,
        Token::Decrement,
        Token::Ellipsis,
        Token::Assign,
        Token::Not,
        Token::Minus,
        Token::Star,
        Token::Ampersand,
        Token::Plus,
        Token::Slash,
        Token::Percent,
        Token::Less,
        Token::Greater,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_literals_keep_lexeme_text() {
    let input = "x = 017; y = 3.14; z = 2e9; s = \"hi\\n\"; c = 'a';";
    let lexed = kinds(input);
    assert!(lexed.contains(&Token::Integer(String::from("017"))));
    assert!(lexed.contains(&Token::Real(String::from("3.14"))));
    assert!(lexed.contains(&Token::Real(String::from("2e9"))));
    assert!(lexed.contains(&Token::Str(String::from("hi\\n"))));
    assert!(lexed.contains(&Token::Character(String::from("a"))));
}

#[test]
fn test_comments_skipped() {
    let input = "int /* a\nmultiline\ncomment */ x; // trailing\nint y;";
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("x")),
        Token::Semicolon,
        Token::Int,
        Token::Identifier(String::from("y")),
        Token::Semicolon,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_line_numbers() {
    let input = "int x;\n\nint y;";
    let lexed = lex(input).expect("should lex");
    assert_eq!(1, lexed[0].get_line());
    assert_eq!(3, lexed[3].get_line());
}

#[test]
fn test_bad_atsign() {
    let input = "int main(void) {\nreturn 0 @ 1;\n}";
    let err = lex(input).expect_err("should fail");
    assert_eq!(&InnerLexError::UnexpectedChar('@'), err.get_inner());
    assert_eq!(2, err.get_ln());
}

#[test]
fn test_bad_constant() {
    let input = "int main(void) { return 1foo; }";
    let err = lex(input).expect_err("should fail");
    assert_eq!(&InnerLexError::BadConstantSuffix('f'), err.get_inner());
}

#[test]
fn test_unterminated_string() {
    let input = "char *s; s = \"oops;";
    let err = lex(input).expect_err("should fail");
    assert_eq!(&InnerLexError::UnterminatedString, err.get_inner());
}

#[test]
fn test_unterminated_comment() {
    let input = "int x; /* no end";
    let err = lex(input).expect_err("should fail");
    assert_eq!(&InnerLexError::UnterminatedComment, err.get_inner());
}
