use super::*;
use crate::lexer;
use crate::semantics::Diagnostic;

fn parse_source(src: &str) -> (TranslationUnit, Checker) {
    let tokens = lexer::lex(src).expect("should lex");
    parse(&tokens).expect("should parse")
}

fn parse_error(src: &str) -> SyntaxError {
    let tokens = lexer::lex(src).expect("should lex");
    parse(&tokens).expect_err("should fail to parse")
}

#[test]
fn test_minimal_function() {
    let (unit, chk) = parse_source("int main(void) { return 0; }");
    assert_eq!(1, unit.functions.len());
    assert!(chk.reporter.is_empty());

    let main = &unit.functions[0];
    assert_eq!("main", chk.symbols[main.id].name());
    assert!(matches!(main.body.statements[..], [Statement::Return(_)]));
}

#[test]
fn test_empty_parameter_list() {
    let (unit, chk) = parse_source("int main() { return 0; }");
    assert_eq!(1, unit.functions.len());
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let src = "int f(void) { if (1) if (0) return 1; else return 2; return 0; }";
    let (unit, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());

    let Statement::If(outer) = &unit.functions[0].body.statements[0] else {
        panic!("expected an if statement");
    };
    assert!(outer.els.is_none());
    let Statement::If(inner) = &*outer.then else {
        panic!("expected a nested if");
    };
    assert!(inner.els.is_some());
}

#[test]
fn test_cast_vs_parenthesized_expression() {
    // "(x)" is a subexpression; "(int)x" begins a cast, decided by the
    // token after the parenthesis
    let src = "int f(int x) { return (x) + (int)x; }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());

    let src = "double g(double x) { return (double)1 + (x); }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_sizeof_type_and_expression() {
    let src = "int main() { int x; x = sizeof(double) + sizeof x + sizeof(int *); return x; }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_declarators() {
    let src = "int x, *p, a[10];\nchar *argv[5];\ndouble d;\nint f(int a, char *b, ...);\n";
    let (unit, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
    assert!(unit.functions.is_empty());
}

#[test]
fn test_syntax_error_names_offending_lexeme() {
    let err = parse_error("int f(void) { return }");
    assert_eq!(
        SyntaxError::At {
            lexeme: String::from("}"),
            ln: 1
        },
        err
    );
}

#[test]
fn test_syntax_error_at_eof() {
    let err = parse_error("int f(void) {");
    assert_eq!(SyntaxError::AtEof, err);
}

#[test]
fn test_missing_semicolon() {
    let err = parse_error("int x\nint y;");
    assert_eq!(
        SyntaxError::At {
            lexeme: String::from("int"),
            ln: 2
        },
        err
    );
}

#[test]
fn test_local_redeclaration_reported_once() {
    let (_, chk) = parse_source("int f(void) { int a; int a; }");
    assert_eq!(
        &[(1, Diagnostic::Redeclared(String::from("a")))],
        chk.reporter.reports()
    );
}

#[test]
fn test_break_outside_loop_reported_once() {
    let (_, chk) = parse_source("int f() { if (0) break; }");
    assert_eq!(
        &[(1, Diagnostic::BreakOutsideLoop)],
        chk.reporter.reports()
    );
}

#[test]
fn test_break_inside_nested_loop_is_quiet() {
    let src = "int f() { while (1) { for (1; 1; 1) break; break; } return 0; }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_parameters_are_visible_in_the_body() {
    let (_, chk) = parse_source("int add(int a, int b) { return a + b; }");
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_declaration_parameter_scope_is_discarded() {
    let (_, chk) = parse_source("int f(int hidden);\nint g() { return hidden; }");
    assert_eq!(
        &[(2, Diagnostic::Undeclared(String::from("hidden")))],
        chk.reporter.reports()
    );
}

#[test]
fn test_variadic_call() {
    let src = "int printf(char *fmt, ...);\nint main() { printf(\"%d\", 3); return printf(\"done\"); }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_character_literal_becomes_integer() {
    let (unit, chk) = parse_source("int main() { return 'a'; }");
    assert!(chk.reporter.is_empty());
    let Statement::Return(returned) = &unit.functions[0].body.statements[0] else {
        panic!("expected a return");
    };
    assert!(matches!(&returned.kind, ExpKind::Integer(text) if text == "97"));
}

#[test]
fn test_escaped_character_literal() {
    let (unit, _) = parse_source("int main() { return '\\n'; }");
    let Statement::Return(returned) = &unit.functions[0].body.statements[0] else {
        panic!("expected a return");
    };
    assert!(matches!(&returned.kind, ExpKind::Integer(text) if text == "10"));
}

#[test]
fn test_pointer_declarations_and_expressions() {
    let src = "int main() {\n\
               int x;\n\
               int *p;\n\
               p = &x;\n\
               *p = 3;\n\
               p[0] = *p + 1;\n\
               return !p == 0;\n\
               }";
    let (_, chk) = parse_source(src);
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_same_type_global_redeclaration_is_quiet() {
    let (_, chk) = parse_source("int x; int x;");
    assert!(chk.reporter.is_empty());
}

#[test]
fn test_conflicting_global_types_reported() {
    let (_, chk) = parse_source("int a2; char a2;");
    assert_eq!(
        &[(1, Diagnostic::Conflicting(String::from("a2")))],
        chk.reporter.reports()
    );
}
