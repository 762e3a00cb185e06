//! Whole-program tests: source text in, diagnostics and assembly out.

use scc::semantics::Diagnostic;
use scc::{codegen, lexer, parser};

/// Run the full pipeline.  Returns the emitted assembly (when the program
/// is semantically clean) and every diagnostic reported.
fn run(src: &str) -> (Option<String>, Vec<(u64, Diagnostic)>) {
    let tokens = lexer::lex(src).expect("should lex");
    let (unit, mut checker) = parser::parse(&tokens).expect("should parse");
    let reports = checker.reporter.reports().to_vec();

    if reports.is_empty() {
        let program = codegen::codegen(&unit, &mut checker.symbols);
        (Some(program.to_string()), reports)
    } else {
        (None, reports)
    }
}

fn diagnostics(src: &str) -> Vec<Diagnostic> {
    run(src).1.into_iter().map(|(_, d)| d).collect()
}

#[test]
fn same_type_global_redeclaration_is_accepted() {
    assert_eq!(Vec::<Diagnostic>::new(), diagnostics("int x; int x;"));
}

#[test]
fn conflicting_global_types_are_reported_once() {
    assert_eq!(
        vec![Diagnostic::Conflicting(String::from("a2"))],
        diagnostics("int a2; char a2;")
    );
}

#[test]
fn local_redeclaration_is_reported_once() {
    assert_eq!(
        vec![Diagnostic::Redeclared(String::from("a"))],
        diagnostics("int f(void) { int a; int a; }")
    );
}

#[test]
fn minimal_main_compiles_to_a_framed_function() {
    let (asm, reports) = run("int main() { return 0; }");
    assert!(reports.is_empty());
    let asm = asm.expect("should emit assembly");

    assert!(asm.contains("\t.globl main"));
    assert!(asm.contains("main:"));
    assert!(asm.contains("\tpushl %ebp"));
    assert!(asm.contains("\tsubl $main.size, %esp"));
    assert!(asm.contains("\tmovl $0, %eax"));
    assert!(asm.contains("\tjmp .L0"));
    assert!(asm.contains("\t.set main.size, 8"));
}

#[test]
fn pointer_addition_is_scaled() {
    let (asm, reports) = run("int main() { int *p; int i; p = p + i; }");
    assert!(reports.is_empty());
    assert!(asm.expect("should emit assembly").contains("\timull $4, %ecx"));
}

#[test]
fn break_outside_a_loop_is_reported_once() {
    assert_eq!(
        vec![Diagnostic::BreakOutsideLoop],
        diagnostics("int f() { if (0) break; }")
    );
}

#[test]
fn one_diagnostic_per_root_cause() {
    // the undeclared name poisons every enclosing expression, so only the
    // undeclared report appears
    let src = "int main() { int x; x = bogus + 1 * bogus; return bogus; }";
    assert_eq!(
        vec![Diagnostic::Undeclared(String::from("bogus"))],
        diagnostics(src)
    );
}

#[test]
fn diagnostics_carry_source_lines() {
    let src = "int main() {\n int a;\n int a;\n return 0;\n}";
    let (_, reports) = run(src);
    assert_eq!(
        vec![(3, Diagnostic::Redeclared(String::from("a")))],
        reports
    );
}

#[test]
fn invalid_operator_diagnostics_name_the_operator() {
    assert_eq!(
        vec![Diagnostic::InvalidBinaryOperands("%")],
        diagnostics("int main() { double d; return 1 % d; }")
    );
    assert_eq!(
        vec![Diagnostic::InvalidUnaryOperand("*")],
        diagnostics("int main() { int i; return *i; }")
    );
}

#[test]
fn return_type_must_be_compatible() {
    assert_eq!(
        vec![Diagnostic::InvalidReturnType],
        diagnostics("int *f() { return 1.5; }")
    );
}

#[test]
fn a_compound_program_compiles() {
    let src = "\
int puts(char *s, ...);\n\
int fib(int n)\n\
{\n\
    if (n < 2)\n\
        return n;\n\
    return fib(n - 1) + fib(n - 2);\n\
}\n\
\n\
double average(double *values, int count)\n\
{\n\
    int i;\n\
    double sum;\n\
    sum = 0.0;\n\
    for (i = 0; i < count; i++)\n\
        sum = sum + values[i];\n\
    return sum / count;\n\
}\n\
\n\
int main()\n\
{\n\
    double data[3];\n\
    data[0] = 1.5;\n\
    data[1] = 2.5;\n\
    data[2] = 5.0;\n\
    puts(\"ready\");\n\
    while (fib(5) > 100)\n\
        break;\n\
    return (int)average(data, 3) + sizeof(double) - 8;\n\
}\n";
    let (asm, reports) = run(src);
    assert!(reports.is_empty(), "unexpected diagnostics: {reports:?}");
    let asm = asm.expect("should emit assembly");

    assert!(asm.contains("\t.globl fib"));
    assert!(asm.contains("\t.globl average"));
    assert!(asm.contains("\t.globl main"));
    assert!(asm.contains("\tcall fib"));
    assert!(asm.contains("\tcall puts"));
    assert!(asm.contains(".asciz \"ready\""));
    assert!(asm.contains(".double 2.5"));
    assert!(asm.contains("\tfaddl"));
    assert!(asm.contains("\tfisttpl"));
}

#[test]
fn sizeof_folds_to_an_immediate() {
    let (asm, reports) = run("int main() { return sizeof(double); }");
    assert!(reports.is_empty());
    assert!(asm.expect("should emit assembly").contains("\tmovl $8, %eax"));
}

#[test]
fn string_literal_type_counts_the_terminating_nul() {
    // "hi" is char[3]; indexing it yields a char, valid as an int return
    let (_, reports) = run("int main() { return \"hi\"[0]; }");
    assert!(reports.is_empty());
}
