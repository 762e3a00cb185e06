/*!
This crate is a single-pass compiler for Simple C, a restricted dialect of C
with `char`, `int` and `double` types, pointers, arrays and functions.  It
reads a source text on standard input and writes GAS-syntax 32-bit x86
assembly on standard output, reporting lexical, syntactic and semantic
diagnostics on standard error.

## Compilation stages
1. **Lexing** - [lex](lexer::lex) scans the source for known token types and
   produces a collection of [LinedToken](lexer::LinedToken) - a token plus
   its 1-based source line.  An unknown character or an unterminated literal
   raises a [LexError](lexer::LexError).
2. **Parsing and checking** - [parse](parser::parse) runs the
   recursive-descent grammar over the tokens.  Parsing and semantic checking
   are a single pass: every expression rule hands its operands to a checking
   rule on [Checker](semantics::Checker), which computes the result type,
   reports any diagnostic, and constructs the corresponding
   [Exp](ast::Exp) node.  A syntactic failure raises a
   [SyntaxError](parser::SyntaxError) and aborts; semantic failures are
   collected by a [Reporter](semantics::Reporter) and poison the offending
   expression with the error type so a single root cause produces a single
   diagnostic.
3. **Code generation** - [codegen](codegen::codegen) walks the checked tree,
   assigns an `%ebp`-relative stack slot to every parameter, local and
   temporary, and produces an [AsmProgram](codegen::AsmProgram).
4. **Emission** - the [emission] module provides [Display] implementations
   for the assembly tree, so the driver can simply [print!] it.

[Display]: std::fmt::Display
[print!]: std::print
*/

#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod ast;
pub mod codegen;
pub mod emission;
pub mod lexer;
pub mod parser;
pub mod semantics;
