use anyhow::Result;

use std::io::{self, Read};
use std::process::exit;

use scc::{codegen, lexer, parser};

fn usage() -> ! {
    let cmd0 = std::env::args().next().unwrap_or_else(|| "scc".to_owned());
    print!(
        concat!(
            "Usage: {} [OPTIONS] < input.c > output.s\n\n",
            "Reads a Simple C source text on standard input and writes\n",
            "32-bit x86 assembly on standard output.\n\n",
            "Options:\n",
            "  -h, --help             Show this message\n",
        ),
        cmd0
    );
    exit(0)
}

fn main() -> Result<()> {
    if std::env::args().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        usage();
    }

    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    let tokens = lexer::lex(&source)?;
    let (unit, mut checker) = parser::parse(&tokens)?;

    for (ln, diagnostic) in checker.reporter.reports() {
        eprintln!("line {ln}: {diagnostic}");
    }
    if !checker.reporter.is_empty() {
        exit(1);
    }

    let program = codegen::codegen(&unit, &mut checker.symbols);
    print!("{program}");

    Ok(())
}
