//! Assembly emission.  The whole assembly tree implements [Display], so
//! writing the program out is a single [print!].  Output is GAS/AT&T
//! syntax; externally visible symbols get the platform's underscore prefix.
//!
//! [Display]: std::fmt::Display
//! [print!]: std::print

use crate::codegen::*;

use std::fmt;

#[cfg(target_os = "macos")]
pub const GLOBAL_PREFIX: &str = "_";
#[cfg(not(target_os = "macos"))]
pub const GLOBAL_PREFIX: &str = "";

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".L{}", self.0)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Eax => write!(f, "%eax"),
            Self::Al => write!(f, "%al"),
            Self::Ecx => write!(f, "%ecx"),
            Self::Edx => write!(f, "%edx"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Imm(text) => write!(f, "${text}"),
            Self::Reg(register) => write!(f, "{register}"),
            Self::Stack(offset) => write!(f, "{offset}(%ebp)"),
            Self::Global(name) => write!(f, "{GLOBAL_PREFIX}{name}"),
            Self::Indirect(register) => write!(f, "({register})"),
            Self::ArgSlot(offset) => write!(f, "{offset}(%esp)"),
            Self::Literal(label) => write!(f, "{label}"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::NE => write!(f, "ne"),
            Self::L => write!(f, "l"),
            Self::G => write!(f, "g"),
            Self::LE => write!(f, "le"),
            Self::GE => write!(f, "ge"),
            Self::B => write!(f, "b"),
            Self::A => write!(f, "a"),
            Self::BE => write!(f, "be"),
            Self::AE => write!(f, "ae"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Mov(src, dst) => write!(f, "movl {src}, {dst}"),
            Self::Movb(src, dst) => write!(f, "movb {src}, {dst}"),
            Self::Movzbl(src, dst) => write!(f, "movzbl {src}, {dst}"),
            Self::Movsbl(src, dst) => write!(f, "movsbl {src}, {dst}"),
            Self::Lea(src, dst) => write!(f, "leal {src}, {dst}"),
            Self::Add(src, dst) => write!(f, "addl {src}, {dst}"),
            Self::Sub(src, dst) => write!(f, "subl {src}, {dst}"),
            Self::Imul(src, dst) => write!(f, "imull {src}, {dst}"),
            Self::Neg(operand) => write!(f, "negl {operand}"),
            Self::Cltd => write!(f, "cltd"),
            Self::Idiv(operand) => write!(f, "idivl {operand}"),
            Self::Cmp(src, dst) => write!(f, "cmpl {src}, {dst}"),
            Self::SetCC(cc, operand) => write!(f, "set{cc} {operand}"),
            Self::Jmp(label) => write!(f, "jmp {label}"),
            Self::JmpCC(cc, label) => write!(f, "j{cc} {label}"),
            Self::LabelDef(label) => write!(f, "{label}:"),
            Self::Call(name) => write!(f, "call {GLOBAL_PREFIX}{name}"),
            Self::Fld(operand) => write!(f, "fldl {operand}"),
            Self::Fstp(operand) => write!(f, "fstpl {operand}"),
            Self::FstpSt0 => write!(f, "fstp %st(0)"),
            Self::Fld1 => write!(f, "fld1"),
            Self::Faddp => write!(f, "faddp"),
            Self::Fsubp => write!(f, "fsubp"),
            Self::Fadd(operand) => write!(f, "faddl {operand}"),
            Self::Fsub(operand) => write!(f, "fsubl {operand}"),
            Self::Fmul(operand) => write!(f, "fmull {operand}"),
            Self::Fdiv(operand) => write!(f, "fdivl {operand}"),
            Self::Fcomp(operand) => write!(f, "fcompl {operand}"),
            Self::Fild(operand) => write!(f, "fildl {operand}"),
            Self::Fisttp(operand) => write!(f, "fisttpl {operand}"),
            Self::Fchs => write!(f, "fchs"),
            Self::Ftst => write!(f, "ftst"),
            Self::Fnstsw => write!(f, "fnstsw %ax"),
            Self::Sahf => write!(f, "sahf"),
        }
    }
}

impl fmt::Display for AsmFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\t.globl {GLOBAL_PREFIX}{}", self.name)?;
        writeln!(f, "{GLOBAL_PREFIX}{}:", self.name)?;
        writeln!(f, "\tpushl %ebp")?;
        writeln!(f, "\tmovl %esp, %ebp")?;
        writeln!(f, "\tsubl ${}.size, %esp", self.name)?;

        for instruction in &self.body {
            match instruction {
                Instruction::LabelDef(label) => writeln!(f, "{label}:")?,
                _ => writeln!(f, "\t{instruction}")?,
            }
        }

        writeln!(f, "{}:", self.return_label)?;
        writeln!(f, "\tmovl %ebp, %esp")?;
        writeln!(f, "\tpopl %ebp")?;
        writeln!(f, "\tret")?;
        writeln!(f, "\t.set {}.size, {}", self.name, self.frame_size)
    }
}

impl fmt::Display for AsmProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for function in &self.functions {
            writeln!(f, "{function}")?;
        }

        for (name, size) in &self.globals {
            writeln!(f, "\t.comm {GLOBAL_PREFIX}{name}, {size}")?;
        }

        writeln!(f, "\t.data")?;
        for (text, label) in &self.strings {
            writeln!(f, "{label}:\t.asciz \"{text}\"")?;
        }
        for (text, label) in &self.doubles {
            writeln!(f, "{label}:\t.double {text}")?;
        }
        Ok(())
    }
}
