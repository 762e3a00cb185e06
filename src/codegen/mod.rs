//! Code generation.  [codegen] walks the checked tree and produces an
//! [AsmProgram] - an assembly-level tree of functions, instructions, global
//! definitions and literal pools, ready to be written out by the
//! [emission](crate::emission) module's [Display](std::fmt::Display)
//! implementations.
//!
//! Storage layout runs as part of generation: parameters get positive
//! `%ebp`-relative offsets, locals negative ones, and every non-leaf
//! expression is given a fresh negative slot for its value at the point its
//! code is emitted.

mod frame;
mod gen;

use crate::ast::TranslationUnit;
use crate::semantics::SymbolTable;

pub fn codegen(unit: &TranslationUnit, symbols: &mut SymbolTable) -> AsmProgram {
    gen::Generator::new(symbols).generate(unit)
}

pub type AsmInstructions = Vec<Instruction>;

/// A local assembly label, printed as `.L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(pub(crate) u64);

#[derive(Debug)]
pub struct AsmProgram {
    pub functions: Vec<AsmFunction>,
    /// Global variable definitions, emitted as `.comm name, size`.
    pub globals: Vec<(String, u32)>,
    /// Deduplicated literal pools, keyed by lexeme text.
    pub strings: Vec<(String, Label)>,
    pub doubles: Vec<(String, Label)>,
}

#[derive(Debug)]
pub struct AsmFunction {
    pub name: String,
    pub body: AsmInstructions,
    pub frame_size: i32,
    /// Shared epilogue label every return jumps to.
    pub return_label: Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Eax,
    Al,
    Ecx,
    Edx,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// An immediate, kept as text: `$value`.
    Imm(String),
    Reg(Register),
    /// A stack slot: `offset(%ebp)`.
    Stack(i32),
    /// A global symbol, printed with the platform prefix.
    Global(String),
    /// Memory through a register: `(%reg)`.
    Indirect(Register),
    /// An outgoing call argument: `offset(%esp)`.
    ArgSlot(u32),
    /// A pooled string or double literal: `.L<n>`.
    Literal(Label),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    E,
    NE,
    L,
    G,
    LE,
    GE,
    B,
    A,
    BE,
    AE,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Mov(Operand, Operand),
    Movb(Operand, Operand),
    Movzbl(Operand, Operand),
    Movsbl(Operand, Operand),
    Lea(Operand, Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Imul(Operand, Operand),
    Neg(Operand),
    Cltd,
    Idiv(Operand),
    Cmp(Operand, Operand),
    SetCC(Condition, Operand),
    Jmp(Label),
    JmpCC(Condition, Label),
    LabelDef(Label),
    Call(String),
    Fld(Operand),
    Fstp(Operand),
    FstpSt0,
    Fld1,
    Faddp,
    Fsubp,
    Fadd(Operand),
    Fsub(Operand),
    Fmul(Operand),
    Fdiv(Operand),
    Fcomp(Operand),
    Fild(Operand),
    Fisttp(Operand),
    Fchs,
    Ftst,
    Fnstsw,
    Sahf,
}
