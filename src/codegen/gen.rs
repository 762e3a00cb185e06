//! The tree walk.  Each expression node emits code for its children, takes
//! a fresh stack slot for its own value, and emits an operator sequence
//! that reads the children's operands and writes its own.  Identifiers and
//! integer, string and double literals have no slot; they are printed
//! directly as operands.
//!
//! Integer arithmetic runs through `%eax`/`%ecx`/`%edx`; double arithmetic
//! runs through the x87 stack.  Pointer arithmetic is scaled here using the
//! scale fields the checker attached to add, subtract, increment and
//! decrement nodes.

use super::frame;
use super::{
    AsmFunction, AsmInstructions, AsmProgram, Condition, Instruction, Label, Operand, Register,
};
use crate::ast::*;
use crate::semantics::{SymbolId, SymbolTable, Type};

use std::mem;

use Instruction as I;
use Operand::{ArgSlot, Imm, Indirect, Literal, Reg, Stack};
use Register::{Al, Eax, Ecx, Edx};

/// Whether an expression's value lives in an eight-byte x87 slot.
fn fp(e: &Exp) -> bool {
    e.etype.is_double()
}

/// Whether an expression's value is a single byte.
fn byte(e: &Exp) -> bool {
    e.etype.size() == 1
}

pub struct Generator<'a> {
    symbols: &'a mut SymbolTable,
    instructions: AsmInstructions,
    /// Running offset of locals and temporaries in the current function.
    offset: i32,
    /// Largest argument area any call in the current function needs.
    max_args: u32,
    labels: u64,
    return_label: Label,
    /// Exit labels of the enclosing loops, innermost last.  Pushed on loop
    /// entry and popped on loop exit; break jumps to the top.
    breaks: Vec<Label>,
    strings: Vec<(String, Label)>,
    doubles: Vec<(String, Label)>,
}

impl<'a> Generator<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self {
            symbols,
            instructions: AsmInstructions::new(),
            offset: 0,
            max_args: 0,
            labels: 0,
            return_label: Label(0),
            breaks: Vec::new(),
            strings: Vec::new(),
            doubles: Vec::new(),
        }
    }

    pub fn generate(mut self, unit: &TranslationUnit) -> AsmProgram {
        let mut functions = Vec::new();
        for function in &unit.functions {
            functions.push(self.gen_function(function));
        }

        let globals = self
            .symbols
            .scope_symbols(unit.globals)
            .iter()
            .map(|id| &self.symbols[*id])
            .filter(|sym| !sym.sym_type().is_function())
            .map(|sym| (sym.name().to_owned(), sym.sym_type().size()))
            .collect();

        AsmProgram {
            functions,
            globals,
            strings: self.strings,
            doubles: self.doubles,
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn fresh_label(&mut self) -> Label {
        let label = Label(self.labels);
        self.labels += 1;
        label
    }

    /// A fresh stack slot for the value of this node.
    fn temp(&mut self, e: &Exp) -> Operand {
        self.offset -= e.etype.size() as i32;
        Stack(self.offset)
    }

    fn string_label(&mut self, text: &str) -> Label {
        if let Some((_, label)) = self.strings.iter().find(|(t, _)| t == text) {
            return *label;
        }
        let label = self.fresh_label();
        self.strings.push((text.to_owned(), label));
        label
    }

    fn double_label(&mut self, text: &str) -> Label {
        if let Some((_, label)) = self.doubles.iter().find(|(t, _)| t == text) {
            return *label;
        }
        let label = self.fresh_label();
        self.doubles.push((text.to_owned(), label));
        label
    }

    fn gen_function(&mut self, function: &Function) -> AsmFunction {
        let name = self.symbols[function.id].name().to_owned();
        let parameter_count = match self.symbols[function.id].sym_type() {
            Type::Function(_, _, parameters) => parameters.types.len(),
            _ => 0,
        };

        self.offset = 0;
        self.max_args = 0;
        self.return_label = self.fresh_label();

        frame::allocate_parameters(self.symbols, function.body.scope, parameter_count);
        self.gen_block(&function.body, parameter_count);

        let mut offset = self.offset - self.max_args as i32;
        offset -= frame::align(offset - frame::SIZEOF_REG * 2);

        AsmFunction {
            name,
            body: mem::take(&mut self.instructions),
            frame_size: -offset,
            return_label: self.return_label,
        }
    }

    fn gen_block(&mut self, block: &Block, parameter_count: usize) {
        frame::allocate_locals(self.symbols, block.scope, parameter_count, &mut self.offset);
        for statement in &block.statements {
            self.gen_statement(statement);
        }
    }

    fn gen_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.gen_block(block, 0),
            Statement::Assignment(assignment) => self.gen_assignment(assignment),
            Statement::Break => {
                let exit = *self.breaks.last().expect("break is always inside a loop");
                self.emit(I::Jmp(exit));
            }
            Statement::Return(returned) => {
                let operand = self.gen_exp(returned);
                if fp(returned) {
                    self.emit(I::Fld(operand));
                } else {
                    self.emit(I::Mov(operand, Reg(Eax)));
                }
                let return_label = self.return_label;
                self.emit(I::Jmp(return_label));
            }
            Statement::While(while_st) => {
                let head = self.fresh_label();
                let exit = self.fresh_label();
                self.breaks.push(exit);

                self.emit(I::LabelDef(head));
                self.test(&while_st.condition, exit, false);
                self.gen_statement(&while_st.body);
                self.emit(I::Jmp(head));
                self.emit(I::LabelDef(exit));

                self.breaks.pop();
            }
            Statement::For(for_st) => {
                let head = self.fresh_label();
                let exit = self.fresh_label();
                self.breaks.push(exit);

                self.gen_assignment(&for_st.init);
                self.emit(I::LabelDef(head));
                self.test(&for_st.condition, exit, false);
                self.gen_statement(&for_st.body);
                self.gen_assignment(&for_st.step);
                self.emit(I::Jmp(head));
                self.emit(I::LabelDef(exit));

                self.breaks.pop();
            }
            Statement::If(if_st) => {
                let skip = self.fresh_label();
                self.test(&if_st.condition, skip, false);
                self.gen_statement(&if_st.then);

                if let Some(els) = &if_st.els {
                    let exit = self.fresh_label();
                    self.emit(I::Jmp(exit));
                    self.emit(I::LabelDef(skip));
                    self.gen_statement(els);
                    self.emit(I::LabelDef(exit));
                } else {
                    self.emit(I::LabelDef(skip));
                }
            }
        }
    }

    /// Evaluate a condition and jump to `target` when it is true or false.
    fn test(&mut self, condition: &Exp, target: Label, jump_if_true: bool) {
        let operand = self.gen_exp(condition);
        self.test_zero(operand, fp(condition));
        let cc = if jump_if_true { Condition::NE } else { Condition::E };
        self.emit(I::JmpCC(cc, target));
    }

    /// Compare an operand against zero, leaving the result in the flags.
    fn test_zero(&mut self, operand: Operand, floating: bool) {
        if floating {
            self.emit(I::Fld(operand));
            self.emit(I::Ftst);
            self.emit(I::Fnstsw);
            self.emit(I::FstpSt0);
            self.emit(I::Sahf);
        } else {
            self.emit(I::Mov(operand, Reg(Eax)));
            self.emit(I::Cmp(Imm(String::from("0")), Reg(Eax)));
        }
    }

    /// Load an integer-class operand into `%eax`, sign-extending bytes.
    fn load_word(&mut self, operand: Operand, is_byte: bool) {
        if is_byte {
            self.emit(I::Movsbl(operand, Reg(Eax)));
        } else {
            self.emit(I::Mov(operand, Reg(Eax)));
        }
    }

    /// An assignment statement, or a bare expression evaluated for its
    /// effects.  When the left side is a dereference, the target pointer is
    /// loaded into a register and the store goes through it.
    fn gen_assignment(&mut self, assignment: &Assignment) {
        let left = &assignment.left;
        let Some(right) = &assignment.right else {
            self.gen_exp(left);
            return;
        };

        let right_op = self.gen_exp(right);

        if let Some(pointer) = left.is_dereference() {
            let pointer_op = self.gen_exp(pointer);
            if fp(left) {
                self.emit(I::Fld(right_op));
                self.emit(I::Mov(pointer_op, Reg(Eax)));
                self.emit(I::Fstp(Indirect(Eax)));
            } else {
                self.load_word(right_op, byte(right));
                self.emit(I::Mov(pointer_op, Reg(Ecx)));
                if byte(left) {
                    self.emit(I::Movb(Reg(Al), Indirect(Ecx)));
                } else {
                    self.emit(I::Mov(Reg(Eax), Indirect(Ecx)));
                }
            }
        } else {
            let left_op = self.gen_exp(left);
            if fp(left) {
                self.emit(I::Fld(right_op));
                self.emit(I::Fstp(left_op));
            } else {
                self.load_word(right_op, byte(right));
                if byte(left) {
                    self.emit(I::Movb(Reg(Al), left_op));
                } else {
                    self.emit(I::Mov(Reg(Eax), left_op));
                }
            }
        }
    }

    fn symbol_operand(&self, id: SymbolId) -> Operand {
        let symbol = &self.symbols[id];
        if symbol.offset == 0 {
            Operand::Global(symbol.name().to_owned())
        } else {
            Stack(symbol.offset)
        }
    }

    fn gen_exp(&mut self, e: &Exp) -> Operand {
        match &e.kind {
            ExpKind::Integer(text) => Imm(text.clone()),
            ExpKind::Real(text) => Literal(self.double_label(text)),
            ExpKind::Str(text) => Literal(self.string_label(text)),
            ExpKind::Identifier(id) => self.symbol_operand(*id),
            ExpKind::Call(id, args) => self.gen_call(e, *id, args),
            ExpKind::Unary(UnaryOp::Not, inner) => self.gen_not(e, inner),
            ExpKind::Unary(UnaryOp::Negate, inner) => self.gen_negate(e, inner),
            ExpKind::Unary(UnaryOp::Dereference, inner) => self.gen_dereference(e, inner),
            ExpKind::Unary(UnaryOp::Address, inner) => self.gen_address(e, inner),
            ExpKind::Unary(UnaryOp::Cast, inner) => self.gen_cast(e, inner),
            ExpKind::Increment(inner, scale) => self.gen_incdec(e, inner, *scale, true),
            ExpKind::Decrement(inner, scale) => self.gen_incdec(e, inner, *scale, false),
            ExpKind::Add {
                left,
                right,
                scale_left,
                scale_right,
            } => self.gen_add(e, left, right, *scale_left, *scale_right),
            ExpKind::Subtract {
                left,
                right,
                scale_right,
                scale_result,
            } => self.gen_subtract(e, left, right, *scale_right, *scale_result),
            ExpKind::Binary(op, left, right) => match op {
                BinaryOp::Multiply => self.gen_multiply(e, left, right),
                BinaryOp::Divide => self.gen_divide(e, left, right, Eax),
                BinaryOp::Remainder => self.gen_divide(e, left, right, Edx),
                BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                    self.gen_logical(e, *op, left, right)
                }
                _ => self.gen_comparison(e, *op, left, right),
            },
        }
    }

    /// Arguments are evaluated first, then moved onto the argument area at
    /// the bottom of the frame; the widest such area any call needs is
    /// reserved in the frame size.
    fn gen_call(&mut self, e: &Exp, id: SymbolId, args: &[Exp]) -> Operand {
        let arg_ops: Vec<Operand> = args.iter().map(|arg| self.gen_exp(arg)).collect();

        let mut offset = 0;
        for (arg, operand) in args.iter().zip(arg_ops) {
            if fp(arg) {
                self.emit(I::Fld(operand));
                self.emit(I::Fstp(ArgSlot(offset)));
            } else {
                self.load_word(operand, byte(arg));
                self.emit(I::Mov(Reg(Eax), ArgSlot(offset)));
            }
            offset += arg.etype.size();
            while offset % 4 != 0 {
                offset += 1;
            }
        }
        if offset > self.max_args {
            self.max_args = offset;
        }

        let name = self.symbols[id].name().to_owned();
        self.emit(I::Call(name));

        let result = self.temp(e);
        if fp(e) {
            self.emit(I::Fstp(result.clone()));
        } else if byte(e) {
            self.emit(I::Movb(Reg(Al), result.clone()));
        } else {
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    fn gen_not(&mut self, e: &Exp, inner: &Exp) -> Operand {
        let operand = self.gen_exp(inner);
        let result = self.temp(e);

        self.test_zero(operand, fp(inner));
        self.emit(I::SetCC(Condition::E, Reg(Al)));
        self.emit(I::Movzbl(Reg(Al), Reg(Eax)));
        self.emit(I::Mov(Reg(Eax), result.clone()));
        result
    }

    fn gen_negate(&mut self, e: &Exp, inner: &Exp) -> Operand {
        let operand = self.gen_exp(inner);
        let result = self.temp(e);

        if fp(e) {
            self.emit(I::Fld(operand));
            self.emit(I::Fchs);
            self.emit(I::Fstp(result.clone()));
        } else {
            self.emit(I::Mov(operand, Reg(Eax)));
            self.emit(I::Neg(Reg(Eax)));
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    fn gen_dereference(&mut self, e: &Exp, inner: &Exp) -> Operand {
        let operand = self.gen_exp(inner);
        let result = self.temp(e);

        self.emit(I::Mov(operand, Reg(Eax)));
        if fp(e) {
            self.emit(I::Fld(Indirect(Eax)));
            self.emit(I::Fstp(result.clone()));
        } else if byte(e) {
            self.emit(I::Movsbl(Indirect(Eax), Reg(Eax)));
            self.emit(I::Movb(Reg(Al), result.clone()));
        } else {
            self.emit(I::Mov(Indirect(Eax), Reg(Eax)));
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    /// The address of a dereference is just the pointer being dereferenced;
    /// anything else is an lvalue with a slot or a global, so `leal` works.
    fn gen_address(&mut self, e: &Exp, inner: &Exp) -> Operand {
        if let Some(pointer) = inner.is_dereference() {
            let operand = self.gen_exp(pointer);
            self.emit(I::Mov(operand, Reg(Eax)));
        } else {
            let operand = self.gen_exp(inner);
            self.emit(I::Lea(operand, Reg(Eax)));
        }

        let result = self.temp(e);
        self.emit(I::Mov(Reg(Eax), result.clone()));
        result
    }

    fn gen_cast(&mut self, e: &Exp, inner: &Exp) -> Operand {
        let operand = self.gen_exp(inner);
        let result = self.temp(e);

        if fp(e) {
            if fp(inner) {
                self.emit(I::Fld(operand));
            } else {
                self.emit(I::Fild(operand));
            }
            self.emit(I::Fstp(result.clone()));
        } else if byte(e) {
            if fp(inner) {
                // narrowing goes through an intermediate int slot
                self.offset -= 4;
                let intermediate = Stack(self.offset);
                self.emit(I::Fld(operand));
                self.emit(I::Fisttp(intermediate.clone()));
                self.emit(I::Mov(intermediate, Reg(Eax)));
            } else {
                self.load_word(operand, byte(inner));
            }
            self.emit(I::Movb(Reg(Al), result.clone()));
        } else {
            if fp(inner) {
                self.emit(I::Fld(operand));
                self.emit(I::Fisttp(result.clone()));
                return result;
            }
            self.load_word(operand, byte(inner));
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    fn gen_incdec(&mut self, e: &Exp, inner: &Exp, scale: u32, increment: bool) -> Operand {
        let result = self.temp(e);

        if let Some(pointer) = inner.is_dereference() {
            let pointer_op = self.gen_exp(pointer);
            self.emit(I::Mov(pointer_op, Reg(Ecx)));

            if fp(e) {
                if increment {
                    self.emit(I::Fld(Indirect(Ecx)));
                    self.emit(I::Fld1);
                    self.emit(I::Faddp);
                } else {
                    self.emit(I::Fld1);
                    self.emit(I::Fld(Indirect(Ecx)));
                    self.emit(I::Fsubp);
                }
                self.emit(I::Fstp(result.clone()));
                self.emit(I::Fld(result.clone()));
                self.emit(I::Fstp(Indirect(Ecx)));
            } else if byte(e) {
                self.emit(I::Movsbl(Indirect(Ecx), Reg(Eax)));
                self.scaled_incdec(scale, increment);
                self.emit(I::Movb(Reg(Al), result.clone()));
                self.emit(I::Movb(Reg(Al), Indirect(Ecx)));
            } else {
                self.emit(I::Mov(Indirect(Ecx), Reg(Eax)));
                self.scaled_incdec(scale, increment);
                self.emit(I::Mov(Reg(Eax), result.clone()));
                self.emit(I::Mov(Reg(Eax), Indirect(Ecx)));
            }
            return result;
        }

        let operand = self.gen_exp(inner);
        if fp(e) {
            if increment {
                self.emit(I::Fld(operand.clone()));
                self.emit(I::Fld1);
                self.emit(I::Faddp);
            } else {
                self.emit(I::Fld1);
                self.emit(I::Fld(operand.clone()));
                self.emit(I::Fsubp);
            }
            self.emit(I::Fstp(result.clone()));
            self.emit(I::Fld(result.clone()));
            self.emit(I::Fstp(operand));
        } else if byte(e) {
            self.emit(I::Movsbl(operand.clone(), Reg(Eax)));
            self.scaled_incdec(scale, increment);
            self.emit(I::Movb(Reg(Al), result.clone()));
            self.emit(I::Movb(Reg(Al), operand));
        } else {
            self.emit(I::Mov(operand.clone(), Reg(Eax)));
            self.scaled_incdec(scale, increment);
            self.emit(I::Mov(Reg(Eax), result.clone()));
            self.emit(I::Mov(Reg(Eax), operand));
        }
        result
    }

    fn scaled_incdec(&mut self, scale: u32, increment: bool) {
        let amount = Imm(scale.to_string());
        if increment {
            self.emit(I::Add(amount, Reg(Eax)));
        } else {
            self.emit(I::Sub(amount, Reg(Eax)));
        }
    }

    fn gen_add(
        &mut self,
        e: &Exp,
        left: &Exp,
        right: &Exp,
        scale_left: u32,
        scale_right: u32,
    ) -> Operand {
        let left_op = self.gen_exp(left);
        let right_op = self.gen_exp(right);
        let result = self.temp(e);

        if fp(e) {
            self.emit(I::Fld(left_op));
            self.emit(I::Fadd(right_op));
            self.emit(I::Fstp(result.clone()));
        } else {
            self.emit(I::Mov(left_op, Reg(Eax)));
            if scale_left > 0 {
                self.emit(I::Imul(Imm(scale_left.to_string()), Reg(Eax)));
            }
            self.emit(I::Mov(right_op, Reg(Ecx)));
            if scale_right > 0 {
                self.emit(I::Imul(Imm(scale_right.to_string()), Reg(Ecx)));
            }
            self.emit(I::Add(Reg(Ecx), Reg(Eax)));
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    fn gen_subtract(
        &mut self,
        e: &Exp,
        left: &Exp,
        right: &Exp,
        scale_right: u32,
        scale_result: u32,
    ) -> Operand {
        let left_op = self.gen_exp(left);
        let right_op = self.gen_exp(right);
        let result = self.temp(e);

        if fp(e) {
            self.emit(I::Fld(left_op));
            self.emit(I::Fsub(right_op));
            self.emit(I::Fstp(result.clone()));
        } else {
            self.emit(I::Mov(left_op, Reg(Eax)));
            if scale_result > 0 {
                // pointer difference, divided down by the element size
                self.emit(I::Sub(right_op, Reg(Eax)));
                self.emit(I::Cltd);
                self.emit(I::Mov(Imm(scale_result.to_string()), Reg(Ecx)));
                self.emit(I::Idiv(Reg(Ecx)));
            } else if scale_right > 0 {
                self.emit(I::Mov(right_op, Reg(Ecx)));
                self.emit(I::Imul(Imm(scale_right.to_string()), Reg(Ecx)));
                self.emit(I::Sub(Reg(Ecx), Reg(Eax)));
            } else {
                self.emit(I::Sub(right_op, Reg(Eax)));
            }
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    fn gen_multiply(&mut self, e: &Exp, left: &Exp, right: &Exp) -> Operand {
        let left_op = self.gen_exp(left);
        let right_op = self.gen_exp(right);
        let result = self.temp(e);

        if fp(e) {
            self.emit(I::Fld(left_op));
            self.emit(I::Fmul(right_op));
            self.emit(I::Fstp(result.clone()));
        } else {
            self.emit(I::Mov(left_op, Reg(Eax)));
            self.emit(I::Imul(right_op, Reg(Eax)));
            self.emit(I::Mov(Reg(Eax), result.clone()));
        }
        result
    }

    /// Division and remainder share the `cltd; idivl` sequence; the result
    /// register picks between quotient and remainder.
    fn gen_divide(&mut self, e: &Exp, left: &Exp, right: &Exp, take: Register) -> Operand {
        let left_op = self.gen_exp(left);
        let right_op = self.gen_exp(right);
        let result = self.temp(e);

        if fp(e) {
            self.emit(I::Fld(left_op));
            self.emit(I::Fdiv(right_op));
            self.emit(I::Fstp(result.clone()));
        } else {
            self.emit(I::Mov(left_op, Reg(Eax)));
            self.emit(I::Cltd);
            self.emit(I::Mov(right_op, Reg(Ecx)));
            self.emit(I::Idiv(Reg(Ecx)));
            self.emit(I::Mov(Reg(take), result.clone()));
        }
        result
    }

    fn gen_comparison(&mut self, e: &Exp, op: BinaryOp, left: &Exp, right: &Exp) -> Operand {
        let left_op = self.gen_exp(left);
        let right_op = self.gen_exp(right);
        let result = self.temp(e);

        let cc = if fp(left) {
            self.emit(I::Fld(left_op));
            self.emit(I::Fcomp(right_op));
            self.emit(I::Fnstsw);
            self.emit(I::Sahf);
            match op {
                BinaryOp::LessThan => Condition::B,
                BinaryOp::GreaterThan => Condition::A,
                BinaryOp::LessOrEqual => Condition::BE,
                BinaryOp::GreaterOrEqual => Condition::AE,
                BinaryOp::NotEqual => Condition::NE,
                _ => Condition::E,
            }
        } else {
            self.emit(I::Mov(left_op, Reg(Eax)));
            self.emit(I::Cmp(right_op, Reg(Eax)));
            match op {
                BinaryOp::LessThan => Condition::L,
                BinaryOp::GreaterThan => Condition::G,
                BinaryOp::LessOrEqual => Condition::LE,
                BinaryOp::GreaterOrEqual => Condition::GE,
                BinaryOp::NotEqual => Condition::NE,
                _ => Condition::E,
            }
        };

        self.emit(I::SetCC(cc, Reg(Al)));
        self.emit(I::Movzbl(Reg(Al), Reg(Eax)));
        self.emit(I::Mov(Reg(Eax), result.clone()));
        result
    }

    /// Short-circuit logical operators: the right side is not evaluated
    /// when the left decides the result.  Each occurrence gets fresh
    /// labels.
    fn gen_logical(&mut self, e: &Exp, op: BinaryOp, left: &Exp, right: &Exp) -> Operand {
        let decided = self.fresh_label();
        let done = self.fresh_label();

        let (cc, decided_value, fallthrough_value) = if op == BinaryOp::LogicalOr {
            (Condition::NE, "1", "0")
        } else {
            (Condition::E, "0", "1")
        };

        let left_op = self.gen_exp(left);
        self.test_zero(left_op, fp(left));
        self.emit(I::JmpCC(cc, decided));

        let right_op = self.gen_exp(right);
        self.test_zero(right_op, fp(right));
        self.emit(I::JmpCC(cc, decided));

        self.emit(I::Mov(Imm(fallthrough_value.into()), Reg(Eax)));
        self.emit(I::Jmp(done));
        self.emit(I::LabelDef(decided));
        self.emit(I::Mov(Imm(decided_value.into()), Reg(Eax)));
        self.emit(I::LabelDef(done));

        let result = self.temp(e);
        self.emit(I::Mov(Reg(Eax), result.clone()));
        result
    }
}
