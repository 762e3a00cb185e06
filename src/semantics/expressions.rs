//! Expression and statement checking.  One rule per operator: each takes
//! its already-checked operands, reports a diagnostic when the operator is
//! misapplied, and returns the corresponding AST node carrying the result
//! type and lvalue state.  An error-typed operand short-circuits every rule
//! to the error type without a report, so a single root cause produces a
//! single diagnostic.

use super::{Checker, Diagnostic, SymbolId, Type};
use crate::ast::{Assignment, BinaryOp, Exp, UnaryOp};

impl Checker {
    pub fn check_logical(&mut self, op: BinaryOp, left: Exp, right: Exp, ln: u64) -> Exp {
        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if left.etype.promote().is_predicate() && right.etype.promote().is_predicate() {
            Type::INT
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands(op.literal()));
            Type::Error
        };
        Exp::binary(op, left, right, rtype)
    }

    pub fn check_equality(&mut self, op: BinaryOp, left: Exp, right: Exp, ln: u64) -> Exp {
        self.check_comparison(op, left, right, ln)
    }

    pub fn check_relational(&mut self, op: BinaryOp, left: Exp, right: Exp, ln: u64) -> Exp {
        self.check_comparison(op, left, right, ln)
    }

    fn check_comparison(&mut self, op: BinaryOp, left: Exp, right: Exp, ln: u64) -> Exp {
        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if left.etype.promote().is_compatible_with(&right.etype.promote()) {
            Type::INT
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands(op.literal()));
            Type::Error
        };
        Exp::binary(op, left, right, rtype)
    }

    pub fn check_add(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        let lprom = left.etype.promote();
        let rprom = right.etype.promote();
        let mut scale_left = 0;
        let mut scale_right = 0;

        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if lprom.is_numeric() && rprom.is_numeric() {
            if lprom.is_double() || rprom.is_double() {
                Type::DOUBLE
            } else {
                Type::INT
            }
        } else if lprom.is_pointer() && rprom.is_integer() {
            scale_right = lprom.deref().size();
            lprom
        } else if lprom.is_integer() && rprom.is_pointer() {
            scale_left = rprom.deref().size();
            rprom
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands("+"));
            Type::Error
        };

        Exp::add(left, right, scale_left, scale_right, rtype)
    }

    pub fn check_subtract(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        let lprom = left.etype.promote();
        let rprom = right.etype.promote();
        let mut scale_right = 0;
        let mut scale_result = 0;

        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if lprom.is_numeric() && rprom.is_numeric() {
            if lprom.is_double() || rprom.is_double() {
                Type::DOUBLE
            } else {
                Type::INT
            }
        } else if lprom.is_pointer() && rprom.is_integer() {
            scale_right = lprom.deref().size();
            lprom
        } else if lprom.is_pointer() && lprom == rprom {
            scale_result = lprom.deref().size();
            Type::INT
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands("-"));
            Type::Error
        };

        Exp::subtract(left, right, scale_right, scale_result, rtype)
    }

    pub fn check_multiply(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        self.check_multiplicative(BinaryOp::Multiply, left, right, ln)
    }

    pub fn check_divide(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        self.check_multiplicative(BinaryOp::Divide, left, right, ln)
    }

    fn check_multiplicative(&mut self, op: BinaryOp, left: Exp, right: Exp, ln: u64) -> Exp {
        let lprom = left.etype.promote();
        let rprom = right.etype.promote();

        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if lprom.is_numeric() && rprom.is_numeric() {
            if lprom.is_double() || rprom.is_double() {
                Type::DOUBLE
            } else {
                Type::INT
            }
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands(op.literal()));
            Type::Error
        };

        Exp::binary(op, left, right, rtype)
    }

    pub fn check_remainder(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        let rtype = if left.etype.is_error() || right.etype.is_error() {
            Type::Error
        } else if left.etype.promote().is_integer() && right.etype.promote().is_integer() {
            Type::INT
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands("%"));
            Type::Error
        };
        Exp::binary(BinaryOp::Remainder, left, right, rtype)
    }

    pub fn check_not(&mut self, operand: Exp, ln: u64) -> Exp {
        let rtype = if operand.etype.is_error() {
            Type::Error
        } else if operand.etype.is_predicate() {
            Type::INT
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidUnaryOperand("!"));
            Type::Error
        };
        Exp::unary(UnaryOp::Not, operand, rtype)
    }

    pub fn check_negate(&mut self, operand: Exp, ln: u64) -> Exp {
        let rtype = if operand.etype.is_error() {
            Type::Error
        } else if operand.etype.is_numeric() {
            operand.etype.clone()
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidUnaryOperand("-"));
            Type::Error
        };
        Exp::unary(UnaryOp::Negate, operand, rtype)
    }

    pub fn check_dereference(&mut self, operand: Exp, ln: u64) -> Exp {
        let prom = operand.etype.promote();
        let rtype = if operand.etype.is_error() {
            Type::Error
        } else if prom.is_pointer() {
            prom.deref()
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidUnaryOperand("*"));
            Type::Error
        };
        Exp::unary(UnaryOp::Dereference, operand, rtype)
    }

    pub fn check_address(&mut self, operand: Exp, ln: u64) -> Exp {
        let rtype = if operand.etype.is_error() {
            Type::Error
        } else if operand.lvalue {
            match &operand.etype {
                Type::Scalar(specifier, indirection) => Type::Scalar(*specifier, indirection + 1),
                _ => Type::Error,
            }
        } else {
            self.reporter.report(ln, Diagnostic::LvalueRequired);
            Type::Error
        };
        Exp::unary(UnaryOp::Address, operand, rtype)
    }

    /// The size of an expression operand is folded into an integer literal
    /// here; there is no sizeof node.
    pub fn check_sizeof(&mut self, operand: Exp, ln: u64) -> Exp {
        if operand.etype.is_error() {
            let mut exp = Exp::integer(String::from("0"));
            exp.etype = Type::Error;
            return exp;
        }
        if operand.etype.is_function() {
            self.reporter.report(ln, Diagnostic::InvalidSizeofOperand);
            let mut exp = Exp::integer(String::from("0"));
            exp.etype = Type::Error;
            return exp;
        }
        Exp::integer(operand.etype.size().to_string())
    }

    pub fn check_cast(&mut self, result: Type, operand: Exp, ln: u64) -> Exp {
        let rprom = result.promote();
        let oprom = operand.etype.promote();
        let permitted = (rprom.is_numeric() && oprom.is_numeric())
            || (rprom.is_pointer() && oprom.is_pointer())
            || (rprom.is_integer() && oprom.is_pointer())
            || (rprom.is_pointer() && oprom.is_integer());

        let rtype = if result.is_error() || operand.etype.is_error() {
            Type::Error
        } else if permitted {
            result
        } else {
            self.reporter.report(ln, Diagnostic::InvalidCastOperand);
            Type::Error
        };
        Exp::unary(UnaryOp::Cast, operand, rtype)
    }

    /// An index expression is a dereference of a scaled addition, so its
    /// tree is exactly that: `Dereference(Add)`, an lvalue.
    pub fn check_index(&mut self, left: Exp, right: Exp, ln: u64) -> Exp {
        let lprom = left.etype.promote();
        let rprom = right.etype.promote();

        if left.etype.is_error() || right.etype.is_error() {
            let sum = Exp::add(left, right, 0, 0, Type::Error);
            return Exp::unary(UnaryOp::Dereference, sum, Type::Error);
        }

        if lprom.is_pointer() && rprom.is_integer() {
            let element = lprom.deref();
            let sum = Exp::add(left, right, 0, element.size(), lprom);
            Exp::unary(UnaryOp::Dereference, sum, element)
        } else {
            self.reporter
                .report(ln, Diagnostic::InvalidBinaryOperands("[]"));
            let sum = Exp::add(left, right, 0, 0, Type::Error);
            Exp::unary(UnaryOp::Dereference, sum, Type::Error)
        }
    }

    pub fn check_increment(&mut self, operand: Exp, ln: u64) -> Exp {
        let (rtype, scale) = self.check_incdec(&operand, ln);
        Exp::increment(operand, scale, rtype)
    }

    pub fn check_decrement(&mut self, operand: Exp, ln: u64) -> Exp {
        let (rtype, scale) = self.check_incdec(&operand, ln);
        Exp::decrement(operand, scale, rtype)
    }

    fn check_incdec(&mut self, operand: &Exp, ln: u64) -> (Type, u32) {
        if operand.etype.is_error() {
            return (Type::Error, 1);
        }
        if !operand.lvalue {
            self.reporter.report(ln, Diagnostic::LvalueRequired);
            return (Type::Error, 1);
        }
        let scale = if operand.etype.is_pointer() {
            operand.etype.promote().deref().size()
        } else {
            1
        };
        (operand.etype.clone(), scale)
    }

    /// Check a call through the named symbol.  The argument count must
    /// match the fixed prefix exactly, or reach it when the function is
    /// variadic, and every prefix argument must be compatible with its
    /// parameter after promotion.
    pub fn check_call(&mut self, id: SymbolId, args: Vec<Exp>, ln: u64) -> Exp {
        let ctype = self.symbols[id].sym_type().clone();

        if ctype.is_error() {
            return Exp::call(id, args, Type::Error);
        }

        let Type::Function(specifier, indirection, parameters) = ctype else {
            self.reporter.report(ln, Diagnostic::ObjectNotFunction);
            return Exp::call(id, args, Type::Error);
        };

        let fixed = parameters.types.len();
        let count_ok = if parameters.variadic {
            args.len() >= fixed
        } else {
            args.len() == fixed
        };

        let args_ok = count_ok
            && parameters
                .types
                .iter()
                .zip(args.iter())
                .all(|(ptype, arg)| ptype.promote().is_compatible_with(&arg.etype.promote()));

        if !args_ok {
            self.reporter.report(ln, Diagnostic::InvalidArguments);
            return Exp::call(id, args, Type::Error);
        }

        Exp::call(id, args, Type::Scalar(specifier, indirection))
    }

    /// An assignment statement.  The left side must be an lvalue and the
    /// two sides compatible after promotion.
    pub fn check_assignment(&mut self, left: Exp, right: Exp, ln: u64) -> Assignment {
        if !left.etype.is_error() && !right.etype.is_error() {
            if !left.lvalue {
                self.reporter.report(ln, Diagnostic::LvalueRequired);
            } else if !left.etype.promote().is_compatible_with(&right.etype.promote()) {
                self.reporter
                    .report(ln, Diagnostic::InvalidBinaryOperands("="));
            }
        }
        Assignment {
            left,
            right: Some(right),
        }
    }

    /// The controlling expression of while, if and for must be a predicate.
    /// The condition is kept either way; control flow continues.
    pub fn check_test(&mut self, condition: Exp, ln: u64) -> Exp {
        if !condition.etype.is_error() && !condition.etype.is_predicate() {
            self.reporter.report(ln, Diagnostic::InvalidTestExpression);
        }
        condition
    }

    pub fn check_break(&mut self, ln: u64) {
        if self.loop_depth == 0 {
            self.reporter.report(ln, Diagnostic::BreakOutsideLoop);
        }
    }

    /// The returned expression must be compatible with the enclosing
    /// function's declared return type.
    pub fn check_return(&mut self, returned: &Exp, ln: u64) {
        if returned.etype.is_error() || self.return_type.is_error() {
            return;
        }
        let rprom = returned.etype.promote();
        if !rprom.is_compatible_with(&self.return_type.promote()) {
            self.reporter.report(ln, Diagnostic::InvalidReturnType);
        }
    }
}
