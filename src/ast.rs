//! Abstract syntax trees for Simple C.  The tree is built during semantic
//! checking, where type information is readily available: every expression
//! node carries the type and lvalue state the checker computed for it.
//! Storage allocation and code generation live in [codegen](crate::codegen).

use crate::semantics::{ScopeId, Specifier, SymbolId, Type};

/// An expression node.  Integer and real literals keep their lexeme text
/// rather than a parsed value, since the emitter prints them back into
/// assembly immediates verbatim.
#[derive(Debug)]
pub struct Exp {
    pub kind: ExpKind,
    pub etype: Type,
    pub lvalue: bool,
}

#[derive(Debug)]
pub enum ExpKind {
    Integer(String),
    Real(String),
    Str(String),
    Identifier(SymbolId),
    Call(SymbolId, Vec<Exp>),
    Unary(UnaryOp, Box<Exp>),
    /// Postfix increment; the scale is the pointed-to element size when the
    /// operand is a pointer, else one.
    Increment(Box<Exp>, u32),
    Decrement(Box<Exp>, u32),
    Add {
        left: Box<Exp>,
        right: Box<Exp>,
        scale_left: u32,
        scale_right: u32,
    },
    Subtract {
        left: Box<Exp>,
        right: Box<Exp>,
        scale_right: u32,
        scale_result: u32,
    },
    Binary(BinaryOp, Box<Exp>, Box<Exp>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Dereference,
    Address,
    Cast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Multiply,
    Divide,
    Remainder,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// The operator as written in the source, for diagnostics.
    pub fn literal(self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        }
    }

}

impl Exp {
    /// An integer literal is always an int.  Character literals also come
    /// here, converted to their character code.
    pub fn integer(text: String) -> Self {
        Self {
            kind: ExpKind::Integer(text),
            etype: Type::INT,
            lvalue: false,
        }
    }

    /// A real literal is always a double.
    pub fn real(text: String) -> Self {
        Self {
            kind: ExpKind::Real(text),
            etype: Type::DOUBLE,
            lvalue: false,
        }
    }

    /// A string literal is a character array; the length accounts for the
    /// terminating NUL.
    pub fn string(text: String) -> Self {
        let length = text.len() as u32 + 1;
        Self {
            kind: ExpKind::Str(text),
            etype: Type::Array(Specifier::Char, 0, length),
            lvalue: false,
        }
    }

    /// An identifier is an lvalue exactly when its type is scalar.
    pub fn identifier(id: SymbolId, sym_type: Type) -> Self {
        let lvalue = sym_type.is_scalar();
        Self {
            kind: ExpKind::Identifier(id),
            etype: sym_type,
            lvalue,
        }
    }

    pub fn call(id: SymbolId, args: Vec<Exp>, rtype: Type) -> Self {
        Self {
            kind: ExpKind::Call(id, args),
            etype: rtype,
            lvalue: false,
        }
    }

    /// A unary operator node.  A dereference is always an lvalue; no other
    /// unary result is.
    pub fn unary(op: UnaryOp, inner: Exp, rtype: Type) -> Self {
        let lvalue = op == UnaryOp::Dereference;
        Self {
            kind: ExpKind::Unary(op, Box::new(inner)),
            etype: rtype,
            lvalue,
        }
    }

    pub fn increment(inner: Exp, scale: u32, rtype: Type) -> Self {
        Self {
            kind: ExpKind::Increment(Box::new(inner), scale),
            etype: rtype,
            lvalue: false,
        }
    }

    pub fn decrement(inner: Exp, scale: u32, rtype: Type) -> Self {
        Self {
            kind: ExpKind::Decrement(Box::new(inner), scale),
            etype: rtype,
            lvalue: false,
        }
    }

    pub fn add(left: Exp, right: Exp, scale_left: u32, scale_right: u32, rtype: Type) -> Self {
        Self {
            kind: ExpKind::Add {
                left: Box::new(left),
                right: Box::new(right),
                scale_left,
                scale_right,
            },
            etype: rtype,
            lvalue: false,
        }
    }

    pub fn subtract(
        left: Exp,
        right: Exp,
        scale_right: u32,
        scale_result: u32,
        rtype: Type,
    ) -> Self {
        Self {
            kind: ExpKind::Subtract {
                left: Box::new(left),
                right: Box::new(right),
                scale_right,
                scale_result,
            },
            etype: rtype,
            lvalue: false,
        }
    }

    pub fn binary(op: BinaryOp, left: Exp, right: Exp, rtype: Type) -> Self {
        Self {
            kind: ExpKind::Binary(op, Box::new(left), Box::new(right)),
            etype: rtype,
            lvalue: false,
        }
    }

    /// The operand of this node if it is a dereference.  Assignment and
    /// address-of generate through the pointer in that case.
    pub fn is_dereference(&self) -> Option<&Exp> {
        match &self.kind {
            ExpKind::Unary(UnaryOp::Dereference, inner) => Some(inner),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Statement {
    Block(Block),
    Assignment(Assignment),
    Break,
    Return(Exp),
    While(While),
    For(For),
    If(If),
}

/// A compound statement owns the scope its declarations were entered into.
#[derive(Debug)]
pub struct Block {
    pub scope: ScopeId,
    pub statements: Vec<Statement>,
}

/// An assignment statement, or a bare expression when there is no
/// right-hand side.
#[derive(Debug)]
pub struct Assignment {
    pub left: Exp,
    pub right: Option<Exp>,
}

#[derive(Debug)]
pub struct While {
    pub condition: Exp,
    pub body: Box<Statement>,
}

#[derive(Debug)]
pub struct For {
    pub init: Assignment,
    pub condition: Exp,
    pub step: Assignment,
    pub body: Box<Statement>,
}

#[derive(Debug)]
pub struct If {
    pub condition: Exp,
    pub then: Box<Statement>,
    pub els: Option<Box<Statement>>,
}

/// A function definition: its symbol and its body.  The body block's scope
/// is the parameter scope, which also holds the top-level locals.
#[derive(Debug)]
pub struct Function {
    pub id: SymbolId,
    pub body: Block,
}

#[derive(Debug)]
pub struct TranslationUnit {
    pub globals: ScopeId,
    pub functions: Vec<Function>,
}
