//! The recursive-descent parser for Simple C.  Parsing drives semantic
//! checking: each expression rule parses its operands and immediately hands
//! them to the matching rule on [Checker], receiving back the checked AST
//! node.  Scopes are opened on parameter lists and compound statements.
//!
//! Two grammar ambiguities are resolved by policy.  A `(` beginning a
//! prefix expression starts a cast (or a sizeof-type) exactly when the
//! token after it is a type specifier, decided with one extra token of
//! lookahead.  The dangling `else` binds to the nearest unmatched `if`
//! because `else` is always consumed eagerly.

mod cursor;
#[cfg(test)]
mod parser_tests;
mod syntax_error;

use crate::ast::*;
use crate::lexer::{LinedToken, Token};
use crate::semantics::{Checker, Parameters, Specifier, Type};
use cursor::Cursor;
pub use syntax_error::{Result, SyntaxError};

pub fn parse(tokens: &[LinedToken]) -> Result<(TranslationUnit, Checker)> {
    let mut cursor = Cursor::new(tokens);
    let mut chk = Checker::new();

    chk.open_scope();
    let mut functions = Vec::new();
    while !cursor.at_end() {
        if let Some(function) = top_level_declaration(&mut cursor, &mut chk)? {
            functions.push(function);
        }
    }
    let globals = chk.close_scope();

    Ok((TranslationUnit { globals, functions }, chk))
}

fn specifier(cursor: &mut Cursor) -> Result<Specifier> {
    let specifier = match cursor.peek() {
        Some(Token::Char) => Specifier::Char,
        Some(Token::Int) => Specifier::Int,
        Some(Token::Double) => Specifier::Double,
        _ => return Err(cursor.error()),
    };
    cursor.bump();
    Ok(specifier)
}

/// Zero or more asterisks.
fn pointers(cursor: &mut Cursor) -> Result<u32> {
    let mut count = 0;
    while cursor.bump_if(&Token::Star) {
        count += 1;
    }
    Ok(count)
}

fn identifier(cursor: &mut Cursor) -> Result<String> {
    if let Some(Token::Identifier(name)) = cursor.peek() {
        let name = name.clone();
        cursor.bump();
        Ok(name)
    } else {
        Err(cursor.error())
    }
}

fn integer_constant(cursor: &mut Cursor) -> Result<u32> {
    if let Some(Token::Integer(text)) = cursor.peek() {
        let value = text.parse().unwrap_or(0);
        cursor.bump();
        Ok(value)
    } else {
        Err(cursor.error())
    }
}

/// The value of a character literal lexeme, as decimal text for an integer
/// literal node.
fn character_code(text: &str) -> String {
    let mut chars = text.chars();
    let value = match (chars.next(), chars.next()) {
        (Some('\\'), Some(escaped)) => match escaped {
            'n' => 10,
            't' => 9,
            'r' => 13,
            '0' => 0,
            'a' => 7,
            'b' => 8,
            'f' => 12,
            'v' => 11,
            other => other as u32,
        },
        (Some(c), _) => c as u32,
        (None, _) => 0,
    };
    value.to_string()
}

/// A parameter is always a scalar with optional pointer declarators.
fn parameter(cursor: &mut Cursor, chk: &mut Checker) -> Result<Type> {
    let specifier = specifier(cursor)?;
    let indirection = pointers(cursor)?;
    let ln = cursor.get_line();
    let name = identifier(cursor)?;

    let ptype = Type::Scalar(specifier, indirection);
    chk.declare_variable(&name, ptype.clone(), ln);
    Ok(ptype)
}

/// Parse a parameter list, without the parentheses.  Opens the parameter
/// scope; the caller decides whether it becomes a function body's scope or
/// is discarded after a pure declaration.
fn parameters(cursor: &mut Cursor, chk: &mut Checker) -> Result<Parameters> {
    chk.open_scope();
    let mut params = Parameters::default();

    if cursor.bump_if(&Token::Void) || cursor.peek_is(&Token::CloseParen) {
        return Ok(params);
    }

    params.types.push(parameter(cursor, chk)?);
    while cursor.bump_if(&Token::Comma) {
        if cursor.bump_if(&Token::Ellipsis) {
            params.variadic = true;
            break;
        }
        params.types.push(parameter(cursor, chk)?);
    }

    Ok(params)
}

/// A local declarator: a scalar variable or an array.
fn declarator(cursor: &mut Cursor, chk: &mut Checker, specifier: Specifier) -> Result<()> {
    let indirection = pointers(cursor)?;
    let ln = cursor.get_line();
    let name = identifier(cursor)?;

    if cursor.bump_if(&Token::OpenBracket) {
        let length = integer_constant(cursor)?;
        cursor.expect(&Token::CloseBracket)?;
        chk.declare_variable(&name, Type::Array(specifier, indirection, length), ln);
    } else {
        chk.declare_variable(&name, Type::Scalar(specifier, indirection), ln);
    }
    Ok(())
}

fn declaration(cursor: &mut Cursor, chk: &mut Checker) -> Result<()> {
    let specifier = specifier(cursor)?;
    declarator(cursor, chk, specifier)?;
    while cursor.bump_if(&Token::Comma) {
        declarator(cursor, chk, specifier)?;
    }
    cursor.expect(&Token::Semicolon)
}

fn declarations(cursor: &mut Cursor, chk: &mut Checker) -> Result<()> {
    while cursor.peek().is_some_and(Token::is_specifier) {
        declaration(cursor, chk)?;
    }
    Ok(())
}

fn statements(cursor: &mut Cursor, chk: &mut Checker) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    while !cursor.peek_is(&Token::CloseBrace) {
        statements.push(statement(cursor, chk)?);
    }
    Ok(statements)
}

/// An assignment, or a bare expression when no `=` follows.
fn assignment(cursor: &mut Cursor, chk: &mut Checker) -> Result<Assignment> {
    let left = expression(cursor, chk)?;
    if cursor.bump_if(&Token::Assign) {
        let right = expression(cursor, chk)?;
        let ln = cursor.get_line();
        Ok(chk.check_assignment(left, right, ln))
    } else {
        Ok(Assignment { left, right: None })
    }
}

fn block(cursor: &mut Cursor, chk: &mut Checker) -> Result<Block> {
    cursor.expect(&Token::OpenBrace)?;
    chk.open_scope();
    declarations(cursor, chk)?;
    let statements = statements(cursor, chk)?;
    let scope = chk.close_scope();
    cursor.expect(&Token::CloseBrace)?;
    Ok(Block { scope, statements })
}

fn while_statement(cursor: &mut Cursor, chk: &mut Checker) -> Result<Statement> {
    cursor.expect(&Token::While)?;
    cursor.expect(&Token::OpenParen)?;
    let condition = expression(cursor, chk)?;
    let condition = chk.check_test(condition, cursor.get_line());
    cursor.expect(&Token::CloseParen)?;

    chk.loop_depth += 1;
    let body = statement(cursor, chk).map(Box::new)?;
    chk.loop_depth -= 1;

    Ok(Statement::While(While { condition, body }))
}

fn for_statement(cursor: &mut Cursor, chk: &mut Checker) -> Result<Statement> {
    cursor.expect(&Token::For)?;
    cursor.expect(&Token::OpenParen)?;
    let init = assignment(cursor, chk)?;
    cursor.expect(&Token::Semicolon)?;
    let condition = expression(cursor, chk)?;
    let condition = chk.check_test(condition, cursor.get_line());
    cursor.expect(&Token::Semicolon)?;
    let step = assignment(cursor, chk)?;
    cursor.expect(&Token::CloseParen)?;

    chk.loop_depth += 1;
    let body = statement(cursor, chk).map(Box::new)?;
    chk.loop_depth -= 1;

    Ok(Statement::For(For {
        init,
        condition,
        step,
        body,
    }))
}

fn if_statement(cursor: &mut Cursor, chk: &mut Checker) -> Result<Statement> {
    cursor.expect(&Token::If)?;
    cursor.expect(&Token::OpenParen)?;
    let condition = expression(cursor, chk)?;
    let condition = chk.check_test(condition, cursor.get_line());
    cursor.expect(&Token::CloseParen)?;

    let then = statement(cursor, chk).map(Box::new)?;
    let els = if cursor.bump_if(&Token::Else) {
        Some(statement(cursor, chk).map(Box::new)?)
    } else {
        None
    };

    Ok(Statement::If(If {
        condition,
        then,
        els,
    }))
}

fn statement(cursor: &mut Cursor, chk: &mut Checker) -> Result<Statement> {
    match cursor.peek() {
        Some(Token::OpenBrace) => block(cursor, chk).map(Statement::Block),
        Some(Token::Break) => {
            chk.check_break(cursor.get_line());
            cursor.bump();
            cursor.expect(&Token::Semicolon)?;
            Ok(Statement::Break)
        }
        Some(Token::Return) => {
            cursor.bump();
            let returned = expression(cursor, chk)?;
            chk.check_return(&returned, cursor.get_line());
            cursor.expect(&Token::Semicolon)?;
            Ok(Statement::Return(returned))
        }
        Some(Token::While) => while_statement(cursor, chk),
        Some(Token::For) => for_statement(cursor, chk),
        Some(Token::If) => if_statement(cursor, chk),
        _ => {
            let assignment = assignment(cursor, chk)?;
            cursor.expect(&Token::Semicolon)?;
            Ok(Statement::Assignment(assignment))
        }
    }
}

fn expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = logical_and_expression(cursor, chk)?;
    while cursor.bump_if(&Token::LogicalOr) {
        let right = logical_and_expression(cursor, chk)?;
        let ln = cursor.get_line();
        left = chk.check_logical(BinaryOp::LogicalOr, left, right, ln);
    }
    Ok(left)
}

fn logical_and_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = equality_expression(cursor, chk)?;
    while cursor.bump_if(&Token::LogicalAnd) {
        let right = equality_expression(cursor, chk)?;
        let ln = cursor.get_line();
        left = chk.check_logical(BinaryOp::LogicalAnd, left, right, ln);
    }
    Ok(left)
}

fn equality_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = relational_expression(cursor, chk)?;
    loop {
        let op = match cursor.peek() {
            Some(Token::Equal) => BinaryOp::Equal,
            Some(Token::NotEqual) => BinaryOp::NotEqual,
            _ => break,
        };
        cursor.bump();
        let right = relational_expression(cursor, chk)?;
        let ln = cursor.get_line();
        left = chk.check_equality(op, left, right, ln);
    }
    Ok(left)
}

fn relational_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = additive_expression(cursor, chk)?;
    loop {
        let op = match cursor.peek() {
            Some(Token::Less) => BinaryOp::LessThan,
            Some(Token::Greater) => BinaryOp::GreaterThan,
            Some(Token::LessEqual) => BinaryOp::LessOrEqual,
            Some(Token::GreaterEqual) => BinaryOp::GreaterOrEqual,
            _ => break,
        };
        cursor.bump();
        let right = additive_expression(cursor, chk)?;
        let ln = cursor.get_line();
        left = chk.check_relational(op, left, right, ln);
    }
    Ok(left)
}

fn additive_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = multiplicative_expression(cursor, chk)?;
    loop {
        if cursor.bump_if(&Token::Plus) {
            let right = multiplicative_expression(cursor, chk)?;
            let ln = cursor.get_line();
            left = chk.check_add(left, right, ln);
        } else if cursor.bump_if(&Token::Minus) {
            let right = multiplicative_expression(cursor, chk)?;
            let ln = cursor.get_line();
            left = chk.check_subtract(left, right, ln);
        } else {
            break;
        }
    }
    Ok(left)
}

fn multiplicative_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = prefix_expression(cursor, chk)?;
    loop {
        if cursor.bump_if(&Token::Star) {
            let right = prefix_expression(cursor, chk)?;
            let ln = cursor.get_line();
            left = chk.check_multiply(left, right, ln);
        } else if cursor.bump_if(&Token::Slash) {
            let right = prefix_expression(cursor, chk)?;
            let ln = cursor.get_line();
            left = chk.check_divide(left, right, ln);
        } else if cursor.bump_if(&Token::Percent) {
            let right = prefix_expression(cursor, chk)?;
            let ln = cursor.get_line();
            left = chk.check_remainder(left, right, ln);
        } else {
            break;
        }
    }
    Ok(left)
}

/// `sizeof (type) * n` is still ambiguous: it could be a multiplication or
/// a cast of a dereference.  The former makes sense, so the `(type)` is
/// always consumed as part of the sizeof expression.
fn prefix_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    match cursor.peek() {
        Some(Token::Not) => {
            cursor.bump();
            let operand = prefix_expression(cursor, chk)?;
            Ok(chk.check_not(operand, cursor.get_line()))
        }
        Some(Token::Minus) => {
            cursor.bump();
            let operand = prefix_expression(cursor, chk)?;
            Ok(chk.check_negate(operand, cursor.get_line()))
        }
        Some(Token::Star) => {
            cursor.bump();
            let operand = prefix_expression(cursor, chk)?;
            Ok(chk.check_dereference(operand, cursor.get_line()))
        }
        Some(Token::Ampersand) => {
            cursor.bump();
            let operand = prefix_expression(cursor, chk)?;
            Ok(chk.check_address(operand, cursor.get_line()))
        }
        Some(Token::Sizeof) => {
            cursor.bump();
            if cursor.peek_is(&Token::OpenParen) && cursor.peek_2nd().is_some_and(Token::is_specifier)
            {
                cursor.bump();
                let specifier = specifier(cursor)?;
                let indirection = pointers(cursor)?;
                cursor.expect(&Token::CloseParen)?;
                let size = Type::Scalar(specifier, indirection).size();
                Ok(Exp::integer(size.to_string()))
            } else {
                let operand = prefix_expression(cursor, chk)?;
                Ok(chk.check_sizeof(operand, cursor.get_line()))
            }
        }
        Some(Token::OpenParen) if cursor.peek_2nd().is_some_and(Token::is_specifier) => {
            cursor.bump();
            let specifier = specifier(cursor)?;
            let indirection = pointers(cursor)?;
            cursor.expect(&Token::CloseParen)?;
            let operand = prefix_expression(cursor, chk)?;
            Ok(chk.check_cast(Type::Scalar(specifier, indirection), operand, cursor.get_line()))
        }
        _ => postfix_expression(cursor, chk),
    }
}

fn postfix_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    let mut left = primary_expression(cursor, chk)?;
    loop {
        if cursor.bump_if(&Token::OpenBracket) {
            let index = expression(cursor, chk)?;
            cursor.expect(&Token::CloseBracket)?;
            left = chk.check_index(left, index, cursor.get_line());
        } else if cursor.bump_if(&Token::Increment) {
            left = chk.check_increment(left, cursor.get_line());
        } else if cursor.bump_if(&Token::Decrement) {
            left = chk.check_decrement(left, cursor.get_line());
        } else {
            break;
        }
    }
    Ok(left)
}

fn call_arguments(cursor: &mut Cursor, chk: &mut Checker) -> Result<Vec<Exp>> {
    let mut args = Vec::new();
    if !cursor.peek_is(&Token::CloseParen) {
        args.push(expression(cursor, chk)?);
        while cursor.bump_if(&Token::Comma) {
            args.push(expression(cursor, chk)?);
        }
    }
    cursor.expect(&Token::CloseParen)?;
    Ok(args)
}

fn primary_expression(cursor: &mut Cursor, chk: &mut Checker) -> Result<Exp> {
    match cursor.peek() {
        Some(Token::OpenParen) => {
            cursor.bump();
            let exp = expression(cursor, chk)?;
            cursor.expect(&Token::CloseParen)?;
            Ok(exp)
        }
        Some(Token::Character(text)) => {
            let code = character_code(text);
            cursor.bump();
            Ok(Exp::integer(code))
        }
        Some(Token::Str(text)) => {
            let text = text.clone();
            cursor.bump();
            Ok(Exp::string(text))
        }
        Some(Token::Integer(text)) => {
            let text = text.clone();
            cursor.bump();
            Ok(Exp::integer(text))
        }
        Some(Token::Real(text)) => {
            let text = text.clone();
            cursor.bump();
            Ok(Exp::real(text))
        }
        Some(Token::Identifier(_)) => {
            let ln = cursor.get_line();
            let name = identifier(cursor)?;
            let id = chk.check_identifier(&name, ln);
            if cursor.bump_if(&Token::OpenParen) {
                let args = call_arguments(cursor, chk)?;
                Ok(chk.check_call(id, args, cursor.get_line()))
            } else {
                let sym_type = chk.symbols[id].sym_type().clone();
                Ok(Exp::identifier(id, sym_type))
            }
        }
        _ => Err(cursor.error()),
    }
}

/// A global declarator: a scalar, an array, or a function declaration.  A
/// pure function declaration's parameter scope is discarded once the
/// parameter types have been cloned into the declaration's type.
fn global_declarator(cursor: &mut Cursor, chk: &mut Checker, specifier: Specifier) -> Result<()> {
    let indirection = pointers(cursor)?;
    let ln = cursor.get_line();
    let name = identifier(cursor)?;

    if cursor.bump_if(&Token::OpenBracket) {
        let length = integer_constant(cursor)?;
        cursor.expect(&Token::CloseBracket)?;
        chk.declare_variable(&name, Type::Array(specifier, indirection, length), ln);
    } else if cursor.bump_if(&Token::OpenParen) {
        let params = parameters(cursor, chk)?;
        cursor.expect(&Token::CloseParen)?;
        let scope = chk.close_scope();
        chk.discard_scope(scope);
        chk.declare_function(&name, Type::Function(specifier, indirection, params), ln);
    } else {
        chk.declare_variable(&name, Type::Scalar(specifier, indirection), ln);
    }
    Ok(())
}

fn remaining_declarators(cursor: &mut Cursor, chk: &mut Checker, specifier: Specifier) -> Result<()> {
    while cursor.bump_if(&Token::Comma) {
        global_declarator(cursor, chk, specifier)?;
    }
    cursor.expect(&Token::Semicolon)
}

/// A global declaration or a function definition.  A definition keeps its
/// parameter scope open: the body's declarations and statements land in it,
/// and it is attached to the body block on close.
fn top_level_declaration(cursor: &mut Cursor, chk: &mut Checker) -> Result<Option<Function>> {
    let specifier = specifier(cursor)?;
    let indirection = pointers(cursor)?;
    let ln = cursor.get_line();
    let name = identifier(cursor)?;

    if cursor.bump_if(&Token::OpenBracket) {
        let length = integer_constant(cursor)?;
        cursor.expect(&Token::CloseBracket)?;
        chk.declare_variable(&name, Type::Array(specifier, indirection, length), ln);
        remaining_declarators(cursor, chk, specifier)?;
        return Ok(None);
    }

    if cursor.bump_if(&Token::OpenParen) {
        let params = parameters(cursor, chk)?;
        cursor.expect(&Token::CloseParen)?;

        if cursor.bump_if(&Token::OpenBrace) {
            chk.return_type = Type::Scalar(specifier, indirection);
            let ftype = Type::Function(specifier, indirection, params);
            let id = chk.define_function(&name, ftype, ln);

            declarations(cursor, chk)?;
            let statements = statements(cursor, chk)?;
            let scope = chk.close_scope();
            cursor.expect(&Token::CloseBrace)?;

            return Ok(Some(Function {
                id,
                body: Block { scope, statements },
            }));
        }

        let scope = chk.close_scope();
        chk.discard_scope(scope);
        chk.declare_function(&name, Type::Function(specifier, indirection, params), ln);
        remaining_declarators(cursor, chk, specifier)?;
        return Ok(None);
    }

    chk.declare_variable(&name, Type::Scalar(specifier, indirection), ln);
    remaining_declarators(cursor, chk, specifier)?;
    Ok(None)
}
