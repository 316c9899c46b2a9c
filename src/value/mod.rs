pub mod error;
pub mod formatter;

use crate::environment::Environment;
use crate::parser::ast::{BlockStatement, InfixOperator, PrefixOperator};
use crate::string::Ident;
use compact_str::CompactString;
use error::RuntimeErrorKind;
use std::sync::Arc;

/// A user-defined function. The closure is the environment that was active
/// at the literal's definition, not the caller's.
#[derive(Debug, Clone)]
pub struct Function {
    pub parameters: Vec<Ident>,
    pub body: Arc<BlockStatement>,
    pub closure: Environment,
}

#[derive(Debug, Clone)]
pub enum MonkeyValue {
    Integer(i64),
    Bool(bool),
    Null,
    Str(CompactString),
    Function(Arc<Function>),
}

impl MonkeyValue {
    /// The type tag used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MonkeyValue::Integer(_) => "INTEGER",
            MonkeyValue::Bool(_) => "BOOLEAN",
            MonkeyValue::Null => "NULL",
            MonkeyValue::Str(_) => "STRING",
            MonkeyValue::Function(_) => "FUNCTION",
        }
    }
}

impl std::fmt::Display for MonkeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Function(function) => {
                write!(f, "fn(")?;
                for (index, parameter) in function.parameters.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {{\n{}\n}}", function.body)
            }
        }
    }
}

// Unary operators
impl MonkeyValue {
    /// Only `false` and `null` are falsy. Zero is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            MonkeyValue::Bool(false) | MonkeyValue::Null => false,
            _ => true,
        }
    }

    pub fn logical_not(&self) -> MonkeyValue {
        MonkeyValue::Bool(!self.is_truthy())
    }

    pub fn numeric_negate(&self) -> Result<MonkeyValue, RuntimeErrorKind> {
        match self {
            MonkeyValue::Integer(v) => Ok(MonkeyValue::Integer(v.wrapping_neg())),
            v => Err(RuntimeErrorKind::UnknownPrefixOperator {
                operator: PrefixOperator::Minus,
                operand: v.type_name(),
            }),
        }
    }
}

// Binary operators. Integer arithmetic wraps on overflow.
impl MonkeyValue {
    pub fn add(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Integer(lhs.wrapping_add(*rhs)))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::Add, rhs)),
        }
    }

    pub fn subtract(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Integer(lhs.wrapping_sub(*rhs)))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::Subtract, rhs)),
        }
    }

    pub fn multiply(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Integer(lhs.wrapping_mul(*rhs)))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::Multiply, rhs)),
        }
    }

    pub fn divide(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(_), MonkeyValue::Integer(0)) => {
                Err(RuntimeErrorKind::DivisionByZero)
            }
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Integer(lhs.wrapping_div(*rhs)))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::Divide, rhs)),
        }
    }

    // Comparison
    pub fn less_than(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Bool(lhs < rhs))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::LessThan, rhs)),
        }
    }

    pub fn greater_than(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Bool(lhs > rhs))
            }
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::GreaterThan, rhs)),
        }
    }

    // Equality is defined for integer pairs and boolean pairs only.
    pub fn equals(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Bool(lhs == rhs))
            }
            (MonkeyValue::Bool(lhs), MonkeyValue::Bool(rhs)) => Ok(MonkeyValue::Bool(lhs == rhs)),
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::EqualEqual, rhs)),
        }
    }

    pub fn not_equals(&self, other: &MonkeyValue) -> Result<MonkeyValue, RuntimeErrorKind> {
        match (self, other) {
            (MonkeyValue::Integer(lhs), MonkeyValue::Integer(rhs)) => {
                Ok(MonkeyValue::Bool(lhs != rhs))
            }
            (MonkeyValue::Bool(lhs), MonkeyValue::Bool(rhs)) => Ok(MonkeyValue::Bool(lhs != rhs)),
            (lhs, rhs) => Err(Self::infix_error(lhs, InfixOperator::BangEqual, rhs)),
        }
    }

    fn infix_error(
        lhs: &MonkeyValue,
        operator: InfixOperator,
        rhs: &MonkeyValue,
    ) -> RuntimeErrorKind {
        if lhs.type_name() != rhs.type_name() {
            RuntimeErrorKind::TypeMismatch {
                left: lhs.type_name(),
                operator,
                right: rhs.type_name(),
            }
        } else {
            RuntimeErrorKind::UnknownInfixOperator {
                left: lhs.type_name(),
                operator,
                right: rhs.type_name(),
            }
        }
    }
}
