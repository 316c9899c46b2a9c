use super::ProgramState;
use crate::environment::Environment;
use crate::parser::ast::{
    BlockStatement, CallExpression, Expression, IfExpression, InfixExpression, InfixOperator,
    LetStatement, PrefixExpression, PrefixOperator, Program, ReturnStatement, Statement,
};
use crate::value::error::{RuntimeError, RuntimeErrorKind};
use crate::value::{Function, MonkeyValue};
use std::sync::Arc;

pub struct TreeWalkInterpreter {
    environment: Environment,
    interpreter: TreeWalkStatementInterpreter,
}

impl TreeWalkInterpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
            interpreter: TreeWalkStatementInterpreter::create(),
        }
    }

    /// Runs a program against the persistent global environment.
    ///
    /// The result is the last statement's value, with a top-level `return`
    /// unwrapped to its payload. Bindings survive into the next `run` call,
    /// which is what gives the REPL its session state.
    pub fn run(&mut self, program: &Program) -> Result<MonkeyValue, RuntimeError> {
        let mut result = MonkeyValue::Null;
        for statement in program.iter() {
            match self
                .interpreter
                .interpret_statement(&mut self.environment, statement)?
            {
                ProgramState::Value(value) => result = value,
                ProgramState::Return(value) => return Ok(value),
            }
        }
        Ok(result)
    }
}

impl Default for TreeWalkInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TreeWalkStatementInterpreter;

// Statement interpreter
impl TreeWalkStatementInterpreter {
    fn create() -> Self {
        Self {}
    }

    fn interpret_statement(
        &self,
        environment: &mut Environment,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::Let(stmt) => self.interpret_let_statement(environment, stmt),
            Statement::Return(stmt) => self.interpret_return_statement(environment, stmt),
            Statement::Expression(stmt) => self.evaluate(environment, &stmt.expr),
            Statement::Block(stmt) => self.interpret_block_statement(environment, stmt),
        }
    }

    fn interpret_let_statement(
        &self,
        environment: &mut Environment,
        stmt: &LetStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let value = match self.evaluate(environment, &stmt.value)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        environment.declare(&stmt.name.name, value);
        Ok(ProgramState::Value(MonkeyValue::Null))
    }

    fn interpret_return_statement(
        &self,
        environment: &mut Environment,
        stmt: &ReturnStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let value = match self.evaluate(environment, &stmt.value)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        Ok(ProgramState::Return(value))
    }

    // Blocks do not open a new scope; only function calls do. A `Return`
    // passes through unchanged so outer frames can keep unwinding.
    fn interpret_block_statement(
        &self,
        environment: &mut Environment,
        block: &BlockStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let mut state = ProgramState::Value(MonkeyValue::Null);
        for statement in block.statements.iter() {
            state = self.interpret_statement(environment, statement)?;
            if matches!(state, ProgramState::Return(_)) {
                break;
            }
        }
        Ok(state)
    }
}

// Expression evaluator
impl TreeWalkStatementInterpreter {
    fn evaluate(
        &self,
        environment: &mut Environment,
        expr: &Expression,
    ) -> Result<ProgramState, RuntimeError> {
        let result = match expr {
            Expression::Identifier(ident) => {
                let value = environment.access(&ident.name).ok_or(RuntimeError {
                    kind: RuntimeErrorKind::IdentifierNotFound(ident.name.clone()),
                    span: ident.span,
                })?;
                ProgramState::Value(value)
            }
            Expression::Integer(node) => ProgramState::Value(MonkeyValue::Integer(node.value)),
            Expression::Str(node) => ProgramState::Value(MonkeyValue::Str(node.value.clone())),
            Expression::Boolean(node) => ProgramState::Value(MonkeyValue::Bool(node.value)),
            Expression::Prefix(node) => return self.evaluate_prefix(environment, node),
            Expression::Infix(node) => return self.evaluate_infix(environment, node),
            Expression::If(node) => return self.evaluate_if(environment, node),
            Expression::Function(node) => {
                ProgramState::Value(MonkeyValue::Function(Arc::new(Function {
                    parameters: node.parameters.clone(),
                    body: node.body.clone(),
                    closure: environment.clone(),
                })))
            }
            Expression::Call(node) => return self.evaluate_call(environment, node),
        };
        Ok(result)
    }

    fn evaluate_prefix(
        &self,
        environment: &mut Environment,
        node: &PrefixExpression,
    ) -> Result<ProgramState, RuntimeError> {
        let rhs = match self.evaluate(environment, &node.rhs)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        let result = match node.operator {
            PrefixOperator::Bang => Ok(rhs.logical_not()),
            PrefixOperator::Minus => rhs.numeric_negate(),
        };
        result
            .map(ProgramState::Value)
            .map_err(|kind| RuntimeError {
                kind,
                span: node.span,
            })
    }

    fn evaluate_infix(
        &self,
        environment: &mut Environment,
        node: &InfixExpression,
    ) -> Result<ProgramState, RuntimeError> {
        let lhs = match self.evaluate(environment, &node.lhs)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        let rhs = match self.evaluate(environment, &node.rhs)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        let result = match node.operator {
            InfixOperator::Add => lhs.add(&rhs),
            InfixOperator::Subtract => lhs.subtract(&rhs),
            InfixOperator::Multiply => lhs.multiply(&rhs),
            InfixOperator::Divide => lhs.divide(&rhs),
            InfixOperator::LessThan => lhs.less_than(&rhs),
            InfixOperator::GreaterThan => lhs.greater_than(&rhs),
            InfixOperator::EqualEqual => lhs.equals(&rhs),
            InfixOperator::BangEqual => lhs.not_equals(&rhs),
        };
        result
            .map(ProgramState::Value)
            .map_err(|kind| RuntimeError {
                kind,
                span: node.span,
            })
    }

    fn evaluate_if(
        &self,
        environment: &mut Environment,
        node: &IfExpression,
    ) -> Result<ProgramState, RuntimeError> {
        let condition = match self.evaluate(environment, &node.condition)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };
        if condition.is_truthy() {
            self.interpret_block_statement(environment, &node.consequence)
        } else if let Some(ref alternative) = node.alternative {
            self.interpret_block_statement(environment, alternative)
        } else {
            Ok(ProgramState::Value(MonkeyValue::Null))
        }
    }

    fn evaluate_call(
        &self,
        environment: &mut Environment,
        node: &CallExpression,
    ) -> Result<ProgramState, RuntimeError> {
        let callee = match self.evaluate(environment, &node.function)? {
            ProgramState::Value(value) => value,
            state => return Ok(state),
        };

        // Arguments evaluate left to right; the first error wins.
        let mut arguments = Vec::with_capacity(node.arguments.len());
        for argument in node.arguments.iter() {
            match self.evaluate(environment, argument)? {
                ProgramState::Value(value) => arguments.push(value),
                state => return Ok(state),
            }
        }

        let MonkeyValue::Function(function) = callee else {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::NotAFunction(callee.type_name()),
                span: node.span,
            });
        };
        if arguments.len() != function.parameters.len() {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::WrongArgumentCount {
                    actual: arguments.len(),
                    expected: function.parameters.len(),
                },
                span: node.span,
            });
        }

        // The call frame encloses the captured environment, not the caller's.
        let mut inner_scope = function.closure.new_scope();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            inner_scope.declare(&parameter.name, argument);
        }

        match self.interpret_block_statement(&mut inner_scope, &function.body)? {
            ProgramState::Return(value) | ProgramState::Value(value) => {
                Ok(ProgramState::Value(value))
            }
        }
    }
}
