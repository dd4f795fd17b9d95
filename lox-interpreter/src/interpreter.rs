//! Tree-walking evaluator.
//!
//! Statements execute against a chain of environments rooted at the
//! globals. Resolved variable references jump straight to the scope the
//! resolver computed; unresolved ones are looked up in the globals.
//! `break` and `return` travel back up as a [`ControlFlow`] signal instead
//! of an error, and are consumed by the enclosing loop or call.

use crate::callable::{Callable, Function};
use crate::class::{Class, Instance};
use crate::config::InterpreterConfig;
use crate::environment::{Environment, SharedEnvironment};
use crate::error::{Result, RuntimeError};
use crate::natives;
use crate::output::Output;
use crate::value::Value;
use lox_parser::{
    Binary, BinaryOperator, Call, ClassDecl, Expr, LogicalOperator, Resolution, Stmt, Token,
    UnaryOperator, with_stack_headroom,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Signal produced by executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    /// Continue with the next statement
    None,
    /// Leave the nearest enclosing loop
    Break,
    /// Leave the nearest enclosing function with this value
    Return(Value),
}

pub struct Interpreter {
    globals: SharedEnvironment,
    environment: SharedEnvironment,
    config: InterpreterConfig,
    output: Output,
    /// Number of user function calls currently active
    call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    /// Interpreter printing to stdout
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_output(config, Output::Stdout)
    }

    pub fn with_output(config: InterpreterConfig, output: Output) -> Self {
        let globals = Environment::new().shared();

        for (name, native) in natives::all() {
            tracing::trace!(name, "defining native");
            globals
                .borrow_mut()
                .define(name, Value::Callable(Rc::new(native)));
        }

        Self {
            environment: Rc::clone(&globals),
            globals,
            config,
            output,
            call_depth: 0,
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Names currently bound in the global environment
    pub fn global_names(&self) -> Vec<String> {
        self.globals
            .borrow()
            .names()
            .map(str::to_string)
            .collect()
    }

    /// Value of a global, mainly for embedding and tests
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }

    /// Execute `statements` in order. A runtime error abandons only the
    /// top-level statement that raised it; the rest still run.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Vec<RuntimeError> {
        let mut errors = Vec::new();

        for statement in statements {
            if let Err(error) = self.execute(statement) {
                tracing::trace!(line = error.line(), "runtime error, continuing");
                errors.push(error);
                self.environment = Rc::clone(&self.globals);
                self.call_depth = 0;
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = errors.len(),
            "interpreted program"
        );
        errors
    }

    pub fn execute(&mut self, statement: &Stmt) -> Result<ControlFlow> {
        with_stack_headroom(|| self.execute_inner(statement))
    }

    fn execute_inner(&mut self, statement: &Stmt) -> Result<ControlFlow> {
        match statement {
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.output
                    .write_line(&value.to_string())
                    .map_err(|e| RuntimeError::output(e, expr.line(), expr.span().into()))?;
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Var(decl) => {
                let value = match &decl.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme.as_str(), value);
            }
            Stmt::Block(statements) => {
                let scope = Environment::new_enclosed(Rc::clone(&self.environment)).shared();
                return self.execute_block(statements, scope);
            }
            Stmt::If(if_stmt) => {
                if self.evaluate(&if_stmt.condition)?.is_truthy() {
                    return self.execute(&if_stmt.then_branch);
                }
                if let Some(else_branch) = &if_stmt.else_branch {
                    return self.execute(else_branch);
                }
            }
            Stmt::While(while_stmt) => {
                while self.evaluate(&while_stmt.condition)?.is_truthy() {
                    match self.execute(&while_stmt.body)? {
                        ControlFlow::None => {}
                        ControlFlow::Break => break,
                        returning @ ControlFlow::Return(_) => return Ok(returning),
                    }
                }
            }
            Stmt::Break(_) => return Ok(ControlFlow::Break),
            Stmt::Function(declaration) => {
                let function = Callable::function(Rc::clone(declaration), Rc::clone(&self.environment));
                if let Some(name) = &declaration.name {
                    self.environment
                        .borrow_mut()
                        .define(name.lexeme.as_str(), Value::Callable(Rc::new(function)));
                }
            }
            Stmt::Return(return_stmt) => {
                let value = match &return_stmt.value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                return Ok(ControlFlow::Return(value));
            }
            Stmt::Class(class) => self.declare_class(class),
        }

        Ok(ControlFlow::None)
    }

    /// Run `statements` inside `scope`, restoring the current environment
    /// afterwards whether they finish, signal, or fail
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        scope: SharedEnvironment,
    ) -> Result<ControlFlow> {
        let previous = std::mem::replace(&mut self.environment, scope);

        let mut result = Ok(ControlFlow::None);
        for statement in statements {
            result = self.execute(statement);
            if !matches!(result, Ok(ControlFlow::None)) {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn declare_class(&mut self, class: &ClassDecl) {
        let methods = class
            .methods
            .iter()
            .filter_map(|method| method.display_name())
            .map(str::to_string)
            .collect();

        let value = Value::Class(Rc::new(Class::new(class.name.lexeme.as_str(), methods)));
        self.environment
            .borrow_mut()
            .define(class.name.lexeme.as_str(), value);
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        with_stack_headroom(|| self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(&literal.value)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary(unary) => {
                let right = self.evaluate(&unary.right)?;
                match unary.operator {
                    UnaryOperator::Not => Ok(Value::Boolean(!right.is_truthy())),
                    UnaryOperator::Negate => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(RuntimeError::operand_must_be_number(
                            &unary.token,
                            other.type_name(),
                        )),
                    },
                }
            }
            Expr::Binary(binary) => self.evaluate_binary(binary),
            Expr::Logical(logical) => {
                let left = self.evaluate(&logical.left)?;
                let decided = match logical.operator {
                    LogicalOperator::Or => left.is_truthy(),
                    LogicalOperator::And => !left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(&logical.right)
                }
            }
            Expr::Conditional(conditional) => {
                if self.evaluate(&conditional.condition)?.is_truthy() {
                    self.evaluate(&conditional.then_branch)
                } else {
                    self.evaluate(&conditional.else_branch)
                }
            }
            Expr::Variable(variable) => self.look_up(&variable.name, &variable.resolution),
            Expr::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;
                self.assign(&assign.name, &assign.resolution, value.clone())?;
                Ok(value)
            }
            Expr::Call(call) => self.evaluate_call(call),
            Expr::Get(get) => {
                let instance = match self.evaluate(&get.object)? {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(RuntimeError::not_an_instance(
                            "properties",
                            other.type_name(),
                            &get.name,
                        ));
                    }
                };

                let instance = instance.borrow();
                if let Some(value) = instance.get(&get.name.lexeme) {
                    return Ok(value);
                }
                if instance.class().has_method(&get.name.lexeme) {
                    return Err(RuntimeError::unsupported_method(
                        &instance.class().name,
                        &get.name,
                    ));
                }
                Err(RuntimeError::undefined_property(&get.name))
            }
            Expr::Set(set) => {
                let instance = match self.evaluate(&set.object)? {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(RuntimeError::not_an_instance(
                            "fields",
                            other.type_name(),
                            &set.name,
                        ));
                    }
                };

                let value = self.evaluate(&set.value)?;
                instance
                    .borrow_mut()
                    .set(set.name.lexeme.as_str(), value.clone());
                Ok(value)
            }
            Expr::Function(declaration) => Ok(Value::Callable(Rc::new(Callable::function(
                Rc::clone(declaration),
                Rc::clone(&self.environment),
            )))),
        }
    }

    fn evaluate_binary(&mut self, binary: &Binary) -> Result<Value> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let token = &binary.token;

        let value = match binary.operator {
            BinaryOperator::Equal => Value::Boolean(left == right),
            BinaryOperator::NotEqual => Value::Boolean(left != right),
            BinaryOperator::Add => return add(token, left, right),
            BinaryOperator::Subtract => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Number(a - b)
            }
            BinaryOperator::Multiply => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Number(a * b)
            }
            BinaryOperator::Divide => {
                let (a, b) = numbers(token, &left, &right)?;
                if a == 0.0 || b == 0.0 {
                    return Err(RuntimeError::division_by_zero(token));
                }
                Value::Number(a / b)
            }
            BinaryOperator::Greater => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Boolean(a > b)
            }
            BinaryOperator::GreaterEqual => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Boolean(a >= b)
            }
            BinaryOperator::Less => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Boolean(a < b)
            }
            BinaryOperator::LessEqual => {
                let (a, b) = numbers(token, &left, &right)?;
                Value::Boolean(a <= b)
            }
        };

        Ok(value)
    }

    fn evaluate_call(&mut self, call: &Call) -> Result<Value> {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match callee {
            Value::Callable(callable) => {
                check_arity(callable.name(), callable.arity(), arguments.len(), &call.paren)?;
                match &*callable {
                    Callable::Native(native) => (native.function)(&arguments).map_err(|message| {
                        RuntimeError::native_failure(native.name, message, &call.paren)
                    }),
                    Callable::Function(function) => {
                        self.call_function(function, arguments, &call.paren)
                    }
                }
            }
            Value::Class(class) => {
                check_arity(&class.name, class.arity(), arguments.len(), &call.paren)?;
                Ok(Value::Instance(Rc::new(RefCell::new(Instance::new(class)))))
            }
            other => Err(RuntimeError::not_callable(&call.paren, other.type_name())),
        }
    }

    /// Bind parameters in a fresh scope off the closure and run the body there
    fn call_function(
        &mut self,
        function: &Function,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.config.max_call_depth, paren));
        }

        let mut scope = Environment::new_enclosed(Rc::clone(&function.closure));
        for (param, argument) in function.declaration.params.iter().zip(arguments) {
            scope.define(param.lexeme.as_str(), argument);
        }

        self.call_depth += 1;
        let result = self.execute_block(&function.declaration.body, scope.shared());
        self.call_depth -= 1;

        match result? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::None | ControlFlow::Break => Ok(Value::Nil),
        }
    }

    fn look_up(&self, name: &Token, resolution: &Resolution) -> Result<Value> {
        let value = match resolution.depth() {
            Some(distance) => Environment::get_at(&self.environment, distance, &name.lexeme),
            None => self.globals.borrow().get(&name.lexeme),
        };

        value.ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    fn assign(&self, name: &Token, resolution: &Resolution, value: Value) -> Result<()> {
        let assigned = match resolution.depth() {
            Some(distance) => {
                Environment::assign_at(&self.environment, distance, &name.lexeme, value)
            }
            None => self.globals.borrow_mut().assign(&name.lexeme, value),
        };

        if assigned {
            Ok(())
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }
}

fn numbers(token: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::operands_must_be_numbers(
            token,
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn check_arity(callee: &str, expected: usize, found: usize, paren: &Token) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::wrong_arity(callee, expected, found, paren))
    }
}

/// `+` adds numbers and concatenates when either operand is a string
fn add(token: &Token, left: Value, right: Value) -> Result<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(_), Value::String(_) | Value::Number(_))
        | (Value::Number(_), Value::String(_)) => Ok(Value::string(format!("{left}{right}"))),
        _ => Err(RuntimeError::invalid_addition(
            token,
            left.type_name(),
            right.type_name(),
        )),
    }
}
