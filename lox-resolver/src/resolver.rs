//! Scope-distance resolution
//!
//! Walks the parsed statements once, mirroring the environments the
//! interpreter will create, and records on every variable read and
//! assignment how many scopes separate it from its binding. References
//! that match no local scope are left unresolved and fall back to the
//! global environment at runtime.

use crate::error::{ResolveError, ResolveWarning};
use indexmap::IndexMap;
use lox_parser::{with_stack_headroom, ClassDecl, Expr, FunctionDecl, Resolution, Stmt, Token};
use std::collections::HashMap;

/// Lifecycle of a binding within one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarState {
    /// Name is known but its initializer has not finished
    Declared,
    /// Initialized and readable
    Defined,
    /// Read or assigned at least once
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
}

#[derive(Debug)]
struct Binding {
    state: VarState,
    name: Token,
}

/// Outcome of resolving one statement list
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolveOutcome {
    /// The error that stopped resolution, if any
    pub error: Option<ResolveError>,
    /// Unused locals found before resolution finished or stopped
    pub warnings: Vec<ResolveWarning>,
}

impl ResolveOutcome {
    pub fn had_error(&self) -> bool {
        self.error.is_some()
    }
}

type ResolveResult = Result<(), ResolveError>;

pub struct Resolver {
    /// Local scopes, innermost last; empty at top level
    scopes: Vec<IndexMap<String, Binding>>,
    /// Top-level names known to exist, so a global initializer that
    /// reads its own variable is caught too
    globals: HashMap<String, VarState>,
    current_function: FunctionKind,
    warnings: Vec<ResolveWarning>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            globals: HashMap::new(),
            current_function: FunctionKind::None,
            warnings: Vec::new(),
        }
    }

    /// Resolver for a program running against globals that already exist,
    /// such as natives or names defined by earlier REPL input
    pub fn with_globals<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut resolver = Self::new();
        resolver.globals = names
            .into_iter()
            .map(|name| (name.into(), VarState::Defined))
            .collect();
        resolver
    }

    /// Resolve `statements`, annotating their variable references in place
    pub fn resolve(&mut self, statements: &[Stmt]) -> ResolveResult {
        let result = self.resolve_statements(statements);

        if let Err(error) = &result {
            tracing::debug!(line = error.line(), "resolution aborted");
        }

        result
    }

    /// Resolve `statements` and hand back everything found
    pub fn finish(mut self, statements: &[Stmt]) -> ResolveOutcome {
        let error = self.resolve(statements).err();
        let warnings = self.into_warnings();

        tracing::debug!(
            had_error = error.is_some(),
            warnings = warnings.len(),
            "resolved program"
        );

        ResolveOutcome { error, warnings }
    }

    pub fn into_warnings(self) -> Vec<ResolveWarning> {
        self.warnings
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) -> ResolveResult {
        statements
            .iter()
            .try_for_each(|statement| self.resolve_statement(statement))
    }

    fn resolve_statement(&mut self, statement: &Stmt) -> ResolveResult {
        with_stack_headroom(|| match statement {
            Stmt::Print(expr) | Stmt::Expression(expr) => self.resolve_expression(expr),
            Stmt::Var(decl) => {
                self.declare(&decl.name)?;
                if let Some(initializer) = &decl.initializer {
                    self.resolve_expression(initializer)?;
                }
                self.define(&decl.name);
                Ok(())
            }
            Stmt::Block(statements) => {
                self.begin_scope();
                let result = self.resolve_statements(statements);
                self.end_scope();
                result
            }
            Stmt::If(if_stmt) => {
                self.resolve_expression(&if_stmt.condition)?;
                self.resolve_statement(&if_stmt.then_branch)?;
                match &if_stmt.else_branch {
                    Some(else_branch) => self.resolve_statement(else_branch),
                    None => Ok(()),
                }
            }
            Stmt::While(while_stmt) => {
                self.resolve_expression(&while_stmt.condition)?;
                self.resolve_statement(&while_stmt.body)
            }
            Stmt::Break(_) => Ok(()),
            Stmt::Function(function) => {
                if let Some(name) = &function.name {
                    // defined before the body so the function can recurse
                    self.declare(name)?;
                    self.define(name);
                }
                self.resolve_function(function, FunctionKind::Function)
            }
            Stmt::Return(return_stmt) => {
                if self.current_function == FunctionKind::None {
                    return Err(ResolveError::top_level_return(&return_stmt.keyword));
                }
                match &return_stmt.value {
                    Some(value) => self.resolve_expression(value),
                    None => Ok(()),
                }
            }
            Stmt::Class(class) => self.resolve_class(class),
        })
    }

    fn resolve_class(&mut self, class: &ClassDecl) -> ResolveResult {
        self.declare(&class.name)?;
        self.define(&class.name);

        class
            .methods
            .iter()
            .try_for_each(|method| self.resolve_function(method, FunctionKind::Method))
    }

    fn resolve_expression(&mut self, expr: &Expr) -> ResolveResult {
        with_stack_headroom(|| match expr {
            Expr::Unary(unary) => self.resolve_expression(&unary.right),
            Expr::Binary(binary) => {
                self.resolve_expression(&binary.left)?;
                self.resolve_expression(&binary.right)
            }
            Expr::Logical(logical) => {
                self.resolve_expression(&logical.left)?;
                self.resolve_expression(&logical.right)
            }
            Expr::Grouping(inner) => self.resolve_expression(inner),
            Expr::Literal(_) => Ok(()),
            Expr::Conditional(conditional) => {
                self.resolve_expression(&conditional.condition)?;
                self.resolve_expression(&conditional.then_branch)?;
                self.resolve_expression(&conditional.else_branch)
            }
            Expr::Variable(variable) => self.resolve_read(&variable.name, &variable.resolution),
            Expr::Assign(assign) => {
                self.resolve_expression(&assign.value)?;
                self.resolve_local(&assign.name, &assign.resolution, 0);
                Ok(())
            }
            Expr::Call(call) => {
                self.resolve_expression(&call.callee)?;
                call.arguments
                    .iter()
                    .try_for_each(|argument| self.resolve_expression(argument))
            }
            Expr::Get(get) => self.resolve_expression(&get.object),
            Expr::Set(set) => {
                self.resolve_expression(&set.value)?;
                self.resolve_expression(&set.object)
            }
            Expr::Function(function) => self.resolve_function(function, FunctionKind::Function),
        })
    }

    /// Parameters and body share one scope, matching the call environment
    fn resolve_function(&mut self, function: &FunctionDecl, kind: FunctionKind) -> ResolveResult {
        let enclosing = std::mem::replace(&mut self.current_function, kind);
        self.begin_scope();

        let result = self.resolve_function_scope(function);

        self.end_scope();
        self.current_function = enclosing;
        result
    }

    fn resolve_function_scope(&mut self, function: &FunctionDecl) -> ResolveResult {
        for param in &function.params {
            self.declare(param)?;
            self.define(param);
        }

        self.resolve_statements(&function.body)
    }

    /// A read inside the initializer of its own declaration sees the binding
    /// being shadowed; with nothing to shadow it is an error.
    fn resolve_read(&mut self, name: &Token, resolution: &Resolution) -> ResolveResult {
        let innermost = match self.scopes.last() {
            Some(scope) => scope.get(&name.lexeme).map(|binding| binding.state),
            None => self.globals.get(&name.lexeme).copied(),
        };

        if innermost != Some(VarState::Declared) {
            self.resolve_local(name, resolution, 0);
            return Ok(());
        }

        if !self.scopes.is_empty() {
            if self.resolve_local(name, resolution, 1) {
                return Ok(());
            }
            if self.globals.get(&name.lexeme) == Some(&VarState::Defined) {
                return Ok(());
            }
        }

        Err(ResolveError::self_referential_initializer(name))
    }

    /// Record the distance to the nearest binding of `name`, ignoring the
    /// `skip` innermost scopes. Returns false when the name is global.
    fn resolve_local(&mut self, name: &Token, resolution: &Resolution, skip: usize) -> bool {
        let scopes = self.scopes.iter_mut().rev().enumerate().skip(skip);
        for (depth, scope) in scopes {
            if let Some(binding) = scope.get_mut(&name.lexeme) {
                binding.state = VarState::Used;
                resolution.set(depth);
                return true;
            }
        }

        resolution.clear();
        false
    }

    fn begin_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    fn end_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };

        for binding in scope.into_values() {
            if binding.state != VarState::Used {
                tracing::trace!(name = %binding.name.lexeme, "unused local");
                self.warnings
                    .push(ResolveWarning::unused_variable(&binding.name));
            }
        }
    }

    fn declare(&mut self, name: &Token) -> ResolveResult {
        let Some(scope) = self.scopes.last_mut() else {
            // globals may be redeclared; the old value stays readable until then
            self.globals
                .entry(name.lexeme.clone())
                .or_insert(VarState::Declared);
            return Ok(());
        };

        if scope.contains_key(&name.lexeme) {
            return Err(ResolveError::duplicate_declaration(name));
        }

        scope.insert(
            name.lexeme.clone(),
            Binding {
                state: VarState::Declared,
                name: name.clone(),
            },
        );
        Ok(())
    }

    fn define(&mut self, name: &Token) {
        match self.scopes.last_mut() {
            Some(scope) => {
                // a closure in the initializer may already have read it
                if let Some(binding) = scope.get_mut(&name.lexeme) {
                    if binding.state == VarState::Declared {
                        binding.state = VarState::Defined;
                    }
                }
            }
            None => {
                self.globals.insert(name.lexeme.clone(), VarState::Defined);
            }
        }
    }
}

/// Resolve a whole program with a fresh resolver
pub fn resolve(statements: &[Stmt]) -> ResolveOutcome {
    Resolver::new().finish(statements)
}
