// Lox AST Definitions
// Closed expression/statement families built once by the parser

use crate::stack::with_stack_headroom;
use crate::token::{Span, Token, TokenKind};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Unary(Unary),
    Binary(Binary),
    Grouping(Box<Expr>),
    Literal(Literal),
    Logical(Logical),
    Conditional(Conditional),
    Variable(Variable),
    Assign(Assign),
    Call(Call),
    /// Property read `object.name`
    Get(Get),
    /// Field write `object.name = value`
    Set(Set),
    /// Anonymous function literal `fun (params) { body }`
    Function(Rc<FunctionDecl>),
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Print(Expr),
    Expression(Expr),
    Var(VarDecl),
    Block(Vec<Stmt>),
    If(If),
    While(While),
    Break(Token),
    Function(Rc<FunctionDecl>),
    Return(Return),
    Class(ClassDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "and"),
            LogicalOperator::Or => write!(f, "or"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub token: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub token: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub left: Box<Expr>,
    pub operator: LogicalOperator,
    pub token: Token,
    pub right: Box<Expr>,
}

/// `condition ? then_branch : else_branch`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub token: Token,
}

/// Scope distance computed by the resolver.
///
/// `None` means the reference was not found in any local scope and is looked
/// up in the global environment at runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution(Cell<Option<usize>>);

impl Resolution {
    pub fn depth(&self) -> Option<usize> {
        self.0.get()
    }

    pub fn set(&self, depth: usize) {
        self.0.set(Some(depth));
    }

    pub fn clear(&self) {
        self.0.set(None);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Token,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Token,
    pub value: Box<Expr>,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expr>,
    /// Closing parenthesis, used to locate call errors
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub keyword: Token,
    pub value: Option<Expr>,
}

/// Function declaration or anonymous function literal.
///
/// Shared behind `Rc` so runtime function values can point back at their
/// declaration without copying the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// `None` for anonymous functions
    pub name: Option<Token>,
    /// The `fun` keyword, or the method name inside a class body
    pub keyword: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_ref().map(|name| name.lexeme.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Token,
    pub methods: Vec<Rc<FunctionDecl>>,
}

impl Expr {
    pub fn literal(value: LiteralValue, token: Token) -> Self {
        Expr::Literal(Literal { value, token })
    }

    pub fn variable(name: Token) -> Self {
        Expr::Variable(Variable {
            name,
            resolution: Resolution::default(),
        })
    }

    pub fn assign(name: Token, value: Expr) -> Self {
        Expr::Assign(Assign {
            name,
            value: Box::new(value),
            resolution: Resolution::default(),
        })
    }

    /// Move this expression out, leaving a `nil` literal in its place
    pub(crate) fn take(&mut self) -> Expr {
        std::mem::replace(self, Expr::placeholder())
    }

    fn placeholder() -> Self {
        Expr::literal(
            LiteralValue::Nil,
            Token {
                kind: TokenKind::Nil,
                lexeme: String::new(),
                line: 0,
                span: Span::default(),
            },
        )
    }

    /// Source range covered by this expression, for diagnostics
    pub fn span(&self) -> Span {
        match self {
            Expr::Unary(unary) => unary.token.span.to(unary.right.span()),
            Expr::Binary(binary) => binary.left.span().to(binary.right.span()),
            Expr::Grouping(inner) => inner.span(),
            Expr::Literal(literal) => literal.token.span,
            Expr::Logical(logical) => logical.left.span().to(logical.right.span()),
            Expr::Conditional(conditional) => conditional
                .condition
                .span()
                .to(conditional.else_branch.span()),
            Expr::Variable(variable) => variable.name.span,
            Expr::Assign(assign) => assign.name.span.to(assign.value.span()),
            Expr::Call(call) => call.callee.span().to(call.paren.span),
            Expr::Get(get) => get.object.span().to(get.name.span),
            Expr::Set(set) => set.object.span().to(set.value.span()),
            Expr::Function(function) => function.keyword.span,
        }
    }

    /// First source line of this expression
    pub fn line(&self) -> usize {
        match self {
            Expr::Unary(unary) => unary.token.line,
            Expr::Binary(binary) => binary.left.line(),
            Expr::Grouping(inner) => inner.line(),
            Expr::Literal(literal) => literal.token.line,
            Expr::Logical(logical) => logical.left.line(),
            Expr::Conditional(conditional) => conditional.condition.line(),
            Expr::Variable(variable) => variable.name.line,
            Expr::Assign(assign) => assign.name.line,
            Expr::Call(call) => call.callee.line(),
            Expr::Get(get) => get.object.line(),
            Expr::Set(set) => set.object.line(),
            Expr::Function(function) => function.keyword.line,
        }
    }
}

// Tree teardown recurses once per nesting level like the passes that build
// and walk it, so children are detached and dropped with stack headroom.

impl Drop for Expr {
    fn drop(&mut self) {
        match self {
            Expr::Unary(unary) => release_expr(&mut unary.right),
            Expr::Binary(Binary { left, right, .. })
            | Expr::Logical(Logical { left, right, .. }) => {
                release_expr(left);
                release_expr(right);
            }
            Expr::Grouping(inner) => release_expr(inner),
            Expr::Conditional(conditional) => {
                release_expr(&mut conditional.condition);
                release_expr(&mut conditional.then_branch);
                release_expr(&mut conditional.else_branch);
            }
            Expr::Assign(assign) => release_expr(&mut assign.value),
            Expr::Call(call) => {
                release_expr(&mut call.callee);
                let arguments = std::mem::take(&mut call.arguments);
                with_stack_headroom(move || drop(arguments));
            }
            Expr::Get(get) => release_expr(&mut get.object),
            Expr::Set(set) => {
                release_expr(&mut set.object);
                release_expr(&mut set.value);
            }
            Expr::Literal(_) | Expr::Variable(_) | Expr::Function(_) => {}
        }
    }
}

impl Drop for Stmt {
    fn drop(&mut self) {
        match self {
            Stmt::Block(statements) => {
                let statements = std::mem::take(statements);
                with_stack_headroom(move || drop(statements));
            }
            Stmt::If(if_stmt) => {
                release_stmt(&mut if_stmt.then_branch);
                if let Some(else_branch) = if_stmt.else_branch.take() {
                    with_stack_headroom(move || drop(else_branch));
                }
            }
            Stmt::While(while_stmt) => release_stmt(&mut while_stmt.body),
            _ => {}
        }
    }
}

impl Drop for FunctionDecl {
    fn drop(&mut self) {
        let body = std::mem::take(&mut self.body);
        with_stack_headroom(move || drop(body));
    }
}

fn release_expr(slot: &mut Expr) {
    let child = slot.take();
    with_stack_headroom(move || drop(child));
}

fn release_stmt(slot: &mut Stmt) {
    let child = std::mem::replace(slot, Stmt::Block(Vec::new()));
    with_stack_headroom(move || drop(child));
}
