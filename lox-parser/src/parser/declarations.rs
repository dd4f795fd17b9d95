// Declaration parsing module
// var, fun and class declarations plus shared function signature/body parsing

use std::rc::Rc;

use crate::ast::*;
use crate::error::*;
use crate::parser::Parser;
use crate::token::{Token, TokenKind};

impl Parser<'_> {
    pub(super) fn declaration_inner(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenKind::Class) {
            return self.class_declaration();
        }
        if self.matches(TokenKind::Fun) {
            let keyword = self.previous.clone();
            let name = self.consume(TokenKind::Identifier, "Expect function name")?;
            let function = self.function_rest(Some(name), keyword, "function")?;
            return Ok(Stmt::Function(Rc::new(function)));
        }
        if self.matches(TokenKind::Var) {
            return self.var_declaration();
        }

        self.statement()
    }

    pub(super) fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name")?;

        let initializer = if self.matches(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration")?;
        Ok(Stmt::Var(VarDecl { name, initializer }))
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name")?;
        self.consume(TokenKind::LeftBrace, "Expect '{' before class body")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let method_name = self.consume(TokenKind::Identifier, "Expect method name")?;
            let keyword = method_name.clone();
            methods.push(Rc::new(self.function_rest(
                Some(method_name),
                keyword,
                "method",
            )?));
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body")?;
        Ok(Stmt::Class(ClassDecl { name, methods }))
    }

    /// Anonymous function literal; the `fun` keyword has just been consumed
    pub(super) fn anonymous_function(&mut self) -> ParseResult<Expr> {
        let keyword = self.previous.clone();

        if self.check(TokenKind::Identifier) {
            return Err(ParseError::named_anonymous_function(&self.current));
        }

        let function = self.function_rest(None, keyword, "anonymous function")?;
        Ok(Expr::Function(Rc::new(function)))
    }

    /// Parameter list and body, shared by every kind of function
    fn function_rest(
        &mut self,
        name: Option<Token>,
        keyword: Token,
        kind: &str,
    ) -> ParseResult<FunctionDecl> {
        let paren_message = if name.is_some() {
            format!("Expect '(' after {kind} name")
        } else {
            format!("Expect '(' for {kind}")
        };
        self.consume(TokenKind::LeftParen, &paren_message)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    let error = ParseError::too_many("parameters", &self.current);
                    self.report(error);
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name")?);

                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expect ')' after parameters")?;
        self.consume(
            TokenKind::LeftBrace,
            &format!("Expect '{{' before {kind} body"),
        )?;

        // a loop around the declaration does not make `break` legal inside the body
        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block();
        self.loop_depth = enclosing_loops;

        Ok(FunctionDecl {
            name,
            keyword,
            params,
            body: body?,
        })
    }
}
