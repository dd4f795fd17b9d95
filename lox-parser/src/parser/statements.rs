// Statement parsing module
// print, blocks, control flow and the `for` desugaring

use crate::ast::*;
use crate::error::*;
use crate::parser::Parser;
use crate::token::{Token, TokenKind};

impl Parser<'_> {
    pub(super) fn statement(&mut self) -> ParseResult<Stmt> {
        match self.current.kind {
            TokenKind::Print => {
                self.advance();
                self.print_statement()
            }
            TokenKind::LeftBrace => {
                self.advance();
                Ok(Stmt::Block(self.block()?))
            }
            TokenKind::If => {
                self.advance();
                self.if_statement()
            }
            TokenKind::While => {
                self.advance();
                self.while_statement()
            }
            TokenKind::For => {
                self.advance();
                self.for_statement()
            }
            TokenKind::Break => {
                self.advance();
                self.break_statement()
            }
            TokenKind::Return => {
                self.advance();
                self.return_statement()
            }
            _ => self.expression_statement(),
        }
    }

    /// Declarations up to the closing brace; the opening brace is already consumed
    pub(super) fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value")?;
        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression")?;
        Ok(Stmt::Expression(expression))
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(If {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after while condition")?;

        let body = self.loop_body()?;
        Ok(Stmt::While(While {
            condition,
            body: Box::new(body),
        }))
    }

    /// `for (init; cond; incr) body` becomes
    /// `{ init; while (cond) { body; incr; } }`, with `true` standing in for
    /// a missing condition.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'")?;

        let initializer = if self.matches(TokenKind::Semicolon) {
            None
        } else if self.matches(TokenKind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses")?;

        let mut body = self.loop_body()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or_else(|| {
            Expr::literal(
                LiteralValue::Boolean(true),
                Token::synthetic(TokenKind::True, "true", keyword.line),
            )
        });
        body = Stmt::While(While {
            condition,
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn loop_body(&mut self) -> ParseResult<Stmt> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();
        if self.loop_depth == 0 {
            return Err(ParseError::break_outside_loop(&keyword));
        }

        self.consume(TokenKind::Semicolon, "Expect ';' after 'break'")?;
        Ok(Stmt::Break(keyword))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(TokenKind::Semicolon, "Expect ';' after return value")?;
        Ok(Stmt::Return(Return { keyword, value }))
    }
}
