// Expression parsing module
// One method per precedence level, lowest (assignment) to highest (primary)

use crate::ast::*;
use crate::error::*;
use crate::parser::Parser;
use crate::stack::with_stack_headroom;
use crate::token::TokenKind;

impl Parser<'_> {
    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        with_stack_headroom(|| self.assignment())
    }

    /// Right-associative; only variables and properties are valid targets
    fn assignment(&mut self) -> ParseResult<Expr> {
        let mut target = self.conditional()?;

        if !self.matches(TokenKind::Equal) {
            return Ok(target);
        }

        let equals = self.previous.clone();
        let value = self.assignment()?;

        if let Expr::Variable(variable) = &target {
            return Ok(Expr::assign(variable.name.clone(), value));
        }
        if let Expr::Get(get) = &mut target {
            return Ok(Expr::Set(Set {
                object: Box::new(get.object.take()),
                name: get.name.clone(),
                value: Box::new(value),
            }));
        }

        self.report(ParseError::invalid_assignment_target(&equals));
        Ok(target)
    }

    /// `cond ? a : b`; the else branch recurses so the operator nests to the right
    fn conditional(&mut self) -> ParseResult<Expr> {
        let condition = self.or()?;

        if !self.matches(TokenKind::Question) {
            return Ok(condition);
        }

        let then_branch = self.expression()?;
        self.consume(TokenKind::Colon, "Expect ':' after then branch of conditional expression")?;
        let else_branch = self.conditional()?;

        Ok(Expr::Conditional(Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }))
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.matches(TokenKind::Or) {
            let token = self.previous.clone();
            let right = self.and()?;
            expr = Expr::Logical(Logical {
                left: Box::new(expr),
                operator: LogicalOperator::Or,
                token,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.matches(TokenKind::And) {
            let token = self.previous.clone();
            let right = self.equality()?;
            expr = Expr::Logical(Logical {
                left: Box::new(expr),
                operator: LogicalOperator::And,
                token,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::Slash, TokenKind::Star], Self::unary)
    }

    /// Left-associative chain of `operand (op operand)*`
    fn binary_level(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.matches_any(operators) {
            let token = self.previous.clone();
            let Some(operator) = binary_operator(token.kind) else {
                return Err(ParseError::unexpected(&token, "Expect binary operator"));
            };
            let right = operand(self)?;
            expr = Expr::Binary(Binary {
                left: Box::new(expr),
                operator,
                token,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let operator = match self.current.kind {
            TokenKind::Bang => UnaryOperator::Not,
            TokenKind::Minus => UnaryOperator::Negate,
            _ => return self.call(),
        };

        let token = self.advance().clone();
        let right = with_stack_headroom(|| self.unary())?;

        Ok(Expr::Unary(Unary {
            operator,
            token,
            right: Box::new(right),
        }))
    }

    /// Primary followed by any mix of `(args)` and `.name` suffixes
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'")?;
                expr = Expr::Get(Get {
                    object: Box::new(expr),
                    name,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    let error = ParseError::too_many("arguments", &self.current);
                    self.report(error);
                }
                arguments.push(self.expression()?);

                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments")?;

        Ok(Expr::Call(Call {
            callee: Box::new(callee),
            paren,
            arguments,
        }))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let value = match self.current.kind {
            TokenKind::False => LiteralValue::Boolean(false),
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::Nil => LiteralValue::Nil,
            TokenKind::Number => match self.current.lexeme.parse::<f64>() {
                Ok(number) => LiteralValue::Number(number),
                Err(_) => return Err(self.error_at_current("Invalid number literal")),
            },
            TokenKind::String => LiteralValue::String(self.current.string_contents().to_string()),
            TokenKind::Identifier => {
                let name = self.advance().clone();
                return Ok(Expr::variable(name));
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression")?;
                return Ok(Expr::Grouping(Box::new(inner)));
            }
            TokenKind::Fun => {
                self.advance();
                return self.anonymous_function();
            }
            _ => return Err(self.error_at_current("Expect expression")),
        };

        let token = self.advance().clone();
        Ok(Expr::literal(value, token))
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::EqualEqual => BinaryOperator::Equal,
        TokenKind::BangEqual => BinaryOperator::NotEqual,
        _ => return None,
    };
    Some(operator)
}
