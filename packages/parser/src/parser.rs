use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;

/// Parse a complete Lua module into a root block
pub fn parse(source: &str) -> ParseResult<Block> {
    Parser::new(source).parse_module()
}

/// Recursive-descent parser over the token stream
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source_len: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let tokens = tokenize(source);
        Self {
            tokens,
            pos: 0,
            source_len: source.len(),
        }
    }

    /// Parse the root module body
    pub fn parse_module(&mut self) -> ParseResult<Block> {
        let block = self.parse_block()?;
        if !self.is_at_end() {
            return Err(ParseError::unexpected_token(
                self.current_pos(),
                "statement",
                self.describe_current(),
            ));
        }
        Ok(block)
    }

    /// Parse statements until a block terminator. A `return` statement
    /// always closes the block (Lua only allows it in final position).
    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut body = Vec::new();

        loop {
            if self.block_ends() {
                break;
            }

            if self.match_token(Token::Semicolon) {
                continue;
            }

            if self.check(Token::Return) {
                body.push(self.parse_return()?);
                self.match_token(Token::Semicolon);
                break;
            }

            body.push(self.parse_statement()?);
        }

        Ok(Block { body })
    }

    fn block_ends(&self) -> bool {
        matches!(
            self.peek_token(),
            None | Some(Token::End) | Some(Token::Else) | Some(Token::Elseif) | Some(Token::Until)
        )
    }

    fn parse_statement(&mut self) -> ParseResult<Stat> {
        match self.peek_token() {
            Some(Token::Local) => self.parse_local(),
            Some(Token::Function) => self.parse_function_statement(),
            Some(Token::Do) => self.parse_do(),
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::Repeat) => self.parse_repeat(),
            Some(Token::For) => self.parse_for(),
            Some(Token::Break) => {
                let start = self.current_pos();
                self.advance();
                Ok(Stat::Break {
                    span: self.span_from(start),
                })
            }
            Some(Token::Error) => Err(ParseError::lexer_error(self.current_pos())),
            Some(_) => self.parse_expr_statement(),
            None => Err(ParseError::unexpected_eof(self.current_pos())),
        }
    }

    /// `local a, b = x, y` or `local function f() ... end`
    fn parse_local(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::Local)?;

        if self.match_token(Token::Function) {
            let name = self.expect_ident()?;
            let (params, body) = self.parse_function_body()?;
            return Ok(Stat::Function(FunctionDeclaration {
                name: FunctionName::Name(name),
                params,
                body,
                is_local: true,
                span: self.span_from(start),
            }));
        }

        let mut names = vec![self.expect_ident()?];
        while self.match_token(Token::Comma) {
            names.push(self.expect_ident()?);
        }

        let mut values = Vec::new();
        if self.match_token(Token::Assign) {
            values = self.parse_expr_list()?;
        }

        Ok(Stat::Local(LocalDeclaration {
            names,
            values,
            span: self.span_from(start),
        }))
    }

    /// `function Name(...)`, `function Base.member(...)`, `function Base:member(...)`
    fn parse_function_statement(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::Function)?;

        let base = self.expect_ident()?;
        let name = if self.match_token(Token::Dot) {
            let member = self.expect_ident()?;
            self.reject_nested_function_name()?;
            FunctionName::Member {
                base,
                indexer: Indexer::Dot,
                member,
            }
        } else if self.match_token(Token::Colon) {
            let member = self.expect_ident()?;
            FunctionName::Member {
                base,
                indexer: Indexer::Colon,
                member,
            }
        } else {
            FunctionName::Name(base)
        };

        let (params, body) = self.parse_function_body()?;

        Ok(Stat::Function(FunctionDeclaration {
            name,
            params,
            body,
            is_local: false,
            span: self.span_from(start),
        }))
    }

    fn reject_nested_function_name(&self) -> ParseResult<()> {
        if matches!(self.peek_token(), Some(Token::Dot) | Some(Token::Colon)) {
            return Err(ParseError::invalid_syntax(
                self.current_pos(),
                "nested function names are not supported",
            ));
        }
        Ok(())
    }

    /// `(params) block end`
    fn parse_function_body(&mut self) -> ParseResult<(Vec<Param>, Block)> {
        self.expect(Token::LParen)?;

        let mut params = Vec::new();
        if !self.check(Token::RParen) {
            loop {
                match self.peek_token() {
                    Some(Token::Ident(_)) => {
                        params.push(Param::Name(self.expect_ident()?));
                    }
                    Some(Token::Ellipsis) => {
                        self.advance();
                        params.push(Param::Vararg);
                        // vararg must be the last parameter
                        break;
                    }
                    _ => {
                        return Err(ParseError::unexpected_token(
                            self.current_pos(),
                            "parameter name or '...'",
                            self.describe_current(),
                        ));
                    }
                }
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }

        self.expect(Token::RParen)?;
        let body = self.parse_block()?;
        self.expect(Token::End)?;

        Ok((params, body))
    }

    fn parse_do(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::Do)?;
        let body = self.parse_block()?;
        self.expect(Token::End)?;
        Ok(Stat::Do {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_if(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::If)?;

        let mut arms = Vec::new();
        let condition = self.parse_expr()?;
        self.expect(Token::Then)?;
        arms.push((condition, self.parse_block()?));

        while self.match_token(Token::Elseif) {
            let condition = self.parse_expr()?;
            self.expect(Token::Then)?;
            arms.push((condition, self.parse_block()?));
        }

        let else_body = if self.match_token(Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        self.expect(Token::End)?;

        Ok(Stat::If {
            arms,
            else_body,
            span: self.span_from(start),
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::While)?;
        let condition = self.parse_expr()?;
        self.expect(Token::Do)?;
        let body = self.parse_block()?;
        self.expect(Token::End)?;
        Ok(Stat::While {
            condition,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_repeat(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::Repeat)?;
        let body = self.parse_block()?;
        self.expect(Token::Until)?;
        let condition = self.parse_expr()?;
        Ok(Stat::Repeat {
            body,
            condition,
            span: self.span_from(start),
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::For)?;

        let first = self.expect_ident()?;

        if self.match_token(Token::Assign) {
            let from = self.parse_expr()?;
            self.expect(Token::Comma)?;
            let limit = self.parse_expr()?;
            let step = if self.match_token(Token::Comma) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect(Token::Do)?;
            let body = self.parse_block()?;
            self.expect(Token::End)?;
            return Ok(Stat::NumericFor {
                variable: first,
                start: from,
                limit,
                step,
                body,
                span: self.span_from(start),
            });
        }

        let mut names = vec![first];
        while self.match_token(Token::Comma) {
            names.push(self.expect_ident()?);
        }
        self.expect(Token::In)?;
        let exprs = self.parse_expr_list()?;
        self.expect(Token::Do)?;
        let body = self.parse_block()?;
        self.expect(Token::End)?;

        Ok(Stat::GenericFor {
            names,
            exprs,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        self.expect(Token::Return)?;

        let arguments = if self.block_ends() || self.check(Token::Semicolon) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };

        Ok(Stat::Return(ReturnStatement {
            arguments,
            span: self.span_from(start),
        }))
    }

    /// Assignment or call statement, both starting with a suffixed expression
    fn parse_expr_statement(&mut self) -> ParseResult<Stat> {
        let start = self.current_pos();
        let first = self.parse_suffixed_expr()?;

        if self.check(Token::Assign) || self.check(Token::Comma) {
            let mut targets = vec![first];
            while self.match_token(Token::Comma) {
                targets.push(self.parse_suffixed_expr()?);
            }
            self.expect(Token::Assign)?;
            let values = self.parse_expr_list()?;
            return Ok(Stat::Assign(AssignmentStatement {
                targets,
                values,
                span: self.span_from(start),
            }));
        }

        match first {
            call @ Expr::Call { .. } => Ok(Stat::Call {
                expr: call,
                span: self.span_from(start),
            }),
            _ => Err(ParseError::invalid_syntax(
                start,
                "expression is not a statement",
            )),
        }
    }

    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.match_token(Token::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    // ---- expressions -------------------------------------------------

    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(0)
    }

    /// Precedence climbing over Lua's binary operator table
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary_expr()?;

        while let Some((op, left_prec, right_prec)) =
            self.peek_token().and_then(binary_op_precedence)
        {
            if left_prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary_expr(right_prec)?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_token() {
            Some(Token::Not) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Negate),
            Some(Token::Hash) => Some(UnaryOp::Length),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.current_pos();
            self.advance();
            // unary binds tighter than every binary operator except '^'
            let operand = self.parse_binary_expr(UNARY_PRECEDENCE)?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }

        self.parse_simple_expr()
    }

    fn parse_simple_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_pos();
        match self.peek_token().cloned() {
            Some(Token::Nil) => {
                self.advance();
                Ok(Expr::Nil {
                    span: self.span_from(start),
                })
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr::Boolean {
                    value: true,
                    span: self.span_from(start),
                })
            }
            Some(Token::False) => {
                self.advance();
                Ok(Expr::Boolean {
                    value: false,
                    span: self.span_from(start),
                })
            }
            Some(Token::Number(value)) => {
                self.advance();
                Ok(Expr::Number {
                    value,
                    span: self.span_from(start),
                })
            }
            Some(Token::String(value)) => {
                self.advance();
                Ok(Expr::String {
                    value: value.to_string(),
                    span: self.span_from(start),
                })
            }
            Some(Token::Ellipsis) => {
                self.advance();
                Ok(Expr::Vararg {
                    span: self.span_from(start),
                })
            }
            Some(Token::Function) => {
                self.advance();
                let (params, body) = self.parse_function_body()?;
                Ok(Expr::Function {
                    params,
                    body,
                    span: self.span_from(start),
                })
            }
            Some(Token::LBrace) => Ok(Expr::Table(self.parse_table_constructor()?)),
            Some(Token::Error) => Err(ParseError::lexer_error(start)),
            _ => self.parse_suffixed_expr(),
        }
    }

    /// Prefix expression followed by `.name`, `[expr]`, `:name(args)` or call arguments
    fn parse_suffixed_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_pos();
        let mut expr = self.parse_prefix_expr()?;

        loop {
            match self.peek_token() {
                Some(Token::Dot) => {
                    self.advance();
                    let member = self.expect_ident()?;
                    expr = Expr::Member {
                        base: Box::new(expr),
                        member,
                        span: self.span_from(start),
                    };
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let key = self.parse_expr()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        key: Box::new(key),
                        span: self.span_from(start),
                    };
                }
                Some(Token::Colon) => {
                    self.advance();
                    let method = self.expect_ident()?;
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        method: Some(method),
                        args,
                        span: self.span_from(start),
                    };
                }
                Some(Token::LParen) | Some(Token::String(_)) | Some(Token::LBrace) => {
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        method: None,
                        args,
                        span: self.span_from(start),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_prefix_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_pos();
        match self.peek_token().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(Expr::Identifier {
                    name: name.to_string(),
                    span: self.span_from(start),
                })
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Error) => Err(ParseError::lexer_error(start)),
            Some(_) => Err(ParseError::unexpected_token(
                start,
                "expression",
                self.describe_current(),
            )),
            None => Err(ParseError::unexpected_eof(start)),
        }
    }

    /// `(exprlist)`, a bare string argument, or a bare table argument
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        match self.peek_token().cloned() {
            Some(Token::LParen) => {
                self.advance();
                let args = if self.check(Token::RParen) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect(Token::RParen)?;
                Ok(args)
            }
            Some(Token::String(value)) => {
                let start = self.current_pos();
                self.advance();
                Ok(vec![Expr::String {
                    value: value.to_string(),
                    span: self.span_from(start),
                }])
            }
            Some(Token::LBrace) => Ok(vec![Expr::Table(self.parse_table_constructor()?)]),
            _ => Err(ParseError::unexpected_token(
                self.current_pos(),
                "call arguments",
                self.describe_current(),
            )),
        }
    }

    fn parse_table_constructor(&mut self) -> ParseResult<TableConstructor> {
        let start = self.current_pos();
        self.expect(Token::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            let field = match self.peek_token() {
                Some(Token::Ident(_)) if self.peek_token_at(1) == Some(&Token::Assign) => {
                    let key = self.expect_ident()?;
                    self.expect(Token::Assign)?;
                    let value = self.parse_expr()?;
                    TableField::Named { key, value }
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let key = self.parse_expr()?;
                    self.expect(Token::RBracket)?;
                    self.expect(Token::Assign)?;
                    let value = self.parse_expr()?;
                    TableField::Indexed { key, value }
                }
                _ => TableField::Item {
                    value: self.parse_expr()?,
                },
            };
            fields.push(field);

            if !self.match_token(Token::Comma) && !self.match_token(Token::Semicolon) {
                break;
            }
        }

        self.expect(Token::RBrace)?;

        Ok(TableConstructor {
            fields,
            span: self.span_from(start),
        })
    }

    // ---- token helpers -----------------------------------------------

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token<'src>> {
        self.peek().map(|(t, _)| t)
    }

    fn peek_token_at(&self, offset: usize) -> Option<&Token<'src>> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token<'src>) -> bool {
        self.peek_token() == Some(&token)
    }

    fn match_token(&mut self, token: Token<'src>) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token<'src>) -> ParseResult<()> {
        if self.match_token(token.clone()) {
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.current_pos()))
        } else {
            Err(ParseError::unexpected_token(
                self.current_pos(),
                format!("{:?}", token),
                self.describe_current(),
            ))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek_token().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(name.to_string())
            }
            Some(_) => Err(ParseError::unexpected_token(
                self.current_pos(),
                "identifier",
                self.describe_current(),
            )),
            None => Err(ParseError::unexpected_eof(self.current_pos())),
        }
    }

    fn current_pos(&self) -> usize {
        self.peek()
            .map(|(_, range)| range.start)
            .unwrap_or(self.source_len)
    }

    fn span_from(&self, start: usize) -> Span {
        let end = if self.pos > 0 {
            self.tokens[self.pos - 1].1.end
        } else {
            start
        };
        Span::new(start, end)
    }

    fn describe_current(&self) -> String {
        match self.peek_token() {
            Some(token) => format!("{:?}", token),
            None => "end of file".to_string(),
        }
    }
}

const UNARY_PRECEDENCE: u8 = 14;

/// (operator, left precedence, right precedence); concat and power are
/// right-associative so their right precedence is lower than their left
fn binary_op_precedence(token: &Token<'_>) -> Option<(BinaryOp, u8, u8)> {
    use BinaryOp::*;
    Some(match token {
        Token::Or => (Or, 1, 2),
        Token::And => (And, 3, 4),
        Token::Less => (LessThan, 5, 6),
        Token::Greater => (GreaterThan, 5, 6),
        Token::LessEq => (LessThanOrEqual, 5, 6),
        Token::GreaterEq => (GreaterThanOrEqual, 5, 6),
        Token::EqEq => (Equals, 5, 6),
        Token::NotEq => (NotEquals, 5, 6),
        Token::Concat => (Concat, 9, 8),
        Token::Plus => (Add, 10, 11),
        Token::Minus => (Subtract, 10, 11),
        Token::Star => (Multiply, 12, 13),
        Token::Slash => (Divide, 12, 13),
        Token::Percent => (Modulo, 12, 13),
        Token::Caret => (Power, 18, 17),
        _ => return None,
    })
}
