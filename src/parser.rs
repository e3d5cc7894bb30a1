use crate::ast::{
    BinaryOperator, BoolOperator, CompareOperator, Constant, Expression, FunctionDef,
    ImportAlias, Module, Parameter, Statement, UnaryOperator,
};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

pub mod error;

pub use error::{ParseError, ParseResult};

/// Maximum nesting of blocks and expressions the parser will descend into.
pub const MAX_NESTING: usize = 128;

const BINARY_LEVELS: usize = 6;

/// Binary operator for `kind` at precedence `level` (0 = `|`, 5 = `*`).
fn binary_operator_at(level: usize, kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    let op = match (level, kind) {
        (0, TokenKind::Pipe) => BinaryOperator::BitOr,
        (1, TokenKind::Caret) => BinaryOperator::BitXor,
        (2, TokenKind::Ampersand) => BinaryOperator::BitAnd,
        (3, TokenKind::LeftShift) => BinaryOperator::LShift,
        (3, TokenKind::RightShift) => BinaryOperator::RShift,
        (4, TokenKind::Plus) => BinaryOperator::Add,
        (4, TokenKind::Minus) => BinaryOperator::Sub,
        (5, TokenKind::Star) => BinaryOperator::Mult,
        (5, TokenKind::Slash) => BinaryOperator::Div,
        (5, TokenKind::DoubleSlash) => BinaryOperator::FloorDiv,
        (5, TokenKind::Percent) => BinaryOperator::Mod,
        (5, TokenKind::At) => BinaryOperator::MatMult,
        _ => return None,
    };
    Some(op)
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !matches!(tokens.last().map(Token::kind), Some(TokenKind::EOF)) {
            let span = tokens.last().map(Token::span).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EOF, span));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    pub fn parse_module(mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        while !self.check(&TokenKind::EOF) {
            if self.consume_newlines() {
                continue;
            }
            self.parse_statement(&mut body)?;
        }
        Ok(Module { body })
    }

    /// Parses input holding exactly one expression, optionally followed by newlines.
    pub fn parse_single_expression(mut self) -> ParseResult<Expression> {
        self.consume_newlines();
        let expr = self.parse_expression_list()?;
        self.consume_newlines();
        self.expect(TokenKind::EOF, "end of input")?;
        Ok(expr)
    }

    fn parse_statement(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        match self.current().kind {
            TokenKind::Def => out.push(self.parse_function_def()?),
            TokenKind::If => out.push(self.parse_if()?),
            TokenKind::For => out.push(self.parse_for()?),
            TokenKind::While => out.push(self.parse_while()?),
            TokenKind::Indent => return Err(self.error("statement")),
            _ => self.parse_simple_statements(out)?,
        }
        Ok(())
    }

    /// `small (';' small)* NEWLINE`
    fn parse_simple_statements(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        loop {
            self.parse_small_statement(out)?;
            if !self.eat(&TokenKind::Semicolon) || self.check(&TokenKind::Newline) {
                break;
            }
        }
        self.expect(TokenKind::Newline, "newline")
    }

    fn parse_small_statement(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        let statement = match self.current().kind {
            TokenKind::Return => {
                self.advance();
                if self.check(&TokenKind::Newline) || self.check(&TokenKind::Semicolon) {
                    Statement::Return(None)
                } else {
                    Statement::Return(Some(self.parse_expression_list()?))
                }
            }
            TokenKind::Pass => {
                self.advance();
                Statement::Pass
            }
            TokenKind::Break => {
                self.advance();
                Statement::Break
            }
            TokenKind::Continue => {
                self.advance();
                Statement::Continue
            }
            TokenKind::Assert => {
                self.advance();
                let condition = self.parse_expression()?;
                let message = if self.eat(&TokenKind::Comma) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                Statement::Assert { condition, message }
            }
            TokenKind::Import => {
                self.advance();
                return self.parse_import(out);
            }
            TokenKind::From => {
                self.advance();
                self.parse_import_from()?
            }
            _ => self.parse_expression_statement()?,
        };
        out.push(statement);
        Ok(())
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let first = self.parse_expression_list()?;

        if let TokenKind::AugAssign(symbol) = self.current().kind {
            let op = self.augmented_operator(symbol)?;
            self.advance();
            let value = self.parse_expression_list()?;
            return Ok(Statement::AugAssign {
                target: first,
                op,
                value,
            });
        }

        if !self.check(&TokenKind::Equal) {
            return Ok(Statement::Expr(first));
        }

        let mut targets = vec![first];
        while self.eat(&TokenKind::Equal) {
            targets.push(self.parse_expression_list()?);
        }
        let value = targets.pop().ok_or_else(|| self.error("assignment value"))?;
        Ok(Statement::Assign { targets, value })
    }

    /// `import a.b [as c] (',' ...)*`, one statement per imported module.
    fn parse_import(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        loop {
            let name = self.parse_dotted_name()?.join(".");
            let alias = self.parse_alias()?;
            out.push(Statement::Import {
                module: Vec::new(),
                names: vec![ImportAlias { name, alias }],
            });
            if !self.eat(&TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    /// `from a.b import x [as y] (',' ...)*`, optionally parenthesized.
    fn parse_import_from(&mut self) -> ParseResult<Statement> {
        if self.check(&TokenKind::Dot) {
            return Err(self.unsupported("Relative imports"));
        }
        let module = self.parse_dotted_name()?;
        self.expect(TokenKind::Import, "import")?;
        if self.check(&TokenKind::Star) {
            return Err(self.unsupported("Wildcard imports"));
        }
        let parenthesized = self.eat(&TokenKind::LParen);
        let mut names = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let alias = self.parse_alias()?;
            names.push(ImportAlias { name, alias });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            if parenthesized && self.check(&TokenKind::RParen) {
                break;
            }
        }
        if parenthesized {
            self.expect(TokenKind::RParen, ")")?;
        }
        Ok(Statement::Import { module, names })
    }

    fn parse_dotted_name(&mut self) -> ParseResult<Vec<String>> {
        let mut path = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::Dot) {
            path.push(self.expect_identifier()?);
        }
        Ok(path)
    }

    fn parse_alias(&mut self) -> ParseResult<Option<String>> {
        if self.eat(&TokenKind::As) {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_function_def(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Def, "def")?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen, "(")?;
        let params = self.parse_parameters(&TokenKind::RParen)?;
        self.expect(TokenKind::RParen, ")")?;
        let body = self.parse_block()?;
        Ok(Statement::FunctionDef(FunctionDef { name, params, body }))
    }

    /// Comma separated bare names up to (not including) `terminator`.
    fn parse_parameters(&mut self, terminator: &TokenKind<'a>) -> ParseResult<Vec<Parameter>> {
        let mut params = Vec::new();
        while !self.check(terminator) {
            if self.check(&TokenKind::Star) || self.check(&TokenKind::DoubleStar) {
                return Err(self.unsupported("Variadic parameters"));
            }
            let name = self.expect_identifier()?;
            if self.check(&TokenKind::Equal) {
                return Err(self.unsupported("Default arguments"));
            }
            if self.check(&TokenKind::Colon) && matches!(terminator, TokenKind::RParen) {
                return Err(self.unsupported("Parameter annotations"));
            }
            params.push(Parameter { name });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        // `if` or `elif`
        self.advance();
        let condition = self.parse_expression()?;
        let then_body = self.parse_block()?;
        let else_body = match self.current().kind {
            TokenKind::Elif => vec![self.parse_if()?],
            TokenKind::Else => {
                self.advance();
                self.parse_block()?
            }
            _ => Vec::new(),
        };
        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::For, "for")?;
        let target = self.parse_target_list()?;
        self.expect(TokenKind::In, "in")?;
        let iterable = self.parse_expression_list()?;
        let body = self.parse_block()?;
        if self.check(&TokenKind::Else) {
            return Err(self.unsupported("Loop else clauses"));
        }
        Ok(Statement::For {
            target,
            iterable,
            body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::While, "while")?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        if self.check(&TokenKind::Else) {
            return Err(self.unsupported("Loop else clauses"));
        }
        Ok(Statement::While { condition, body })
    }

    /// Loop targets stop before `in`, so they are parsed below comparison level.
    fn parse_target_list(&mut self) -> ParseResult<Expression> {
        let first = self.parse_bit_or()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::In) {
                break;
            }
            items.push(self.parse_bit_or()?);
        }
        Ok(Expression::Tuple(items))
    }

    /// `':' NEWLINE INDENT statement+ DEDENT` or `':' simple_statements`.
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect(TokenKind::Colon, ":")?;
        let mut body = Vec::new();
        if !self.eat(&TokenKind::Newline) {
            self.parse_simple_statements(&mut body)?;
            return Ok(body);
        }
        self.consume_newlines();
        self.expect(TokenKind::Indent, "indent")?;
        self.nested(|parser| {
            while !matches!(parser.current().kind, TokenKind::Dedent | TokenKind::EOF) {
                if parser.consume_newlines() {
                    continue;
                }
                parser.parse_statement(&mut body)?;
            }
            Ok(())
        })?;
        self.expect(TokenKind::Dedent, "dedent")?;
        Ok(body)
    }

    /// `expr (',' expr)* [',']`; a comma makes it a tuple.
    fn parse_expression_list(&mut self) -> ParseResult<Expression> {
        let first = self.parse_expression()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.at_expression_end() {
                break;
            }
            items.push(self.parse_expression()?);
        }
        Ok(Expression::Tuple(items))
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(|parser| {
            if parser.eat(&TokenKind::Lambda) {
                let params = parser.parse_parameters(&TokenKind::Colon)?;
                parser.expect(TokenKind::Colon, ":")?;
                let body = parser.parse_expression()?;
                return Ok(Expression::Lambda {
                    params,
                    body: Box::new(body),
                });
            }
            let expr = parser.parse_or()?;
            if parser.check(&TokenKind::If) {
                return Err(parser.unsupported("Conditional expressions"));
            }
            Ok(expr)
        })
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        let first = self.parse_and()?;
        if !self.check(&TokenKind::Or) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(&TokenKind::Or) {
            values.push(self.parse_and()?);
        }
        Ok(Expression::BoolOp {
            op: BoolOperator::Or,
            values,
        })
    }

    fn parse_and(&mut self) -> ParseResult<Expression> {
        let first = self.parse_not()?;
        if !self.check(&TokenKind::And) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(&TokenKind::And) {
            values.push(self.parse_not()?);
        }
        Ok(Expression::BoolOp {
            op: BoolOperator::And,
            values,
        })
    }

    fn parse_not(&mut self) -> ParseResult<Expression> {
        if self.eat(&TokenKind::Not) {
            let operand = self.nested(Self::parse_not)?;
            return Ok(Expression::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_bit_or()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.comparison_operator() {
            ops.push(op);
            comparators.push(self.parse_bit_or()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(Expression::Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    /// Consumes a comparison operator (one or two tokens) if present.
    fn comparison_operator(&mut self) -> Option<CompareOperator> {
        let op = match self.current().kind {
            TokenKind::EqualEqual => CompareOperator::Eq,
            TokenKind::NotEqual => CompareOperator::NotEq,
            TokenKind::Less => CompareOperator::Lt,
            TokenKind::LessEqual => CompareOperator::LtE,
            TokenKind::Greater => CompareOperator::Gt,
            TokenKind::GreaterEqual => CompareOperator::GtE,
            TokenKind::In => CompareOperator::In,
            TokenKind::Not if matches!(self.peek().kind, TokenKind::In) => {
                self.advance();
                CompareOperator::NotIn
            }
            TokenKind::Is if matches!(self.peek().kind, TokenKind::Not) => {
                self.advance();
                CompareOperator::IsNot
            }
            TokenKind::Is => CompareOperator::Is,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn parse_bit_or(&mut self) -> ParseResult<Expression> {
        self.parse_binary_level(0)
    }

    /// Left-associative binary levels, loosest first.
    fn parse_binary_level(&mut self, level: usize) -> ParseResult<Expression> {
        if level == BINARY_LEVELS {
            return self.parse_factor();
        }
        let mut expr = self.parse_binary_level(level + 1)?;
        while let Some(op) = binary_operator_at(level, &self.current().kind) {
            self.advance();
            let right = self.parse_binary_level(level + 1)?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// Unary prefix operators. `-` directly before a number folds into the
    /// literal unless the number is the base of `**`.
    fn parse_factor(&mut self) -> ParseResult<Expression> {
        let op = match self.current().kind {
            TokenKind::Minus => UnaryOperator::Neg,
            TokenKind::Plus => UnaryOperator::Pos,
            TokenKind::Tilde => UnaryOperator::Invert,
            _ => return self.parse_power(),
        };
        self.advance();

        if op == UnaryOperator::Neg
            && let TokenKind::Number(lexeme) = self.current().kind
            && !matches!(self.peek().kind, TokenKind::DoubleStar)
        {
            let literal = self.number_literal(lexeme)?;
            self.advance();
            return self.parse_postfix_from(Expression::Number(format!("-{literal}")));
        }

        let operand = self.nested(Self::parse_factor)?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `postfix ['**' factor]`, right-associative.
    fn parse_power(&mut self) -> ParseResult<Expression> {
        let base = self.parse_postfix()?;
        if !self.eat(&TokenKind::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.nested(Self::parse_factor)?;
        Ok(Expression::BinaryOp {
            left: Box::new(base),
            op: BinaryOperator::Pow,
            right: Box::new(exponent),
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let atom = self.parse_atom()?;
        self.parse_postfix_from(atom)
    }

    fn parse_postfix_from(&mut self, mut expr: Expression) -> ParseResult<Expression> {
        loop {
            match self.current().kind {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_arguments()?;
                    self.expect(TokenKind::RParen, ")")?;
                    expr = Expression::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression_list()?;
                    if self.check(&TokenKind::Colon) {
                        return Err(self.unsupported("Slices"));
                    }
                    self.expect(TokenKind::RBracket, "]")?;
                    expr = Expression::Subscript {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_identifier()?;
                    expr = Expression::Attribute {
                        object: Box::new(expr),
                        name,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Star) || self.check(&TokenKind::DoubleStar) {
                return Err(self.unsupported("Argument unpacking"));
            }
            if matches!(self.current().kind, TokenKind::Identifier(_))
                && matches!(self.peek().kind, TokenKind::Equal)
            {
                return Err(self.unsupported("Keyword arguments"));
            }
            args.push(self.parse_expression()?);
            if self.check(&TokenKind::For) {
                return Err(self.unsupported("Comprehensions"));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn parse_atom(&mut self) -> ParseResult<Expression> {
        let expr = match &self.current().kind {
            TokenKind::Number(lexeme) => Expression::Number(self.number_literal(lexeme)?),
            TokenKind::Identifier(name) => Expression::Name(name.to_string()),
            TokenKind::True => Expression::Constant(Constant::True),
            TokenKind::False => Expression::Constant(Constant::False),
            TokenKind::None => Expression::Constant(Constant::None),
            TokenKind::String(_) => return Ok(self.parse_strings()),
            TokenKind::LParen => return self.nested(Self::parse_parenthesized),
            TokenKind::LBracket => return self.nested(Self::parse_list),
            TokenKind::LBrace => return self.nested(Self::parse_dict),
            _ => return Err(self.error("expression")),
        };
        self.advance();
        Ok(expr)
    }

    /// Number text as q reads it: `_` separators dropped and prefixed integers
    /// written in decimal. Other lexemes are kept as written.
    fn number_literal(&self, lexeme: &str) -> ParseResult<String> {
        let digits = lexeme.replace('_', "");
        let radix = match digits.get(..2) {
            Some("0x" | "0X") => 16,
            Some("0o" | "0O") => 8,
            Some("0b" | "0B") => 2,
            _ => return Ok(digits),
        };
        u128::from_str_radix(&digits[2..], radix)
            .map(|value| value.to_string())
            .map_err(|_| self.unsupported("Integer literals wider than 128 bits"))
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Expression {
        let mut value = String::new();
        while let TokenKind::String(part) = &self.current().kind {
            value.push_str(part);
            self.advance();
        }
        Expression::String(value)
    }

    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        self.expect(TokenKind::LParen, "(")?;
        if self.eat(&TokenKind::RParen) {
            return Ok(Expression::Tuple(Vec::new()));
        }
        let expr = self.parse_expression_list()?;
        if self.check(&TokenKind::For) {
            return Err(self.unsupported("Generator expressions"));
        }
        self.expect(TokenKind::RParen, ")")?;
        Ok(expr)
    }

    fn parse_list(&mut self) -> ParseResult<Expression> {
        self.expect(TokenKind::LBracket, "[")?;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expression()?);
            if self.check(&TokenKind::For) {
                return Err(self.unsupported("Comprehensions"));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "]")?;
        Ok(Expression::List(items))
    }

    fn parse_dict(&mut self) -> ParseResult<Expression> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::DoubleStar) {
                return Err(self.unsupported("Dict unpacking"));
            }
            let key = self.parse_expression()?;
            if !self.check(&TokenKind::Colon) {
                return Err(self.unsupported("Set literals"));
            }
            self.advance();
            let value = self.parse_expression()?;
            if self.check(&TokenKind::For) {
                return Err(self.unsupported("Comprehensions"));
            }
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "}")?;
        Ok(Expression::Dict(entries))
    }

    fn augmented_operator(&self, symbol: &str) -> ParseResult<BinaryOperator> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mult,
            "/" => BinaryOperator::Div,
            "//" => BinaryOperator::FloorDiv,
            "**" => BinaryOperator::Pow,
            "%" => BinaryOperator::Mod,
            "@" => BinaryOperator::MatMult,
            "<<" => BinaryOperator::LShift,
            ">>" => BinaryOperator::RShift,
            "&" => BinaryOperator::BitAnd,
            "|" => BinaryOperator::BitOr,
            "^" => BinaryOperator::BitXor,
            _ => return Err(self.error("augmented assignment operator")),
        };
        Ok(op)
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            let span = self.current().span;
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                line: span.line,
                column: span.column,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn at_expression_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Newline
                | TokenKind::EOF
                | TokenKind::Equal
                | TokenKind::AugAssign(_)
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Semicolon
                | TokenKind::Colon
        )
    }

    fn consume_newlines(&mut self) -> bool {
        let mut consumed = false;
        while self.check(&TokenKind::Newline) {
            consumed = true;
            self.advance();
        }
        consumed
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        if let TokenKind::Identifier(name) = self.current().kind {
            self.advance();
            Ok(name.to_string())
        } else {
            Err(self.error("identifier"))
        }
    }

    fn expect(&mut self, kind: TokenKind<'a>, expected: &str) -> ParseResult<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn eat(&mut self, kind: &TokenKind<'a>) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind<'a>) -> bool {
        &self.current().kind == kind
    }

    fn current(&self) -> &Token<'a> {
        // `new` guarantees a trailing EOF, which is never advanced past.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token<'a> {
        let index = (self.position + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn advance(&mut self) {
        if !matches!(self.current().kind, TokenKind::EOF) {
            self.position += 1;
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: format!("{:?}", token.kind),
            line: token.span.line,
            column: token.span.column,
        }
    }

    fn unsupported(&self, feature: &'static str) -> ParseError {
        let span = self.current().span;
        ParseError::Unsupported {
            feature,
            line: span.line,
            column: span.column,
        }
    }
}

pub fn parse_tokens(tokens: Vec<Token<'_>>) -> ParseResult<Module> {
    Parser::new(tokens).parse_module()
}

pub fn parse_module(source: &str) -> ParseResult<Module> {
    parse_tokens(tokenize(source)?)
}

pub fn parse_expression(source: &str) -> ParseResult<Expression> {
    Parser::new(tokenize(source)?).parse_single_expression()
}
