use std::borrow::Cow;
use std::{iter::Peekable, str::CharIndices};

use crate::token::{Span, Token, TokenKind};

pub mod error;

pub use error::{LexError, LexResult};

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    indent_stack: Vec<usize>,
    pending_tokens: Vec<Token<'a>>,
    /// Open brackets; newlines and indentation are insignificant while non-empty.
    brackets: Vec<char>,
    at_line_start: bool,
    /// A token other than Newline/Indent/Dedent was produced on the current line.
    line_has_tokens: bool,
    eof_reached: bool,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            indent_stack: vec![0],
            pending_tokens: Vec::new(),
            brackets: Vec::new(),
            at_line_start: true,
            line_has_tokens: false,
            eof_reached: false,
            line: 1,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        if let Some(token) = self.pending_tokens.pop() {
            return Ok(token);
        }

        if self.eof_reached {
            return Ok(Token::new(TokenKind::EOF, self.empty_span()));
        }

        if self.at_line_start {
            self.at_line_start = false;
            if let Some(token) = self.handle_indentation()? {
                return Ok(token);
            }
        }

        self.skip_insignificant();

        let Some(&(start_idx, ch)) = self.chars.peek() else {
            return self.finish();
        };

        let start_line = self.line;
        let start_column = self.column;
        let span = |end: usize| Span {
            start: start_idx,
            end,
            line: start_line,
            column: start_column,
        };

        if ch == '\n' {
            self.advance_char();
            self.at_line_start = true;
            self.line_has_tokens = false;
            return Ok(Token::new(TokenKind::Newline, span(start_idx + 1)));
        }

        self.line_has_tokens = true;
        match ch {
            '"' | '\'' => self.read_string(ch, start_idx, start_line, start_column),
            c if c.is_alphabetic() || c == '_' => {
                Ok(self.read_identifier(start_idx, start_line, start_column))
            }
            c if c.is_ascii_digit() => self.read_number(start_idx, start_line, start_column),
            '.' if self.input[start_idx + 1..].starts_with(|c: char| c.is_ascii_digit()) => {
                self.read_number(start_idx, start_line, start_column)
            }
            _ => {
                let Some((kind, len)) = punctuation(&self.input[start_idx..]) else {
                    return Err(LexError::UnexpectedCharacter {
                        character: ch,
                        line: start_line,
                        column: start_column,
                    });
                };
                self.track_bracket(ch, start_line, start_column)?;
                for _ in 0..len {
                    self.advance_char();
                }
                Ok(Token::new(kind, span(start_idx + len)))
            }
        }
    }

    /// Emits Indent/Dedent for the line about to be scanned. Returns `None` when
    /// the indentation level is unchanged or the line is blank.
    fn handle_indentation(&mut self) -> LexResult<Option<Token<'a>>> {
        if !self.brackets.is_empty() {
            return Ok(None);
        }
        let Some(indent_level) = self.count_indentation()? else {
            return Ok(None);
        };
        let current_indent = *self.indent_stack.last().unwrap_or(&0);
        let span = self.empty_span();

        if indent_level > current_indent {
            self.indent_stack.push(indent_level);
            return Ok(Some(Token::new(TokenKind::Indent, span)));
        }
        if indent_level < current_indent {
            while let Some(&top) = self.indent_stack.last() {
                if top > indent_level {
                    self.indent_stack.pop();
                    self.pending_tokens.push(Token::new(TokenKind::Dedent, span));
                } else {
                    break;
                }
            }
            if self.indent_stack.last() != Some(&indent_level) {
                return Err(LexError::InvalidDedent {
                    indent_level,
                    line: self.line,
                    column: self.column,
                });
            }
            return Ok(self.pending_tokens.pop());
        }
        Ok(None)
    }

    /// Closes the final logical line and unwinds indentation at end of input.
    fn finish(&mut self) -> LexResult<Token<'a>> {
        if let Some(&open) = self.brackets.last() {
            return Err(LexError::UnbalancedBracket {
                character: open,
                line: self.line,
                column: self.column,
            });
        }
        self.eof_reached = true;
        let span = self.empty_span();
        self.pending_tokens.push(Token::new(TokenKind::EOF, span));
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending_tokens.push(Token::new(TokenKind::Dedent, span));
        }
        if self.line_has_tokens {
            self.line_has_tokens = false;
            self.pending_tokens.push(Token::new(TokenKind::Newline, span));
        }
        // pending_tokens is non-empty: EOF was pushed above
        Ok(self
            .pending_tokens
            .pop()
            .unwrap_or_else(|| Token::new(TokenKind::EOF, span)))
    }

    /// Counts leading spaces. Blank and comment-only lines yield `None` so they
    /// never open or close a block.
    fn count_indentation(&mut self) -> LexResult<Option<usize>> {
        let mut lookahead = self.chars.clone();
        while let Some(&(_, c)) = lookahead.peek() {
            match c {
                ' ' => {
                    lookahead.next();
                }
                '\t' => {
                    return Err(LexError::TabIndentation {
                        line: self.line,
                        column: self.column,
                    });
                }
                '\n' | '\r' | '#' => return Ok(None),
                _ => break,
            }
        }
        if lookahead.peek().is_none() {
            return Ok(None);
        }

        let mut count = 0;
        while let Some(&(_, ' ')) = self.chars.peek() {
            self.advance_char();
            count += 1;
        }
        Ok(Some(count))
    }

    /// Skips spaces, comments, line continuations and newlines inside brackets.
    fn skip_insignificant(&mut self) {
        while let Some(&(idx, c)) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance_char();
                }
                '#' => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance_char();
                    }
                }
                '\\' if self.input[idx + 1..].starts_with('\n') => {
                    self.advance_char();
                    self.advance_char();
                }
                '\n' if !self.brackets.is_empty() => {
                    self.advance_char();
                }
                _ => break,
            }
        }
    }

    fn track_bracket(&mut self, ch: char, line: usize, column: usize) -> LexResult<()> {
        match ch {
            '(' | '[' | '{' => self.brackets.push(ch),
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if self.brackets.pop() != Some(expected) {
                    return Err(LexError::UnbalancedBracket {
                        character: ch,
                        line,
                        column,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }
        let end_idx = self.current_index();
        let ident = &self.input[start..end_idx];
        let kind = TokenKind::keyword(ident).unwrap_or(TokenKind::Identifier(ident));
        Token::new(
            kind,
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        )
    }

    /// Reads `123`, `1.5`, `.5`, `1.`, `2e10`, `1e-05`, `0x1F`, `0o17`, `0b101`.
    /// The lexeme is kept verbatim.
    fn read_number(&mut self, start: usize, line: usize, column: usize) -> LexResult<Token<'a>> {
        if let Some(radix) = radix_prefix(&self.input[start..]) {
            self.advance_char();
            self.advance_char();
            let digits = self.consume_digits_in(radix);
            return self.finish_number(start, line, column, digits > 0);
        }
        self.consume_digits();
        if let Some(&(_, '.')) = self.chars.peek() {
            self.advance_char();
            self.consume_digits();
        }
        if let Some(&(_, 'e' | 'E')) = self.chars.peek() {
            self.advance_char();
            if let Some(&(_, '+' | '-')) = self.chars.peek() {
                self.advance_char();
            }
            if self.consume_digits() == 0 {
                return self.finish_number(start, line, column, false);
            }
        }
        self.finish_number(start, line, column, true)
    }

    /// Rejects a lexeme without digits or with letters glued to its end.
    fn finish_number(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
        has_digits: bool,
    ) -> LexResult<Token<'a>> {
        let end_idx = self.current_index();
        if !has_digits {
            return Err(LexError::InvalidNumberLiteral {
                literal: self.input[start..end_idx].to_string(),
                line,
                column,
            });
        }
        if let Some(&(_, c)) = self.chars.peek()
            && (c.is_alphanumeric() || c == '_')
        {
            return Err(LexError::InvalidNumberLiteral {
                literal: format!("{}{c}", &self.input[start..end_idx]),
                line,
                column,
            });
        }
        Ok(Token::new(
            TokenKind::Number(&self.input[start..end_idx]),
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        ))
    }

    fn consume_digits(&mut self) -> usize {
        self.consume_digits_in(10)
    }

    /// Digits of `radix` with `_` separators between them.
    fn consume_digits_in(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_digit(radix) || (c == '_' && count > 0) {
                self.advance_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_string(
        &mut self,
        quote: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> LexResult<Token<'a>> {
        let triple: String = std::iter::repeat_n(quote, 3).collect();
        let is_triple = self.input[start..].starts_with(&triple);
        let delimiter_len = if is_triple { 3 } else { 1 };
        for _ in 0..delimiter_len {
            self.advance_char();
        }

        let content_start = start + delimiter_len;
        let mut decoded: Option<String> = None;
        while let Some(&(idx, c)) = self.chars.peek() {
            let closes = if is_triple {
                self.input[idx..].starts_with(&triple)
            } else {
                c == quote
            };
            if closes {
                for _ in 0..delimiter_len {
                    self.advance_char();
                }
                let content = match decoded {
                    Some(text) => Cow::Owned(text),
                    None => Cow::Borrowed(&self.input[content_start..idx]),
                };
                return Ok(Token::new(
                    TokenKind::String(content),
                    Span {
                        start,
                        end: idx + delimiter_len,
                        line,
                        column,
                    },
                ));
            }
            if c == '\n' && !is_triple {
                break;
            }
            self.advance_char();
            if c == '\\' {
                let text =
                    decoded.get_or_insert_with(|| self.input[content_start..idx].to_string());
                let Some((_, escaped)) = self.advance_char() else {
                    break;
                };
                match escaped {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    'r' => text.push('\r'),
                    '0' => text.push('\0'),
                    '\\' | '\'' | '"' => text.push(escaped),
                    '\n' => {}
                    other => {
                        text.push('\\');
                        text.push(other);
                    }
                }
            } else if let Some(text) = decoded.as_mut() {
                text.push(c);
            }
        }
        Err(LexError::UnterminatedString { line, column })
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn empty_span(&mut self) -> Span {
        let index = self.current_index();
        Span {
            start: index,
            end: index,
            line: self.line,
            column: self.column,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token())
    }
}

/// Radix of a `0x`, `0o` or `0b` prefixed integer.
fn radix_prefix(rest: &str) -> Option<u32> {
    match rest.as_bytes() {
        [b'0', b'x' | b'X', ..] => Some(16),
        [b'0', b'o' | b'O', ..] => Some(8),
        [b'0', b'b' | b'B', ..] => Some(2),
        _ => None,
    }
}

/// Longest-match operator and delimiter lookup.
fn punctuation(rest: &str) -> Option<(TokenKind<'static>, usize)> {
    const AUGMENTED: [&str; 13] = [
        "//=", "**=", ">>=", "<<=", "+=", "-=", "*=", "/=", "%=", "@=", "&=", "|=", "^=",
    ];
    for op in AUGMENTED {
        if rest.starts_with(op) {
            return Some((TokenKind::AugAssign(&op[..op.len() - 1]), op.len()));
        }
    }

    let two = match rest.get(..2) {
        Some("**") => Some(TokenKind::DoubleStar),
        Some("//") => Some(TokenKind::DoubleSlash),
        Some("<<") => Some(TokenKind::LeftShift),
        Some(">>") => Some(TokenKind::RightShift),
        Some("==") => Some(TokenKind::EqualEqual),
        Some("!=") => Some(TokenKind::NotEqual),
        Some("<=") => Some(TokenKind::LessEqual),
        Some(">=") => Some(TokenKind::GreaterEqual),
        _ => None,
    };
    if let Some(kind) = two {
        return Some((kind, 2));
    }

    let one = match rest.chars().next()? {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '@' => TokenKind::At,
        '&' => TokenKind::Ampersand,
        '|' => TokenKind::Pipe,
        '^' => TokenKind::Caret,
        '~' => TokenKind::Tilde,
        '<' => TokenKind::Less,
        '>' => TokenKind::Greater,
        '=' => TokenKind::Equal,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        '.' => TokenKind::Dot,
        ';' => TokenKind::Semicolon,
        _ => return None,
    };
    Some((one, 1))
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::EOF);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}
