use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Character-level scanner over the source text. Holds the input position
/// state (current line and column), initialized once at construction and
/// advanced on every consumed character. Knows nothing about parsing.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Returns the next classified token, or a token of kind `Eof` once the
    /// input is exhausted (idempotently). Fails when no valid transition
    /// exists from the current state for the current character.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace_and_comments()?;

        let start = self.position();

        let c = match self.bump() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    span: Span { start, end: start },
                })
            }
        };

        let kind = match c {
            '*' => TokenKind::Multiply,
            '/' => {
                if self.peek() == Some('/') {
                    self.bump();
                    TokenKind::IntDivide
                } else {
                    TokenKind::Divide
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '#' => TokenKind::CharCount,
            '<' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '~' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::NotEq
                } else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedCharacter { character: '~' },
                        start,
                    ));
                }
            }
            '.' => {
                if self.peek() == Some('.') {
                    self.bump();
                    TokenKind::Concat
                } else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedCharacter { character: '.' },
                        start,
                    ));
                }
            }
            ':' => TokenKind::Colon,
            '(' => TokenKind::LeftBracket,
            ')' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            '"' => self.lex_string(start)?,
            c if c.is_ascii_digit() => self.lex_number(c, start)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(c),
            c => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedCharacter { character: c },
                    start,
                ))
            }
        };

        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.position(),
            },
        })
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('-') if self.peek_next() == Some('-') => {
                    self.bump();
                    self.bump();
                    self.skip_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), Error> {
        // `--[[` opens a block comment closed by `]]`; anything else after
        // `--` runs to the end of the line.
        if self.peek() == Some('[') && self.peek_next() == Some('[') {
            let start = self.position();
            self.bump();
            self.bump();
            loop {
                match self.bump() {
                    Some(']') if self.peek() == Some(']') => {
                        self.bump();
                        return Ok(());
                    }
                    Some(_) => {}
                    None => {
                        return Err(Error::new(ErrorImpl::UnterminatedComment, start));
                    }
                }
            }
        }

        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        Ok(())
    }

    fn lex_number(&mut self, first: char, start: Position) -> Result<TokenKind, Error> {
        let mut literal = String::from(first);
        let mut is_decimal = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                literal.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            literal.push('.');
            self.bump();
            is_decimal = true;

            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(Error::new(ErrorImpl::MalformedNumber { literal }, start));
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    literal.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            literal.push(self.bump().unwrap_or('e'));
            is_decimal = true;

            if matches!(self.peek(), Some('+') | Some('-')) {
                literal.push(self.bump().unwrap_or('+'));
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(Error::new(ErrorImpl::MalformedNumber { literal }, start));
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    literal.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }

        if is_decimal {
            match literal.parse::<f64>() {
                Ok(value) => Ok(TokenKind::Decimal(value)),
                Err(_) => Err(Error::new(ErrorImpl::MalformedNumber { literal }, start)),
            }
        } else {
            match literal.parse::<i64>() {
                Ok(value) => Ok(TokenKind::Integer(value)),
                Err(_) => Err(Error::new(ErrorImpl::MalformedNumber { literal }, start)),
            }
        }
    }

    fn lex_string(&mut self, start: Position) -> Result<TokenKind, Error> {
        let mut value = String::new();

        loop {
            let escape_pos = self.position();
            match self.bump() {
                None | Some('\n') => {
                    return Err(Error::new(ErrorImpl::UnterminatedString, start));
                }
                Some('"') => return Ok(TokenKind::Str(value)),
                Some('\\') => value.push(self.lex_escape(escape_pos)?),
                Some(c) => value.push(c),
            }
        }
    }

    fn lex_escape(&mut self, pos: Position) -> Result<char, Error> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some(d) if d.is_ascii_digit() => {
                // \ddd, exactly three digits, value 001-255
                let mut sequence = String::from(d);
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_digit() => {
                            sequence.push(c);
                            self.bump();
                        }
                        _ => {
                            return Err(Error::new(ErrorImpl::InvalidEscape { sequence }, pos));
                        }
                    }
                }
                match sequence.parse::<u32>() {
                    Ok(value) if (1..=255).contains(&value) => Ok(value as u8 as char),
                    _ => Err(Error::new(ErrorImpl::InvalidEscape { sequence }, pos)),
                }
            }
            Some('x') => {
                // \xXX, exactly two hex digits, value 01-FF
                let mut sequence = String::from("x");
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            sequence.push(c);
                            self.bump();
                        }
                        _ => {
                            return Err(Error::new(ErrorImpl::InvalidEscape { sequence }, pos));
                        }
                    }
                }
                match u8::from_str_radix(&sequence[1..], 16) {
                    Ok(value) if value > 0 => Ok(value as char),
                    _ => Err(Error::new(ErrorImpl::InvalidEscape { sequence }, pos)),
                }
            }
            Some(c) => Err(Error::new(
                ErrorImpl::InvalidEscape {
                    sequence: String::from(c),
                },
                pos,
            )),
            None => Err(Error::new(ErrorImpl::UnterminatedString, pos)),
        }
    }

    fn lex_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if let Some(keyword) = RESERVED_LOOKUP.get(name.as_str()) {
            TokenKind::Keyword(*keyword)
        } else {
            TokenKind::Identifier(name)
        }
    }
}

/// Scans the whole source at once. The returned stream always ends with a
/// single `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];

    loop {
        let token = scanner.next_token()?;
        let eof = token.is_eof();
        tokens.push(token);
        if eof {
            return Ok(tokens);
        }
    }
}
