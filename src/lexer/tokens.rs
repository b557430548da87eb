use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, Keyword> = {
        let mut map = HashMap::new();
        map.insert("do", Keyword::Do);
        map.insert("else", Keyword::Else);
        map.insert("end", Keyword::End);
        map.insert("function", Keyword::Function);
        map.insert("global", Keyword::Global);
        map.insert("if", Keyword::If);
        map.insert("integer", Keyword::Integer);
        map.insert("local", Keyword::Local);
        map.insert("nil", Keyword::Nil);
        map.insert("number", Keyword::Number);
        map.insert("require", Keyword::Require);
        map.insert("return", Keyword::Return);
        map.insert("string", Keyword::String);
        map.insert("then", Keyword::Then);
        map.insert("while", Keyword::While);
        map
    };
}

/// The fixed reserved-word set, recognized by exact match after an
/// identifier has been scanned.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Do,
    Else,
    End,
    Function,
    Global,
    If,
    Integer,
    Local,
    Nil,
    Number,
    Require,
    Return,
    String,
    Then,
    While,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::End => "end",
            Keyword::Function => "function",
            Keyword::Global => "global",
            Keyword::If => "if",
            Keyword::Integer => "integer",
            Keyword::Local => "local",
            Keyword::Nil => "nil",
            Keyword::Number => "number",
            Keyword::Require => "require",
            Keyword::Return => "return",
            Keyword::String => "string",
            Keyword::Then => "then",
            Keyword::While => "while",
        };
        write!(f, "{}", text)
    }
}

/// A classified token. Literal and identifier kinds carry their decoded
/// payload; the payload is owned by the token and released on drop.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Multiply,     // *
    Divide,       // /
    IntDivide,    // //
    Plus,         // +
    Minus,        // -
    CharCount,    // #
    Concat,       // ..
    Less,         // <
    LessEq,       // <=
    Greater,      // >
    GreaterEq,    // >=
    NotEq,        // ~=
    Assign,       // =
    Eq,           // ==
    Colon,        // :
    LeftBracket,  // (
    RightBracket, // )
    Comma,        // ,

    Integer(i64),
    Decimal(f64),
    Str(String),
    Identifier(String),
    Keyword(Keyword),

    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Multiply => write!(f, "*"),
            TokenKind::Divide => write!(f, "/"),
            TokenKind::IntDivide => write!(f, "//"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::CharCount => write!(f, "#"),
            TokenKind::Concat => write!(f, ".."),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEq => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEq => write!(f, ">="),
            TokenKind::NotEq => write!(f, "~="),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::LeftBracket => write!(f, "("),
            TokenKind::RightBracket => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Integer(value) => write!(f, "{}", value),
            TokenKind::Decimal(value) => write!(f, "{}", value),
            TokenKind::Str(value) => write!(f, "{:?}", value),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Keyword(keyword) => write!(f, "{}", keyword),
            TokenKind::Eof => write!(f, "<eof>"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
