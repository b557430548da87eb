#![allow(clippy::module_inception)]

use std::{fmt::Display, fs, path::PathBuf};

use crate::errors::errors::{Error, ErrorClass, ErrorTip};

pub mod codegen;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symtable;

/// A line/column coordinate in the source text. Lines and columns are
/// 1-based; the scanner advances both as it consumes characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }

    pub fn null() -> Self {
        Position { line: 0, col: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// The scalar kinds the language recognizes, plus `Other` for values that
/// carry no concrete type (comparison results, operator stack entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    Integer,
    Number,
    Str,
    Nil,
    #[default]
    Other,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => write!(f, "integer"),
            DataType::Number => write!(f, "number"),
            DataType::Str => write!(f, "string"),
            DataType::Nil => write!(f, "nil"),
            DataType::Other => write!(f, "<untyped>"),
        }
    }
}

pub fn get_line(source: &str, line_number: u32) -> Option<String> {
    source
        .lines()
        .nth(line_number.saturating_sub(1) as usize)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line() {
        let source = "local a = 1\nlocal b = 2\nlocal c = a + b\n";
        assert_eq!(super::get_line(source, 1), Some("local a = 1".to_string()));
        assert_eq!(
            super::get_line(source, 3),
            Some("local c = a + b".to_string())
        );
        assert_eq!(super::get_line(source, 4), None);
    }
}

pub fn display_error(error: Error, file: PathBuf) {
    /*
        error: message
        -> final.tl
           |
        20 | local a = #5
           | ----------^
    */

    let position = *error.get_position();
    let content = fs::read_to_string(&file).unwrap_or_default();

    let prefix = if error.class() == ErrorClass::Internal {
        "Compiler bug"
    } else {
        "Error"
    };

    if let ErrorTip::None = error.get_tip() {
        println!("{}: {}", prefix, error.get_error_name());
    } else {
        println!(
            "{}: {} ({})",
            prefix,
            error.get_error_name(),
            error.get_tip()
        );
    }
    println!("-> {}:{}", file.as_os_str().to_string_lossy(), position);

    if let Some(line_text) = get_line(&content, position.line) {
        let line_string = position.line.to_string();
        let padding = line_string.len() + 2;

        println!("{:>padding$}", "|");

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        println!("{} | {}", line_string, line_text_removed.trim_end());

        let arrows = (position.col as usize)
            .saturating_sub(removed_whitespace)
            .max(1);

        println!("{:>padding$} {:->arrows$}", "|", "^");
    }
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
