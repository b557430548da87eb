use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Coarse classification of an error, matching the phases of the front end.
/// `Internal` marks broken invariants inside the compiler itself and should
/// never surface for well-formed or ill-formed user input alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Lexical,
    Syntax,
    SemanticType,
    SemanticUndeclared,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn class(&self) -> ErrorClass {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => ErrorClass::Lexical,
            ErrorImpl::MalformedNumber { .. } => ErrorClass::Lexical,
            ErrorImpl::UnterminatedString => ErrorClass::Lexical,
            ErrorImpl::UnterminatedComment => ErrorClass::Lexical,
            ErrorImpl::InvalidEscape { .. } => ErrorClass::Lexical,
            ErrorImpl::UnexpectedToken { .. } => ErrorClass::Syntax,
            ErrorImpl::MalformedExpression => ErrorClass::Syntax,
            ErrorImpl::IncompatibleTypes { .. } => ErrorClass::SemanticType,
            ErrorImpl::IncompatibleOperand { .. } => ErrorClass::SemanticType,
            ErrorImpl::VariableNotDeclared { .. } => ErrorClass::SemanticUndeclared,
            ErrorImpl::VariableAlreadyDeclared { .. } => ErrorClass::SemanticUndeclared,
            ErrorImpl::Internal { .. } => ErrorClass::Internal,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ErrorImpl::MalformedNumber { .. } => "MalformedNumber",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MalformedExpression => "MalformedExpression",
            ErrorImpl::IncompatibleTypes { .. } => "IncompatibleTypes",
            ErrorImpl::IncompatibleOperand { .. } => "IncompatibleOperand",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::Internal { .. } => "Internal",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => ErrorTip::None,
            ErrorImpl::MalformedNumber { literal } => ErrorTip::Suggestion(format!(
                "Invalid numeric literal `{}`, a digit is required after the decimal point and exponent",
                literal
            )),
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing a closing `\"`"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Block comment is missing a closing `]]`"))
            }
            ErrorImpl::InvalidEscape { sequence } => ErrorTip::Suggestion(format!(
                "Invalid escape sequence `\\{}` in string literal",
                sequence
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token `{}` in expression",
                token
            )),
            ErrorImpl::MalformedExpression => ErrorTip::None,
            ErrorImpl::IncompatibleTypes {
                operation,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot combine `{}` and `{}`",
                operation, left, right
            )),
            ErrorImpl::IncompatibleOperand { operation, operand } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be applied to `{}`", operation, operand),
            ),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already declared in this scope",
                variable
            )),
            ErrorImpl::Internal { .. } => ErrorTip::Suggestion(String::from(
                "This is a defect in the compiler itself, not in the compiled program",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unexpected character: {character:?}")]
    UnexpectedCharacter { character: char },
    #[error("malformed numeric literal: {literal:?}")]
    MalformedNumber { literal: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid string escape: \\{sequence}")]
    InvalidEscape { sequence: String },
    #[error("unexpected token in expression: {token:?}")]
    UnexpectedToken { token: String },
    #[error("expression cannot be reduced")]
    MalformedExpression,
    #[error("incompatible operand types for {operation:?}: {left:?} and {right:?}")]
    IncompatibleTypes {
        operation: String,
        left: String,
        right: String,
    },
    #[error("incompatible operand type for {operation:?}: {operand:?}")]
    IncompatibleOperand { operation: String, operand: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
}
