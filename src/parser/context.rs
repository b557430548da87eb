use crate::{
    codegen::events::CodeEmitter,
    errors::errors::Error,
    lexer::{scanner::Scanner, tokens::Token},
    symtable::scope::ScopeChain,
};

/// The mutable state the statement-level parser threads through an
/// expression parse: the current token, the scanner feeding it, the scope
/// chain for identifier resolution, the enclosing function name (if the
/// expression sits inside a function body), whether the expression is a
/// condition (and so must end up boolean-like), and the code-event sink.
pub struct ParseContext {
    pub token: Token,
    scanner: Scanner,
    pub scopes: ScopeChain,
    pub func_name: Option<String>,
    pub condition_context: bool,
    pub emitter: CodeEmitter,
}

impl ParseContext {
    /// Builds a context over `source` with a fresh global scope, positioned
    /// on the first token.
    pub fn new(source: &str) -> Result<Self, Error> {
        ParseContext::with_scopes(source, ScopeChain::new())
    }

    /// Builds a context over `source` resolving identifiers against an
    /// existing scope chain.
    pub fn with_scopes(source: &str, scopes: ScopeChain) -> Result<Self, Error> {
        let mut scanner = Scanner::new(source);
        let token = scanner.next_token()?;

        Ok(ParseContext {
            token,
            scanner,
            scopes,
            func_name: None,
            condition_context: false,
            emitter: CodeEmitter::new(),
        })
    }

    /// Replaces the current token with the scanner's next one.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.token = self.scanner.next_token()?;
        Ok(())
    }
}
