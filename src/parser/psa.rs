use crate::{
    codegen::events::{CodeEvent, Operation},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Keyword, TokenKind},
    prec_row, DataType, Position,
};

use super::context::ParseContext;

/// The terminal categories indexing the precedence table, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    CharCount,    // #
    Plus,         // +
    Minus,        // -
    Multiply,     // *
    Divide,       // /
    IntDivide,    // //
    Concat,       // ..
    Less,         // <
    Greater,      // >
    LessEq,       // <=
    GreaterEq,    // >=
    NotEq,        // ~=
    Eq,           // ==
    LeftBracket,  // (
    RightBracket, // )
    Operand,      // identifier or numeric/nil literal
    Str,          // string literal
    Dollar,       // bottom of stack / end of expression
}

impl Category {
    fn index(self) -> usize {
        self as usize
    }
}

/// One cell of the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Insert a reduction marker after the top terminal, then push.
    Shift,
    /// Pop a handle and collapse it to a nonterminal.
    Reduce,
    /// Bracket match: push without a new marker.
    Equal,
    /// No valid action: syntax error.
    Blank,
}

#[rustfmt::skip]
static PREC_TABLE: [[Action; 18]; 18] = [
    /*        #  +  -  *  /  // ..  <  > <= >= ~= ==  (  )  i  s  $ */
    /* #  */ prec_row![_ > > > _ > _ > > > > > > < > < < >],
    /* +  */ prec_row![< > > < < < _ > > > > > > < > < _ >],
    /* -  */ prec_row![< > > < < < _ > > > > > > < > < _ >],
    /* *  */ prec_row![< > > > > > _ > > > > > > < > < _ >],
    /* /  */ prec_row![< > > > > > _ > > > > > > < > < _ >],
    /* // */ prec_row![< > > > > > _ > > > > > > < > < _ >],
    /* .. */ prec_row![_ _ _ _ _ _ > _ _ _ _ _ > < > < < >],
    /* <  */ prec_row![< < < < < < _ > > > > > > < > < < >],
    /* >  */ prec_row![< < < < < < _ > > > > > > < > < < >],
    /* <= */ prec_row![< < < < < < _ > > > > > > < > < < >],
    /* >= */ prec_row![< < < < < < _ > > > > > > < > < < >],
    /* ~= */ prec_row![< < < < < < _ > > > > > > < > < < >],
    /* == */ prec_row![< < < < < < < > > > > > > < > < < >],
    /* (  */ prec_row![< < < < < < < < < < < < < < = < < _],
    /* )  */ prec_row![_ > > > > > > > > > > > > _ > _ _ >],
    /* i  */ prec_row![_ > > > > > > > > > > > > _ > _ _ >],
    /* s  */ prec_row![_ > > > _ > > > > > > > > _ > _ _ >],
    /* $  */ prec_row![< < < < < < < < < < < < < < _ < < _],
];

/// A working-stack entry: a table terminal, a reduced subexpression, or the
/// marker delimiting the next reduction handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackSymbol {
    Terminal(Category),
    NonTerminal,
    Stop,
}

#[derive(Debug, Clone, Copy)]
struct StackEntry {
    symbol: StackSymbol,
    data: DataType,
}

/// The push-down symbol stack of one expression parse. Created fresh per
/// parse; everything it holds is dropped with it on every exit path.
struct SymStack {
    entries: Vec<StackEntry>,
}

impl SymStack {
    fn new() -> Self {
        SymStack {
            entries: vec![StackEntry {
                symbol: StackSymbol::Terminal(Category::Dollar),
                data: DataType::Other,
            }],
        }
    }

    fn push(&mut self, symbol: StackSymbol, data: DataType) {
        self.entries.push(StackEntry { symbol, data });
    }

    fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    fn top_is_nonterminal(&self) -> bool {
        matches!(
            self.top().map(|entry| entry.symbol),
            Some(StackSymbol::NonTerminal)
        )
    }

    fn top_terminal_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| matches!(entry.symbol, StackSymbol::Terminal(_)))
    }

    fn top_terminal(&self, position: Position) -> Result<Category, Error> {
        match self.top_terminal_index() {
            Some(index) => match self.entries[index].symbol {
                StackSymbol::Terminal(category) => Ok(category),
                _ => unreachable!(),
            },
            None => Err(internal("no terminal on the symbol stack", position)),
        }
    }

    /// Inserts the reduction marker directly above the topmost terminal.
    fn insert_stop_after_top_terminal(&mut self, position: Position) -> Result<(), Error> {
        let index = self
            .top_terminal_index()
            .ok_or_else(|| internal("no terminal on the symbol stack", position))?;
        self.entries.insert(
            index + 1,
            StackEntry {
                symbol: StackSymbol::Stop,
                data: DataType::Other,
            },
        );
        Ok(())
    }

    /// Pops the handle delimited by the nearest `Stop` marker: at most three
    /// entries, returned in pop order (top first), with the marker removed.
    fn pop_handle(&mut self, position: Position) -> Result<Vec<StackEntry>, Error> {
        let mut handle = vec![];

        while handle.len() < 3 {
            match self.entries.last().copied() {
                Some(entry) if entry.symbol != StackSymbol::Stop => {
                    handle.push(entry);
                    self.entries.pop();
                }
                Some(_) => break,
                None => return Err(internal("symbol stack underflow", position)),
            }
        }

        match self.entries.last().copied() {
            Some(entry) if entry.symbol == StackSymbol::Stop => {
                self.entries.pop();
                Ok(handle)
            }
            _ => Err(internal("reduction handle has no marker", position)),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The reducible handle shapes of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Operand,       // E -> i
    LengthOf,      // E -> #E
    Parenthesized, // E -> (E)
    Add,           // E -> E + E
    Sub,           // E -> E - E
    Mul,           // E -> E * E
    Div,           // E -> E / E
    IntDiv,        // E -> E // E
    Concat,        // E -> E .. E
    Eq,            // E -> E == E
    NotEq,         // E -> E ~= E
    Less,          // E -> E < E
    Greater,       // E -> E > E
    LessEq,        // E -> E <= E
    GreaterEq,     // E -> E >= E
}

impl Rule {
    fn operation(self) -> Option<Operation> {
        match self {
            Rule::Operand | Rule::Parenthesized => None,
            Rule::LengthOf => Some(Operation::Length),
            Rule::Add => Some(Operation::Add),
            Rule::Sub => Some(Operation::Sub),
            Rule::Mul => Some(Operation::Mul),
            Rule::Div => Some(Operation::Div),
            Rule::IntDiv => Some(Operation::IntDiv),
            Rule::Concat => Some(Operation::Concat),
            Rule::Eq => Some(Operation::Eq),
            Rule::NotEq => Some(Operation::NotEq),
            Rule::Less => Some(Operation::Less),
            Rule::Greater => Some(Operation::Greater),
            Rule::LessEq => Some(Operation::LessEq),
            Rule::GreaterEq => Some(Operation::GreaterEq),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Rule::Operand => "i",
            Rule::LengthOf => "#",
            Rule::Parenthesized => "()",
            Rule::Add => "+",
            Rule::Sub => "-",
            Rule::Mul => "*",
            Rule::Div => "/",
            Rule::IntDiv => "//",
            Rule::Concat => "..",
            Rule::Eq => "==",
            Rule::NotEq => "~=",
            Rule::Less => "<",
            Rule::Greater => ">",
            Rule::LessEq => "<=",
            Rule::GreaterEq => ">=",
        }
    }
}

fn internal(detail: &str, position: Position) -> Error {
    Error::new(
        ErrorImpl::Internal {
            detail: String::from(detail),
        },
        position,
    )
}

/// Classifies the lookahead token against the table categories. Statement
/// keywords, commas and end of input all classify as `$` so the automaton
/// reduces out of the expression; an identifier naming a known function does
/// the same (the enclosing grammar parses the call). A bare `=` can never
/// appear here, so it reports a compiler bug rather than a diagnostic.
fn token_category(ctx: &ParseContext) -> Result<Category, Error> {
    let position = ctx.token.span.start;

    match &ctx.token.kind {
        TokenKind::Multiply => Ok(Category::Multiply),
        TokenKind::Divide => Ok(Category::Divide),
        TokenKind::IntDivide => Ok(Category::IntDivide),
        TokenKind::Plus => Ok(Category::Plus),
        TokenKind::Minus => Ok(Category::Minus),
        TokenKind::CharCount => Ok(Category::CharCount),
        TokenKind::Concat => Ok(Category::Concat),
        TokenKind::Less => Ok(Category::Less),
        TokenKind::LessEq => Ok(Category::LessEq),
        TokenKind::Greater => Ok(Category::Greater),
        TokenKind::GreaterEq => Ok(Category::GreaterEq),
        TokenKind::NotEq => Ok(Category::NotEq),
        TokenKind::Eq => Ok(Category::Eq),
        TokenKind::LeftBracket => Ok(Category::LeftBracket),
        TokenKind::RightBracket => Ok(Category::RightBracket),
        TokenKind::Identifier(name) => {
            if ctx.scopes.is_function(name) {
                Ok(Category::Dollar)
            } else {
                Ok(Category::Operand)
            }
        }
        TokenKind::Comma => Ok(Category::Dollar),
        TokenKind::Integer(_) | TokenKind::Decimal(_) => Ok(Category::Operand),
        TokenKind::Str(_) => Ok(Category::Str),
        TokenKind::Keyword(keyword) => match keyword {
            Keyword::Nil => Ok(Category::Operand),
            Keyword::Then
            | Keyword::Do
            | Keyword::Local
            | Keyword::If
            | Keyword::While
            | Keyword::Return
            | Keyword::End
            | Keyword::Else
            | Keyword::Function
            | Keyword::Global => Ok(Category::Dollar),
            Keyword::Integer | Keyword::Number | Keyword::String | Keyword::Require => {
                Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: ctx.token.to_string(),
                    },
                    position,
                ))
            }
        },
        TokenKind::Assign => Err(internal(
            "assignment operator inside an expression",
            position,
        )),
        TokenKind::Colon => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: ctx.token.to_string(),
            },
            position,
        )),
        TokenKind::Eof => Ok(Category::Dollar),
    }
}

/// The terminal category a token is pushed under. Only tokens the table can
/// shift ever reach this.
fn terminal_symbol(kind: &TokenKind) -> Category {
    match kind {
        TokenKind::Multiply => Category::Multiply,
        TokenKind::Divide => Category::Divide,
        TokenKind::IntDivide => Category::IntDivide,
        TokenKind::Plus => Category::Plus,
        TokenKind::Minus => Category::Minus,
        TokenKind::CharCount => Category::CharCount,
        TokenKind::Concat => Category::Concat,
        TokenKind::Less => Category::Less,
        TokenKind::LessEq => Category::LessEq,
        TokenKind::Greater => Category::Greater,
        TokenKind::GreaterEq => Category::GreaterEq,
        TokenKind::NotEq => Category::NotEq,
        TokenKind::Eq => Category::Eq,
        TokenKind::LeftBracket => Category::LeftBracket,
        TokenKind::RightBracket => Category::RightBracket,
        TokenKind::Identifier(_) | TokenKind::Integer(_) | TokenKind::Decimal(_) => {
            Category::Operand
        }
        TokenKind::Str(_) => Category::Str,
        TokenKind::Keyword(Keyword::Nil) => Category::Operand,
        _ => Category::Dollar,
    }
}

/// The data type the lookahead contributes as an operand. An identifier
/// must resolve to a defined symbol; this is the one place the undeclared
/// diagnostic is raised.
fn operand_type(ctx: &ParseContext) -> Result<DataType, Error> {
    match &ctx.token.kind {
        TokenKind::Integer(_) => Ok(DataType::Integer),
        TokenKind::Decimal(_) => Ok(DataType::Number),
        TokenKind::Str(_) => Ok(DataType::Str),
        TokenKind::Keyword(Keyword::Nil) => Ok(DataType::Nil),
        TokenKind::Identifier(name) => {
            if ctx.scopes.is_defined(name) {
                Ok(ctx.scopes.identifier_type(name).unwrap_or(DataType::Other))
            } else {
                Err(Error::new(
                    ErrorImpl::VariableNotDeclared {
                        variable: name.clone(),
                    },
                    ctx.token.span.start,
                ))
            }
        }
        _ => Ok(DataType::Other),
    }
}

/// Matches a popped handle (top entry first) against the reducible shapes.
fn match_rule(handle: &[StackEntry]) -> Option<Rule> {
    match handle {
        [only] => match only.symbol {
            StackSymbol::Terminal(Category::Operand) | StackSymbol::Terminal(Category::Str) => {
                Some(Rule::Operand)
            }
            _ => None,
        },
        [top, below] => {
            if below.symbol == StackSymbol::Terminal(Category::CharCount)
                && top.symbol == StackSymbol::NonTerminal
            {
                Some(Rule::LengthOf)
            } else {
                None
            }
        }
        [top, middle, bottom] => {
            if bottom.symbol == StackSymbol::Terminal(Category::LeftBracket)
                && middle.symbol == StackSymbol::NonTerminal
                && top.symbol == StackSymbol::Terminal(Category::RightBracket)
            {
                return Some(Rule::Parenthesized);
            }

            if top.symbol != StackSymbol::NonTerminal || bottom.symbol != StackSymbol::NonTerminal {
                return None;
            }

            match middle.symbol {
                StackSymbol::Terminal(Category::Plus) => Some(Rule::Add),
                StackSymbol::Terminal(Category::Minus) => Some(Rule::Sub),
                StackSymbol::Terminal(Category::Multiply) => Some(Rule::Mul),
                StackSymbol::Terminal(Category::Divide) => Some(Rule::Div),
                StackSymbol::Terminal(Category::IntDivide) => Some(Rule::IntDiv),
                StackSymbol::Terminal(Category::Concat) => Some(Rule::Concat),
                StackSymbol::Terminal(Category::Eq) => Some(Rule::Eq),
                StackSymbol::Terminal(Category::NotEq) => Some(Rule::NotEq),
                StackSymbol::Terminal(Category::Less) => Some(Rule::Less),
                StackSymbol::Terminal(Category::Greater) => Some(Rule::Greater),
                StackSymbol::Terminal(Category::LessEq) => Some(Rule::LessEq),
                StackSymbol::Terminal(Category::GreaterEq) => Some(Rule::GreaterEq),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Which operands of a binary reduction get an implicit Integer-to-Number
/// conversion. `first` is the right operand (topmost on the generated
/// code's value stack), `second` the left; conversions are emitted in that
/// order, before the operator itself.
#[derive(Debug, Clone, Copy, Default)]
struct Promotion {
    first: bool,
    second: bool,
}

fn incompatible(rule: Rule, left: DataType, right: DataType, position: Position) -> Error {
    Error::new(
        ErrorImpl::IncompatibleTypes {
            operation: String::from(rule.symbol()),
            left: left.to_string(),
            right: right.to_string(),
        },
        position,
    )
}

/// Type-checks one binary reduction and decides the result type and the
/// promotions, without emitting anything.
fn check_semantic(
    rule: Rule,
    left: DataType,
    right: DataType,
    position: Position,
) -> Result<(DataType, Promotion), Error> {
    let mut promotion = Promotion::default();

    let final_type = match rule {
        Rule::Concat => {
            if left != DataType::Str || right != DataType::Str {
                return Err(incompatible(rule, left, right, position));
            }
            DataType::Str
        }
        Rule::Add | Rule::Sub | Rule::Mul => {
            if left == DataType::Str || right == DataType::Str {
                return Err(incompatible(rule, left, right, position));
            }

            if left == DataType::Integer && right == DataType::Integer {
                DataType::Integer
            } else if left == DataType::Number && right == DataType::Number {
                DataType::Number
            } else {
                let mut final_type = DataType::Other;
                if right == DataType::Integer {
                    promotion.first = true;
                    final_type = DataType::Number;
                }
                if left == DataType::Integer {
                    promotion.second = true;
                    final_type = DataType::Number;
                }
                if left == DataType::Number || right == DataType::Number {
                    final_type = DataType::Number;
                }
                final_type
            }
        }
        Rule::Div => {
            // Division always yields a Number; both sides are promoted.
            if left == DataType::Str || right == DataType::Str {
                return Err(incompatible(rule, left, right, position));
            }
            if right == DataType::Integer {
                promotion.first = true;
            }
            if left == DataType::Integer {
                promotion.second = true;
            }
            DataType::Number
        }
        Rule::IntDiv => {
            // Integer division stays integral and performs no promotion;
            // only String operands are rejected.
            if left == DataType::Str || right == DataType::Str {
                return Err(incompatible(rule, left, right, position));
            }
            DataType::Integer
        }
        Rule::Eq | Rule::NotEq | Rule::Less | Rule::Greater | Rule::LessEq | Rule::GreaterEq => {
            let left_numeric = left == DataType::Integer || left == DataType::Number;
            let right_numeric = right == DataType::Integer || right == DataType::Number;

            if (left == DataType::Str && right_numeric) || (left_numeric && right == DataType::Str)
            {
                return Err(incompatible(rule, left, right, position));
            }

            let same_kind = (left == DataType::Str && right == DataType::Str)
                || (left == DataType::Integer && right == DataType::Integer)
                || (left == DataType::Number && right == DataType::Number);

            if !same_kind {
                if right == DataType::Integer {
                    promotion.first = true;
                }
                if left == DataType::Integer {
                    promotion.second = true;
                }
            }

            // Comparison results are boolean-like, never the operand type.
            DataType::Other
        }
        Rule::Operand | Rule::Parenthesized | Rule::LengthOf => {
            return Err(internal("check_semantic on a non-binary rule", position));
        }
    };

    Ok((final_type, promotion))
}

/// Parses and type-checks one expression starting at the context's current
/// token, emitting code events as a side effect, and leaves the first token
/// past the expression in the context. Returns the expression's result
/// type.
pub fn psa(ctx: &mut ParseContext) -> Result<DataType, Error> {
    let mut stack = SymStack::new();

    loop {
        let position = ctx.token.span.start;

        let cat_a = stack.top_terminal(position)?;
        let mut cat_b = token_category(ctx)?;

        // A second operand directly after an operand (or a reduced
        // subexpression) belongs to the next statement, not to this
        // expression: force a reduction.
        if cat_b == Category::Operand
            && (cat_a == Category::Operand
                || cat_a == Category::Str
                || stack.top_is_nonterminal())
        {
            cat_b = Category::Dollar;
        }

        match PREC_TABLE[cat_a.index()][cat_b.index()] {
            Action::Equal => {
                let data = operand_type(ctx)?;
                stack.push(
                    StackSymbol::Terminal(terminal_symbol(&ctx.token.kind)),
                    data,
                );
                ctx.advance()?;
            }
            Action::Shift => {
                stack.insert_stop_after_top_terminal(position)?;

                let data = operand_type(ctx)?;
                stack.push(
                    StackSymbol::Terminal(terminal_symbol(&ctx.token.kind)),
                    data,
                );

                if let TokenKind::Identifier(name) = &ctx.token.kind {
                    let name = name.clone();
                    ctx.advance()?;

                    // A defined variable followed by `(` would be a call to
                    // a non-function value.
                    if matches!(ctx.token.kind, TokenKind::LeftBracket) {
                        return Err(Error::new(
                            ErrorImpl::UnexpectedToken {
                                token: String::from("("),
                            },
                            ctx.token.span.start,
                        ));
                    }

                    ctx.emitter.emit(CodeEvent::PushVar(name));
                } else {
                    match &ctx.token.kind {
                        TokenKind::Integer(value) => {
                            ctx.emitter.emit(CodeEvent::PushInt(*value));
                        }
                        TokenKind::Decimal(value) => {
                            ctx.emitter.emit(CodeEvent::PushFloat(*value));
                        }
                        TokenKind::Str(value) => {
                            ctx.emitter.emit(CodeEvent::PushString(value.clone()));
                        }
                        TokenKind::Keyword(Keyword::Nil) => {
                            ctx.emitter.emit(CodeEvent::PushNil);
                        }
                        _ => {}
                    }
                    ctx.advance()?;
                }
            }
            Action::Reduce => {
                let handle = stack.pop_handle(position)?;

                let rule = match match_rule(&handle) {
                    Some(rule) => rule,
                    None => {
                        return Err(Error::new(ErrorImpl::MalformedExpression, position));
                    }
                };

                match rule {
                    Rule::Operand => {
                        stack.push(StackSymbol::NonTerminal, handle[0].data);
                    }
                    Rule::Parenthesized => {
                        // Brackets pass the inner type through and emit
                        // nothing of their own.
                        stack.push(StackSymbol::NonTerminal, handle[1].data);
                    }
                    Rule::LengthOf => {
                        let operand = handle[0].data;
                        if operand != DataType::Str {
                            return Err(Error::new(
                                ErrorImpl::IncompatibleOperand {
                                    operation: String::from("#"),
                                    operand: operand.to_string(),
                                },
                                position,
                            ));
                        }
                        stack.push(StackSymbol::NonTerminal, DataType::Integer);
                        ctx.emitter.emit(CodeEvent::Apply(Operation::Length));
                    }
                    _ => {
                        let right = handle[0].data;
                        let left = handle[2].data;
                        let (final_type, promotion) =
                            check_semantic(rule, left, right, position)?;

                        if promotion.first {
                            ctx.emitter.emit(CodeEvent::IntToFloatFirst);
                        }
                        if promotion.second {
                            ctx.emitter.emit(CodeEvent::IntToFloatSecond);
                        }

                        stack.push(StackSymbol::NonTerminal, final_type);

                        if let Some(operation) = rule.operation() {
                            ctx.emitter.emit(CodeEvent::Apply(operation));
                        }
                    }
                }

                if cat_b == Category::Dollar && stack.top_terminal(position)? == Category::Dollar
                {
                    break;
                }
            }
            Action::Blank => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: ctx.token.to_string(),
                    },
                    position,
                ));
            }
        }
    }

    // A finished reduction leaves exactly one nonterminal above the bottom
    // marker; its type is the expression's result type.
    let end_position = ctx.token.span.start;
    match stack.top() {
        Some(entry) if entry.symbol == StackSymbol::NonTerminal && stack.len() == 2 => {
            let result = entry.data;

            if ctx.condition_context && result != DataType::Other {
                ctx.emitter.emit(CodeEvent::ToBool);
            }

            Ok(result)
        }
        _ => Err(internal(
            "expression reduced to an unexpected stack shape",
            end_position,
        )),
    }
}
