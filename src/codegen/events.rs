use std::fmt::Display;

/// The operator applied by an `Apply` event, one per reducible binary or
/// unary rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Concat,
    Length,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
            Operation::IntDiv => "idiv",
            Operation::Concat => "concat",
            Operation::Length => "len",
            Operation::Eq => "eq",
            Operation::NotEq => "neq",
            Operation::Less => "lt",
            Operation::Greater => "gt",
            Operation::LessEq => "le",
            Operation::GreaterEq => "ge",
        };
        write!(f, "{}", text)
    }
}

/// One code-generation call, in the order the parser emitted it. Promotion
/// events name the operand by its position on the generated code's value
/// stack: `IntToFloatFirst` converts the topmost value (the right operand),
/// `IntToFloatSecond` the one below it.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeEvent {
    PushInt(i64),
    PushFloat(f64),
    PushString(String),
    PushNil,
    PushVar(String),
    IntToFloatFirst,
    IntToFloatSecond,
    Apply(Operation),
    ToBool,
}

impl Display for CodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeEvent::PushInt(value) => write!(f, "push-int {}", value),
            CodeEvent::PushFloat(value) => write!(f, "push-float {}", value),
            CodeEvent::PushString(value) => write!(f, "push-string {:?}", value),
            CodeEvent::PushNil => write!(f, "push-nil"),
            CodeEvent::PushVar(name) => write!(f, "push-var {}", name),
            CodeEvent::IntToFloatFirst => write!(f, "int-to-float 1"),
            CodeEvent::IntToFloatSecond => write!(f, "int-to-float 2"),
            CodeEvent::Apply(operation) => write!(f, "apply {}", operation),
            CodeEvent::ToBool => write!(f, "to-bool"),
        }
    }
}

/// An ordered sink of code events. The parser only appends; the consumer
/// inspects or drains after the parse.
#[derive(Debug, Default)]
pub struct CodeEmitter {
    events: Vec<CodeEvent>,
}

impl CodeEmitter {
    pub fn new() -> Self {
        CodeEmitter { events: vec![] }
    }

    pub fn emit(&mut self, event: CodeEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CodeEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<CodeEvent> {
        std::mem::take(&mut self.events)
    }
}
