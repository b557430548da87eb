//! Code-generation events.
//!
//! The expression parser does not call a backend directly; it appends an
//! ordered sequence of events to a `CodeEmitter` as it shifts operands and
//! reduces handles. The (external) code generator consumes the sequence in
//! emission order.

pub mod events;
