//! Integration tests for the front end.
//!
//! These tests drive the whole pipeline: source text through the scanner
//! and the precedence expression parser, down to the emitted code-event
//! sequence and the inferred result type.

use tealc::{
    codegen::events::{CodeEvent, Operation},
    errors::errors::ErrorClass,
    lexer::scanner::tokenize,
    parser::{context::ParseContext, psa::psa},
    symtable::{scope::ScopeChain, symtable::SymbolData},
    DataType,
};

#[test]
fn test_tokenize_then_parse_simple_expression() {
    let source = "1 + 2 * 3";

    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 6); // 1, +, 2, *, 3, eof

    let mut ctx = ParseContext::new(source).unwrap();
    assert_eq!(psa(&mut ctx).unwrap(), DataType::Integer);
}

#[test]
fn test_full_event_sequence_with_promotion() {
    // The right operand of `/` is reduced from a bracketed subexpression;
    // every integer side of the division is promoted exactly once.
    let source = "(1 + 2) / 4";
    let mut ctx = ParseContext::new(source).unwrap();

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Number);
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushInt(1),
            CodeEvent::PushInt(2),
            CodeEvent::Apply(Operation::Add),
            CodeEvent::PushInt(4),
            CodeEvent::IntToFloatFirst,
            CodeEvent::IntToFloatSecond,
            CodeEvent::Apply(Operation::Div),
        ]
    );
}

#[test]
fn test_expression_over_declared_variables() {
    let mut scopes = ScopeChain::new();
    scopes
        .insert("radius", SymbolData::variable(DataType::Number))
        .unwrap();
    scopes
        .insert("pi", SymbolData::variable(DataType::Number))
        .unwrap();

    let mut ctx = ParseContext::with_scopes("pi * radius * radius", scopes).unwrap();

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Number);
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushVar("pi".to_string()),
            CodeEvent::PushVar("radius".to_string()),
            CodeEvent::Apply(Operation::Mul),
            CodeEvent::PushVar("radius".to_string()),
            CodeEvent::Apply(Operation::Mul),
        ]
    );
}

#[test]
fn test_string_pipeline_with_escapes() {
    let source = r#""line\n" .. "end""#;
    let mut ctx = ParseContext::new(source).unwrap();

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Str);
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushString("line\n".to_string()),
            CodeEvent::PushString("end".to_string()),
            CodeEvent::Apply(Operation::Concat),
        ]
    );
}

#[test]
fn test_length_feeds_arithmetic() {
    let source = r#"#"hello" + 1"#;
    let mut ctx = ParseContext::new(source).unwrap();

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Integer);
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushString("hello".to_string()),
            CodeEvent::Apply(Operation::Length),
            CodeEvent::PushInt(1),
            CodeEvent::Apply(Operation::Add),
        ]
    );
}

#[test]
fn test_condition_expression_in_while_header() {
    // The driver marks the condition context and stops at `do`, as the
    // statement grammar around a while-loop would.
    let mut scopes = ScopeChain::new();
    scopes
        .insert("count", SymbolData::variable(DataType::Integer))
        .unwrap();

    let mut ctx = ParseContext::with_scopes("count < 10 do", scopes).unwrap();
    ctx.condition_context = true;

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Other);
    assert_eq!(ctx.token.to_string(), "do");
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushVar("count".to_string()),
            CodeEvent::PushInt(10),
            CodeEvent::Apply(Operation::Less),
        ]
    );
}

#[test]
fn test_condition_context_coerces_plain_value() {
    let mut ctx = ParseContext::new("1 + 1 then").unwrap();
    ctx.condition_context = true;

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Integer);
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushInt(1),
            CodeEvent::PushInt(1),
            CodeEvent::Apply(Operation::Add),
            CodeEvent::ToBool,
        ]
    );
}

#[test]
fn test_two_expressions_back_to_back() {
    // After the first parse stops at the adjacent operand, the same context
    // carries straight into the next expression.
    let mut scopes = ScopeChain::new();
    scopes
        .insert("a", SymbolData::variable(DataType::Integer))
        .unwrap();
    scopes
        .insert("b", SymbolData::variable(DataType::Str))
        .unwrap();

    let mut ctx = ParseContext::with_scopes("a b", scopes).unwrap();

    assert_eq!(psa(&mut ctx).unwrap(), DataType::Integer);
    assert_eq!(psa(&mut ctx).unwrap(), DataType::Str);
    assert!(ctx.token.is_eof());
    assert_eq!(
        ctx.emitter.events(),
        &[
            CodeEvent::PushVar("a".to_string()),
            CodeEvent::PushVar("b".to_string()),
        ]
    );
}

#[test]
fn test_scope_shadowing_end_to_end() {
    let mut scopes = ScopeChain::new();
    scopes
        .insert("x", SymbolData::variable(DataType::Str))
        .unwrap();
    scopes.push_scope();
    scopes
        .insert("x", SymbolData::variable(DataType::Integer))
        .unwrap();

    // Inner scope: `x` is an integer.
    let mut ctx = ParseContext::with_scopes("x + 1", scopes).unwrap();
    assert_eq!(psa(&mut ctx).unwrap(), DataType::Integer);

    // Outer scope again: `x` is a string.
    let mut scopes = ctx.scopes;
    scopes.pop_scope();
    let mut ctx = ParseContext::with_scopes(r#"x .. "!""#, scopes).unwrap();
    assert_eq!(psa(&mut ctx).unwrap(), DataType::Str);
}

#[test]
fn test_lexical_error_reaches_the_caller() {
    let mut ctx = ParseContext::new("1 + 2..").unwrap();
    let error = psa(&mut ctx).err().unwrap();

    // `2..` scans as a decimal point with no digit behind it.
    assert_eq!(error.class(), ErrorClass::Lexical);
}

#[test]
fn test_semantic_error_reports_offending_types() {
    let mut ctx = ParseContext::new(r#"1 .. "tail""#).unwrap();
    let error = psa(&mut ctx).err().unwrap();

    assert_eq!(error.class(), ErrorClass::SemanticType);
    assert_eq!(error.get_error_name(), "IncompatibleTypes");
}

#[test]
fn test_error_positions_point_into_the_source() {
    let mut ctx = ParseContext::new("1 +\n  ghost").unwrap();
    let error = psa(&mut ctx).err().unwrap();

    assert_eq!(error.class(), ErrorClass::SemanticUndeclared);
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().col, 3);
}
