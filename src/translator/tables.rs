//! Fixed source-to-q mappings. Lookups never fall back: a missing entry is an
//! error for operators and a pass-through only for call names.

use crate::ast::{BinaryOperator, CompareOperator};
use crate::options::PowerToken;

/// Exponentiation is handled by [`binary_operator`]; its token is configurable.
pub const BINARY_OPERATORS: &[(BinaryOperator, &str)] = &[
    (BinaryOperator::Add, "+"),
    (BinaryOperator::Mult, "*"),
    (BinaryOperator::Sub, "-"),
    (BinaryOperator::Div, "/"),
    (BinaryOperator::FloorDiv, "div"),
];

pub const COMPARISON_OPERATORS: &[(CompareOperator, &str)] = &[
    (CompareOperator::Eq, "="),
    (CompareOperator::NotEq, "<>"),
    (CompareOperator::Lt, "<"),
    (CompareOperator::Gt, ">"),
    (CompareOperator::LtE, "<="),
    (CompareOperator::GtE, ">="),
];

/// In-place forms; `x +: y` amends `x` rather than rebinding it.
pub const AUGMENTED_OPERATORS: &[(BinaryOperator, &str)] = &[
    (BinaryOperator::Add, "+:"),
    (BinaryOperator::Sub, "-:"),
    (BinaryOperator::Mult, "*:"),
    (BinaryOperator::Div, "/:"),
];

pub const BUILTINS: &[(&str, &str)] = &[("map", "each"), ("range", "til"), ("xrange", "til")];

fn lookup<K: Copy + PartialEq>(table: &[(K, &'static str)], key: K) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, token)| *token)
}

pub fn binary_operator(op: BinaryOperator, power: PowerToken) -> Option<&'static str> {
    match op {
        BinaryOperator::Pow => Some(power.token()),
        _ => lookup(BINARY_OPERATORS, op),
    }
}

pub fn comparison_operator(op: CompareOperator) -> Option<&'static str> {
    lookup(COMPARISON_OPERATORS, op)
}

pub fn augmented_operator(op: BinaryOperator) -> Option<&'static str> {
    lookup(AUGMENTED_OPERATORS, op)
}

/// Substitutes a q combinator for a known builtin; other names pass through.
pub fn builtin_name(name: &str) -> &str {
    BUILTINS
        .iter()
        .find(|(source, _)| *source == name)
        .map_or(name, |(_, target)| *target)
}
