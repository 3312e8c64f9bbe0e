//! JavaScript value conversions used by attribute comparisons.

use super::property::Prop;
use crate::{
    ast::Literal,
    tree::{AstValue, ValueKind},
};
use std::{borrow::Cow, cmp::Ordering};

/// A property value after `ToPrimitive`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Primitive<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Cow<'a, str>),
}

impl<'a> Primitive<'a> {
    pub(crate) fn from_prop<V: AstValue>(prop: Prop<'a, V>) -> Self {
        match prop {
            Prop::Undefined => Primitive::Undefined,
            Prop::Number(n) => Primitive::Number(n),
            Prop::Value(value) => Self::from_value(value),
        }
    }

    fn from_value<V: AstValue>(value: &'a V) -> Self {
        match value.kind() {
            ValueKind::Null => Primitive::Null,
            ValueKind::Bool(b) => Primitive::Bool(b),
            ValueKind::Number(n) => Primitive::Number(n),
            ValueKind::String(s) => Primitive::String(Cow::Borrowed(s)),
            ValueKind::List(elements) => Primitive::String(Cow::Owned(join(elements))),
            ValueKind::Object => Primitive::String(Cow::Borrowed("[object Object]")),
        }
    }

    pub(crate) fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::String(s) => Primitive::String(Cow::Borrowed(s)),
            Literal::Number(n) => Primitive::Number(*n),
        }
    }

    /// `ToString`.
    pub(crate) fn to_js_string(&self) -> Cow<'_, str> {
        match self {
            Primitive::Undefined => Cow::Borrowed("undefined"),
            Primitive::Null => Cow::Borrowed("null"),
            Primitive::Bool(true) => Cow::Borrowed("true"),
            Primitive::Bool(false) => Cow::Borrowed("false"),
            Primitive::Number(n) => Cow::Owned(number_to_string(*n)),
            Primitive::String(s) => Cow::Borrowed(s),
        }
    }

    /// `ToNumber`.
    pub(crate) fn to_number(&self) -> f64 {
        match self {
            Primitive::Undefined => f64::NAN,
            Primitive::Null | Primitive::Bool(false) => 0.0,
            Primitive::Bool(true) => 1.0,
            Primitive::Number(n) => *n,
            Primitive::String(s) => string_to_number(s),
        }
    }
}

/// `Array.prototype.join` with the default separator.
fn join<V: AstValue>(elements: &[V]) -> String {
    let mut joined = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            joined.push(',');
        }
        if !matches!(element.kind(), ValueKind::Null) {
            joined.push_str(&Primitive::from_value(element).to_js_string());
        }
    }
    joined
}

/// The `typeof` name of a property.
pub(crate) fn type_of<V: AstValue>(prop: Prop<'_, V>) -> &'static str {
    match prop {
        Prop::Undefined => "undefined",
        Prop::Number(_) => "number",
        Prop::Value(value) => match value.kind() {
            ValueKind::Bool(_) => "boolean",
            ValueKind::Number(_) => "number",
            ValueKind::String(_) => "string",
            ValueKind::Null | ValueKind::List(_) | ValueKind::Object => "object",
        },
    }
}

/// The abstract relational comparison of two primitives. Two strings
/// compare by UTF-16 code units, anything else numerically. `None` means
/// the values are unordered, so every relational operator is false.
pub(crate) fn relational(left: &Primitive<'_>, right: &Primitive<'_>) -> Option<Ordering> {
    match (left, right) {
        (Primitive::String(a), Primitive::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

/// `Number.prototype.toString` for radix 10.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }

    let exponential = format!("{n:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}

#[allow(clippy::cast_precision_loss)]
fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return if digits.chars().all(|c| c.is_digit(radix)) {
                u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64)
            } else {
                f64::NAN
            };
        }
    }

    // Rust also accepts spellings like "inf" and "nan" that JavaScript does
    // not.
    if s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        s.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}
