//! Conversion of textual problem literals into typed values, and the
//! structural equality used to grade results.
//!
//! Problem banks store inputs and expected outputs as display text, for
//! example `nums = [2,7,11,15], target = 9`. This module turns that text back
//! into values a driver can feed to the submitted function.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};

lazy_static! {
    /// A `name =` assignment head inside an input line.
    static ref ASSIGNMENT: Regex =
        Regex::new(r"[A-Za-z_]\w*\s*=\s*").expect("assignment pattern is valid");
}

/// Parses one textual literal into a typed value.
///
/// The check order is part of the contract: bare `true`, `false`, `null` and
/// numerics are recognised before quoted forms are stripped. A quoted
/// `"true"` therefore parses to the string `true`, whose serialized form
/// re-parses as a boolean; that round-trip ambiguity is accepted and pinned
/// by a test below.
pub fn parse_value(text: &str) -> Value {
    let trimmed = text.trim();

    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if !trimmed.is_empty() {
        if let Ok(int) = trimmed.parse::<i64>() {
            return Value::Number(Number::from(int));
        }
        if let Ok(float) = trimmed.parse::<f64>() {
            if float.is_finite() {
                if let Some(number) = Number::from_f64(float) {
                    return Value::Number(number);
                }
            }
        }
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return parsed;
        }
        // malformed structure text stays a string rather than failing the run
        return Value::String(trimmed.to_string());
    }

    let bytes = trimmed.as_bytes();
    if trimmed.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[trimmed.len() - 1] == bytes[0]
    {
        return Value::String(trimmed[1..trimmed.len() - 1].to_string());
    }

    Value::String(trimmed.to_string())
}

/// Splits a problem input line into its positional argument values.
///
/// Lines in `name = value` form yield one value per assignment. Lines
/// without assignments fall back to a top-level comma split, so
/// `[2,7,11,15], 9` still yields two arguments. The assignment pattern is a
/// textual heuristic over scraped problem text, not a parser; an `=` inside
/// a string value will mislead it.
pub fn parse_input_line(text: &str) -> Vec<Value> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let heads: Vec<_> = ASSIGNMENT.find_iter(text).collect();
    if heads.is_empty() {
        return split_top_level(text)
            .into_iter()
            .map(parse_value)
            .collect();
    }

    let mut values = Vec::with_capacity(heads.len());
    for (index, head) in heads.iter().enumerate() {
        let end = heads
            .get(index + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let segment = text[head.end()..end].trim_end().trim_end_matches(',');
        values.push(parse_value(segment));
    }
    values
}

/// Splits on commas that sit outside any `[]` or `{}` nesting.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (index, ch) in text.char_indices() {
        match ch {
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Structural equality between two values.
///
/// No coercion happens across type tags, so `1` and `"1"` are unequal.
/// Numbers compare numerically and integer and float spellings of the same
/// quantity are equal. Object key order never matters; array order always
/// does.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        // a == b already covered (null, null)
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(left), Value::Number(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        },
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left.iter().zip(right.iter()).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, l)| right.get(key).is_some_and(|r| deep_equal(l, r)))
        }
        _ => false,
    }
}
