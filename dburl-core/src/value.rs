//! Typed query parameter values and the coercion chain that produces them.
//!
//! Query strings carry untyped text. Each raw value is run through a fixed
//! chain of parse attempts and the first one that accepts the whole token
//! wins:
//!
//! 1. integer (`42`, `-7`, `+3`)
//! 2. float (`8001.2`, `.5`, `1e3`, `-2.5E-4`); `3.4.5` is not a float
//! 3. boolean (`true` / `false`, any case)
//! 4. null (`null` / `none`, any case)
//! 5. string, verbatim
//!
//! ```rust
//! use dburl_core::{Value, coerce_value};
//!
//! assert_eq!(coerce_value("42"), Value::Int(42));
//! assert_eq!(coerce_value("8001.2"), Value::Float(8001.2));
//! assert_eq!(coerce_value("FALSE"), Value::Bool(false));
//! assert_eq!(coerce_value("3.4.5"), Value::String("3.4.5".into()));
//! assert_eq!(coerce_value(""), Value::String(String::new()));
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// A coerced query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value (`null` / `none`).
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
}

impl Value {
    /// Get the boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get a float view of any numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Self::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Coerce a single raw query value.
pub fn coerce_value(raw: &str) -> Value {
    if let Some(n) = parse_int(raw) {
        return Value::Int(n);
    }
    if let Some(x) = parse_float(raw) {
        return Value::Float(x);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("none") {
        return Value::Null;
    }
    Value::String(raw.to_string())
}

/// Split a raw query string into coerced parameters.
///
/// Pairs are separated by `&` and split on their first `=` only; a pair
/// without `=` gets an empty string value. Keys and values are taken
/// verbatim. A repeated key keeps its first position and takes the last
/// value.
pub fn coerce_query(raw_query: &str) -> IndexMap<String, Value> {
    let mut params = IndexMap::new();

    for pair in raw_query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = coerce_value(raw);
        trace!(key = key, kind = value.type_name(), "Coerced query parameter");
        params.insert(key.to_string(), value);
    }

    params
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_int(raw: &str) -> Option<i64> {
    let digits = strip_sign(raw);
    if digits.is_empty() || !all_digits(digits) {
        return None;
    }
    raw.parse().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    let body = strip_sign(raw);

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    if let Some(exp) = exponent {
        let exp = strip_sign(exp);
        if exp.is_empty() || !all_digits(exp) {
            return None;
        }
    }

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None if exponent.is_some() => (mantissa, ""),
        None => return None,
    };

    if whole.len() + fraction.len() == 0 || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    raw.parse::<f64>().ok().filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_value("42"), Value::Int(42));
        assert_eq!(coerce_value("-7"), Value::Int(-7));
        assert_eq!(coerce_value("+3"), Value::Int(3));
        assert_eq!(coerce_value("007"), Value::Int(7));
    }

    #[test]
    fn test_coerce_int_overflow_is_string() {
        let raw = "99999999999999999999999";
        assert_eq!(coerce_value(raw), Value::String(raw.to_string()));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_value("8001.2"), Value::Float(8001.2));
        assert_eq!(coerce_value("-0.5"), Value::Float(-0.5));
        assert_eq!(coerce_value(".5"), Value::Float(0.5));
        assert_eq!(coerce_value("5."), Value::Float(5.0));
        assert_eq!(coerce_value("1e3"), Value::Float(1000.0));
        assert_eq!(coerce_value("2.5E-1"), Value::Float(0.25));
    }

    #[test]
    fn test_coerce_float_rejects_malformed() {
        for raw in [
            "3.4.5", ".", "1e", "e5", "1.2e+", "inf", "NaN", "1_000.0", "0x1.0", "1e400",
            "-1.5e309",
        ] {
            assert_eq!(coerce_value(raw), Value::String(raw.to_string()), "{raw}");
        }
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_value("true"), Value::Bool(true));
        assert_eq!(coerce_value("False"), Value::Bool(false));
        assert_eq!(coerce_value("TRUE"), Value::Bool(true));
        // Numeric tokens resolve before booleans.
        assert_eq!(coerce_value("1"), Value::Int(1));
        assert_eq!(coerce_value("0"), Value::Int(0));
    }

    #[test]
    fn test_coerce_null() {
        assert_eq!(coerce_value("null"), Value::Null);
        assert_eq!(coerce_value("None"), Value::Null);
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(coerce_value(""), Value::String(String::new()));
        assert_eq!(coerce_value("xyz"), Value::String("xyz".to_string()));
        assert_eq!(coerce_value("1?a"), Value::String("1?a".to_string()));
    }

    #[test]
    fn test_coerce_query() {
        let params =
            coerce_query("max_connections=42&stale_timeout=8001.2&zai=&baz=3.4.5&boolz=false");

        assert_eq!(params.len(), 5);
        assert_eq!(params["max_connections"], Value::Int(42));
        assert_eq!(params["stale_timeout"], Value::Float(8001.2));
        assert_eq!(params["zai"], Value::String(String::new()));
        assert_eq!(params["baz"], Value::String("3.4.5".to_string()));
        assert_eq!(params["boolz"], Value::Bool(false));
    }

    #[test]
    fn test_coerce_query_splits_on_first_equals() {
        let params = coerce_query("opts=a=b=c&flag");
        assert_eq!(params["opts"], Value::String("a=b=c".to_string()));
        assert_eq!(params["flag"], Value::String(String::new()));
    }

    #[test]
    fn test_coerce_query_last_wins() {
        let params = coerce_query("a=1&b=2&a=three");
        let keys: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params["a"], Value::String("three".to_string()));
    }

    #[test]
    fn test_coerce_query_empty() {
        assert!(coerce_query("").is_empty());
        assert_eq!(coerce_query("&&a=1&").len(), 1);
    }

    #[test]
    fn test_int_display_roundtrip() {
        let value = coerce_value("-12345");
        assert_eq!(coerce_value(&value.to_string()), value);

        let value = coerce_value("8001.2");
        assert_eq!(coerce_value(&value.to_string()), value);

        let value = coerce_value("1e400");
        assert_eq!(value, Value::String("1e400".to_string()));
        assert_eq!(coerce_value(&value.to_string()), value);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_int(), None);
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::Bool(false),
            Value::Null,
            Value::from("s"),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,2.5,false,null,"s"]"#);
    }
}
