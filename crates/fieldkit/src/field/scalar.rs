// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar coercion rules: integer, number, boolean and enum kinds.
//!
//! Integer and number coercion follow the loose parsing conventions of
//! web form input: a string contributes its longest numeric prefix
//! (`"123abc"` is 123, `"0xff"` is 255 for integers), finite numbers are
//! truncated or widened, and anything without a numeric prefix is
//! rejected.

use crate::error::ValidationError;
use crate::value::Value;

/// Optional inclusive clamp bounds shared by integer and number fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    fn clamp_f64(&self, mut v: f64) -> f64 {
        if let Some(min) = self.min {
            if v < min {
                v = min;
            }
        }
        if let Some(max) = self.max {
            if v > max {
                v = max;
            }
        }
        v
    }

    fn clamp_i64(&self, mut v: i64) -> i64 {
        if let Some(min) = self.min {
            if (v as f64) < min {
                v = min.ceil() as i64;
            }
        }
        if let Some(max) = self.max {
            if (v as f64) > max {
                v = max.floor() as i64;
            }
        }
        v
    }
}

/// One allowed value of an enum field, with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumChoice {
    pub value: Value,
    pub label: String,
}

impl EnumChoice {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Integer prefix parse.
pub(crate) fn parse_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Integer(i) => Some(*i),
        Value::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = split_sign(s);
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let sign = if negative { "-" } else { "" };
    // Digit runs past the i64 range saturate, clamping happens later.
    match i64::from_str_radix(&format!("{sign}{}", &digits[..end]), radix) {
        Ok(value) => Some(value),
        Err(_) if negative => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Float prefix parse.
pub(crate) fn parse_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Integer(i) => Some(*i as f64),
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

pub(crate) fn clean_integer(
    field: &str,
    bounds: &Bounds,
    raw: &Value,
) -> Result<Value, ValidationError> {
    let parsed = parse_int(raw).ok_or_else(|| {
        ValidationError::new(field, format!("{} is not an integer", raw.kind_name()))
    })?;
    Ok(Value::Integer(bounds.clamp_i64(parsed)))
}

pub(crate) fn clean_number(
    field: &str,
    bounds: &Bounds,
    raw: &Value,
) -> Result<Value, ValidationError> {
    let parsed = parse_float(raw).ok_or_else(|| {
        ValidationError::new(field, format!("{} is not a number", raw.kind_name()))
    })?;
    Ok(Value::Number(bounds.clamp_f64(parsed)))
}

pub(crate) fn clean_boolean(raw: &Value) -> Value {
    Value::Bool(raw.is_truthy())
}

pub(crate) fn clean_enum(
    field: &str,
    choices: &[EnumChoice],
    raw: &Value,
) -> Result<Value, ValidationError> {
    choices
        .iter()
        .find(|choice| coerce_like(&choice.value, raw).as_ref() == Some(&choice.value))
        .map(|choice| choice.value.clone())
        .ok_or_else(|| ValidationError::new(field, format!("{raw} is not one of the choices")))
}

/// Coerce `raw` to the variant of `like`, strictly (whole-string parses).
fn coerce_like(like: &Value, raw: &Value) -> Option<Value> {
    match (like, raw) {
        (Value::Integer(_), Value::Integer(i)) => Some(Value::Integer(*i)),
        (Value::Integer(_), Value::Number(n)) if n.fract() == 0.0 => {
            Some(Value::Integer(*n as i64))
        }
        (Value::Integer(_), Value::String(s)) => s.trim().parse().ok().map(Value::Integer),
        (Value::Number(_), Value::Number(_) | Value::Integer(_)) => raw.as_f64().map(Value::Number),
        (Value::Number(_), Value::String(s)) => s.trim().parse().ok().map(Value::Number),
        (Value::String(_), Value::String(s)) => Some(Value::String(s.clone())),
        (Value::String(_), Value::Integer(i)) => Some(Value::String(i.to_string())),
        (Value::String(_), Value::Number(n)) => Some(Value::String(n.to_string())),
        _ => Some(raw.clone()),
    }
}

/// Normalize the numeric wire representation without validating.
pub(crate) fn integer_from_wire(wire: &Value) -> Value {
    match wire {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Value::Integer(*n as i64),
        other => other.clone(),
    }
}

pub(crate) fn number_from_wire(wire: &Value) -> Value {
    match wire {
        Value::Integer(i) => Value::Number(*i as f64),
        other => other.clone(),
    }
}
