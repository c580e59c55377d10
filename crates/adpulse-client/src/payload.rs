//! Lenient extraction of loosely-typed upstream JSON fields.
//!
//! Both upstreams ship numbers as JSON numbers or as localized strings
//! depending on the endpoint and the day of the week. Everything funnels
//! through these coercions; a missing or garbled field counts as zero.

use adpulse_core::domain::money::parse_money;
use serde_json::Value;

/// Numeric field: number, numeric string, or anything else as zero.
pub fn num(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_money(s),
        _ => 0.0,
    }
}

/// Non-negative count field.
pub fn count(value: Option<&Value>) -> u64 {
    let n = num(value);
    if n.is_finite() && n > 0.0 {
        n.round() as u64
    } else {
        0
    }
}

/// Integer field kept as an integer, `None` when absent or garbled.
pub fn int_opt(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            let parsed = parse_money(s);
            if parsed == 0.0 && s.trim() != "0" {
                None
            } else {
                Some(parsed.round() as i64)
            }
        }
        _ => None,
    }
}

/// Text field: string, number rendered as text, otherwise empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
