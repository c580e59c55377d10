//! Money parsing and spreadsheet formatting helpers.
//!
//! Upstream APIs ship currency amounts inconsistently: JSON numbers, plain
//! strings, strings with space group separators and comma decimal marks.
//! Everything funnels through [`parse_money`], which never fails; unparsable
//! input counts as zero.

pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Lenient currency/number parser. `"1 234,56"` -> `1234.56`, garbage -> `0.0`.
pub fn parse_money(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Spreadsheet integer formatting: round half away from zero, drop the
/// fraction. `None` renders as an empty cell.
pub fn fmt_num(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_finite() => format!("{}", v.round() as i64),
        Some(_) => String::from("0"),
    }
}

/// Major currency units to integer micro-units, ties to even.
pub fn to_micro(major: f64) -> i64 {
    (major * MICROS_PER_UNIT as f64).round_ties_even() as i64
}

/// Integer micro-units to major currency units.
pub fn from_micro(micro: i64) -> f64 {
    micro as f64 / MICROS_PER_UNIT as f64
}
