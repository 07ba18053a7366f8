use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single cell as delivered by the decoder boundary.
///
/// CSV decoding only ever produces `Text` and `Empty`; the typed variants
/// exist because spreadsheet decoders hand over numbers and dates directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Empty,
}

fn re_amountish() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"^\(?\s*-?\s*\$?\s*[\d.,]+\s*\)?$").expect("invalid regex")
    })
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(t) => t.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Best-effort numeric view: typed numbers pass through, text is parsed
    /// as a monetary amount. Dates and blanks have no numeric value.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(t) => parse_amount(t),
            _ => None,
        }
    }

    /// Render the raw value without role-aware coercion.
    pub fn to_plain_string(&self) -> String {
        match self {
            Cell::Text(t) => t.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// Parse a monetary-looking string into a `Decimal`.
///
/// Accepts currency signs, thousands separators, inner whitespace and
/// accounting parentheses; anything carrying letters is rejected so store
/// codes like `CLL80` never coerce.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() || !re_amountish().is_match(s) {
        return None;
    }
    let (negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let cleaned = s.replace([',', '$', ' '], "");
    let mut dec = Decimal::from_str(&cleaned).ok()?;
    if negative {
        dec = -dec;
    }
    Some(dec)
}

/// Display currency: `$` plus thousands separators, no decimal places.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round();
    let raw = rounded.to_string();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", raw.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}
