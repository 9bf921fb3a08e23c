//! Serde helpers for numeric fields that older documents stored as form text.
//!
//! The browser client saved raw input values, so `"175"`, `""` and `175` can
//! all show up for the same field. Text is read like the browser's
//! `parseFloat`: the longest numeric prefix counts (`"175cm"` is 175), and
//! text with no leading number reads as absent.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub(crate) fn parse_optional_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(s.len());
    (1..=end).rev().find_map(|len| s[..len].parse::<f64>().ok())
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => parse_optional_f64(&s),
        None => None,
    })
}

pub(crate) fn optional_calories<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}
