//! Coercion of loosely-typed request values into domain types.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::errors::AppError;

/// A number that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn as_text(&self) -> String {
        match self {
            LooseNumber::Number(n) => n.to_string(),
            LooseNumber::Text(s) => s.trim().to_string(),
        }
    }
}

pub fn parse_quantity(value: &LooseNumber) -> Result<i32, AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid quantity '{}'", value.as_text()));

    match value {
        LooseNumber::Number(n) => {
            let in_range = (i32::MIN as f64..=i32::MAX as f64).contains(n);
            if !n.is_finite() || n.fract() != 0.0 || !in_range {
                return Err(invalid());
            }
            Ok(*n as i32)
        }
        LooseNumber::Text(s) => s.trim().parse::<i32>().map_err(|_| invalid()),
    }
}

/// PostgreSQL `NUMERIC` limits: digits after and before the decimal point.
const NUMERIC_MAX_SCALE: i64 = 16_383;
const NUMERIC_MAX_INT_DIGITS: i64 = 131_072;

/// Parses a price that a `NUMERIC` column can hold. Exponent notation is
/// accepted but rewritten without a negative or oversized scale.
pub fn parse_price(value: &LooseNumber) -> Result<BigDecimal, AppError> {
    let text = value.as_text();
    let invalid = || AppError::BadRequest(format!("Invalid price '{text}'"));
    if text.is_empty() {
        return Err(invalid());
    }

    let price = BigDecimal::from_str(&text).map_err(|_| invalid())?;
    let normalized = price.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    let int_digits = normalized.digits() as i64 - scale;
    if scale > NUMERIC_MAX_SCALE || int_digits > NUMERIC_MAX_INT_DIGITS {
        return Err(invalid());
    }

    let (_, raw_scale) = price.as_bigint_and_exponent();
    if (0..=NUMERIC_MAX_SCALE).contains(&raw_scale) {
        Ok(price)
    } else {
        Ok(normalized.with_scale(scale.max(0)))
    }
}

/// Accepts RFC 3339 or the `YYYY-MM-DDTHH:MM[:SS]` form produced by
/// `datetime-local` inputs, read as UTC. Blank means no pickup time.
pub fn parse_pickup_time(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid pickupTime '{raw}'")))
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
