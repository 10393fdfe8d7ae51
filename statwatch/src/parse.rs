//! Stats line parser: `"load,memTotal,memUsed,diskTotal,diskUsed,netTotal,netUsed"`.

use thiserror::Error;

use crate::types::{MetricVector, FIELD_COUNT};

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected 7 fields, got {0}")]
    FieldCount(usize),
    #[error("field {index} is not a number: {value:?}")]
    InvalidNumber { index: usize, value: String },
    #[error("field {index} is not finite")]
    NonFinite { index: usize },
}

/// Parse one stats line. Either all seven fields parse or nothing is returned.
pub fn parse_stats(text: &str) -> Result<MetricVector, ParseError> {
    let fields: Vec<&str> = text.trim().split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let mut values = [0.0f64; FIELD_COUNT];
    for (index, (slot, raw)) in values.iter_mut().zip(fields).enumerate() {
        let raw = raw.trim();
        let v: f64 = raw.parse().map_err(|_| ParseError::InvalidNumber {
            index,
            value: raw.to_string(),
        })?;
        if !v.is_finite() {
            return Err(ParseError::NonFinite { index });
        }
        *slot = v;
    }
    Ok(MetricVector::from(values))
}
