// Utility functions
use crate::model::{AnalyzeError, Field, Observation};
use tracing::debug;

/// Converts a stored text value to a number, failing loudly on garbage.
pub fn parse_number(field: Field, location: &str, raw: &str) -> Result<f64, AnalyzeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AnalyzeError::InvalidNumber {
            field: field.column(),
            location: location.to_string(),
            value: raw.to_string(),
        })
}

/// Numeric value of `field` in an observation. `NaN` and infinities parse but
/// never take part in a ranking, so they come back as `None`.
pub fn observed_number(observation: &Observation, field: Field) -> Result<Option<f64>, AnalyzeError> {
    let raw = observation
        .value(field)
        .ok_or_else(|| AnalyzeError::MissingField {
            field: field.column(),
            location: observation.location.clone(),
        })?;
    let number = parse_number(field, &observation.location, raw)?;
    if !number.is_finite() {
        debug!("Skipping non-finite {} = {:?} for {}", field.column(), raw, observation.location);
        return Ok(None);
    }
    Ok(Some(number))
}

/// Rounds half away from zero and prints without a fractional part.
pub fn format_rounded(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Prints whole numbers with one decimal (`50.0`), everything else in shortest form.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
