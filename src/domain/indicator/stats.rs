//! Mean and population standard deviation over a numeric sequence.

use crate::domain::error::IndicatorError;

pub fn mean(values: &[f64]) -> Result<f64, IndicatorError> {
    if values.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// sqrt(sum((x - mean)^2) / n), dividing by N rather than N-1.
pub fn stddev(values: &[f64]) -> Result<f64, IndicatorError> {
    let m = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    Ok(variance.sqrt())
}
