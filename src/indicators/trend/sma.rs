//! SMA (Simple Moving Average) indicator

/// Unweighted mean of the last `period` values, `None` if there are fewer
pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
