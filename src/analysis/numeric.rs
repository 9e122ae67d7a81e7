//! Small numeric helpers shared by the aggregator and the rating calculator.
//! Every division here falls back to 0 when the denominator is 0.

const DISPLAY_PLACES: i32 = 2;

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Two-decimal value for display; non-finite input becomes 0
pub fn round_for_display(value: f64) -> f64 {
    if value.is_finite() {
        round_to(value, DISPLAY_PLACES)
    } else {
        0.0
    }
}

pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_for_display(numerator as f64 / denominator as f64)
}

pub fn percent(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_for_display(100.0 * numerator as f64 / denominator as f64)
}

pub fn median(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let middle = sorted.len() / 2;

    let value = if sorted.len() % 2 == 0 {
        (sorted[middle - 1] as f64 + sorted[middle] as f64) / 2.0
    } else {
        sorted[middle] as f64
    };
    round_for_display(value)
}
