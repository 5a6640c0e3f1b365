//! Presentation helpers.
//!
//! All rounding lives here. Nothing in this module feeds back into the
//! ledger or remaining-capacity arithmetic.

use crate::{RiskLevel, UsageBand};

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Format with a fixed number of decimal places
pub fn fixed(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_to(value, places))
}

/// Percent strength (w/v) of a concentration given in mg/ml
///
/// 10 mg/ml is a 1% solution.
pub fn percent_strength(concentration_mg_ml: f64) -> f64 {
    concentration_mg_ml / 10.0
}

/// Label such as `20 mg/ml (2.00%)`
pub fn concentration_label(concentration_mg_ml: f64) -> String {
    format!(
        "{} mg/ml ({:.2}%)",
        concentration_mg_ml,
        percent_strength(concentration_mg_ml)
    )
}

/// Colour band for the cumulative-use progress bar
pub fn usage_band(total_percent_used: f64) -> UsageBand {
    if total_percent_used > 85.0 {
        UsageBand::Red
    } else if total_percent_used > 50.0 {
        UsageBand::Orange
    } else {
        UsageBand::Green
    }
}

/// Classify the remaining fraction of the ceiling
pub fn classify_remaining(remaining_fraction: f64) -> RiskLevel {
    if remaining_fraction > 0.5 {
        RiskLevel::Low
    } else if remaining_fraction > 0.2 {
        RiskLevel::Caution
    } else {
        RiskLevel::High
    }
}
