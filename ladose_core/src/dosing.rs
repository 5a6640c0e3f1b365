//! Ideal body weight and dosing weight.
//!
//! Uses the Devine formula:
//! - Male:   IBW = 50.0 + 0.9 * (height_cm - 152)
//! - Female: IBW = 45.5 + 0.9 * (height_cm - 152)
//!
//! The dosing weight is the lesser of IBW and actual weight. Values are
//! carried unrounded; rounding happens only when they are displayed.
//! No physiological range is enforced on height or weight.

use crate::{DosingWeight, Error, PatientProfile, Result, Sex};

const DEVINE_REFERENCE_HEIGHT_CM: f64 = 152.0;
const DEVINE_KG_PER_CM: f64 = 0.9;

/// Compute IBW and dosing weight from already-parsed values
pub fn dosing_weight(sex: Sex, height_cm: f64, actual_weight_kg: f64) -> DosingWeight {
    let ibw = sex.ibw_base_kg() + DEVINE_KG_PER_CM * (height_cm - DEVINE_REFERENCE_HEIGHT_CM);
    let dosing = ibw.min(actual_weight_kg);

    tracing::debug!(
        "Dosing weight for {} @ {} cm, {} kg: IBW {}, dosing {}",
        sex,
        height_cm,
        actual_weight_kg,
        ibw,
        dosing
    );

    DosingWeight {
        ideal_body_weight_kg: ibw,
        dosing_weight_kg: dosing,
    }
}

/// Compute IBW and dosing weight from raw form fields
///
/// Every field is validated before anything is computed, so a bad field
/// never yields a partial result.
pub fn compute_dosing_weight(sex: &str, height_cm: &str, actual_weight_kg: &str) -> Result<DosingWeight> {
    let sex: Sex = sex.parse()?;
    let height = parse_finite("height", height_cm)?;
    let weight = parse_finite("weight", actual_weight_kg)?;
    Ok(dosing_weight(sex, height, weight))
}

/// Parse a numeric form field, rejecting NaN and infinities
pub fn parse_finite(field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} '{}' is not a number", field, raw.trim())))?;

    if !value.is_finite() {
        return Err(Error::InvalidInput(format!(
            "{} '{}' is not a finite number",
            field,
            raw.trim()
        )));
    }
    Ok(value)
}

impl PatientProfile {
    /// Build a profile from parsed values
    pub fn new(sex: Sex, height_cm: f64, actual_weight_kg: f64) -> Self {
        let weights = dosing_weight(sex, height_cm, actual_weight_kg);
        Self {
            sex,
            height_cm,
            actual_weight_kg,
            ideal_body_weight_kg: weights.ideal_body_weight_kg,
            dosing_weight_kg: weights.dosing_weight_kg,
        }
    }

    /// Build a profile from raw form fields
    pub fn from_form(sex: &str, height_cm: &str, actual_weight_kg: &str) -> Result<Self> {
        let sex: Sex = sex.parse()?;
        let height = parse_finite("height", height_cm)?;
        let weight = parse_finite("weight", actual_weight_kg)?;
        Ok(Self::new(sex, height, weight))
    }
}
