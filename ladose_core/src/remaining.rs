//! Remaining safe dose and volume.
//!
//! The used fraction is the ledger's total across *all* drugs, applied to
//! the selected drug's ceiling. Toxicity from local anaesthetics is
//! additive, so burden from a different agent reduces what is left of this
//! one. Counting only entries of the selected drug would overstate what can
//! still be given, and is intentionally not offered.

use crate::display::classify_remaining;
use crate::ledger::CEILING_PERCENT;
use crate::{Catalog, DoseLedger, Error, PatientProfile, RemainingCapacity, Result};

/// Compute what can still be given of `drug_name` at `concentration_mg_ml`
///
/// A non-positive or non-finite concentration yields a remaining volume of
/// zero rather than an error. Results are clamped at zero and never
/// negative. This is a pure read of the ledger.
pub fn remaining(
    ledger: &DoseLedger,
    profile: &PatientProfile,
    catalog: &Catalog,
    drug_name: &str,
    concentration_mg_ml: f64,
) -> Result<RemainingCapacity> {
    let drug = catalog.lookup(drug_name)?;
    let ceiling_mg = drug.ceiling_mg(profile.dosing_weight_kg);
    if !(ceiling_mg.is_finite() && ceiling_mg > 0.0) {
        return Err(Error::InvalidInput(format!(
            "toxic ceiling for {} is {} mg; dosing weight {} kg must be positive",
            drug_name, ceiling_mg, profile.dosing_weight_kg
        )));
    }

    let used_fraction = ledger.total_percent_used() / CEILING_PERCENT;
    let remaining_dose_mg = (ceiling_mg * (1.0 - used_fraction)).max(0.0);
    let remaining_percent = (CEILING_PERCENT - ledger.total_percent_used()).max(0.0);

    let remaining_volume_ml = if concentration_mg_ml.is_finite() && concentration_mg_ml > 0.0 {
        remaining_dose_mg / concentration_mg_ml
    } else {
        0.0
    };

    let risk = classify_remaining(remaining_dose_mg / ceiling_mg);

    tracing::debug!(
        "Remaining {}: {} mg / {} ml at {} mg/ml ({:?})",
        drug_name,
        remaining_dose_mg,
        remaining_volume_ml,
        concentration_mg_ml,
        risk
    );

    Ok(RemainingCapacity {
        drug_name: drug.name.clone(),
        concentration_mg_ml,
        ceiling_mg,
        remaining_dose_mg,
        remaining_volume_ml,
        remaining_percent,
        risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::{RiskLevel, Sex};

    fn profile_60kg() -> PatientProfile {
        PatientProfile::new(Sex::Male, 170.0, 60.0)
    }

    #[test]
    fn test_empty_ledger_has_full_ceiling() {
        let profile = profile_60kg();
        let ledger = DoseLedger::for_patient(&profile);

        let r = remaining(&ledger, &profile, get_default_catalog(), "Lidocaine", 10.0).unwrap();
        assert_eq!(r.ceiling_mg, 180.0);
        assert_eq!(r.remaining_dose_mg, 180.0);
        assert_eq!(r.remaining_volume_ml, 18.0);
        assert_eq!(r.remaining_percent, 100.0);
        assert_eq!(r.risk, RiskLevel::Low);
    }

    #[test]
    fn test_aggregate_burden_across_drugs() {
        let catalog = get_default_catalog();
        let profile = profile_60kg();
        let mut ledger = DoseLedger::for_patient(&profile);

        // 50% used, all of it Lidocaine
        ledger.add_entry(catalog, "Lidocaine", 20.0, 4.5).unwrap();

        // Ropivacaine ceiling 180 mg: half of it is gone even though none was given
        let r = remaining(&ledger, &profile, catalog, "Ropivacaine", 7.5).unwrap();
        assert_eq!(r.remaining_dose_mg, 90.0);
        assert_eq!(r.remaining_volume_ml, 12.0);
        assert_eq!(r.remaining_percent, 50.0);
        assert_eq!(r.risk, RiskLevel::Caution);
    }

    #[test]
    fn test_never_negative_at_or_over_ceiling() {
        let catalog = get_default_catalog();
        let profile = profile_60kg();
        let mut ledger = DoseLedger::for_patient(&profile);
        ledger.add_entry(catalog, "Lidocaine", 20.0, 9.0).unwrap();
        assert_eq!(ledger.total_percent_used(), 100.0);

        for drug in catalog.names() {
            let r = remaining(&ledger, &profile, catalog, drug, 10.0).unwrap();
            assert_eq!(r.remaining_dose_mg, 0.0);
            assert_eq!(r.remaining_volume_ml, 0.0);
            assert_eq!(r.remaining_percent, 0.0);
            assert_eq!(r.risk, RiskLevel::High);
        }
    }

    #[test]
    fn test_thirds_do_not_go_negative() {
        let catalog = get_default_catalog();
        let profile = profile_60kg();
        let mut ledger = DoseLedger::for_patient(&profile);
        for _ in 0..3 {
            ledger.add_entry(catalog, "Lidocaine", 20.0, 3.0).unwrap();
        }

        let r = remaining(&ledger, &profile, catalog, "Lidocaine", 20.0).unwrap();
        assert!(r.remaining_dose_mg >= 0.0);
        assert!(r.remaining_dose_mg < 1e-9);
        assert!(r.remaining_volume_ml >= 0.0);
    }

    #[test]
    fn test_non_positive_concentration_gives_zero_volume() {
        let profile = profile_60kg();
        let ledger = DoseLedger::for_patient(&profile);
        let catalog = get_default_catalog();

        for conc in [0.0, -5.0, f64::NAN] {
            let r = remaining(&ledger, &profile, catalog, "Lidocaine", conc).unwrap();
            assert_eq!(r.remaining_dose_mg, 180.0);
            assert_eq!(r.remaining_volume_ml, 0.0);
        }
    }

    #[test]
    fn test_unknown_drug() {
        let profile = profile_60kg();
        let ledger = DoseLedger::for_patient(&profile);
        let err = remaining(&ledger, &profile, get_default_catalog(), "Cocaine", 10.0).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_zero_dosing_weight_is_invalid() {
        let profile = PatientProfile::new(Sex::Female, 100.0, 0.0);
        let ledger = DoseLedger::for_patient(&profile);
        let err = remaining(&ledger, &profile, get_default_catalog(), "Lidocaine", 10.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_idempotent_read() {
        let catalog = get_default_catalog();
        let profile = profile_60kg();
        let mut ledger = DoseLedger::for_patient(&profile);
        ledger.add_entry(catalog, "Prilocaine", 10.0, 7.0).unwrap();
        let snapshot = ledger.clone();

        let first = remaining(&ledger, &profile, catalog, "Lidocaine + Adrenaline", 15.0).unwrap();
        let second = remaining(&ledger, &profile, catalog, "Lidocaine + Adrenaline", 15.0).unwrap();

        assert_eq!(first, second);
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_risk_thresholds() {
        let catalog = get_default_catalog();
        let profile = profile_60kg();
        let mut ledger = DoseLedger::for_patient(&profile);

        // 80% used leaves exactly a fifth
        ledger.add_entry(catalog, "Lidocaine", 20.0, 7.2).unwrap();
        let r = remaining(&ledger, &profile, catalog, "Lidocaine", 20.0).unwrap();
        assert_eq!(r.risk, RiskLevel::High);
    }
}
