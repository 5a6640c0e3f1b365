//! In-memory session state.
//!
//! A session is one patient profile plus its dose ledger. It lives only as
//! long as the caller holds it; nothing is written to disk.

use crate::remaining::remaining;
use crate::{
    Catalog, DoseEntry, DoseLedger, EntryId, PatientProfile, RemainingCapacity, Result,
};
use uuid::Uuid;

/// Active dosing session for one patient
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    pub profile: PatientProfile,
    pub ledger: DoseLedger,
}

impl Session {
    /// Start a session from raw form fields
    pub fn start(sex: &str, height_cm: &str, actual_weight_kg: &str) -> Result<Self> {
        let profile = PatientProfile::from_form(sex, height_cm, actual_weight_kg)?;
        Ok(Self::with_profile(profile))
    }

    /// Start a session from an existing profile with an empty ledger
    pub fn with_profile(profile: PatientProfile) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            ledger: DoseLedger::for_patient(&profile),
            profile,
        };
        tracing::info!(
            session = %session.id,
            "Session started: dosing weight {} kg",
            session.profile.dosing_weight_kg
        );
        session
    }

    /// Record an injection in this session's ledger
    pub fn add_entry(
        &mut self,
        catalog: &Catalog,
        drug_name: &str,
        concentration_mg_ml: f64,
        volume_ml: f64,
    ) -> Result<DoseEntry> {
        self.ledger
            .add_entry(catalog, drug_name, concentration_mg_ml, volume_ml)
    }

    /// Remove an injection; absent ids are ignored
    pub fn remove_entry(&mut self, id: EntryId) -> Option<DoseEntry> {
        self.ledger.remove_entry(id)
    }

    /// Remaining capacity for a drug and concentration
    pub fn remaining(
        &self,
        catalog: &Catalog,
        drug_name: &str,
        concentration_mg_ml: f64,
    ) -> Result<RemainingCapacity> {
        remaining(
            &self.ledger,
            &self.profile,
            catalog,
            drug_name,
            concentration_mg_ml,
        )
    }

    /// "Start again": discard the profile and every entry
    ///
    /// Consumes the session so nothing from it can be reused.
    pub fn reset(self) {
        tracing::info!(
            session = %self.id,
            "Session reset, discarding {} entries",
            self.ledger.entries().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, get_default_catalog};
    use crate::{DrugDefinition, Error};

    #[test]
    fn test_start_and_record() {
        crate::logging::init_test();
        let catalog = get_default_catalog();

        let mut session = Session::start("M", "170", "60").unwrap();
        assert_eq!(session.profile.dosing_weight_kg, 60.0);
        assert!(session.ledger.is_empty());

        let entry = session.add_entry(catalog, "Lidocaine", 10.0, 9.0).unwrap();
        assert_eq!(entry.percent_of_ceiling, 50.0);

        let r = session.remaining(catalog, "Lidocaine", 10.0).unwrap();
        assert_eq!(r.remaining_dose_mg, 90.0);
        assert_eq!(r.remaining_volume_ml, 9.0);

        assert!(session.remove_entry(entry.id).is_some());
        assert_eq!(session.ledger.total_percent_used(), 0.0);
    }

    #[test]
    fn test_start_rejects_bad_form() {
        assert!(matches!(
            Session::start("M", "170cm", "60"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let catalog = get_default_catalog();
        let mut first = Session::start("F", "160", "50").unwrap();
        first.add_entry(catalog, "Lidocaine", 10.0, 1.0).unwrap();

        let second = Session::start("F", "160", "50").unwrap();
        assert_ne!(first.id, second.id);
        assert!(second.ledger.is_empty());

        first.reset();
    }

    #[test]
    fn test_catalog_substitution_leaves_dosing_weight_alone() {
        let mut alt = build_default_catalog();
        alt.drugs = vec![DrugDefinition {
            name: "Lidocaine".into(),
            toxic_dose_per_kg: 4.5,
            concentrations: vec![10.0, 20.0],
        }];

        let a = Session::start("M", "170", "60").unwrap();
        let b = Session::start("M", "170", "80").unwrap();
        assert_eq!(a.profile.dosing_weight_kg, 60.0);
        assert!((b.profile.dosing_weight_kg - 66.2).abs() < 1e-9);

        // Only the ceiling moves with the catalog
        let default_r = a.remaining(get_default_catalog(), "Lidocaine", 10.0).unwrap();
        let alt_r = a.remaining(&alt, "Lidocaine", 10.0).unwrap();
        assert_eq!(default_r.ceiling_mg, 180.0);
        assert_eq!(alt_r.ceiling_mg, 270.0);
        assert!(a.remaining(&alt, "Prilocaine", 10.0).is_err());
    }
}
