//! Cumulative dose ledger.
//!
//! Each entry is expressed as a percentage of its own drug's toxic ceiling
//! for the patient's dosing weight, and percentages are summed across all
//! drugs. Two thresholds apply and are deliberately distinct:
//! - [`CEILING_PERCENT`]: hard limit, an entry that would push the total
//!   above it is rejected and the ledger is left untouched
//! - [`ADD_MORE_GATE_PERCENT`]: soft limit, callers stop offering new
//!   entries once the total reaches it

use crate::{Catalog, DoseEntry, EntryId, Error, PatientProfile, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Hard ceiling on cumulative use, in percent of the toxic dose
pub const CEILING_PERCENT: f64 = 100.0;

/// Cumulative use at which callers should stop offering new entries
pub const ADD_MORE_GATE_PERCENT: f64 = 95.0;

// Absorbs representation error so that entries summing to exactly 100% on
// paper (e.g. three thirds) are not rejected.
const CEILING_TOLERANCE: f64 = 1e-9;

/// Running record of injections for one session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseLedger {
    dosing_weight_kg: f64,
    entries: Vec<DoseEntry>,
    total_percent_used: f64,
    next_id: EntryId,
}

impl DoseLedger {
    /// Create an empty ledger for a dosing weight
    pub fn new(dosing_weight_kg: f64) -> Self {
        Self {
            dosing_weight_kg,
            entries: Vec::new(),
            total_percent_used: 0.0,
            next_id: 1,
        }
    }

    /// Create an empty ledger for a patient
    pub fn for_patient(profile: &PatientProfile) -> Self {
        Self::new(profile.dosing_weight_kg)
    }

    pub fn dosing_weight_kg(&self) -> f64 {
        self.dosing_weight_kg
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[DoseEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry's percent of ceiling
    pub fn total_percent_used(&self) -> f64 {
        self.total_percent_used
    }

    /// Whether a caller should still offer to add entries
    pub fn can_add_more(&self) -> bool {
        self.total_percent_used < ADD_MORE_GATE_PERCENT
    }

    /// Milligrams recorded against one drug
    pub fn used_mg_by_drug(&self, drug_name: &str) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.drug_name == drug_name)
            .map(|e| e.dose_mg)
            .sum()
    }

    /// Record an injection
    ///
    /// Validation and the ceiling check happen before anything is stored:
    /// on any error the ledger is exactly as it was.
    pub fn add_entry(
        &mut self,
        catalog: &Catalog,
        drug_name: &str,
        concentration_mg_ml: f64,
        volume_ml: f64,
    ) -> Result<DoseEntry> {
        if !(volume_ml.is_finite() && volume_ml > 0.0) {
            return Err(Error::InvalidInput(format!(
                "volume {} ml must be a positive number",
                volume_ml
            )));
        }
        if !(concentration_mg_ml.is_finite() && concentration_mg_ml > 0.0) {
            return Err(Error::InvalidInput(format!(
                "concentration {} mg/ml must be a positive number",
                concentration_mg_ml
            )));
        }

        let drug = catalog.lookup(drug_name)?;

        let dose_mg = volume_ml * concentration_mg_ml;
        let ceiling_mg = drug.ceiling_mg(self.dosing_weight_kg);
        if !(ceiling_mg.is_finite() && ceiling_mg > 0.0) {
            return Err(Error::InvalidInput(format!(
                "toxic ceiling for {} is {} mg; dosing weight {} kg must be positive",
                drug_name, ceiling_mg, self.dosing_weight_kg
            )));
        }

        let percent = dose_mg / ceiling_mg * 100.0;
        let new_total = self.total_percent_used + percent;
        if new_total > CEILING_PERCENT + CEILING_TOLERANCE {
            tracing::warn!(
                "Rejected {} ml of {} @ {} mg/ml: total would be {:.2}%",
                volume_ml,
                drug_name,
                concentration_mg_ml,
                new_total
            );
            return Err(Error::OverdoseRejected {
                attempted_percent: percent,
                resulting_total_percent: new_total,
            });
        }

        let entry = DoseEntry {
            id: self.next_id,
            drug_name: drug.name.clone(),
            concentration_mg_ml,
            volume_ml,
            dose_mg,
            percent_of_ceiling: percent,
            recorded_at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        self.recompute_total();

        tracing::info!(
            "Added entry {}: {} mg of {} ({:.2}%), total {:.2}%",
            entry.id,
            entry.dose_mg,
            entry.drug_name,
            entry.percent_of_ceiling,
            self.total_percent_used
        );
        Ok(entry)
    }

    /// Remove an entry by id; absent ids are ignored
    pub fn remove_entry(&mut self, id: EntryId) -> Option<DoseEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(idx);
        self.recompute_total();

        tracing::info!(
            "Removed entry {} ({}), total {:.2}%",
            id,
            removed.drug_name,
            self.total_percent_used
        );
        Some(removed)
    }

    // Always summed from scratch so repeated add/remove cycles cannot drift.
    fn recompute_total(&mut self) {
        self.total_percent_used = self.entries.iter().map(|e| e.percent_of_ceiling).sum();
    }
}
