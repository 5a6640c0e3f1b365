//! Core domain types for local anaesthetic dose budgeting.
//!
//! This module defines the fundamental types used throughout the system:
//! - Drug definitions and the catalog that holds them
//! - Patient profile with derived dosing weight
//! - Recorded dose entries
//! - Remaining-capacity results and their classifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Drug Types
// ============================================================================

/// A local anaesthetic agent with its toxic threshold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrugDefinition {
    pub name: String,
    /// Milligrams per kilogram of dosing weight considered toxic
    pub toxic_dose_per_kg: f64,
    /// Standard concentrations in mg/ml; the first one is the default
    pub concentrations: Vec<f64>,
}

impl DrugDefinition {
    /// First listed concentration, if any.
    pub fn default_concentration(&self) -> Option<f64> {
        self.concentrations.first().copied()
    }

    /// Absolute toxic ceiling in mg for the given dosing weight.
    pub fn ceiling_mg(&self, dosing_weight_kg: f64) -> f64 {
        self.toxic_dose_per_kg * dosing_weight_kg
    }
}

/// Ordered collection of drug definitions
///
/// Order is significant: the first drug is what a form preselects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Catalog {
    #[serde(default)]
    pub drugs: Vec<DrugDefinition>,
}

// ============================================================================
// Patient Types
// ============================================================================

/// Patient sex as used by the Devine formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Base weight in kg at 152 cm.
    pub fn ibw_base_kg(self) -> f64 {
        match self {
            Sex::Male => 50.0,
            Sex::Female => 45.5,
        }
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Sex::Male),
            "f" | "female" => Ok(Sex::Female),
            other => Err(Error::InvalidInput(format!("unrecognised sex '{}'", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

/// Result of the dosing-weight calculation, unrounded
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosingWeight {
    pub ideal_body_weight_kg: f64,
    pub dosing_weight_kg: f64,
}

/// Patient data captured once per session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub sex: Sex,
    pub height_cm: f64,
    pub actual_weight_kg: f64,
    pub ideal_body_weight_kg: f64,
    pub dosing_weight_kg: f64,
}

// ============================================================================
// Ledger Types
// ============================================================================

/// Identifier of a ledger entry, unique within a session
pub type EntryId = u32;

/// One recorded injection
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseEntry {
    pub id: EntryId,
    pub drug_name: String,
    pub concentration_mg_ml: f64,
    pub volume_ml: f64,
    pub dose_mg: f64,
    pub percent_of_ceiling: f64,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Remaining Capacity Types
// ============================================================================

/// Advisory classification of how much of the ceiling is left
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// More than half the ceiling remains
    Low,
    /// Between a fifth and a half remains
    Caution,
    /// A fifth or less remains
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Caution => "caution",
            RiskLevel::High => "high",
        }
    }
}

/// Colour band of the cumulative-use progress bar
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageBand {
    Green,
    Orange,
    Red,
}

impl UsageBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageBand::Green => "green",
            UsageBand::Orange => "orange",
            UsageBand::Red => "red",
        }
    }
}

/// What can still be given of one drug at one concentration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemainingCapacity {
    pub drug_name: String,
    pub concentration_mg_ml: f64,
    pub ceiling_mg: f64,
    pub remaining_dose_mg: f64,
    pub remaining_volume_ml: f64,
    pub remaining_percent: f64,
    pub risk: RiskLevel,
}
