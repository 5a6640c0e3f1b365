//! Local anaesthetic drug catalog.
//!
//! The catalog is plain data: calculation code only ever sees it through
//! [`Catalog::lookup`], so a different drug list can be loaded from a TOML
//! file without touching any formula.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of local anaesthetics
///
/// **Note**: prefer `get_default_catalog()` which returns a cached reference.
/// This function is retained for tests and for building modified catalogs.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn drug(name: &str, toxic_dose_per_kg: f64, concentrations: &[f64]) -> DrugDefinition {
    DrugDefinition {
        name: name.into(),
        toxic_dose_per_kg,
        concentrations: concentrations.to_vec(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    Catalog {
        drugs: vec![
            drug("Lidocaine", 3.0, &[10.0, 20.0]),
            drug("Lidocaine + Adrenaline", 7.0, &[10.0, 15.0, 20.0]),
            drug("Topical Lidocaine", 9.0, &[10.0, 20.0, 40.0, 100.0]),
            // Levobupivacaine and bupivacaine share one threshold
            drug("(Levo)Bupivacaine", 2.0, &[2.5, 3.75, 5.0, 7.5]),
            drug("Ropivacaine", 3.0, &[3.75, 5.0, 7.5]),
            drug("Prilocaine", 6.0, &[10.0, 20.0]),
        ],
    }
}

impl Catalog {
    /// Find a drug by its exact name
    pub fn lookup(&self, name: &str) -> Result<&DrugDefinition> {
        self.drugs
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// First standard concentration of the named drug
    pub fn default_concentration(&self, name: &str) -> Result<f64> {
        let def = self.lookup(name)?;
        def.default_concentration().ok_or_else(|| {
            Error::CatalogValidation(format!("Drug '{}' has no concentrations", name))
        })
    }

    /// Drug preselected by a form (the first in the list)
    pub fn default_drug(&self) -> Option<&DrugDefinition> {
        self.drugs.first()
    }

    /// Drug names in display order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drugs.iter().map(|d| d.name.as_str())
    }

    /// Parse a catalog from TOML and validate it
    ///
    /// ```toml
    /// [[drugs]]
    /// name = "Lidocaine"
    /// toxic_dose_per_kg = 3.0
    /// concentrations = [10.0, 20.0]
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(contents)?;
        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded catalog with {} drugs from {:?}",
            catalog.drugs.len(),
            path
        );
        Ok(catalog)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.drugs.is_empty() {
            errors.push("Catalog has no drugs".to_string());
        }

        let mut seen = HashSet::new();
        for def in &self.drugs {
            if def.name.trim().is_empty() {
                errors.push("Drug has empty name".to_string());
            }
            if !seen.insert(def.name.as_str()) {
                errors.push(format!("Duplicate drug name '{}'", def.name));
            }
            if !(def.toxic_dose_per_kg.is_finite() && def.toxic_dose_per_kg > 0.0) {
                errors.push(format!(
                    "Drug '{}': toxic dose {} mg/kg must be positive",
                    def.name, def.toxic_dose_per_kg
                ));
            }
            if def.concentrations.is_empty() {
                errors.push(format!("Drug '{}' has no concentrations", def.name));
            }
            for c in &def.concentrations {
                if !(c.is_finite() && *c > 0.0) {
                    errors.push(format!(
                        "Drug '{}': concentration {} mg/ml must be positive",
                        def.name, c
                    ));
                }
            }
        }

        errors
    }
}
