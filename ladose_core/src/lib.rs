#![forbid(unsafe_code)]

//! Core domain model and dosing arithmetic for local anaesthetic budgeting.
//!
//! This crate provides:
//! - Domain types (drugs, patient profile, dose entries)
//! - Drug catalog management
//! - Ideal body weight and dosing weight
//! - Cumulative dose ledger with overdose rejection
//! - Remaining safe dose and volume
//! - In-memory session state

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod display;
pub mod dosing;
pub mod ledger;
pub mod remaining;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use dosing::{compute_dosing_weight, dosing_weight};
pub use ledger::{DoseLedger, ADD_MORE_GATE_PERCENT, CEILING_PERCENT};
pub use remaining::remaining;
pub use session::Session;
