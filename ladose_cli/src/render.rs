//! Text rendering shared by the one-shot commands and the wizard.

use ladose_core::display::{concentration_label, fixed, usage_band};
use ladose_core::{Catalog, DoseLedger, PatientProfile, RemainingCapacity, Result, ADD_MORE_GATE_PERCENT};
use std::io::Write;

pub fn write_profile(out: &mut impl Write, profile: &PatientProfile, places: u32) -> Result<()> {
    writeln!(out, "  Sex: {}", profile.sex)?;
    writeln!(
        out,
        "  Ideal body weight: {} kg",
        fixed(profile.ideal_body_weight_kg, places)
    )?;
    writeln!(
        out,
        "  Dosing weight: {} kg",
        fixed(profile.dosing_weight_kg, places)
    )?;
    Ok(())
}

pub fn write_ledger(out: &mut impl Write, ledger: &DoseLedger, places: u32) -> Result<()> {
    let total = ledger.total_percent_used();
    writeln!(
        out,
        "  Total toxic dose used: {}% [{}]",
        fixed(total, places),
        usage_band(total).as_str()
    )?;

    if ledger.is_empty() {
        writeln!(out, "  No injections recorded.")?;
    } else {
        writeln!(out, "  Summary:")?;
        for entry in ledger.entries() {
            writeln!(
                out,
                "    #{} {} - {} x {} ml: {} mg ({}%)",
                entry.id,
                entry.drug_name,
                concentration_label(entry.concentration_mg_ml),
                entry.volume_ml,
                fixed(entry.dose_mg, places),
                fixed(entry.percent_of_ceiling, places)
            )?;
        }
    }

    if !ledger.can_add_more() {
        writeln!(
            out,
            "  Cumulative toxic dose >= {}%. No more LAs can be added.",
            ADD_MORE_GATE_PERCENT
        )?;
    }
    Ok(())
}

pub fn write_remaining(out: &mut impl Write, r: &RemainingCapacity, places: u32) -> Result<()> {
    writeln!(
        out,
        "  Remaining for {} at {}:",
        r.drug_name,
        concentration_label(r.concentration_mg_ml)
    )?;
    writeln!(out, "    Remaining dose: {} mg", fixed(r.remaining_dose_mg, places))?;
    writeln!(
        out,
        "    Remaining volume: {} ml",
        fixed(r.remaining_volume_ml, places)
    )?;
    writeln!(
        out,
        "    Remaining toxic budget: {}% (risk: {})",
        fixed(r.remaining_percent, places),
        r.risk.as_str()
    )?;
    Ok(())
}

pub fn write_catalog(out: &mut impl Write, catalog: &Catalog) -> Result<()> {
    for (i, drug) in catalog.drugs.iter().enumerate() {
        writeln!(
            out,
            "{}. {} (toxic dose {} mg/kg)",
            i + 1,
            drug.name,
            drug.toxic_dose_per_kg
        )?;
        for c in &drug.concentrations {
            writeln!(out, "     {}", concentration_label(*c))?;
        }
    }
    Ok(())
}
