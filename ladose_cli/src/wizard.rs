//! Interactive dosing wizard.
//!
//! Walks through the same steps as the form screens: disclaimer, patient
//! form, injection ledger, remaining volume, start again. End of input at
//! any prompt ends the session without error.

use crate::render::{write_catalog, write_ledger, write_profile, write_remaining};
use ladose_core::display::{concentration_label, fixed};
use ladose_core::dosing::parse_finite;
use ladose_core::{Catalog, DrugDefinition, Error, Result, Session};
use std::io::{BufRead, Write};

const DISCLAIMER: &str = "\
This tool assists with the calculation of local anaesthetic dosages.
It is not a substitute for clinical judgment. No responsibility is accepted
for incorrect use, incorrect route of administration, or adverse events.";

#[derive(Clone, Copy)]
enum Step {
    Ledger,
    Remaining,
    StartAgain,
    Quit,
}

pub struct Wizard<'a, R, W> {
    catalog: &'a Catalog,
    places: u32,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Wizard<'a, R, W> {
    pub fn new(catalog: &'a Catalog, places: u32, input: R, output: W) -> Self {
        Self {
            catalog,
            places,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Disclaimer\n\n{}\n", DISCLAIMER)?;
        match self.ask_yes_no("I understand and agree")? {
            Some(true) => {}
            _ => {
                writeln!(self.output, "Disclaimer not accepted.")?;
                return Ok(());
            }
        }

        loop {
            let Some(mut session) = self.patient_form()? else {
                return Ok(());
            };

            let mut step = match self
                .ask_yes_no("Do you plan to do more than one local anaesthetic injection?")?
            {
                Some(true) => Step::Ledger,
                Some(false) => Step::Remaining,
                None => Step::Quit,
            };

            loop {
                step = match step {
                    Step::Ledger => self.ledger_screen(&mut session)?,
                    Step::Remaining => self.remaining_screen(&session)?,
                    Step::StartAgain | Step::Quit => break,
                };
            }

            match step {
                Step::StartAgain => {
                    session.reset();
                    writeln!(self.output, "\nStarting again.")?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}\n> ", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.prompt(&format!("{} [y/n]", question))? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    fn patient_form(&mut self) -> Result<Option<Session>> {
        writeln!(self.output, "\nIBW Calculator")?;
        loop {
            let Some(sex) = self.prompt("Sex (M/F)")? else {
                return Ok(None);
            };
            let Some(height) = self.prompt("Height (cm)")? else {
                return Ok(None);
            };
            let Some(weight) = self.prompt("Actual weight (kg)")? else {
                return Ok(None);
            };

            match Session::start(&sex, &height, &weight) {
                Ok(session) => {
                    write_profile(&mut self.output, &session.profile, self.places)?;
                    return Ok(Some(session));
                }
                Err(e @ Error::InvalidInput(_)) => {
                    writeln!(
                        self.output,
                        "{}. Please enter valid sex, height, and weight.",
                        e
                    )?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn ledger_screen(&mut self, session: &mut Session) -> Result<Step> {
        loop {
            writeln!(self.output, "\nLocal Anaesthetic Dosing")?;
            writeln!(
                self.output,
                "  Dosing weight: {} kg",
                fixed(session.profile.dosing_weight_kg, self.places)
            )?;
            write_ledger(&mut self.output, &session.ledger, self.places)?;

            let can_add = session.ledger.can_add_more();
            let menu = if can_add {
                "a = add injection, d <id> = delete, r = remaining volume, q = quit"
            } else {
                "d <id> = delete, r = remaining volume, q = quit"
            };
            let Some(command) = self.prompt(menu)? else {
                return Ok(Step::Quit);
            };

            let mut parts = command.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("a"), None) if can_add => {
                    if !self.add_entry_form(session)? {
                        return Ok(Step::Quit);
                    }
                }
                (Some("d"), Some(id)) => match id.parse() {
                    Ok(id) => match session.remove_entry(id) {
                        Some(entry) => writeln!(self.output, "Removed entry #{}.", entry.id)?,
                        None => writeln!(self.output, "No entry #{}.", id)?,
                    },
                    Err(_) => writeln!(self.output, "'{}' is not an entry id.", id)?,
                },
                (Some("r"), None) => return Ok(Step::Remaining),
                (Some("q"), None) => return Ok(Step::Quit),
                _ => writeln!(self.output, "Unknown command '{}'.", command)?,
            }
        }
    }

    /// Returns false when input ended mid-form
    fn add_entry_form(&mut self, session: &mut Session) -> Result<bool> {
        let Some(drug) = self.pick_drug()? else {
            return Ok(false);
        };
        let Some(concentration) = self.pick_concentration(&drug)? else {
            return Ok(false);
        };

        let volume = loop {
            let Some(raw) = self.prompt("Planned volume (ml)")? else {
                return Ok(false);
            };
            match parse_finite("volume", &raw) {
                Ok(v) => break v,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        };

        match session.add_entry(self.catalog, &drug.name, concentration, volume) {
            Ok(entry) => writeln!(
                self.output,
                "Added #{}: {} mg ({}% of toxic dose).",
                entry.id,
                fixed(entry.dose_mg, self.places),
                fixed(entry.percent_of_ceiling, self.places)
            )?,
            Err(Error::OverdoseRejected { .. }) => writeln!(
                self.output,
                "Overdose warning: this would exceed 100% of toxic dose."
            )?,
            Err(e @ Error::InvalidInput(_)) => {
                writeln!(self.output, "{}. Please enter valid concentration and volume.", e)?
            }
            Err(e) => return Err(e),
        }
        Ok(true)
    }

    fn remaining_screen(&mut self, session: &Session) -> Result<Step> {
        writeln!(self.output, "\nRemaining Volume Calculator")?;
        writeln!(
            self.output,
            "  Dosing weight: {} kg",
            fixed(session.profile.dosing_weight_kg, self.places)
        )?;
        write_ledger(&mut self.output, &session.ledger, self.places)?;

        loop {
            let Some(drug) = self.pick_drug()? else {
                return Ok(Step::Quit);
            };
            let Some(concentration) = self.pick_concentration(&drug)? else {
                return Ok(Step::Quit);
            };

            match session.remaining(self.catalog, &drug.name, concentration) {
                Ok(r) => write_remaining(&mut self.output, &r, self.places)?,
                Err(e @ Error::InvalidInput(_)) => writeln!(self.output, "{}", e)?,
                Err(e) => return Err(e),
            }

            loop {
                let Some(command) = self.prompt(
                    "c = check another drug, b = back to injections, s = start again, q = quit",
                )?
                else {
                    return Ok(Step::Quit);
                };
                match command.as_str() {
                    "c" => break,
                    "b" => return Ok(Step::Ledger),
                    "q" => return Ok(Step::Quit),
                    "s" => match self.ask_yes_no("Start again: reset everything?")? {
                        Some(true) => return Ok(Step::StartAgain),
                        Some(false) => {}
                        None => return Ok(Step::Quit),
                    },
                    _ => writeln!(self.output, "Unknown command '{}'.", command)?,
                }
            }
        }
    }

    fn pick_drug(&mut self) -> Result<Option<DrugDefinition>> {
        let catalog = self.catalog;
        write_catalog(&mut self.output, catalog)?;
        loop {
            let Some(raw) = self.prompt("Select LA by number [1]")? else {
                return Ok(None);
            };
            if raw.is_empty() {
                if let Some(drug) = catalog.default_drug() {
                    return Ok(Some(drug.clone()));
                }
            }
            match raw.parse::<usize>() {
                Ok(n) if (1..=catalog.drugs.len()).contains(&n) => {
                    return Ok(Some(catalog.drugs[n - 1].clone()));
                }
                _ => writeln!(self.output, "Choose a number from 1 to {}.", catalog.drugs.len())?,
            }
        }
    }

    fn pick_concentration(&mut self, drug: &DrugDefinition) -> Result<Option<f64>> {
        for (i, c) in drug.concentrations.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, concentration_label(*c))?;
        }
        loop {
            let Some(raw) = self.prompt(
                "Select concentration by number [1], or 'c <mg/ml>' for a custom concentration",
            )?
            else {
                return Ok(None);
            };

            if let Some(custom) = raw.strip_prefix("c ") {
                match parse_finite("concentration", custom) {
                    Ok(value) => return Ok(Some(value)),
                    Err(e) => {
                        writeln!(self.output, "{}", e)?;
                        continue;
                    }
                }
            }

            let choice = if raw.is_empty() { Ok(1) } else { raw.parse::<usize>() };
            match choice {
                Ok(n) if (1..=drug.concentrations.len()).contains(&n) => {
                    return Ok(Some(drug.concentrations[n - 1]));
                }
                _ => writeln!(
                    self.output,
                    "Choose a number from 1 to {}.",
                    drug.concentrations.len()
                )?,
            }
        }
    }
}
