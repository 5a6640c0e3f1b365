mod render;
mod wizard;

use clap::{Parser, Subcommand};
use ladose_core::display::fixed;
use ladose_core::dosing::parse_finite;
use ladose_core::*;
use render::{write_catalog, write_ledger, write_profile, write_remaining};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use wizard::Wizard;

#[derive(Parser)]
#[command(name = "ladose")]
#[command(about = "Local anaesthetic toxic dose calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this drug catalog file instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dosing wizard (default)
    Plan,

    /// Ideal body weight and dosing weight
    Ibw {
        /// M or F
        #[arg(long)]
        sex: String,

        /// Height in cm
        #[arg(long, allow_hyphen_values = true)]
        height: String,

        /// Actual weight in kg
        #[arg(long, allow_hyphen_values = true)]
        weight: String,
    },

    /// List the drug catalog
    Drugs,

    /// Record injections and report what can still be given
    Remaining {
        /// M or F
        #[arg(long)]
        sex: String,

        /// Height in cm
        #[arg(long, allow_hyphen_values = true)]
        height: String,

        /// Actual weight in kg
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Injection already given, as "<drug>:<mg/ml>:<ml>" (repeatable)
        #[arg(long = "entry")]
        entries: Vec<String>,

        /// Drug to report on (defaults to the first in the catalog)
        #[arg(long)]
        drug: Option<String>,

        /// Concentration in mg/ml (defaults to the drug's first)
        #[arg(long)]
        concentration: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    ladose_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let catalog = match cli.catalog {
        Some(path) => Catalog::load_from(&path)?,
        None => config.catalog()?,
    };
    let places = config.display.decimal_places;

    match cli.command {
        Some(Commands::Ibw {
            sex,
            height,
            weight,
        }) => cmd_ibw(&sex, &height, &weight, places),
        Some(Commands::Drugs) => write_catalog(&mut io::stdout().lock(), &catalog),
        Some(Commands::Remaining {
            sex,
            height,
            weight,
            entries,
            drug,
            concentration,
            json,
        }) => cmd_remaining(
            &catalog,
            places,
            (&sex, &height, &weight),
            &entries,
            drug,
            concentration,
            json,
        ),
        Some(Commands::Plan) | None => {
            let stdin = io::stdin();
            Wizard::new(&catalog, places, stdin.lock(), io::stdout().lock()).run()
        }
    }
}

fn cmd_ibw(sex: &str, height: &str, weight: &str, places: u32) -> Result<()> {
    let weights = compute_dosing_weight(sex, height, weight)?;
    println!(
        "Ideal body weight: {} kg",
        fixed(weights.ideal_body_weight_kg, places)
    );
    println!("Dosing weight: {} kg", fixed(weights.dosing_weight_kg, places));
    Ok(())
}

fn cmd_remaining(
    catalog: &Catalog,
    places: u32,
    (sex, height, weight): (&str, &str, &str),
    entries: &[String],
    drug: Option<String>,
    concentration: Option<f64>,
    json: bool,
) -> Result<()> {
    let mut session = Session::start(sex, height, weight)?;

    for raw in entries {
        let (name, conc, volume) = parse_entry(raw)?;
        session.add_entry(catalog, name, conc, volume)?;
    }

    let drug = match drug {
        Some(name) => name,
        None => catalog
            .default_drug()
            .map(|d| d.name.clone())
            .ok_or_else(|| Error::CatalogValidation("Catalog has no drugs".into()))?,
    };
    let concentration = match concentration {
        Some(c) => c,
        None => catalog.default_concentration(&drug)?,
    };

    let r = session.remaining(catalog, &drug, concentration)?;

    let mut out = io::stdout().lock();
    if json {
        let report = serde_json::json!({
            "profile": session.profile,
            "entries": session.ledger.entries(),
            "total_percent_used": session.ledger.total_percent_used(),
            "can_add_more": session.ledger.can_add_more(),
            "remaining": r,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_profile(&mut out, &session.profile, places)?;
        write_ledger(&mut out, &session.ledger, places)?;
        write_remaining(&mut out, &r, places)?;
    }
    Ok(())
}

/// Split `"<drug>:<mg/ml>:<ml>"`; drug names may not contain ':'
fn parse_entry(raw: &str) -> Result<(&str, f64, f64)> {
    let mut parts = raw.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(volume), Some(conc), Some(name)) if !name.trim().is_empty() => Ok((
            name.trim(),
            parse_finite("concentration", conc)?,
            parse_finite("volume", volume)?,
        )),
        _ => Err(Error::InvalidInput(format!(
            "entry '{}' must look like <drug>:<mg/ml>:<ml>",
            raw
        ))),
    }
}
