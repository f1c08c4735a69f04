//! Command-line front end: the form and the records table.

pub mod table;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::commands::{self, PrescriptionMessage, SubmitError};
use crate::config;
use crate::db::{PatientStore, StoreError};
use crate::intake::IntakeForm;
use crate::knowledge::KnowledgeBase;

#[derive(Debug, Parser)]
#[command(name = "medicare", version, about = "Patient intake register with first-line prescriptions")]
pub struct Cli {
    /// Database file (defaults to $MEDICARE_DB, then ~/Medicare/healthcare.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a patient and print the prescription
    Submit(SubmitArgs),
    /// Show every recorded patient
    List,
    /// Show the diseases, symptom phrases and subtypes that have advice
    Diseases,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, allow_negative_numbers = true)]
    pub age: Option<i64>,
    /// Male, Female or Other
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub district: String,
    /// Disease name or symptom phrase, e.g. "fever" or "runny nose"
    #[arg(long, default_value = "")]
    pub disease: String,
    /// Skin infection subtype: fungal, bacterial, viral or allergic
    #[arg(long)]
    pub subtype: Option<String>,
    #[arg(long = "days", allow_negative_numbers = true)]
    pub days_suffering: Option<i64>,
}

impl From<SubmitArgs> for IntakeForm {
    fn from(args: SubmitArgs) -> Self {
        IntakeForm {
            name: args.name,
            age: args.age,
            gender: args.gender,
            district: args.district,
            disease: args.disease,
            subtype: args.subtype,
            days_suffering: args.days_suffering,
        }
    }
}

/// Errors that end a CLI invocation. Printed, never panicked on.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Cannot create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Execute one parsed command and return what should be printed.
pub fn execute(cli: Cli) -> Result<String, CliError> {
    let kb = KnowledgeBase::builtin();

    match cli.command {
        Command::Diseases => {
            let diseases = commands::list_diseases(&kb);
            if cli.json {
                return to_json(&diseases);
            }
            Ok(diseases
                .iter()
                .map(|d| {
                    let mut line = format!("{}: {}", d.key, d.advice);
                    if !d.aliases.is_empty() {
                        line.push_str(&format!("\n    also: {}", d.aliases.join(", ")));
                    }
                    if !d.subtypes.is_empty() {
                        line.push_str(&format!("\n    subtypes: {}", d.subtypes.join(", ")));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::List => {
            let store = open_store(cli.db)?;
            let records = commands::list_records(&store)?;
            if cli.json {
                return to_json(&records);
            }
            if records.is_empty() {
                return Ok("No patient records yet.".into());
            }
            Ok(table::render_table(&records))
        }
        Command::Submit(args) => {
            let store = open_store(cli.db)?;
            let message = commands::submit(&store, &kb, args.into())?;
            if cli.json {
                return to_json(&message);
            }
            Ok(render_prescription(&message))
        }
    }
}

fn open_store(db: Option<PathBuf>) -> Result<PatientStore, CliError> {
    let path = db.unwrap_or_else(config::database_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(PatientStore::open(&path)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_prescription(message: &PrescriptionMessage) -> String {
    let mut out = format!(
        "Prescription generated for {} (record #{})\nDisease identified: {}",
        message.patient_name, message.patient_id, message.disease_label
    );
    if let Some(subtype) = &message.subtype {
        out.push_str(&format!(" ({subtype})"));
    }
    out.push_str(&format!("\nPrescription: {}", message.advice));
    out
}
