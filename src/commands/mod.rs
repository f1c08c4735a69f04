//! Entry points for a presentation surface.
//!
//! - `submit`: validate a form, store the patient, resolve advice
//! - `list_records`: every stored patient for tabular display
//! - `list_diseases`: the knowledge base, for help screens

pub mod intake;

pub use intake::*;

use thiserror::Error;

use crate::db::StoreError;
use crate::intake::ValidationError;

/// Why a submission was not accepted. Neither variant is fatal: the caller
/// shows the message and keeps serving.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Could not save the record: {0}")]
    Store(#[from] StoreError),
}
