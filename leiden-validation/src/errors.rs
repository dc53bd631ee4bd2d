use thiserror::Error;

use leiden_lookup::LookupError;
use leiden_vcf::VcfError;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Vcf(#[from] VcfError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("No input files given")]
    NoInputs,
    #[error("A worker thread panicked")]
    WorkerPanicked,
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
