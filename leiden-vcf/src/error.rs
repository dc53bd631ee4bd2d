use thiserror::Error;

use leiden_core::errors::ModelError;

#[derive(Error, Debug)]
pub enum VcfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Can't read file: {0}")]
    Open(String),
    #[error("VCF header has no ##INFO definition for tag `{0}`")]
    MissingInfoDefinition(String),
    #[error("##INFO definition for tag `{0}` has no `Format:` description")]
    MissingInfoFormat(String),
    #[error("`{tag}` format does not define a `{field}` field")]
    MissingFormatField { tag: String, field: String },
    #[error("Expected at least 8 tab-separated columns, found {0}")]
    TooFewColumns(usize),
    #[error("Invalid POS column: `{0}`")]
    InvalidPosition(String),
    #[error("Multi-allelic record (ALT `{0}`); split multi-allelic sites before validation")]
    MultiAllelic(String),
    #[error("INFO column has no `{0}` entry")]
    MissingTag(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type VcfResult<T> = std::result::Result<T, VcfError>;
