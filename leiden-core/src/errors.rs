use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Chromosome name is empty")]
    EmptyChromosome,

    #[error("Position must be 1-based and greater than zero, got {0}")]
    InvalidPosition(u64),

    #[error("Invalid allele '{0}': must be a non-empty sequence over A, C, G, T, N")]
    InvalidAllele(String),

    #[error("Unrecognized amino acid or stop codon code: {0}")]
    UnknownAminoAcid(String),

    #[error("Unexpected protein change format: {0}")]
    ProteinChangeFormat(String),

    #[error("Unsupported protein change (in-frame indel): {0}")]
    UnsupportedProteinChange(String),

    #[error("Unexpected coding DNA change format: {0}")]
    CodingChangeFormat(String),

    #[error("Submission and prediction disagree on coordinate: {submitted} vs {predicted}")]
    CoordinateMismatch { submitted: String, predicted: String },

    #[error("Record has no {0}")]
    MissingSide(&'static str),
}
