use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use leiden_core::models::VariantCoordinate;
use leiden_core::protein::AminoAcid;

use crate::error::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    Frameshift,
    CodonLoss,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupMode::Frameshift => "frameshift",
            LookupMode::CodonLoss => "codon_loss",
        }
    }
}

impl Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub transcript_id: String,
    pub coordinate: VariantCoordinate,
    pub mode: LookupMode,
}

impl LookupRequest {
    pub fn new(transcript_id: &str, coordinate: &VariantCoordinate, mode: LookupMode) -> Self {
        LookupRequest {
            transcript_id: transcript_id.to_string(),
            coordinate: coordinate.clone(),
            mode,
        }
    }
}

///
/// What the sequence service reports for a variant on one transcript.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupAnswer {
    /// First affected residue, 1-based.
    pub residue_position: u32,
    pub reference_amino_acid: AminoAcid,
    /// Residues from `residue_position` on, as translated after the change.
    pub altered_amino_acids: Vec<AminoAcid>,
    /// Absolute residue position of the next in-frame stop, if one was found.
    pub next_stop_position: Option<u32>,
}

impl LookupAnswer {
    pub fn first_altered(&self) -> Option<AminoAcid> {
        self.altered_amino_acids.first().copied()
    }
}

///
/// JSON shape shared by the HTTP service and the offline table. Amino acids
/// travel as one- or three-letter codes; `X` and `*` mean stop.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AnswerPayload {
    pub residue_position: u32,
    pub reference_amino_acid: String,
    pub altered_amino_acids: String,
    #[serde(default)]
    pub next_stop_position: Option<u32>,
}

impl TryFrom<AnswerPayload> for LookupAnswer {
    type Error = LookupError;

    fn try_from(payload: AnswerPayload) -> Result<Self, Self::Error> {
        let reference_amino_acid = AminoAcid::from_str(&payload.reference_amino_acid)
            .map_err(|e| LookupError::Invalid(e.to_string()))?;
        let altered_amino_acids = AminoAcid::parse_sequence(&payload.altered_amino_acids)
            .map_err(|e| LookupError::Invalid(e.to_string()))?;

        Ok(LookupAnswer {
            residue_position: payload.residue_position,
            reference_amino_acid,
            altered_amino_acids,
            next_stop_position: payload.next_stop_position,
        })
    }
}

///
/// Boundary to the external amino-acid/stop-codon lookup service. Rules only
/// see this trait, so they run against a stub in tests.
///
pub trait LookupClient: Send + Sync {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError>;
}

impl<T: LookupClient + ?Sized> LookupClient for Box<T> {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        (**self).lookup(request)
    }
}

impl<T: LookupClient + ?Sized> LookupClient for &T {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        (**self).lookup(request)
    }
}

/// Used when neither a service URL nor a table is given: every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl LookupClient for NoLookup {
    fn lookup(&self, _request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        Err(LookupError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_answer_from_payload() {
        let payload: AnswerPayload = serde_json::from_str(
            r#"{"residue_position": 97, "reference_amino_acid": "Arg", "altered_amino_acids": "GASX", "next_stop_position": 100}"#,
        )
        .unwrap();
        let answer = LookupAnswer::try_from(payload).unwrap();
        assert_eq!(answer.reference_amino_acid, AminoAcid::Arg);
        assert_eq!(answer.first_altered(), Some(AminoAcid::Gly));
        assert_eq!(answer.altered_amino_acids.last(), Some(&AminoAcid::Stop));
        assert_eq!(answer.next_stop_position, Some(100));
    }

    #[rstest]
    fn test_answer_without_stop() {
        let payload: AnswerPayload = serde_json::from_str(
            r#"{"residue_position": 5, "reference_amino_acid": "M", "altered_amino_acids": ""}"#,
        )
        .unwrap();
        let answer = LookupAnswer::try_from(payload).unwrap();
        assert_eq!(answer.next_stop_position, None);
        assert_eq!(answer.first_altered(), None);
    }

    #[rstest]
    fn test_invalid_payload() {
        let payload = AnswerPayload {
            residue_position: 1,
            reference_amino_acid: "Zzz".to_string(),
            altered_amino_acids: "A".to_string(),
            next_stop_position: None,
        };
        assert!(matches!(
            LookupAnswer::try_from(payload),
            Err(LookupError::Invalid(_))
        ));
    }

    #[rstest]
    fn test_no_lookup() {
        let coordinate = VariantCoordinate::new("1", 10, "AG", "A").unwrap();
        let request = LookupRequest::new("ENST1", &coordinate, LookupMode::Frameshift);
        assert!(matches!(NoLookup.lookup(&request), Err(LookupError::NotConfigured)));
    }
}
