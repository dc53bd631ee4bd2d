use std::fmt::{self, Display};

use crate::models::coordinate::VariantCoordinate;

/// Evaluation category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Frameshift,
    CodonLoss,
    Splice,
    Missense,
    Synonymous,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Frameshift,
        Category::CodonLoss,
        Category::Splice,
        Category::Missense,
        Category::Synonymous,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frameshift => "frameshift",
            Category::CodonLoss => "codon_loss",
            Category::Splice => "splice",
            Category::Missense => "missense",
            Category::Synonymous => "synonymous",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    Concordant,
    Discordant,
    Error,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Concordant => "concordant",
            Status::Discordant => "discordant",
            Status::Error => "error",
        };
        write!(f, "{}", s)
    }
}

///
/// Machine-readable reason attached to every verdict. Each code belongs to
/// exactly one [`Status`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReasonCode {
    Match,

    AminoAcidMismatch,
    AmbiguousTranscript,
    NoSynonymousPrediction,
    OutsideSpliceWindow,
    NonCanonicalSplice,
    NoSplicePrediction,
    StopPositionMismatch,

    InsufficientInformation,
    MissingTranscript,
    LookupUnavailable,
    LookupNoAnswer,
}

impl ReasonCode {
    pub fn status(&self) -> Status {
        match self {
            ReasonCode::Match => Status::Concordant,
            ReasonCode::AminoAcidMismatch
            | ReasonCode::AmbiguousTranscript
            | ReasonCode::NoSynonymousPrediction
            | ReasonCode::OutsideSpliceWindow
            | ReasonCode::NonCanonicalSplice
            | ReasonCode::NoSplicePrediction
            | ReasonCode::StopPositionMismatch => Status::Discordant,
            ReasonCode::InsufficientInformation
            | ReasonCode::MissingTranscript
            | ReasonCode::LookupUnavailable
            | ReasonCode::LookupNoAnswer => Status::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Match => "match",
            ReasonCode::AminoAcidMismatch => "amino_acid_mismatch",
            ReasonCode::AmbiguousTranscript => "ambiguous_transcript",
            ReasonCode::NoSynonymousPrediction => "no_synonymous_prediction",
            ReasonCode::OutsideSpliceWindow => "outside_splice_window",
            ReasonCode::NonCanonicalSplice => "non_canonical_splice_site",
            ReasonCode::NoSplicePrediction => "no_splice_prediction",
            ReasonCode::StopPositionMismatch => "stop_position_mismatch",
            ReasonCode::InsufficientInformation => "insufficient_information",
            ReasonCode::MissingTranscript => "missing_transcript",
            ReasonCode::LookupUnavailable => "lookup_unavailable",
            ReasonCode::LookupNoAnswer => "lookup_no_answer",
        }
    }
}

impl Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// The outcome of evaluating one paired record. The status is derived from
/// the reason code, so a verdict can never carry a contradictory pair.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    coordinate: VariantCoordinate,
    category: Category,
    reason: ReasonCode,
    explanation: String,
}

impl Verdict {
    pub fn new(
        coordinate: &VariantCoordinate,
        category: Category,
        reason: ReasonCode,
        explanation: impl Into<String>,
    ) -> Self {
        Verdict {
            coordinate: coordinate.clone(),
            category,
            reason,
            explanation: explanation.into(),
        }
    }

    pub fn coordinate(&self) -> &VariantCoordinate {
        &self.coordinate
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn status(&self) -> Status {
        self.reason.status()
    }

    pub fn reason(&self) -> ReasonCode {
        self.reason
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ({}): {}",
            self.coordinate,
            self.category,
            self.status(),
            self.reason,
            self.explanation
        )
    }
}
