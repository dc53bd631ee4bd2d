use std::fmt::{self, Display};

use crate::errors::ModelError;
use crate::models::annotation::PredictedAnnotation;
use crate::models::coordinate::VariantCoordinate;
use crate::models::submission::SubmittedEntry;

///
/// A submission and its prediction, joined on coordinate.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedRecord {
    pub submitted: SubmittedEntry,
    pub predicted: PredictedAnnotation,
    /// Verbatim VCF data line the record was decoded from.
    pub source_line: Option<String>,
}

impl PairedRecord {
    ///
    /// Join the two sides of a record. Fails if either side is absent or the
    /// coordinates differ.
    ///
    pub fn join(
        submitted: Option<SubmittedEntry>,
        predicted: Option<PredictedAnnotation>,
    ) -> Result<Self, ModelError> {
        let submitted = submitted.ok_or(ModelError::MissingSide("submission"))?;
        let predicted = predicted.ok_or(ModelError::MissingSide("prediction"))?;

        if submitted.coordinate != predicted.coordinate {
            return Err(ModelError::CoordinateMismatch {
                submitted: submitted.coordinate.to_string(),
                predicted: predicted.coordinate.to_string(),
            });
        }

        Ok(PairedRecord {
            submitted,
            predicted,
            source_line: None,
        })
    }

    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    pub fn coordinate(&self) -> &VariantCoordinate {
        &self.submitted.coordinate
    }
}

///
/// An input line that never became a [`PairedRecord`]: unparseable
/// coordinate, missing tags, or a failed join.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Input file (or other stream label) the line came from.
    pub source: String,
    /// 1-based line number within `source`.
    pub line: usize,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(source: &str, line: usize, reason: impl Into<String>) -> Self {
        MalformedRecord {
            source: source.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.line, self.reason)
    }
}
