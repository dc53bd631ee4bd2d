//! Per-category concordance rules.
//!
//! Every rule turns one [`PairedRecord`] into exactly one [`Verdict`]. Rules
//! never fail: anything that prevents a comparison becomes an `error`
//! verdict carrying the reason.

pub mod codon_loss;
pub mod frameshift;
pub mod missense;
pub mod splice;
pub mod synonymous;

use leiden_core::models::{Category, PairedRecord, ReasonCode, Verdict};
use leiden_lookup::LookupClient;

use crate::classifier::classify;

/// Intronic bases either side of an exon boundary that form the canonical splice dinucleotide.
pub const SPLICE_WINDOW: i64 = 2;

/// Allowed difference, in residues, between submitted and looked-up stop positions.
pub const STOP_TOLERANCE: u32 = 1;

///
/// Classifies records and applies the matching rule. Frameshift and codon
/// loss rules consult `client`.
///
pub struct Evaluator<C> {
    client: C,
}

impl<C: LookupClient> Evaluator<C> {
    pub fn new(client: C) -> Self {
        Evaluator { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn evaluate(&self, record: &PairedRecord) -> Verdict {
        let category = classify(record);
        let verdict = match category {
            Category::Frameshift => frameshift::evaluate(record, &self.client),
            Category::CodonLoss => codon_loss::evaluate(record, &self.client),
            Category::Splice => splice::evaluate(record),
            Category::Missense => missense::evaluate(record),
            Category::Synonymous => synonymous::evaluate(record),
            Category::Other => Verdict::new(
                record.coordinate(),
                Category::Other,
                ReasonCode::InsufficientInformation,
                "insufficient information to classify",
            ),
        };

        tracing::trace!(
            coordinate = %record.coordinate(),
            category = %verdict.category(),
            reason = %verdict.reason(),
            "evaluated"
        );
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leiden_core::models::{
        Consequence, PredictedAnnotation, Status, SubmittedEntry, TranscriptPrediction,
        VariantCoordinate,
    };
    use leiden_lookup::NoLookup;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_other_is_error() {
        let coordinate = VariantCoordinate::new("1", 10, "A", "G").unwrap();
        let record = PairedRecord::join(
            Some(SubmittedEntry::new(coordinate.clone(), "c.-50A>G")),
            Some(PredictedAnnotation::new(
                coordinate,
                vec![TranscriptPrediction::new(
                    "ENST1",
                    vec![Consequence::Other("5_prime_utr_variant".to_string())],
                )],
            )),
        )
        .unwrap();

        let verdict = Evaluator::new(NoLookup).evaluate(&record);
        assert_eq!(verdict.category(), Category::Other);
        assert_eq!(verdict.status(), Status::Error);
        assert_eq!(verdict.reason(), ReasonCode::InsufficientInformation);
    }
}
