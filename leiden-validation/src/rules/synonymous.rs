use leiden_core::models::{Category, Consequence, PairedRecord, ReasonCode, Verdict};

/// Concordant iff some transcript carries a synonymous consequence term.
pub fn evaluate(record: &PairedRecord) -> Verdict {
    let predicted = &record.predicted;
    let terms = predicted.consequence_terms();
    let (reason, explanation) = if terms.is_empty() {
        (
            ReasonCode::MissingTranscript,
            "no predicted consequences to compare".to_string(),
        )
    } else if let Some(t) = predicted
        .transcripts_with(|c| *c == Consequence::Synonymous)
        .next()
    {
        (
            ReasonCode::Match,
            format!("synonymous change predicted on {}", t.transcript_id),
        )
    } else {
        (
            ReasonCode::NoSynonymousPrediction,
            format!(
                "predicted consequences: {}",
                terms.join("&")
            ),
        )
    };

    Verdict::new(record.coordinate(), Category::Synonymous, reason, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leiden_core::models::{PredictedAnnotation, Status, SubmittedEntry, TranscriptPrediction, VariantCoordinate};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn record(terms: &[&str]) -> PairedRecord {
        let coordinate = VariantCoordinate::new("1", 1000, "C", "T").unwrap();
        let transcripts = terms
            .iter()
            .enumerate()
            .map(|(i, t)| TranscriptPrediction::new(&format!("ENST{}", i), Consequence::parse_list(t)))
            .collect();
        PairedRecord::join(
            Some(SubmittedEntry::new(coordinate.clone(), "c.27C>T").with_protein_change("p.(=)")),
            Some(PredictedAnnotation::new(coordinate, transcripts)),
        )
        .unwrap()
    }

    #[rstest]
    #[case(&["missense_variant", "synonymous_variant"], ReasonCode::Match)]
    #[case(&["SYNONYMOUS_CODING"], ReasonCode::Match)]
    #[case(&["missense_variant", "intron_variant"], ReasonCode::NoSynonymousPrediction)]
    #[case(&[], ReasonCode::MissingTranscript)]
    #[case(&["", ""], ReasonCode::MissingTranscript)]
    fn test_synonymous(#[case] terms: &[&str], #[case] reason: ReasonCode) {
        assert_eq!(evaluate(&record(terms)).reason(), reason);
    }

    #[rstest]
    fn test_transcripts_without_terms_are_error() {
        let verdict = evaluate(&record(&[""]));
        assert_eq!(verdict.status(), Status::Error);
        assert_eq!(verdict.explanation(), "no predicted consequences to compare");
    }

    #[rstest]
    fn test_discordant_lists_terms() {
        let verdict = evaluate(&record(&["missense_variant&splice_region_variant"]));
        assert_eq!(verdict.status(), Status::Discordant);
        assert_eq!(
            verdict.explanation(),
            "predicted consequences: missense_variant&splice_region_variant"
        );
    }
}
