use leiden_core::models::{Category, PairedRecord, ReasonCode, Verdict};
use leiden_core::protein::ResidueChange;

///
/// Concordant iff some transcript predicts the submitted reference and
/// alternate amino acids at the submitted residue.
///
pub fn evaluate(record: &PairedRecord) -> Verdict {
    let verdict = |reason, explanation: String| {
        Verdict::new(record.coordinate(), Category::Missense, reason, explanation)
    };

    let submitted = match record.submitted.parsed_protein_change() {
        Some(Ok(change)) => change.missense_change(),
        _ => None,
    };
    let Some(submitted) = submitted else {
        return verdict(
            ReasonCode::InsufficientInformation,
            format!(
                "submitted protein change `{}` is not an amino-acid substitution",
                record.submitted.protein_change.as_deref().unwrap_or_default()
            ),
        );
    };

    let predicted: Vec<(&str, ResidueChange)> = record
        .predicted
        .transcripts
        .iter()
        .filter_map(|t| t.residue_change().map(|change| (t.transcript_id.as_str(), change)))
        .collect();

    if predicted.is_empty() {
        return verdict(
            ReasonCode::InsufficientInformation,
            format!("no predicted residue position to compare with {}", submitted),
        );
    }

    if let Some((transcript, _)) = predicted.iter().find(|(_, change)| *change == submitted) {
        return verdict(
            ReasonCode::Match,
            format!("{} predicted on {}", submitted, transcript),
        );
    }

    let same_residue: Vec<String> = predicted
        .iter()
        .filter(|(_, change)| change.position == submitted.position)
        .map(|(transcript, change)| format!("{} on {}", change, transcript))
        .collect();

    if !same_residue.is_empty() {
        return verdict(
            ReasonCode::AminoAcidMismatch,
            format!("submitted {}, predicted {}", submitted, same_residue.join(", ")),
        );
    }

    let elsewhere: Vec<String> = predicted
        .iter()
        .map(|(transcript, change)| format!("{} on {}", change, transcript))
        .collect();
    verdict(
        ReasonCode::AmbiguousTranscript,
        format!(
            "no transcript predicts residue {}; predicted {}",
            submitted.position,
            elsewhere.join(", ")
        ),
    )
}
