//! Assigns each paired record the category whose rule will judge it.

use leiden_core::models::{Category, Consequence, PairedRecord};

///
/// Decide the evaluation category of a record. The first matching category
/// wins, in this order: frameshift, codon loss, splice, missense,
/// synonymous, other. Never fails; vocabulary it does not know about counts
/// as `other`.
///
pub fn classify(record: &PairedRecord) -> Category {
    let predicted = &record.predicted;
    let submitted = &record.submitted;

    if predicted.any(&Consequence::Frameshift) {
        return Category::Frameshift;
    }

    if predicted.any_matching(Consequence::is_codon_loss) {
        return Category::CodonLoss;
    }

    if predicted.any_matching(Consequence::is_splice) || submitted.locus_names_exon_boundary() {
        return Category::Splice;
    }

    let submitted_change = submitted.parsed_protein_change().and_then(Result::ok);

    let submitted_missense = submitted_change
        .as_ref()
        .is_some_and(|change| change.missense_change().is_some());
    if submitted_missense && predicted.transcripts.iter().any(|t| t.has_protein_text()) {
        return Category::Missense;
    }

    let submitted_silent = submitted_change.as_ref().is_some_and(|change| change.is_silent());
    let predicted_silent = predicted
        .transcripts
        .iter()
        .any(|t| t.predicts_silent_change());
    if submitted_silent || predicted_silent {
        return Category::Synonymous;
    }

    Category::Other
}
