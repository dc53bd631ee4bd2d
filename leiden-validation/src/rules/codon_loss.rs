use leiden_core::models::{Category, Consequence, PairedRecord, ReasonCode, Verdict};
use leiden_lookup::{LookupClient, LookupMode};

use super::frameshift::{ResidueClaim, compare_with_lookup};

///
/// Confirm a stop gain, stop loss or start loss through the lookup service:
/// same residue, same original and altered amino acid. Stop positions are
/// not compared.
///
pub fn evaluate<C: LookupClient>(record: &PairedRecord, client: &C) -> Verdict {
    let claim = record
        .submitted
        .parsed_protein_change()
        .and_then(Result::ok)
        .as_ref()
        .and_then(ResidueClaim::from_change);

    let Some(claim) = claim else {
        return Verdict::new(
            record.coordinate(),
            Category::CodonLoss,
            ReasonCode::InsufficientInformation,
            format!(
                "submitted protein change `{}` names no residue to confirm",
                record.submitted.protein_change.as_deref().unwrap_or_default()
            ),
        );
    };

    compare_with_lookup(
        record,
        client,
        Category::CodonLoss,
        LookupMode::CodonLoss,
        claim,
        Consequence::is_codon_loss,
    )
}
