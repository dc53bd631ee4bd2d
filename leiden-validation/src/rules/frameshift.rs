use leiden_core::models::{Category, Consequence, PairedRecord, ReasonCode, Status, Verdict};
use leiden_core::protein::{AminoAcid, ProteinChange};
use leiden_lookup::{LookupAnswer, LookupClient, LookupError, LookupMode, LookupRequest};

use super::STOP_TOLERANCE;

///
/// What the submitter says happens at the protein level, reduced to the
/// parts a lookup answer can confirm.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ResidueClaim {
    pub position: u32,
    pub reference: AminoAcid,
    pub alternate: Option<AminoAcid>,
    pub stop_position: Option<u32>,
}

impl ResidueClaim {
    pub(super) fn from_change(change: &ProteinChange) -> Option<Self> {
        match *change {
            ProteinChange::Frameshift {
                reference,
                position,
                alternate,
                stop_offset,
            } => {
                // an offset whose stop cannot be placed leaves nothing to compare
                let stop_position = match stop_offset {
                    Some(_) => Some(change.stop_position()?),
                    None => None,
                };
                Some(ResidueClaim {
                    position,
                    reference,
                    alternate,
                    stop_position,
                })
            }
            ProteinChange::Substitution(residue_change) => Some(ResidueClaim {
                position: residue_change.position,
                reference: residue_change.reference,
                alternate: Some(residue_change.alternate),
                stop_position: (residue_change.alternate == AminoAcid::Stop)
                    .then_some(residue_change.position),
            }),
            _ => None,
        }
    }

    /// First disagreement with a lookup answer, if any.
    fn mismatch(&self, answer: &LookupAnswer, check_stop: bool) -> Option<(ReasonCode, String)> {
        if answer.residue_position != self.position || answer.reference_amino_acid != self.reference {
            return Some((
                ReasonCode::AminoAcidMismatch,
                format!(
                    "submitted {}{}, lookup reports {}{}",
                    self.reference, self.position, answer.reference_amino_acid, answer.residue_position
                ),
            ));
        }

        if let Some(alternate) = self.alternate {
            let first = answer.first_altered();
            if first != Some(alternate) {
                return Some((
                    ReasonCode::AminoAcidMismatch,
                    format!(
                        "submitted altered amino acid {}, lookup reports {}",
                        alternate,
                        first.map(|aa| aa.to_string()).unwrap_or_else(|| "none".to_string())
                    ),
                ));
            }
        }

        if check_stop {
            if let Some(submitted_stop) = self.stop_position {
                match answer.next_stop_position {
                    Some(stop) if stop.abs_diff(submitted_stop) <= STOP_TOLERANCE => {}
                    Some(stop) => {
                        return Some((
                            ReasonCode::StopPositionMismatch,
                            format!("submitted stop at {}, lookup reports {}", submitted_stop, stop),
                        ));
                    }
                    None => {
                        return Some((
                            ReasonCode::StopPositionMismatch,
                            format!("submitted stop at {}, lookup found no stop", submitted_stop),
                        ));
                    }
                }
            }
        }

        None
    }
}

fn failure_reason(error: &LookupError) -> ReasonCode {
    match error {
        LookupError::NoAnswer(_) => ReasonCode::LookupNoAnswer,
        _ => ReasonCode::LookupUnavailable,
    }
}

///
/// Ask the lookup service about every transcript carrying a consequence that
/// satisfies `predicate`, in order. The first transcript whose answer agrees
/// with `claim` makes the record concordant. Otherwise a failed lookup makes
/// it an error, and a clean disagreement makes it discordant.
///
pub(super) fn compare_with_lookup<C: LookupClient>(
    record: &PairedRecord,
    client: &C,
    category: Category,
    mode: LookupMode,
    claim: ResidueClaim,
    predicate: impl Fn(&Consequence) -> bool,
) -> Verdict {
    let coordinate = record.coordinate();
    let mut unresolved: Option<(ReasonCode, String)> = None;

    for transcript in record.predicted.transcripts_with(&predicate) {
        let request = LookupRequest::new(&transcript.transcript_id, coordinate, mode);

        let found = match client.lookup(&request) {
            Ok(answer) => match claim.mismatch(&answer, mode == LookupMode::Frameshift) {
                None => {
                    return Verdict::new(
                        coordinate,
                        category,
                        ReasonCode::Match,
                        format!("lookup on {} agrees with the submission", transcript.transcript_id),
                    );
                }
                Some((reason, detail)) => (reason, format!("{} on {}", detail, transcript.transcript_id)),
            },
            Err(e) => {
                tracing::debug!(
                    coordinate = %coordinate,
                    transcript = %transcript.transcript_id,
                    error = %e,
                    "lookup failed"
                );
                (failure_reason(&e), format!("{} ({})", e, transcript.transcript_id))
            }
        };

        // a failed lookup could have been the matching transcript
        let replaces = match &unresolved {
            None => true,
            Some((current, _)) => {
                current.status() != Status::Error && found.0.status() == Status::Error
            }
        };
        if replaces {
            unresolved = Some(found);
        }
    }

    let Some((reason, explanation)) = unresolved else {
        return Verdict::new(
            coordinate,
            category,
            ReasonCode::MissingTranscript,
            format!("no transcript predicted {}", category),
        );
    };
    Verdict::new(coordinate, category, reason, explanation)
}

///
/// Confirm a frameshift through the lookup service: same residue, same
/// original and first altered amino acid, and a submitted stop (`fs*N`)
/// within one codon of the looked-up stop.
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
            Category::Frameshift,
            ReasonCode::InsufficientInformation,
            format!(
                "submitted protein change `{}` does not describe a frameshift",
                record.submitted.protein_change.as_deref().unwrap_or_default()
            ),
        );
    };

    compare_with_lookup(
        record,
        client,
        Category::Frameshift,
        LookupMode::Frameshift,
        claim,
        |c| *c == Consequence::Frameshift,
    )
}
