use leiden_core::cdna::CodingPosition;
use leiden_core::models::{Category, PairedRecord, ReasonCode, TranscriptPrediction, Verdict};

use super::SPLICE_WINDOW;

const DONOR: &str = "GT";
const ACCEPTOR: &str = "AG";

/// Canonical reference base at an intronic offset inside the window.
fn expected_base(offset: i64) -> char {
    match offset {
        1 => 'G',
        2 => 'T',
        -2 => 'A',
        _ => 'G',
    }
}

fn complement(base: char) -> Option<char> {
    match base {
        'A' => Some('T'),
        'C' => Some('G'),
        'G' => Some('C'),
        'T' => Some('A'),
        _ => None,
    }
}

///
/// Reference base at the variant on the transcript's strand. The base named
/// by a `c.` substitution comes first; otherwise the single-base VCF
/// reference is turned onto the strand of a predicted transcript.
///
fn transcript_reference_base(record: &PairedRecord, position: &CodingPosition) -> Result<char, String> {
    if let Some(base) = position.reference_base {
        return Ok(base);
    }

    let reference = record.coordinate().ref_allele();
    let mut bases = reference.chars();
    let (Some(base), None) = (bases.next(), bases.next()) else {
        return Err(format!("multi-base reference {} with no splice dinucleotide", reference));
    };

    let reverse = record
        .predicted
        .transcripts_with(|c| c.is_splice())
        .chain(record.predicted.transcripts.iter())
        .find_map(TranscriptPrediction::is_reverse_strand);
    match reverse {
        Some(false) => Ok(base),
        Some(true) => complement(base).ok_or_else(|| format!("reference {} is not a nucleotide", reference)),
        None => Err(format!(
            "{} names no reference base and no transcript strand is known for {}",
            record.submitted.dna_change, reference
        )),
    }
}

///
/// Concordant iff the submitted change sits within two bases of an exon
/// boundary, the reference there is the canonical dinucleotide (donor `GT`,
/// acceptor `AG`), and a splice consequence was predicted.
///
pub fn evaluate(record: &PairedRecord) -> Verdict {
    let verdict = |reason, explanation: String| {
        Verdict::new(record.coordinate(), Category::Splice, reason, explanation)
    };
    let dna_change = &record.submitted.dna_change;

    let position = match record.submitted.coding_position() {
        Ok(position) => position,
        Err(e) => return verdict(ReasonCode::InsufficientInformation, e.to_string()),
    };

    let offset = match position.intron_offset {
        Some(offset) if offset != 0 && offset.abs() <= SPLICE_WINDOW => offset,
        Some(offset) if offset != 0 => {
            return verdict(
                ReasonCode::OutsideSpliceWindow,
                format!(
                    "{} is {} bases into the intron, outside the {} base splice window",
                    dna_change,
                    offset.abs(),
                    SPLICE_WINDOW
                ),
            );
        }
        _ => {
            return verdict(
                ReasonCode::OutsideSpliceWindow,
                format!("{} is exonic", dna_change),
            );
        }
    };

    let (site, canonical) = if offset > 0 {
        ("donor", DONOR)
    } else {
        ("acceptor", ACCEPTOR)
    };

    match record.predicted.splice_reference.as_deref() {
        Some(dinucleotide) => {
            if dinucleotide != canonical {
                return verdict(
                    ReasonCode::NonCanonicalSplice,
                    format!(
                        "reference {} at {} is not the canonical {} {}",
                        dinucleotide, dna_change, site, canonical
                    ),
                );
            }
        }
        None => {
            let base = match transcript_reference_base(record, &position) {
                Ok(base) => base,
                Err(explanation) => return verdict(ReasonCode::InsufficientInformation, explanation),
            };
            let expected = expected_base(offset);
            if base != expected {
                return verdict(
                    ReasonCode::NonCanonicalSplice,
                    format!(
                        "reference {} at {} is not {} of the canonical {} {}",
                        base, dna_change, expected, site, canonical
                    ),
                );
            }
        }
    }

    let terms = record.predicted.consequence_terms();
    if terms.is_empty() {
        return verdict(
            ReasonCode::MissingTranscript,
            format!("canonical {} site but no consequence was predicted", site),
        );
    }

    match record.predicted.transcripts_with(|c| c.is_splice()).next() {
        Some(t) => verdict(
            ReasonCode::Match,
            format!("canonical {} site, splice change predicted on {}", site, t.transcript_id),
        ),
        None => verdict(
            ReasonCode::NoSplicePrediction,
            format!(
                "canonical {} site but predicted consequences are {}",
                site,
                terms.join("&")
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leiden_core::models::{
        Consequence, PredictedAnnotation, Status, SubmittedEntry, TranscriptPrediction,
        VariantCoordinate,
    };
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn record(
        dna_change: &str,
        ref_allele: &str,
        splice_reference: Option<&str>,
        terms: &str,
    ) -> PairedRecord {
        let coordinate = VariantCoordinate::new("1", 1000, ref_allele, "C").unwrap();
        let mut predicted = PredictedAnnotation::new(
            coordinate.clone(),
            vec![TranscriptPrediction::new("ENST1", Consequence::parse_list(terms))],
        );
        if let Some(dinucleotide) = splice_reference {
            predicted = predicted.with_splice_reference(dinucleotide);
        }
        PairedRecord::join(
            Some(SubmittedEntry::new(coordinate, dna_change).with_locus("5i")),
            Some(predicted),
        )
        .unwrap()
    }

    #[rstest]
    #[case("c.990+1G>C", "G", Some("GT"), "splice_donor_variant", ReasonCode::Match)]
    #[case("c.990+2T>C", "T", Some("GT"), "splice_donor_variant", ReasonCode::Match)]
    #[case("c.991-2A>C", "A", Some("AG"), "splice_acceptor_variant", ReasonCode::Match)]
    #[case("c.990+1G>C", "G", Some("GA"), "splice_donor_variant", ReasonCode::NonCanonicalSplice)]
    #[case("c.990+10G>C", "G", Some("GT"), "splice_donor_variant", ReasonCode::OutsideSpliceWindow)]
    #[case("c.990G>C", "G", Some("GT"), "splice_donor_variant", ReasonCode::OutsideSpliceWindow)]
    #[case("c.990+1G>C", "G", Some("GT"), "intron_variant", ReasonCode::NoSplicePrediction)]
    fn test_splice_with_dinucleotide(
        #[case] dna_change: &str,
        #[case] ref_allele: &str,
        #[case] splice_reference: Option<&str>,
        #[case] terms: &str,
        #[case] reason: ReasonCode,
    ) {
        let verdict = evaluate(&record(dna_change, ref_allele, splice_reference, terms));
        assert_eq!(verdict.reason(), reason);
    }

    #[rstest]
    #[case("c.990+1G>C", "G", ReasonCode::Match)]
    #[case("c.990+2T>C", "T", ReasonCode::Match)]
    #[case("c.991-2A>C", "A", ReasonCode::Match)]
    #[case("c.991-1G>C", "G", ReasonCode::Match)]
    #[case("c.990+1A>C", "A", ReasonCode::NonCanonicalSplice)]
    #[case("c.991-2G>C", "G", ReasonCode::NonCanonicalSplice)]
    fn test_splice_with_single_reference_base(
        #[case] dna_change: &str,
        #[case] ref_allele: &str,
        #[case] reason: ReasonCode,
    ) {
        let verdict = evaluate(&record(dna_change, ref_allele, None, "splice_donor_variant&splice_acceptor_variant"));
        assert_eq!(verdict.reason(), reason);
    }

    #[rstest]
    fn test_minus_strand_donor_uses_submitted_base() {
        // HBB intron 1 donor: VCF REF is the plus-strand C opposite the transcript G
        let coordinate = VariantCoordinate::new("11", 5248159, "C", "T").unwrap();
        let predicted = PredictedAnnotation::new(
            coordinate.clone(),
            vec![TranscriptPrediction::new("ENST00000335295", vec![Consequence::SpliceDonor]).with_strand(-1)],
        );
        let record = PairedRecord::join(
            Some(SubmittedEntry::new(coordinate, "c.92+1G>A").with_locus("1i")),
            Some(predicted),
        )
        .unwrap();

        let verdict = evaluate(&record);
        assert_eq!(verdict.reason(), ReasonCode::Match);
    }

    #[rstest]
    #[case(Some(-1), "C", ReasonCode::Match)]
    #[case(Some(1), "G", ReasonCode::Match)]
    #[case(Some(1), "C", ReasonCode::NonCanonicalSplice)]
    #[case(None, "G", ReasonCode::InsufficientInformation)]
    fn test_vcf_reference_oriented_by_strand(
        #[case] strand: Option<i8>,
        #[case] ref_allele: &str,
        #[case] reason: ReasonCode,
    ) {
        let coordinate = VariantCoordinate::new("1", 1000, ref_allele, "CTT").unwrap();
        let mut transcript = TranscriptPrediction::new("ENST1", vec![Consequence::SpliceDonor]);
        if let Some(strand) = strand {
            transcript = transcript.with_strand(strand);
        }
        let record = PairedRecord::join(
            Some(SubmittedEntry::new(coordinate.clone(), "c.990+1delinsTT")),
            Some(PredictedAnnotation::new(coordinate, vec![transcript])),
        )
        .unwrap();

        assert_eq!(evaluate(&record).reason(), reason);
    }

    #[rstest]
    #[case(Some("GT"))]
    #[case(None)]
    fn test_no_predicted_consequence_is_error(#[case] splice_reference: Option<&str>) {
        let verdict = evaluate(&record("c.990+1G>C", "G", splice_reference, ""));
        assert_eq!(verdict.status(), Status::Error);
        assert_eq!(verdict.reason(), ReasonCode::MissingTranscript);
    }

    #[rstest]
    fn test_non_canonical_is_discordant() {
        let verdict = evaluate(&record("c.990+1G>C", "G", Some("GA"), "splice_donor_variant"));
        assert_eq!(verdict.status(), Status::Discordant);
        assert_eq!(
            verdict.explanation(),
            "reference GA at c.990+1G>C is not the canonical donor GT"
        );
    }

    #[rstest]
    fn test_multi_base_reference_without_dinucleotide_is_error() {
        let verdict = evaluate(&record("c.990+1_990+2del", "GTA", None, "splice_donor_variant"));
        assert_eq!(verdict.status(), Status::Error);
    }

    #[rstest]
    fn test_unparseable_dna_change_is_error() {
        let verdict = evaluate(&record("IVS5+1G>C", "G", Some("GT"), "splice_donor_variant"));
        assert_eq!(verdict.status(), Status::Error);
        assert_eq!(verdict.reason(), ReasonCode::InsufficientInformation);
    }
}
