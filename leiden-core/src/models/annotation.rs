use std::fmt::{self, Display};

use crate::errors::ModelError;
use crate::models::coordinate::VariantCoordinate;
use crate::protein::{ProteinChange, ResidueChange, parse_protein_change, parse_vep_amino_acids};

///
/// Predicted molecular consequence. VEP terms are open-ended text, so anything
/// not used by concordance evaluation lands in `Other`.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Consequence {
    Missense,
    Synonymous,
    SpliceDonor,
    SpliceAcceptor,
    Frameshift,
    StopGained,
    StopLost,
    StartLost,
    Other(String),
}

impl Consequence {
    ///
    /// Map a single consequence term onto the vocabulary. Sequence Ontology
    /// terms and the legacy VEP/Ensembl terms are both recognised.
    ///
    pub fn from_term(term: &str) -> Self {
        match term.trim().to_lowercase().as_str() {
            "missense_variant" | "missense" | "non_synonymous_coding" => Consequence::Missense,
            "synonymous_variant" | "synonymous" | "synonymous_coding" | "stop_retained_variant" => {
                Consequence::Synonymous
            }
            "splice_donor_variant" | "splice_donor" => Consequence::SpliceDonor,
            "splice_acceptor_variant" | "splice_acceptor" => Consequence::SpliceAcceptor,
            "frameshift_variant" | "frameshift" | "frameshift_coding" => Consequence::Frameshift,
            "stop_gained" | "nonsense_variant" | "codon_loss" => Consequence::StopGained,
            "stop_lost" => Consequence::StopLost,
            "start_lost" | "initiator_codon_variant" => Consequence::StartLost,
            other => Consequence::Other(other.to_string()),
        }
    }

    /// Parse VEP's `&`-joined consequence list, e.g. `splice_region_variant&intron_variant`.
    pub fn parse_list(terms: &str) -> Vec<Consequence> {
        terms
            .split(['&', ','])
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(Consequence::from_term)
            .collect()
    }

    pub fn is_splice(&self) -> bool {
        matches!(self, Consequence::SpliceDonor | Consequence::SpliceAcceptor)
    }

    pub fn is_codon_loss(&self) -> bool {
        matches!(
            self,
            Consequence::StopGained | Consequence::StopLost | Consequence::StartLost
        )
    }
}

impl Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let term = match self {
            Consequence::Missense => "missense_variant",
            Consequence::Synonymous => "synonymous_variant",
            Consequence::SpliceDonor => "splice_donor_variant",
            Consequence::SpliceAcceptor => "splice_acceptor_variant",
            Consequence::Frameshift => "frameshift_variant",
            Consequence::StopGained => "stop_gained",
            Consequence::StopLost => "stop_lost",
            Consequence::StartLost => "start_lost",
            Consequence::Other(term) => term.as_str(),
        };
        write!(f, "{}", term)
    }
}

///
/// VEP's `IMPACT` rating of a consequence, ordered from least to most severe.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    Modifier,
    Low,
    Moderate,
    High,
}

impl Impact {
    pub fn from_term(term: &str) -> Option<Self> {
        match term.trim().to_uppercase().as_str() {
            "MODIFIER" => Some(Impact::Modifier),
            "LOW" => Some(Impact::Low),
            "MODERATE" => Some(Impact::Moderate),
            "HIGH" => Some(Impact::High),
            _ => None,
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let term = match self {
            Impact::Modifier => "MODIFIER",
            Impact::Low => "LOW",
            Impact::Moderate => "MODERATE",
            Impact::High => "HIGH",
        };
        write!(f, "{}", term)
    }
}

/// Allele count and allele number from a population panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlleleCounts {
    pub count: u64,
    pub number: u64,
}

impl AlleleCounts {
    /// Allele frequency in percent; `None` when no alleles were called.
    pub fn frequency_percent(&self) -> Option<f64> {
        (self.number > 0).then(|| self.count as f64 / self.number as f64 * 100.0)
    }
}

///
/// Mutation database and population panel annotations found next to the
/// predictions.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseOverlap {
    /// Most severe impact as already written by the annotation step.
    pub severe_impact: Option<String>,
    pub hgmd_site: bool,
    pub hgmd_mutation: bool,
    pub allele_counts: Option<AlleleCounts>,
}

///
/// One transcript-scoped prediction from the annotation block.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptPrediction {
    pub transcript_id: String,
    pub consequences: Vec<Consequence>,
    /// HGVSp, e.g. `ENSP00000233146.2:p.Arg97His`
    pub protein_change: Option<String>,
    /// VEP `Amino_acids`, e.g. `R/H`
    pub amino_acids: Option<String>,
    pub protein_position: Option<u32>,
    pub cds_position: Option<u32>,
    /// VEP `STRAND`: `1` forward, `-1` reverse.
    pub strand: Option<i8>,
    pub impact: Option<Impact>,
}

impl TranscriptPrediction {
    pub fn new(transcript_id: &str, consequences: Vec<Consequence>) -> Self {
        TranscriptPrediction {
            transcript_id: transcript_id.to_string(),
            consequences,
            ..Default::default()
        }
    }

    pub fn with_protein_change(mut self, protein_change: &str) -> Self {
        self.protein_change = Some(protein_change.to_string());
        self
    }

    pub fn with_amino_acids(mut self, amino_acids: &str, protein_position: u32) -> Self {
        self.amino_acids = Some(amino_acids.to_string());
        self.protein_position = Some(protein_position);
        self
    }

    pub fn with_strand(mut self, strand: i8) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn is_reverse_strand(&self) -> Option<bool> {
        self.strand.map(|strand| strand < 0)
    }

    pub fn has(&self, consequence: &Consequence) -> bool {
        self.consequences.contains(consequence)
    }

    /// True if the transcript carries any protein-level change text.
    pub fn has_protein_text(&self) -> bool {
        let present = |text: &Option<String>| text.as_deref().is_some_and(|t| !t.trim().is_empty());
        present(&self.protein_change) || present(&self.amino_acids)
    }

    pub fn parsed_protein_change(&self) -> Option<Result<ProteinChange, ModelError>> {
        self.protein_change
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(parse_protein_change)
    }

    ///
    /// Resolve the predicted residue change, preferring HGVSp and falling back
    /// to `Amino_acids` + `Protein_position`. `None` when no residue position
    /// can be established.
    ///
    pub fn residue_change(&self) -> Option<ResidueChange> {
        if let Some(Ok(change)) = self.parsed_protein_change() {
            match change {
                ProteinChange::Substitution(residue_change) => return Some(residue_change),
                ProteinChange::Silent(Some(residue)) => {
                    return Some(ResidueChange {
                        reference: residue.amino_acid,
                        position: residue.position,
                        alternate: residue.amino_acid,
                    });
                }
                _ => {}
            }
        }

        let amino_acids = self.amino_acids.as_deref()?.trim();
        let position = self.protein_position?;
        parse_vep_amino_acids(amino_acids, position).ok()
    }

    /// True if the predicted protein text describes no amino-acid change.
    pub fn predicts_silent_change(&self) -> bool {
        if let Some(Ok(change)) = self.parsed_protein_change() {
            return change.is_silent();
        }
        match self.amino_acids.as_deref().map(str::trim) {
            Some(aa) if !aa.is_empty() && !aa.contains('/') => true,
            Some(aa) => aa
                .split_once('/')
                .is_some_and(|(before, after)| !before.is_empty() && before == after),
            None => false,
        }
    }
}

///
/// All predictions the annotator made for one coordinate.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedAnnotation {
    pub coordinate: VariantCoordinate,
    pub transcripts: Vec<TranscriptPrediction>,
    /// The two reference bases at the intron edge next to the variant, if the
    /// annotation step resolved them.
    pub splice_reference: Option<String>,
    pub overlap: DatabaseOverlap,
}

impl PredictedAnnotation {
    pub fn new(coordinate: VariantCoordinate, transcripts: Vec<TranscriptPrediction>) -> Self {
        PredictedAnnotation {
            coordinate,
            transcripts,
            splice_reference: None,
            overlap: DatabaseOverlap::default(),
        }
    }

    pub fn with_overlap(mut self, overlap: DatabaseOverlap) -> Self {
        self.overlap = overlap;
        self
    }

    /// Most severe `IMPACT` across all transcripts.
    pub fn most_severe_impact(&self) -> Option<Impact> {
        self.transcripts.iter().filter_map(|t| t.impact).max()
    }

    pub fn with_splice_reference(mut self, dinucleotide: &str) -> Self {
        self.splice_reference = Some(dinucleotide.to_ascii_uppercase());
        self
    }

    pub fn any(&self, consequence: &Consequence) -> bool {
        self.transcripts.iter().any(|t| t.has(consequence))
    }

    pub fn any_matching(&self, predicate: impl Fn(&Consequence) -> bool) -> bool {
        self.transcripts
            .iter()
            .flat_map(|t| t.consequences.iter())
            .any(predicate)
    }

    /// Transcripts carrying a consequence that satisfies `predicate`, in input order.
    pub fn transcripts_with(
        &self,
        predicate: impl Fn(&Consequence) -> bool,
    ) -> impl Iterator<Item = &TranscriptPrediction> {
        self.transcripts
            .iter()
            .filter(move |t| t.consequences.iter().any(&predicate))
    }

    /// Distinct consequence terms across all transcripts, in first-seen order.
    pub fn consequence_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for consequence in self.transcripts.iter().flat_map(|t| t.consequences.iter()) {
            let term = consequence.to_string();
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }
}
