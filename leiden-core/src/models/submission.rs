use std::sync::LazyLock;

use regex::Regex;

use crate::cdna::{CodingPosition, parse_coding_position};
use crate::errors::ModelError;
use crate::models::coordinate::VariantCoordinate;
use crate::protein::{ProteinChange, parse_protein_change};

static EXON_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+\s*i|\d+\s*[_/-]\s*\d+\s*i?|ivs\s*\d+|intron\s*\d+)$").unwrap()
});

///
/// A variant as reported by a LOVD submitter.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedEntry {
    pub coordinate: VariantCoordinate,
    /// e.g. `NM_000088.3:c.990+1G>T`
    pub dna_change: String,
    /// e.g. `p.(Arg97His)`
    pub protein_change: Option<String>,
    /// Exon/intron label from the LOVD `Exon` column, e.g. `12` or `5i`.
    pub locus: Option<String>,
    pub remarks: String,
}

impl SubmittedEntry {
    pub fn new(coordinate: VariantCoordinate, dna_change: &str) -> Self {
        SubmittedEntry {
            coordinate,
            dna_change: dna_change.to_string(),
            protein_change: None,
            locus: None,
            remarks: String::new(),
        }
    }

    pub fn with_protein_change(mut self, protein_change: &str) -> Self {
        self.protein_change = Some(protein_change.to_string());
        self
    }

    pub fn with_locus(mut self, locus: &str) -> Self {
        self.locus = Some(locus.to_string());
        self
    }

    pub fn with_remarks(mut self, remarks: &str) -> Self {
        self.remarks = remarks.to_string();
        self
    }

    /// The parsed protein change, or `None` when the submitter left it blank.
    pub fn parsed_protein_change(&self) -> Option<Result<ProteinChange, ModelError>> {
        self.protein_change
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(parse_protein_change)
    }

    pub fn coding_position(&self) -> Result<CodingPosition, ModelError> {
        parse_coding_position(&self.dna_change)
    }

    ///
    /// Whether the locus label places the variant at an exon/intron junction:
    /// intron labels (`5i`, `IVS5`, `intron 5`), exon junctions (`5_6`) or
    /// anything mentioning a splice site or boundary.
    ///
    pub fn locus_names_exon_boundary(&self) -> bool {
        let Some(locus) = self.locus.as_deref().map(str::trim) else {
            return false;
        };
        let lower = locus.to_lowercase();
        lower.contains("splice") || lower.contains("boundary") || EXON_BOUNDARY.is_match(&lower)
    }
}
