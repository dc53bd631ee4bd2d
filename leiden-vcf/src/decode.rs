//! Decoding VCF data lines into [`PairedRecord`]s.
//!
//! The submission tag carries one LOVD row as `|`-separated values, and the
//! consequence tag carries VEP's comma-separated transcript blocks. Both are
//! interpreted through the `Format:` string of their `##INFO` definitions.

use serde::{Deserialize, Serialize};

use leiden_core::models::{
    AlleleCounts, Consequence, DatabaseOverlap, Impact, PairedRecord, PredictedAnnotation,
    SubmittedEntry, TranscriptPrediction, VariantCoordinate,
};

use crate::error::{VcfError, VcfResult};
use crate::header::{VcfHeader, normalize_field_name};
use crate::info::{has_entry, present, tagged_value};

pub const FIELD_SEPARATOR: char = '|';
pub const BLOCK_SEPARATOR: char = ',';

///
/// INFO tags the decoder reads. Only the submission and consequence tags are
/// required on every record.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VcfTags {
    pub submission: String,
    pub consequence: String,
    pub splice_reference: String,
    pub severe_impact: String,
    pub hgmd_site: String,
    pub hgmd_mutation: String,
    /// Population panel allele count and allele number.
    pub allele_count: String,
    pub allele_number: String,
}

impl Default for VcfTags {
    fn default() -> Self {
        VcfTags {
            submission: "LOVD".to_string(),
            consequence: "CSQ".to_string(),
            splice_reference: "SPLICE_REF".to_string(),
            severe_impact: "SEVERE_IMPACT".to_string(),
            hgmd_site: "HGMD_SITE".to_string(),
            hgmd_mutation: "HGMD_MUT".to_string(),
            allele_count: "AC_MAC26K".to_string(),
            allele_number: "AN_MAC26K".to_string(),
        }
    }
}

// canonical LOVD field name, then accepted aliases
const DNA_CHANGE: &[&str] = &["DNA_CHANGE", "DNA"];
const PROTEIN_CHANGE: &[&str] = &["PROTEIN_CHANGE", "PROTEIN"];
const LOCUS: &[&str] = &["EXON", "LOCATION"];
const REMARKS: &[&str] = &["REMARKS", "VARIANT_REMARKS"];

const CSQ_CONSEQUENCE: &str = "CONSEQUENCE";
const CSQ_FEATURE: &str = "FEATURE";
const CSQ_HGVSP: &str = "HGVSP";
const CSQ_AMINO_ACIDS: &str = "AMINO_ACIDS";
const CSQ_PROTEIN_POSITION: &str = "PROTEIN_POSITION";
const CSQ_CDS_POSITION: &str = "CDS_POSITION";
const CSQ_STRAND: &str = "STRAND";
const CSQ_IMPACT: &str = "IMPACT";

fn field_index(fields: &[String], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| fields.iter().position(|field| field == name))
}

fn required_index(fields: &[String], tag: &str, names: &[&str]) -> VcfResult<usize> {
    field_index(fields, names).ok_or_else(|| VcfError::MissingFormatField {
        tag: tag.to_string(),
        field: names[0].to_string(),
    })
}

/// Leading integer of a VEP position such as `97`, `97-98` or `97/412`.
fn parse_leading_position(text: &str) -> Option<u32> {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[derive(Debug, Clone)]
struct SubmissionLayout {
    dna_change: usize,
    protein_change: Option<usize>,
    locus: Option<usize>,
    remarks: Option<usize>,
}

#[derive(Debug, Clone)]
struct ConsequenceLayout {
    consequence: usize,
    feature: usize,
    hgvsp: Option<usize>,
    amino_acids: Option<usize>,
    protein_position: Option<usize>,
    cds_position: Option<usize>,
    strand: Option<usize>,
    impact: Option<usize>,
}

///
/// Decodes data lines of one VCF file. Built once per file from its header,
/// since field order comes from the header's `Format:` strings.
///
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    tags: VcfTags,
    submission: SubmissionLayout,
    consequence: ConsequenceLayout,
}

impl RecordDecoder {
    ///
    /// Create a decoder for a file with the given header.
    ///
    /// # Arguments
    /// - header: the parsed VCF header
    /// - tags: names of the submission, consequence and splice reference tags
    ///
    pub fn from_header(header: &VcfHeader, tags: VcfTags) -> VcfResult<Self> {
        let submission_fields = Self::format_of(header, &tags.submission)?;
        let consequence_fields = Self::format_of(header, &tags.consequence)?;

        let submission = SubmissionLayout {
            dna_change: required_index(&submission_fields, &tags.submission, DNA_CHANGE)?,
            protein_change: field_index(&submission_fields, PROTEIN_CHANGE),
            locus: field_index(&submission_fields, LOCUS),
            remarks: field_index(&submission_fields, REMARKS),
        };

        let consequence = ConsequenceLayout {
            consequence: required_index(&consequence_fields, &tags.consequence, &[CSQ_CONSEQUENCE])?,
            feature: required_index(&consequence_fields, &tags.consequence, &[CSQ_FEATURE])?,
            hgvsp: field_index(&consequence_fields, &[CSQ_HGVSP]),
            amino_acids: field_index(&consequence_fields, &[CSQ_AMINO_ACIDS]),
            protein_position: field_index(&consequence_fields, &[CSQ_PROTEIN_POSITION]),
            cds_position: field_index(&consequence_fields, &[CSQ_CDS_POSITION]),
            strand: field_index(&consequence_fields, &[CSQ_STRAND]),
            impact: field_index(&consequence_fields, &[CSQ_IMPACT]),
        };

        Ok(RecordDecoder {
            tags,
            submission,
            consequence,
        })
    }

    fn format_of(header: &VcfHeader, tag: &str) -> VcfResult<Vec<String>> {
        header
            .info(tag)
            .ok_or_else(|| VcfError::MissingInfoDefinition(tag.to_string()))?
            .format_fields()
            .ok_or_else(|| VcfError::MissingInfoFormat(tag.to_string()))
    }

    pub fn tags(&self) -> &VcfTags {
        &self.tags
    }

    ///
    /// Decode one tab-separated data line. The verbatim line is kept on the
    /// returned record.
    ///
    pub fn decode(&self, line: &str) -> VcfResult<PairedRecord> {
        let columns: Vec<&str> = line.splitn(9, '\t').collect();
        if columns.len() < 8 {
            return Err(VcfError::TooFewColumns(columns.len()));
        }

        let pos = columns[1]
            .trim()
            .parse::<u64>()
            .map_err(|_| VcfError::InvalidPosition(columns[1].to_string()))?;
        let alt = columns[4].trim();
        if alt.contains(BLOCK_SEPARATOR) {
            return Err(VcfError::MultiAllelic(alt.to_string()));
        }
        let coordinate = VariantCoordinate::new(columns[0].trim(), pos, columns[3].trim(), alt)?;

        let info = columns[7];
        let submitted = tagged_value(info, &self.tags.submission)
            .map(|value| self.decode_submission(&coordinate, value))
            .transpose()?;
        let predicted = tagged_value(info, &self.tags.consequence)
            .map(|value| self.decode_prediction(&coordinate, value, info));

        let submitted = submitted.ok_or_else(|| VcfError::MissingTag(self.tags.submission.clone()))?;
        let predicted = predicted.ok_or_else(|| VcfError::MissingTag(self.tags.consequence.clone()))?;

        Ok(PairedRecord::join(Some(submitted), Some(predicted))?.with_source_line(line))
    }

    fn decode_submission(
        &self,
        coordinate: &VariantCoordinate,
        value: &str,
    ) -> VcfResult<SubmittedEntry> {
        let values: Vec<&str> = value.split(FIELD_SEPARATOR).collect();
        let get = |index: Option<usize>| present(index.and_then(|i| values.get(i).copied()));

        let dna_change = get(Some(self.submission.dna_change)).ok_or_else(|| {
            VcfError::MissingFormatField {
                tag: self.tags.submission.clone(),
                field: DNA_CHANGE[0].to_string(),
            }
        })?;

        let mut entry = SubmittedEntry::new(coordinate.clone(), dna_change);
        if let Some(protein_change) = get(self.submission.protein_change) {
            entry = entry.with_protein_change(protein_change);
        }
        if let Some(locus) = get(self.submission.locus) {
            entry = entry.with_locus(locus);
        }
        if let Some(remarks) = get(self.submission.remarks) {
            entry = entry.with_remarks(remarks);
        }
        Ok(entry)
    }

    fn decode_prediction(
        &self,
        coordinate: &VariantCoordinate,
        value: &str,
        info: &str,
    ) -> PredictedAnnotation {
        let layout = &self.consequence;
        let transcripts = value
            .split(BLOCK_SEPARATOR)
            .filter(|block| !block.trim().is_empty())
            .map(|block| {
                let values: Vec<&str> = block.split(FIELD_SEPARATOR).collect();
                let get = |index: Option<usize>| present(index.and_then(|i| values.get(i).copied()));

                TranscriptPrediction {
                    transcript_id: get(Some(layout.feature)).unwrap_or_default().to_string(),
                    consequences: get(Some(layout.consequence))
                        .map(Consequence::parse_list)
                        .unwrap_or_default(),
                    protein_change: get(layout.hgvsp).map(str::to_string),
                    amino_acids: get(layout.amino_acids).map(str::to_string),
                    protein_position: get(layout.protein_position).and_then(parse_leading_position),
                    cds_position: get(layout.cds_position).and_then(parse_leading_position),
                    strand: get(layout.strand).and_then(|strand| strand.parse().ok()),
                    impact: get(layout.impact).and_then(Impact::from_term),
                }
            })
            .collect();

        let annotation =
            PredictedAnnotation::new(coordinate.clone(), transcripts).with_overlap(self.decode_overlap(info));
        match present(tagged_value(info, &self.tags.splice_reference)) {
            Some(dinucleotide) => annotation.with_splice_reference(dinucleotide),
            None => annotation,
        }
    }

    fn decode_overlap(&self, info: &str) -> DatabaseOverlap {
        let count = |tag: &str| present(tagged_value(info, tag)).and_then(|value| value.parse::<u64>().ok());
        let allele_counts = match (count(&self.tags.allele_count), count(&self.tags.allele_number)) {
            (Some(count), Some(number)) => Some(AlleleCounts { count, number }),
            _ => None,
        };

        DatabaseOverlap {
            severe_impact: present(tagged_value(info, &self.tags.severe_impact)).map(str::to_string),
            hgmd_site: has_entry(info, &self.tags.hgmd_site),
            hgmd_mutation: has_entry(info, &self.tags.hgmd_mutation),
            allele_counts,
        }
    }
}
