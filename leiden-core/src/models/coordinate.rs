use std::fmt::{self, Display};

use crate::errors::ModelError;

///
/// A single genomic variant position: the join key between a LOVD submission
/// and its VEP annotation.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantCoordinate {
    chrom: String,
    pos: u64,
    ref_allele: String,
    alt_allele: String,
}

fn normalize_allele(allele: &str) -> Result<String, ModelError> {
    let upper = allele.trim().to_ascii_uppercase();
    let valid = !upper.is_empty()
        && upper
            .bytes()
            .all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'));

    if valid {
        Ok(upper)
    } else {
        Err(ModelError::InvalidAllele(allele.to_string()))
    }
}

impl VariantCoordinate {
    ///
    /// Create a new coordinate. Alleles are stored upper-case.
    ///
    /// # Arguments
    /// - chrom: chromosome name, e.g. `1` or `chrX`
    /// - pos: 1-based position of the first reference base
    /// - ref_allele: reference bases
    /// - alt_allele: alternate bases
    ///
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Result<Self, ModelError> {
        let chrom = chrom.trim();
        if chrom.is_empty() {
            return Err(ModelError::EmptyChromosome);
        }
        if pos == 0 {
            return Err(ModelError::InvalidPosition(pos));
        }

        Ok(VariantCoordinate {
            chrom: chrom.to_string(),
            pos,
            ref_allele: normalize_allele(ref_allele)?,
            alt_allele: normalize_allele(alt_allele)?,
        })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    /// Single-base substitution (both alleles one base long).
    pub fn is_snv(&self) -> bool {
        self.ref_allele.len() == 1 && self.alt_allele.len() == 1
    }

    /// Net length change, positive for insertions.
    pub fn length_change(&self) -> i64 {
        self.alt_allele.len() as i64 - self.ref_allele.len() as i64
    }
}

impl Display for VariantCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}>{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}
