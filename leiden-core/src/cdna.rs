//! HGVS coding DNA (`c.`) positions, as far as splice evaluation needs them.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ModelError;

static CODING_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)c\.\(?([-*]?\d+)([+-]\d+)?(?:([ACGT])>)?").unwrap());

///
/// The first position named by a `c.` change. `c.990+1G>T` has anchor `990`,
/// intronic offset `+1` and reference base `G`; exonic positions carry no
/// offset, and only substitutions name a reference base.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingPosition {
    /// Exonic anchor as written, including a `-` (5' UTR) or `*` (3' UTR) prefix.
    pub anchor: String,
    /// Distance into the intron: positive after a donor, negative before an acceptor.
    pub intron_offset: Option<i64>,
    /// Reference base of a substitution, on the transcript's strand.
    pub reference_base: Option<char>,
}

impl CodingPosition {
    pub fn is_intronic(&self) -> bool {
        self.intron_offset.is_some_and(|offset| offset != 0)
    }
}

///
/// Parse the first coding position out of a submitted DNA change, e.g.
/// `NM_000088.3:c.990+1G>T` or `c.(990-2_990-1)del`.
///
pub fn parse_coding_position(dna_change: &str) -> Result<CodingPosition, ModelError> {
    let caps = CODING_POSITION
        .captures(dna_change)
        .ok_or_else(|| ModelError::CodingChangeFormat(dna_change.to_string()))?;

    let intron_offset = caps
        .get(2)
        .map(|m| {
            m.as_str()
                .parse::<i64>()
                .map_err(|_| ModelError::CodingChangeFormat(dna_change.to_string()))
        })
        .transpose()?;

    let reference_base = caps
        .get(3)
        .and_then(|m| m.as_str().chars().next())
        .map(|base| base.to_ascii_uppercase());

    Ok(CodingPosition {
        anchor: caps[1].to_string(),
        intron_offset,
        reference_base,
    })
}
