//! HGVS protein-level notation.
//!
//! LOVD submitters and VEP describe protein changes with slightly different
//! dialects (`p.(Arg97His)`, `p.R97H`, `NP_000245.2:p.Arg97His`, VEP's
//! URL-encoded `p.Arg97%3D`). Everything here reduces those to a
//! [`ProteinChange`] so the two sides can be compared residue by residue.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Sec,
    Pyl,
    Stop,
}

impl AminoAcid {
    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
            AminoAcid::Sec => 'U',
            AminoAcid::Pyl => 'O',
            AminoAcid::Stop => '*',
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "Ala",
            AminoAcid::Arg => "Arg",
            AminoAcid::Asn => "Asn",
            AminoAcid::Asp => "Asp",
            AminoAcid::Cys => "Cys",
            AminoAcid::Gln => "Gln",
            AminoAcid::Glu => "Glu",
            AminoAcid::Gly => "Gly",
            AminoAcid::His => "His",
            AminoAcid::Ile => "Ile",
            AminoAcid::Leu => "Leu",
            AminoAcid::Lys => "Lys",
            AminoAcid::Met => "Met",
            AminoAcid::Phe => "Phe",
            AminoAcid::Pro => "Pro",
            AminoAcid::Ser => "Ser",
            AminoAcid::Thr => "Thr",
            AminoAcid::Trp => "Trp",
            AminoAcid::Tyr => "Tyr",
            AminoAcid::Val => "Val",
            AminoAcid::Sec => "Sec",
            AminoAcid::Pyl => "Pyl",
            AminoAcid::Stop => "Ter",
        }
    }

    ///
    /// Parse a sequence of one-letter codes, e.g. the altered peptide returned
    /// by the lookup service (`GAS*`).
    ///
    pub fn parse_sequence(sequence: &str) -> Result<Vec<AminoAcid>, ModelError> {
        sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| AminoAcid::from_str(&c.to_string()))
            .collect()
    }
}

impl FromStr for AminoAcid {
    type Err = ModelError;

    /// Three- or one-letter code, case-insensitive. `*`, `Ter`, `X` and `Xaa`
    /// all denote a stop codon.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let aa = match code.trim().to_ascii_uppercase().as_str() {
            "A" | "ALA" => AminoAcid::Ala,
            "R" | "ARG" => AminoAcid::Arg,
            "N" | "ASN" => AminoAcid::Asn,
            "D" | "ASP" => AminoAcid::Asp,
            "C" | "CYS" => AminoAcid::Cys,
            "Q" | "GLN" => AminoAcid::Gln,
            "E" | "GLU" => AminoAcid::Glu,
            "G" | "GLY" => AminoAcid::Gly,
            "H" | "HIS" => AminoAcid::His,
            "I" | "ILE" => AminoAcid::Ile,
            "L" | "LEU" => AminoAcid::Leu,
            "K" | "LYS" => AminoAcid::Lys,
            "M" | "MET" => AminoAcid::Met,
            "F" | "PHE" => AminoAcid::Phe,
            "P" | "PRO" => AminoAcid::Pro,
            "S" | "SER" => AminoAcid::Ser,
            "T" | "THR" => AminoAcid::Thr,
            "W" | "TRP" => AminoAcid::Trp,
            "Y" | "TYR" => AminoAcid::Tyr,
            "V" | "VAL" => AminoAcid::Val,
            "U" | "SEC" => AminoAcid::Sec,
            "O" | "PYL" => AminoAcid::Pyl,
            "*" | "TER" | "X" | "XAA" => AminoAcid::Stop,
            _ => return Err(ModelError::UnknownAminoAcid(code.to_string())),
        };
        Ok(aa)
    }
}

impl Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.three_letter())
    }
}

/// An amino acid at a 1-based residue position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Residue {
    pub amino_acid: AminoAcid,
    pub position: u32,
}

/// Residue-level substitution: `reference` at `position` becomes `alternate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueChange {
    pub reference: AminoAcid,
    pub position: u32,
    pub alternate: AminoAcid,
}

impl ResidueChange {
    pub fn is_silent(&self) -> bool {
        self.reference == self.alternate
    }
}

impl Display for ResidueChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p.{}{}{}", self.reference, self.position, self.alternate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProteinChange {
    /// Single residue replaced (missense, nonsense, stop-loss extension).
    Substitution(ResidueChange),
    /// No amino-acid change; the residue is known for `p.Arg97=`, not for `p.=`.
    Silent(Option<Residue>),
    /// Reading frame shifted starting at `reference`/`position`.
    Frameshift {
        reference: AminoAcid,
        position: u32,
        alternate: Option<AminoAcid>,
        /// Length of the new reading frame including the stop, as in `fs*24`.
        stop_offset: Option<u32>,
    },
    /// `p.?`, `p.0`, `p.Met1?`: the effect is not known.
    Unknown,
}

impl ProteinChange {
    ///
    /// Absolute residue position of the new stop codon for a frameshift,
    /// e.g. `p.Arg97Glyfs*24` terminates at residue 120. `None` without an
    /// `fs*N` offset, or when the stop would lie past `u32::MAX`.
    ///
    pub fn stop_position(&self) -> Option<u32> {
        match self {
            ProteinChange::Frameshift {
                position,
                stop_offset: Some(offset),
                ..
            } => position.checked_add(offset.saturating_sub(1)),
            _ => None,
        }
    }

    pub fn is_silent(&self) -> bool {
        match self {
            ProteinChange::Silent(_) => true,
            ProteinChange::Substitution(change) => change.is_silent(),
            _ => false,
        }
    }

    /// The residue change for substitutions whose codes differ.
    pub fn missense_change(&self) -> Option<ResidueChange> {
        match self {
            ProteinChange::Substitution(change) if !change.is_silent() => Some(*change),
            _ => None,
        }
    }
}

impl FromStr for ProteinChange {
    type Err = ModelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_protein_change(text)
    }
}

static P_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)p\.[\(\[]?([^\)\]]+)[\)\]]?").unwrap());

static FRAMESHIFT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z*]{1,3})(\d+)([a-z*]{1,3})?fs(?:\*|ter|x)?(\d+|\?)?$").unwrap()
});

static SUBSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z*]{1,3})(\d+)([a-z*]{1,3}|=|\?)(?:ext.*)?$").unwrap()
});

static INDEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(del|ins|dup|_)").unwrap());

///
/// Remove the p-dot wrapper from a protein change description. Accepted forms
/// are `p.change`, `p.(change)` and `p.[change]`, optionally prefixed by a
/// protein accession. Text without a p-dot is returned trimmed.
///
pub fn strip_p_dot(annotation: &str) -> String {
    let decoded = annotation.trim().replace("%3D", "=").replace("%3d", "=");
    let without_accession = match decoded.split_once(':') {
        Some((_, rest)) => rest.to_string(),
        None => decoded,
    };

    match P_DOT.captures(&without_accession) {
        Some(caps) => caps[1].trim().to_string(),
        None => without_accession.trim().to_string(),
    }
}

fn parse_position(text: &str, original: &str) -> Result<u32, ModelError> {
    text.parse::<u32>()
        .map_err(|_| ModelError::ProteinChangeFormat(original.to_string()))
}

///
/// Parse a protein change description into a [`ProteinChange`].
///
/// # Arguments
/// - text: LOVD or VEP protein change text
///
pub fn parse_protein_change(text: &str) -> Result<ProteinChange, ModelError> {
    let body = strip_p_dot(text);

    match body.as_str() {
        "=" => return Ok(ProteinChange::Silent(None)),
        "" | "?" | "0" | "-" | "0?" => return Ok(ProteinChange::Unknown),
        _ => {}
    }

    if let Some(caps) = FRAMESHIFT.captures(&body) {
        let reference = AminoAcid::from_str(&caps[1])?;
        let position = parse_position(&caps[2], text)?;
        let alternate = caps
            .get(3)
            .map(|m| AminoAcid::from_str(m.as_str()))
            .transpose()?;
        let stop_offset = match caps.get(4).map(|m| m.as_str()) {
            Some("?") | None => None,
            Some(n) => Some(parse_position(n, text)?),
        };
        return Ok(ProteinChange::Frameshift {
            reference,
            position,
            alternate,
            stop_offset,
        });
    }

    if INDEL.is_match(&body) {
        return Err(ModelError::UnsupportedProteinChange(text.to_string()));
    }

    let caps = SUBSTITUTION
        .captures(&body)
        .ok_or_else(|| ModelError::ProteinChangeFormat(text.to_string()))?;

    let reference = AminoAcid::from_str(&caps[1])?;
    let position = parse_position(&caps[2], text)?;

    match &caps[3] {
        "=" => Ok(ProteinChange::Silent(Some(Residue {
            amino_acid: reference,
            position,
        }))),
        "?" => Ok(ProteinChange::Unknown),
        alt => {
            let alternate = AminoAcid::from_str(alt)?;
            if alternate == reference {
                Ok(ProteinChange::Silent(Some(Residue {
                    amino_acid: reference,
                    position,
                })))
            } else {
                Ok(ProteinChange::Substitution(ResidueChange {
                    reference,
                    position,
                    alternate,
                }))
            }
        }
    }
}

///
/// Parse VEP's `Amino_acids` field (`R/H`, or `R` for synonymous changes)
/// together with its `Protein_position` into a residue change.
///
pub fn parse_vep_amino_acids(amino_acids: &str, position: u32) -> Result<ResidueChange, ModelError> {
    let (before, after) = match amino_acids.split_once('/') {
        Some((before, after)) => (before, after),
        None => (amino_acids, amino_acids),
    };

    // only single residues; multi-residue strings come from indels
    if before.chars().count() != 1 || after.chars().count() != 1 {
        return Err(ModelError::UnsupportedProteinChange(amino_acids.to_string()));
    }

    Ok(ResidueChange {
        reference: AminoAcid::from_str(before)?,
        position,
        alternate: AminoAcid::from_str(after)?,
    })
}
