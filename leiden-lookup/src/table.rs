use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use leiden_core::models::VariantCoordinate;

use crate::client::{AnswerPayload, LookupAnswer, LookupClient, LookupMode, LookupRequest};
use crate::error::LookupError;

///
/// One precomputed answer in an offline lookup table.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub transcript_id: String,
    pub chrom: String,
    pub pos: u64,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
    /// Restrict the entry to one mode; answers both when absent.
    #[serde(default)]
    pub mode: Option<LookupMode>,
    #[serde(flatten)]
    pub answer: AnswerPayload,
}

type TableKey = (String, VariantCoordinate);

///
/// Answers lookups from a JSON array of [`TableEntry`] values. Variants not
/// in the table get [`LookupError::NoAnswer`].
///
#[derive(Debug, Default)]
pub struct TableLookupClient {
    entries: FxHashMap<TableKey, (Option<LookupMode>, LookupAnswer)>,
}

impl TableLookupClient {
    pub fn from_entries(entries: Vec<TableEntry>) -> Result<Self, LookupError> {
        let mut table = FxHashMap::default();
        for entry in entries {
            let coordinate =
                VariantCoordinate::new(&entry.chrom, entry.pos, &entry.ref_allele, &entry.alt_allele)
                    .map_err(|e| LookupError::Invalid(e.to_string()))?;
            let answer = LookupAnswer::try_from(entry.answer)?;
            table.insert((entry.transcript_id, coordinate), (entry.mode, answer));
        }
        Ok(TableLookupClient { entries: table })
    }

    pub fn from_path(path: &Path) -> Result<Self, LookupError> {
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<TableEntry> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LookupClient for TableLookupClient {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        let key = (request.transcript_id.clone(), request.coordinate.clone());
        match self.entries.get(&key) {
            Some((mode, answer)) if mode.is_none_or(|m| m == request.mode) => Ok(answer.clone()),
            _ => Err(LookupError::NoAnswer(format!(
                "{} on {} ({})",
                request.coordinate, request.transcript_id, request.mode
            ))),
        }
    }
}
