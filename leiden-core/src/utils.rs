use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::models::VariantCoordinate;

/// Bases shown either side of a variant in genome browser links.
pub const BROWSER_VIEWING_INTERVAL: u64 = 25;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read + Send>>> {
    let is_gzipped = matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    );
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read + Send> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::with_capacity(256 * 1024, file))
}

///
/// Link to the region around a variant in the UCSC genome browser (hg19).
///
pub fn ucsc_location_link(coordinate: &VariantCoordinate) -> String {
    let chrom = coordinate.chrom().trim_start_matches("chr");
    let start = coordinate.pos().saturating_sub(BROWSER_VIEWING_INTERVAL).max(1);
    let end = coordinate.pos() + BROWSER_VIEWING_INTERVAL;
    format!(
        "http://genome.ucsc.edu/cgi-bin/hgTracks?db=hg19&position=chr{}%3A{}-{}",
        chrom, start, end
    )
}

///
/// Make free text safe to embed as a VCF INFO value: list/field separators
/// become `&`, whitespace and `=` become `_`.
///
pub fn vcf_friendly_text(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            ',' | ';' | '|' => '&',
            '=' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
