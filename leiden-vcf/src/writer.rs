use std::io::Write;

use leiden_core::models::PairedRecord;

use crate::error::VcfResult;
use crate::header::{InfoDefinition, VcfHeader};
use crate::info::append_info;

///
/// Writes VCF records, optionally extending each INFO column. The header is
/// written once, on construction.
///
pub struct VcfWriter<W: Write> {
    inner: W,
}

impl<W: Write> VcfWriter<W> {
    ///
    /// # Arguments
    /// - inner: destination
    /// - header: header to pass through
    /// - extra_info: `##INFO` definitions for entries this writer adds
    ///
    pub fn new(mut inner: W, header: &VcfHeader, extra_info: &[InfoDefinition]) -> VcfResult<Self> {
        for line in header.lines_with_info(extra_info) {
            writeln!(inner, "{}", line)?;
        }
        Ok(VcfWriter { inner })
    }

    ///
    /// Write a record, appending `extra_info` to its INFO column. Records
    /// decoded from a file are written from their verbatim line; others are
    /// rebuilt from the coordinate.
    ///
    pub fn write_record(&mut self, record: &PairedRecord, extra_info: &[(&str, String)]) -> VcfResult<()> {
        let line = match record.source_line.as_deref() {
            Some(line) => line.to_string(),
            None => {
                let coordinate = record.coordinate();
                format!(
                    "{}\t{}\t.\t{}\t{}\t.\t.\t.",
                    coordinate.chrom(),
                    coordinate.pos(),
                    coordinate.ref_allele(),
                    coordinate.alt_allele()
                )
            }
        };

        if extra_info.is_empty() {
            writeln!(self.inner, "{}", line)?;
            return Ok(());
        }

        let mut columns: Vec<String> = line.split('\t').map(str::to_string).collect();
        while columns.len() < 8 {
            columns.push(".".to_string());
        }
        columns[7] = append_info(&columns[7], extra_info);
        writeln!(self.inner, "{}", columns.join("\t"))?;
        Ok(())
    }

    pub fn flush(&mut self) -> VcfResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
