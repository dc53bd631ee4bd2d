use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use leiden_core::models::{MalformedRecord, PairedRecord};
use leiden_core::utils::get_dynamic_reader;

use crate::decode::{RecordDecoder, VcfTags};
use crate::error::{VcfError, VcfResult};
use crate::header::{HEADER_PREFIX, VcfHeader};

///
/// Streams [`PairedRecord`]s out of an annotated VCF. Lines that cannot be
/// decoded come out as [`MalformedRecord`]s so the caller can log them and
/// keep going.
///
pub struct VcfReader<R> {
    source: String,
    reader: R,
    header: VcfHeader,
    decoder: RecordDecoder,
    pending: Option<String>,
    line_number: usize,
    buf: String,
    finished: bool,
}

impl VcfReader<BufReader<Box<dyn Read + Send>>> {
    ///
    /// Open a plain or gzipped VCF and read its header. Fails if the file
    /// cannot be opened or its header lacks the tag definitions.
    ///
    pub fn from_path(path: &Path, tags: VcfTags) -> VcfResult<Self> {
        let reader = get_dynamic_reader(path)
            .map_err(|e| VcfError::Open(format!("{}: {:#}", path.display(), e)))?;
        Self::new(&path.display().to_string(), reader, tags)
    }
}

impl<R: BufRead> VcfReader<R> {
    pub fn new(source: &str, mut reader: R, tags: VcfTags) -> VcfResult<Self> {
        let mut header = VcfHeader::new();
        let mut buf = String::new();
        let mut line_number = 0;
        let mut pending = None;

        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let line = buf.trim_end_matches(['\n', '\r']);
            if line.starts_with(HEADER_PREFIX) {
                header.push_line(line);
            } else {
                pending = Some(line.to_string());
                break;
            }
        }

        let decoder = RecordDecoder::from_header(&header, tags)?;

        Ok(VcfReader {
            source: source.to_string(),
            reader,
            header,
            decoder,
            pending,
            line_number,
            buf,
            finished: false,
        })
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn decode(&self, line: &str) -> Result<PairedRecord, MalformedRecord> {
        self.decoder.decode(line).map_err(|e| {
            tracing::debug!(source = %self.source, line = self.line_number, error = %e, "malformed record");
            MalformedRecord::new(&self.source, self.line_number, e.to_string())
        })
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<PairedRecord, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.take() {
            if !line.trim().is_empty() {
                return Some(self.decode(&line));
            }
        }

        while !self.finished {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buf.trim_end_matches(['\n', '\r']);
                    if line.trim().is_empty() || line.starts_with(HEADER_PREFIX) {
                        continue;
                    }
                    let line = line.to_string();
                    return Some(self.decode(&line));
                }
                Err(e) => {
                    // the stream cannot be resumed after a read error
                    self.finished = true;
                    tracing::warn!(source = %self.source, line = self.line_number + 1, error = %e, "read failed");
                    return Some(Err(MalformedRecord::new(
                        &self.source,
                        self.line_number + 1,
                        format!("read failed: {}", e),
                    )));
                }
            }
        }

        None
    }
}
