//! # leiden-vcf
//!
//! Reading LOVD/VEP annotated VCF files into paired records, and writing
//! records back out.
//!
//! ## Main Components
//!
//! - **`VcfReader`**: streams `PairedRecord`s (or `MalformedRecord`s) from a plain or gzipped VCF
//! - **`RecordDecoder`**: decodes one data line using the header's `Format:` strings
//! - **`VcfWriter`**: header passthrough plus extra INFO entries per record
//!
pub mod decode;
pub mod error;
pub mod header;
pub mod info;
pub mod reader;
pub mod writer;

// re-export things
pub use decode::{RecordDecoder, VcfTags};
pub use error::*;
pub use header::{InfoDefinition, VcfHeader};
pub use reader::VcfReader;
pub use writer::VcfWriter;
