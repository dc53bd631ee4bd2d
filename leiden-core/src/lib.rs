//! # leiden-core
//!
//! Shared models for checking LOVD variant submissions against VEP predictions.
//!
//! ## Main Components
//!
//! - **`VariantCoordinate`**: chromosome, position and alleles; the join key
//! - **`SubmittedEntry`** / **`PredictedAnnotation`**: the two sides of a record
//! - **`PairedRecord`**: both sides joined on coordinate
//! - **`Verdict`**: the terminal outcome of evaluating one record
//! - **`protein`** / **`cdna`**: the HGVS notation the rules need to read
//!
//! ## Example
//!
//! ```rust
//! use leiden_core::models::{PairedRecord, PredictedAnnotation, SubmittedEntry, VariantCoordinate};
//!
//! let coordinate = VariantCoordinate::new("11", 5248232, "T", "A").unwrap();
//! let submitted = SubmittedEntry::new(coordinate.clone(), "c.20A>T").with_protein_change("p.(Glu7Val)");
//! let predicted = PredictedAnnotation::new(coordinate, vec![]);
//!
//! let record = PairedRecord::join(Some(submitted), Some(predicted)).unwrap();
//! assert_eq!(record.coordinate().pos(), 5248232);
//! ```
//!
pub mod cdna;
pub mod errors;
pub mod models;
pub mod protein;
pub mod utils;
