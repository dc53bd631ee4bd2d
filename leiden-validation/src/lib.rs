//! # leiden-validation
//!
//! Concordance evaluation of LOVD variant submissions against VEP
//! predictions. Every record is classified into one category, checked by
//! that category's rule, and routed to exactly one of three outputs.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use leiden_lookup::NoLookup;
//! use leiden_validation::{Evaluator, Pipeline, ResultAggregator};
//! use leiden_vcf::{VcfReader, VcfTags};
//!
//! let reader = VcfReader::from_path(Path::new("annotated.vcf"), VcfTags::default()).unwrap();
//! let mut aggregator =
//!     ResultAggregator::new(reader.header(), Vec::new(), Vec::new(), Vec::new()).unwrap();
//!
//! let pipeline = Pipeline::new(Evaluator::new(NoLookup), 4);
//! pipeline.run(vec![reader], &mut aggregator).unwrap();
//!
//! println!("{}", aggregator.summary());
//! ```
//!
pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod reorder;
pub mod rules;

// re-export things
pub use aggregator::{
    AggregatorOutputs, OverlapCounts, ResultAggregator, RunTally, SourceTally, StatusCounts,
};
pub use classifier::classify;
pub use config::{ConfigError, LookupSettings, ValidationConfig};
pub use errors::{ValidationError, ValidationResult};
pub use pipeline::Pipeline;
pub use reorder::ReorderBuffer;
pub use rules::Evaluator;
