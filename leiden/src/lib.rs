//! # leiden
//!
//! Checks curated LOVD variant submissions against VEP consequence
//! predictions. Each member crate is re-exported behind a feature of the
//! same name.
//!
#[cfg(feature = "core")]
#[doc(inline)]
pub use leiden_core as core;

#[cfg(feature = "vcf")]
#[doc(inline)]
pub use leiden_vcf as vcf;

#[cfg(feature = "lookup")]
#[doc(inline)]
pub use leiden_lookup as lookup;

#[cfg(feature = "validation")]
#[doc(inline)]
pub use leiden_validation as validation;
