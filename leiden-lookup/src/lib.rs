//! # leiden-lookup
//!
//! Clients for the external sequence service that resolves frameshift and
//! codon-loss predictions: residue position, original and altered amino
//! acids, and the next in-frame stop.
//!
//! Clients compose by wrapping:
//!
//! ```rust
//! use leiden_lookup::{Gated, NoLookup, RetryPolicy, Retrying};
//!
//! let client = Retrying::new(Gated::new(NoLookup, 4), RetryPolicy::default());
//! ```
//!
pub mod client;
pub mod error;
pub mod gate;
#[cfg(feature = "http")]
pub mod http;
pub mod retry;
pub mod table;

// re-export things
pub use client::*;
pub use error::*;
pub use gate::{ConcurrencyGate, Gated};
#[cfg(feature = "http")]
pub use http::{HttpLookupClient, HttpLookupConfig};
pub use retry::{RetryPolicy, Retrying};
pub use table::{TableEntry, TableLookupClient};
