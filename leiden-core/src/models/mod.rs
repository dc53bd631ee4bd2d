pub mod annotation;
pub mod coordinate;
pub mod record;
pub mod submission;
pub mod verdict;

// re-export for cleaner imports
pub use self::annotation::{
    AlleleCounts, Consequence, DatabaseOverlap, Impact, PredictedAnnotation, TranscriptPrediction,
};
pub use self::coordinate::VariantCoordinate;
pub use self::record::{MalformedRecord, PairedRecord};
pub use self::submission::SubmittedEntry;
pub use self::verdict::{Category, ReasonCode, Status, Verdict};
