//! Format and intent classification.
//!
//! Cheap structural detectors and keyword heuristics run first; the
//! model-backed fallback only sees content none of them recognized.

pub mod detectors;
pub mod fallback;
pub mod intent;
pub mod router;
pub mod types;

pub use fallback::FallbackClassifier;
pub use router::ClassificationRouter;
pub use types::{ClassificationResult, Format, Intent};
