//! # Gridvakt Detection Engine
//!
//! Pure, stateless reasoning: threshold-based anomaly classification and
//! graph-based cascade propagation over supply edges.

pub mod cascade;
pub mod thresholds;

pub use cascade::{propagate, CascadePair, CascadeReport};
pub use thresholds::{classify_snapshot, Severity, ThresholdTable};
