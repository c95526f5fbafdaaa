// src/error.rs

use thiserror::Error;

/// Errors surfaced by graph construction and sample extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No read in the dataset reaches the high-frequency threshold, so
    /// nothing can anchor classification. Fatal; raised before any parallel
    /// work is dispatched.
    #[error("no reads meet the high-frequency threshold {threshold}; nothing to classify against")]
    NoHighFrequencyReads { threshold: u32 },

    /// An assumed-adjacent read pair is not actually at edit distance 1.
    /// Signals a graph-construction defect and is never silently corrected.
    #[error("reads {parent:?} and {child:?} are at edit distance {distance}, expected 1")]
    InvalidEditDistance {
        parent: String,
        child: String,
        distance: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
