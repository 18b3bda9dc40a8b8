use thiserror::Error;

/// Top-level error type for the rondel annotation kernel.
#[derive(Debug, Error)]
pub enum RondelError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// Errors related to path topology bookkeeping.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("segment range {start}..={end} is invalid for {count} segments")]
    InvalidRange {
        start: usize,
        end: usize,
        count: usize,
    },

    #[error("sub-path {index} does not exist ({count} sub-paths)")]
    SubpathNotFound { index: usize, count: usize },
}

/// Errors related to satellite annotations.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("satellite anchored at segment {index}, but the path has {count} segments")]
    AnchorOutOfRange { index: usize, count: usize },
}

/// Convenience type alias for results using [`RondelError`].
pub type Result<T> = std::result::Result<T, RondelError>;
