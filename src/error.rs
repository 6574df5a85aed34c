//! Error types for kerf.

/// Errors that can occur during splitting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that reached or exceeded the size.
        overlap: usize,
    },

    /// The recursive splitter was given no separators.
    #[error("separator list must not be empty")]
    EmptySeparators,

    /// Invalid hard ceiling for semantic chunks (must be > 0 when set).
    #[error("invalid max chunk size: {0} (must be > 0)")]
    InvalidMaxChunkSize(usize),

    /// The breakpoint threshold amount is unusable for its threshold type.
    #[error("invalid breakpoint threshold amount {amount} for {kind}: {reason}")]
    InvalidThresholdAmount {
        /// The threshold type the amount was given for.
        kind: &'static str,
        /// The rejected amount.
        amount: f64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The embedding generator failed. The generator's error is passed through.
    #[error(transparent)]
    Embedding(anyhow::Error),

    /// The embedding generator returned a different number of vectors than texts.
    #[error("embedding generator returned {actual} vectors for {expected} texts")]
    EmbeddingCountMismatch {
        /// Number of texts sent to the generator.
        expected: usize,
        /// Number of vectors it returned.
        actual: usize,
    },

    /// The embedding generator returned vectors of differing dimensionality.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the first vector in the batch.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// The operation was cancelled through its cancellation token.
    #[error("split cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error comes from invalid splitter options.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidChunkSize(_)
                | Self::OverlapExceedsSize { .. }
                | Self::EmptySeparators
                | Self::InvalidMaxChunkSize(_)
                | Self::InvalidThresholdAmount { .. }
        )
    }

    /// Whether the embedding generator broke its output contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingCountMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }

    /// Whether the operation ended through cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for kerf operations.
pub type Result<T> = std::result::Result<T, Error>;
