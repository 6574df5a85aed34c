//! Splitter options.
//!
//! Both option records are plain data: `Clone`, `serde`-friendly, with
//! defaults for every field so partial configuration files work. They are
//! validated when a split starts, not when they are built, since a
//! [`LiveOptions`](crate::LiveOptions) source may publish new values at any
//! time between calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separators for general prose: paragraphs, lines, words, characters.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Separators for Markdown: headings first, then the prose hierarchy.
pub const MARKDOWN_SEPARATORS: &[&str] = &["\n## ", "\n### ", "\n\n", "\n", ". ", " ", ""];

/// Options for the recursive separator splitter.
///
/// ```rust
/// use kerf::TextSplitterOptions;
///
/// let options = TextSplitterOptions::prose(500).with_chunk_overlap(50);
/// assert!(options.validate().is_ok());
///
/// let broken = TextSplitterOptions::default().with_chunk_overlap(100);
/// assert!(broken.validate().is_err()); // overlap must be < chunk_size
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSplitterOptions {
    /// Separators tried from coarsest to finest. `""` splits per character.
    pub separators: Vec<String>,
    /// Maximum chunk length, measured by the length function.
    pub chunk_size: usize,
    /// Trailing length units of one chunk repeated at the start of the next.
    pub chunk_overlap: usize,
}

impl Default for TextSplitterOptions {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.iter().map(|&s| s.to_string()).collect(),
            chunk_size: 100,
            chunk_overlap: 0,
        }
    }
}

impl TextSplitterOptions {
    /// Options with custom separators and no overlap.
    #[must_use]
    pub fn new(chunk_size: usize, separators: &[&str]) -> Self {
        Self {
            separators: separators.iter().map(|&s| s.to_string()).collect(),
            chunk_size,
            chunk_overlap: 0,
        }
    }

    /// Options with the default prose separators.
    #[must_use]
    pub fn prose(chunk_size: usize) -> Self {
        Self::new(chunk_size, DEFAULT_SEPARATORS)
    }

    /// Options with Markdown-aware separators.
    #[must_use]
    pub fn markdown(chunk_size: usize) -> Self {
        Self::new(chunk_size, MARKDOWN_SEPARATORS)
    }

    /// Set the chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the overlap between consecutive chunks.
    #[must_use]
    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Check the options for configuration errors.
    ///
    /// # Errors
    ///
    /// Fails if `chunk_size == 0`, `chunk_overlap >= chunk_size`, or there
    /// are no separators.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        if self.separators.is_empty() {
            return Err(Error::EmptySeparators);
        }
        Ok(())
    }
}

/// How the breakpoint threshold is derived from the distance series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakpointThresholdType {
    /// The value at the `amount`-th percentile (0-100) of the distances.
    #[default]
    Percentile,
    /// Mean plus `amount` population standard deviations.
    StandardDeviation,
    /// Third quartile plus `amount` interquartile ranges.
    InterquartileRange,
}

impl BreakpointThresholdType {
    /// The amount used when none is configured.
    pub const fn default_amount(self) -> f64 {
        match self {
            Self::Percentile => 95.0,
            Self::StandardDeviation => 3.0,
            Self::InterquartileRange => 1.5,
        }
    }

    /// A stable name, used in error messages and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentile => "percentile",
            Self::StandardDeviation => "standard_deviation",
            Self::InterquartileRange => "interquartile_range",
        }
    }
}

impl fmt::Display for BreakpointThresholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for the semantic splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticTextSplitterOptions {
    /// Neighbors on each side merged into a sentence before embedding it.
    pub buffer_size: usize,
    /// How the breakpoint threshold is computed.
    pub breakpoint_threshold_type: BreakpointThresholdType,
    /// Parameter for the threshold type.
    pub breakpoint_threshold_amount: f64,
    /// Soft ceiling on chunk length. Oversized chunks are re-split while
    /// the retry budget lasts.
    pub max_chunk_size: Option<usize>,
    /// How many times an oversized chunk may be re-split.
    pub chunk_split_retry_limit: Option<usize>,
}

impl Default for SemanticTextSplitterOptions {
    fn default() -> Self {
        let threshold = BreakpointThresholdType::default();
        Self {
            buffer_size: 1,
            breakpoint_threshold_type: threshold,
            breakpoint_threshold_amount: threshold.default_amount(),
            max_chunk_size: None,
            chunk_split_retry_limit: None,
        }
    }
}

impl SemanticTextSplitterOptions {
    /// Set the neighbor buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Use `kind` with its default amount.
    #[must_use]
    pub fn with_threshold_type(mut self, kind: BreakpointThresholdType) -> Self {
        self.breakpoint_threshold_type = kind;
        self.breakpoint_threshold_amount = kind.default_amount();
        self
    }

    /// Set the threshold amount.
    #[must_use]
    pub fn with_threshold_amount(mut self, amount: f64) -> Self {
        self.breakpoint_threshold_amount = amount;
        self
    }

    /// Set the soft ceiling on chunk length.
    #[must_use]
    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = Some(max_chunk_size);
        self
    }

    /// Set how many times an oversized chunk may be re-split.
    #[must_use]
    pub fn with_retry_limit(mut self, limit: usize) -> Self {
        self.chunk_split_retry_limit = Some(limit);
        self
    }

    /// Check the options for configuration errors.
    ///
    /// # Errors
    ///
    /// Fails if `max_chunk_size` is `Some(0)`, the threshold amount is not
    /// finite, or a percentile amount lies outside `0..=100`.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == Some(0) {
            return Err(Error::InvalidMaxChunkSize(0));
        }
        let kind = self.breakpoint_threshold_type;
        let amount = self.breakpoint_threshold_amount;
        if !amount.is_finite() {
            return Err(Error::InvalidThresholdAmount {
                kind: kind.as_str(),
                amount,
                reason: "must be finite",
            });
        }
        if kind == BreakpointThresholdType::Percentile && !(0.0..=100.0).contains(&amount) {
            return Err(Error::InvalidThresholdAmount {
                kind: kind.as_str(),
                amount,
                reason: "percentile must be within 0..=100",
            });
        }
        Ok(())
    }
}
