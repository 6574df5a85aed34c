//! # kerf
//!
//! Text splitting for retrieval-augmented generation (RAG) pipelines.
//!
//! ## The Problem
//!
//! Language models have context windows. Documents don't fit. You need to split
//! them into pieces ("chunks") small enough to embed and retrieve, but large
//! enough to preserve meaning.
//!
//! Splitting every N characters cuts words and sentences in half. kerf offers
//! two strategies that respect the structure of the text instead.
//!
//! ## Splitting Strategies
//!
//! ### Recursive (LangChain-style)
//!
//! Try splitting on paragraph breaks first. If a piece is still too large,
//! split that piece on line breaks, then on spaces, then into characters.
//!
//! ```text
//! Separators: ["\n\n", "\n", " ", ""]
//!
//! 1. Split on "\n\n" (paragraphs), pack paragraphs into chunks
//! 2. A paragraph > chunk_size? Split it on "\n" (lines)
//! 3. A line still > chunk_size? Split it on " " (words)
//! 4. A word still > chunk_size? Split it on "" (characters)
//! ```
//!
//! Synchronous, pure, no model required.
//!
//! **When to use**: General-purpose, mixed content.
//! **Weakness**: Separator hierarchy is heuristic, not semantic.
//!
//! ### Semantic (Embedding-Based)
//!
//! Embed each sentence, measure the cosine distance between neighbors, and
//! split where the distance is an outlier for this document.
//!
//! ```text
//! Sentences:  [S1, S2, S3, S4, S5, S6]
//! Distances:     0.1  0.2  0.7  0.15 0.3
//!                          ↑
//!                     Topic shift! (above the 95th percentile)
//!
//! Chunks: [S1, S2, S3] | [S4, S5, S6]
//! ```
//!
//! Embeddings come from your own [`EmbeddingGenerator`]: a remote API, a
//! local model (see the `fastembed` feature), or anything else.
//!
//! **When to use**: When topic coherence matters more than size uniformity.
//! **Weakness**: Requires an embedding model, slower, thresholds are relative.
//!
//! ## Quick Start
//!
//! ```rust
//! use kerf::{RecursiveSplitter, TextSplitter, TextSplitterOptions};
//!
//! let text = "The quick brown fox jumps over the lazy dog.\n\n\
//!             Pack my box with five dozen liquor jugs.";
//!
//! let splitter = RecursiveSplitter::new(TextSplitterOptions::prose(50));
//! let chunks = splitter.split(text)?;
//!
//! assert_eq!(chunks.len(), 2);
//! # Ok::<(), kerf::Error>(())
//! ```
//!
//! ## Semantic Splitting
//!
//! ```rust,ignore
//! use kerf::{CancellationToken, SemanticSplitter, SemanticTextSplitterOptions};
//!
//! let splitter = SemanticSplitter::new(my_generator, SemanticTextSplitterOptions::default());
//! let chunks = splitter.split(long_document, &CancellationToken::new()).await?;
//! ```
//!
//! ## Measuring Size
//!
//! Sizes are measured by a [`LengthFunction`]: characters by default, or
//! bytes, graphemes, words, or your tokenizer wrapped in a closure.
//!
//! ## Configuration
//!
//! Options are plain `serde` structs. Splitters read them from an
//! [`OptionsSource`]; a [`LiveOptions`] lets you publish new options (say,
//! after a config reload) without rebuilding splitters. Each call sees one
//! consistent snapshot.
//!
//! ## Performance Considerations
//!
//! | Strategy | Speed | Quality | Memory |
//! |----------|-------|---------|--------|
//! | Recursive | O(n × s) | Medium | O(n) |
//! | Semantic | O(n × d) + model | High | O(n × d) |
//!
//! Where n = document length, s = separator count, d = embedding dimension.
//!
//! For most RAG applications, **Recursive** is the sweet spot.
//! Use **Semantic** when retrieval quality justifies the cost.

pub mod breakpoint;
pub mod distance;
mod embedding;
mod error;
mod length;
mod options;
mod recursive;
mod semantic;
mod sentence;
mod source;

#[cfg(feature = "fastembed")]
mod fastembed;

pub use embedding::{EmbeddingGenerator, FnGenerator};
pub use error::{Error, Result};
pub use length::{ByteCount, CharCount, GraphemeCount, LengthFunction, WordCount};
pub use options::{
    BreakpointThresholdType, SemanticTextSplitterOptions, TextSplitterOptions, DEFAULT_SEPARATORS,
    MARKDOWN_SEPARATORS,
};
pub use recursive::{split_recursive, RecursiveSplitter};
pub use semantic::{split_semantic, SemanticSplitter};
pub use sentence::{buffer_sentences, join_sentences, split_sentences, Sentence};
pub use source::{LiveOptions, OptionsSource};

pub use tokio_util::sync::CancellationToken;

#[cfg(feature = "fastembed")]
pub use crate::fastembed::FastEmbedGenerator;

/// A synchronous text splitting strategy.
///
/// Implemented by [`RecursiveSplitter`], enabling polymorphic usage:
///
/// ```rust
/// use kerf::{RecursiveSplitter, TextSplitter, TextSplitterOptions};
///
/// fn split_document(splitter: &dyn TextSplitter, text: &str) -> kerf::Result<Vec<String>> {
///     splitter.split(text)
/// }
///
/// let prose = RecursiveSplitter::new(TextSplitterOptions::prose(100));
/// let markdown = RecursiveSplitter::new(TextSplitterOptions::markdown(100));
///
/// let text = "Hello world. This is a test.";
/// assert_eq!(split_document(&prose, text)?, [text]);
/// assert_eq!(split_document(&markdown, text)?, [text]);
/// # Ok::<(), kerf::Error>(())
/// ```
///
/// The semantic splitter is asynchronous and has its own
/// [`SemanticSplitter::split`].
pub trait TextSplitter: Send + Sync {
    /// Split text into chunks, in document order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the splitter's current options are
    /// invalid.
    fn split(&self, text: &str) -> Result<Vec<String>>;
}
