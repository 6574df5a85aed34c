//! Semantic splitting using embedding distances.
//!
//! Splits text where the topic changes, detected as unusually large jumps
//! in embedding distance between neighboring sentences.
//!
//! ## The Idea
//!
//! Adjacent sentences about the same topic have similar embeddings. When the
//! topic changes, the distance spikes. We split there.
//!
//! ```text
//! Sentences:  [S1]   [S2]   [S3]   [S4]   [S5]
//! Distances:      0.9    0.05   0.04   0.06
//!                  ↑
//!             above threshold -> break after S1
//!
//! Result: Chunk 1 = [S1], Chunk 2 = [S2, S3, S4, S5]
//! ```
//!
//! What counts as "unusually large" is relative to the document itself: the
//! threshold is a statistic of the distance series (see
//! [`breakpoint`](crate::breakpoint)), so the same options work for dense
//! and loose prose alike.
//!
//! ## One Call Per Pass
//!
//! Each pass makes exactly one batched generator call, with one text per
//! sentence (optionally buffered with its neighbors). A text with a single
//! sentence needs no pass at all.
//!
//! ## Oversized Chunks
//!
//! Topic boundaries do not care about size limits. With `max_chunk_size`
//! set, an oversized chunk gets another pass over just its own sentences,
//! where the statistics are local and finer boundaries show up:
//!
//! ```text
//! pass 1:  [A] [B C D]          (B C D > max, retry budget 1)
//! pass 2:      [B C] [D]        (over B, C, D only, budget now 0)
//! result:  [A] [B C] [D]
//! ```
//!
//! The budget is carried per chunk: a chunk produced by a retry pass may
//! itself be retried only while its inherited budget is above zero. A chunk
//! that is still too large when the budget runs out, or whose pass found no
//! boundary, is emitted as it is. That is a soft limit, not an error.

use std::ops::Range;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::breakpoint::{detect_breakpoints, group_ranges};
use crate::distance::distance_series;
use crate::sentence::{buffer_sentences, join_sentences, split_sentences, Sentence};
use crate::{
    CharCount, EmbeddingGenerator, Error, LengthFunction, OptionsSource, Result,
    SemanticTextSplitterOptions,
};

/// Work-list entry for [`split_semantic`].
#[derive(Debug)]
enum Pending {
    /// Sentences to run a pass over, with the retry budget they inherit.
    Pass {
        sentences: Range<usize>,
        retries_left: usize,
    },
    /// A finished chunk.
    Emit(String),
}

/// Split `text` into chunks of topically related sentences.
///
/// Chunks are the original sentences joined by single spaces, in document
/// order. Empty and whitespace-only text gives no chunks; text with a single
/// sentence is returned unchanged as the only chunk without calling the
/// generator.
///
/// A chunk longer than `max_chunk_size` with more than one sentence gets
/// another pass while retries remain, but only if the pass that produced it
/// found a boundary. Otherwise it is accepted oversized without another
/// generator call, so a split may use fewer calls than the retry limit allows.
///
/// # Errors
///
/// - A configuration error if `options` fail
///   [`SemanticTextSplitterOptions::validate`].
/// - [`Error::Embedding`] with the generator's own error if it fails.
/// - [`Error::EmbeddingCountMismatch`] or [`Error::DimensionMismatch`] if
///   the generator returns the wrong shape. These are never retried.
/// - [`Error::Cancelled`] if `cancel` fires before or during a generator
///   call. No partial output is returned.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub async fn split_semantic<G, L>(
    text: &str,
    generator: &G,
    length: &L,
    options: &SemanticTextSplitterOptions,
    cancel: &CancellationToken,
) -> Result<Vec<String>>
where
    G: EmbeddingGenerator + ?Sized,
    L: LengthFunction + ?Sized,
{
    options.validate()?;

    let sentences = split_sentences(text);
    match sentences.len() {
        0 => return Ok(vec![]),
        1 => return Ok(vec![text.to_string()]),
        _ => {}
    }

    let mut chunks = Vec::new();
    let mut passes = 0usize;
    let mut pending = vec![Pending::Pass {
        sentences: 0..sentences.len(),
        retries_left: options.chunk_split_retry_limit.unwrap_or(0),
    }];

    while let Some(entry) = pending.pop() {
        let (range, retries_left) = match entry {
            Pending::Emit(chunk) => {
                chunks.push(chunk);
                continue;
            }
            Pending::Pass {
                sentences,
                retries_left,
            } => (sentences, retries_left),
        };

        let groups = semantic_groups(&sentences[range.clone()], generator, options, cancel).await?;
        passes += 1;
        let found_boundary = groups.len() > 1;

        let mut planned = Vec::with_capacity(groups.len());
        for group in groups {
            let group = range.start + group.start..range.start + group.end;
            let chunk = join_sentences(&sentences[group.clone()]);

            let oversized = options
                .max_chunk_size
                .is_some_and(|max| length.length(&chunk) > max);

            if oversized && found_boundary && retries_left > 0 && group.len() > 1 {
                trace!(?group, retries_left, "retrying oversized chunk");
                planned.push(Pending::Pass {
                    sentences: group,
                    retries_left: retries_left - 1,
                });
            } else {
                if oversized {
                    debug!(
                        ?group,
                        len = length.length(&chunk),
                        max = options.max_chunk_size,
                        "accepting oversized chunk"
                    );
                }
                planned.push(Pending::Emit(chunk));
            }
        }

        // Reversed so the first planned entry is popped first.
        pending.extend(planned.into_iter().rev());
    }

    debug!(
        sentences = sentences.len(),
        passes,
        chunks = chunks.len(),
        "semantic split complete"
    );
    Ok(chunks)
}

/// One pass: embed `sentences`, find breakpoints, return the groups as
/// ranges relative to `sentences`.
async fn semantic_groups<G>(
    sentences: &[Sentence<'_>],
    generator: &G,
    options: &SemanticTextSplitterOptions,
    cancel: &CancellationToken,
) -> Result<Vec<Range<usize>>>
where
    G: EmbeddingGenerator + ?Sized,
{
    let inputs = buffer_sentences(sentences, options.buffer_size);
    let embeddings = embed(generator, &inputs, cancel).await?;
    let distances = distance_series(&embeddings)?;
    let breakpoints = detect_breakpoints(
        &distances,
        options.breakpoint_threshold_type,
        options.breakpoint_threshold_amount,
    );
    Ok(group_ranges(sentences.len(), &breakpoints))
}

/// Call the generator once, honoring cancellation and checking the count.
async fn embed<G>(
    generator: &G,
    texts: &[String],
    cancel: &CancellationToken,
) -> Result<Vec<Vec<f32>>>
where
    G: EmbeddingGenerator + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    trace!(texts = texts.len(), "embedding batch");
    let embeddings = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        result = generator.generate(texts, cancel) => result.map_err(Error::Embedding)?,
    };

    if embeddings.len() != texts.len() {
        return Err(Error::EmbeddingCountMismatch {
            expected: texts.len(),
            actual: embeddings.len(),
        });
    }
    Ok(embeddings)
}

/// Semantic splitter.
///
/// Owns an embedding generator, a length function for `max_chunk_size`, and
/// an options source; every call takes a fresh options snapshot.
///
/// ## Example
///
/// ```rust
/// use kerf::{CancellationToken, FnGenerator, SemanticSplitter, SemanticTextSplitterOptions};
///
/// # tokio_test_block(async {
/// // Toy embedding: which topic word the sentence mentions.
/// let generator = FnGenerator::new(|texts: Vec<String>, _cancel: CancellationToken| async move {
///     anyhow::Ok(
///         texts
///             .iter()
///             .map(|t| if t.contains("cat") { vec![1.0_f32, 0.0] } else { vec![0.0, 1.0] })
///             .collect::<Vec<_>>(),
///     )
/// });
/// let options = SemanticTextSplitterOptions::default().with_buffer_size(0);
/// let splitter = SemanticSplitter::new(generator, options);
///
/// let text = "My cat sleeps. The cat purrs. The cat eats. Stocks fell today.";
/// let chunks = splitter.split(text, &CancellationToken::new()).await?;
///
/// assert_eq!(chunks, ["My cat sleeps. The cat purrs. The cat eats.", "Stocks fell today."]);
/// # Ok::<(), kerf::Error>(())
/// # }).unwrap();
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct SemanticSplitter<G, L = CharCount> {
    generator: G,
    options: Arc<dyn OptionsSource<SemanticTextSplitterOptions>>,
    length: L,
}

impl<G: EmbeddingGenerator> SemanticSplitter<G> {
    /// Create a splitter with fixed options, measuring in characters.
    pub fn new(generator: G, options: SemanticTextSplitterOptions) -> Self {
        Self::from_source(generator, Arc::new(Arc::new(options)))
    }

    /// Create a splitter that reads options from `source` on every call.
    pub fn from_source(
        generator: G,
        source: Arc<dyn OptionsSource<SemanticTextSplitterOptions>>,
    ) -> Self {
        Self {
            generator,
            options: source,
            length: CharCount,
        }
    }
}

impl<G: EmbeddingGenerator, L: LengthFunction> SemanticSplitter<G, L> {
    /// Measure chunks against `max_chunk_size` with `length` instead.
    #[must_use]
    pub fn with_length<M: LengthFunction>(self, length: M) -> SemanticSplitter<G, M> {
        SemanticSplitter {
            generator: self.generator,
            options: self.options,
            length,
        }
    }

    /// The options the next call would use.
    pub fn options(&self) -> Arc<SemanticTextSplitterOptions> {
        self.options.snapshot()
    }

    /// The embedding generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Split `text`; see [`split_semantic`].
    ///
    /// # Errors
    ///
    /// Same as [`split_semantic`].
    pub async fn split(&self, text: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        let options = self.options.snapshot();
        split_semantic(text, &self.generator, &self.length, &options, cancel).await
    }
}

impl<G, L: std::fmt::Debug> std::fmt::Debug for SemanticSplitter<G, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSplitter")
            .field("options", &self.options.snapshot())
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
