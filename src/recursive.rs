//! Recursive separator splitting (LangChain-style).
//!
//! Tries progressively finer separators until every chunk fits the budget.
//!
//! ## The Algorithm
//!
//! Given separators `["\n\n", "\n", " ", ""]` and `chunk_size = 100`:
//!
//! ```text
//! 1. Split the text on "\n\n" (paragraphs)
//! 2. Pack neighboring paragraphs into chunks of <= 100 units
//! 3. A single paragraph > 100 units? Split *that paragraph* on "\n"
//!    and pack its lines the same way, in place of the paragraph
//! 4. A single line still > 100? Split it on " " (words)
//! 5. A single word still > 100? Split it on "" (characters)
//! 6. Out of separators? Emit the fragment as-is
//! ```
//!
//! ## Packing and Overlap
//!
//! Parts are packed greedily, joined by the separator they were split on.
//! With `chunk_overlap > 0`, the next chunk starts with as many trailing
//! parts of the previous chunk as fit in the overlap budget:
//!
//! ```text
//! parts: [the] [quick] [brown] [fox] [jumps]     size = 15, overlap = 5
//!
//! Chunk 0: "the quick brown"
//! Chunk 1: "brown fox jumps"   <- "brown" carried over (5 <= 5)
//! ```
//!
//! ## No Call-Stack Recursion
//!
//! Oversized fragments are not handled by recursive calls. Each pass pushes
//! its output, in order, onto an explicit stack of `Pending` entries:
//! finished chunks (`Emit`) and fragments that still need a finer separator
//! (`Split`). Popping the stack yields chunks in document order, and memory
//! stays proportional to the text rather than to the nesting depth.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{CharCount, LengthFunction, OptionsSource, Result, TextSplitter, TextSplitterOptions};

/// Work-list entry for [`split_recursive`].
#[derive(Debug)]
enum Pending<'a> {
    /// A fragment to split with the separator at `level`.
    Split { text: &'a str, level: usize },
    /// A finished chunk.
    Emit(String),
}

/// Split `text` with the separator hierarchy in `options`.
///
/// This is a pure function of its arguments. Chunks are non-empty, in
/// document order, and at most `options.chunk_size` long unless no
/// separator can reduce a fragment any further.
///
/// ```rust
/// use kerf::{split_recursive, CharCount, TextSplitterOptions};
///
/// let options = TextSplitterOptions::new(20, &["\n\n", " "]);
/// let chunks = split_recursive("Short one.\n\nA second, longer paragraph.", &CharCount, &options)?;
///
/// assert_eq!(chunks, ["Short one.", "A second, longer", "paragraph."]);
/// # Ok::<(), kerf::Error>(())
/// ```
///
/// # Errors
///
/// Returns a configuration error if `options` fail
/// [`TextSplitterOptions::validate`].
#[tracing::instrument(skip_all, fields(text_len = text.len(), chunk_size = options.chunk_size))]
pub fn split_recursive<L>(
    text: &str,
    length: &L,
    options: &TextSplitterOptions,
) -> Result<Vec<String>>
where
    L: LengthFunction + ?Sized,
{
    options.validate()?;

    if text.is_empty() {
        return Ok(vec![]);
    }

    let separators = &options.separators;
    let mut chunks = Vec::new();
    let mut pending = vec![Pending::Split { text, level: 0 }];

    while let Some(entry) = pending.pop() {
        let (fragment, level) = match entry {
            Pending::Emit(chunk) => {
                chunks.push(chunk);
                continue;
            }
            Pending::Split { text, level } => (text, level),
        };

        let Some(separator) = separators.get(level) else {
            // Atomic: nothing left to split on.
            chunks.push(fragment.to_string());
            continue;
        };

        let parts = split_on(fragment, separator);
        trace!(level, parts = parts.len(), "splitting fragment");

        let mut planned = Vec::new();
        let mut run: Vec<&str> = Vec::new();

        for part in parts {
            if length.length(part) <= options.chunk_size {
                run.push(part);
                continue;
            }

            planned.extend(
                merge_parts(&run, separator, length, options)
                    .into_iter()
                    .map(Pending::Emit),
            );
            run.clear();

            if level + 1 < separators.len() {
                planned.push(Pending::Split {
                    text: part,
                    level: level + 1,
                });
            } else {
                planned.push(Pending::Emit(part.to_string()));
            }
        }

        planned.extend(
            merge_parts(&run, separator, length, options)
                .into_iter()
                .map(Pending::Emit),
        );

        // Reversed so the first planned entry is popped first.
        pending.extend(planned.into_iter().rev());
    }

    debug!(chunks = chunks.len(), "recursive split complete");
    Ok(chunks)
}

/// Split on a literal separator, or into characters for `""`.
fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).collect()
    }
}

/// Greedily pack `parts` into chunks joined by `separator`.
///
/// The running length is the sum of part lengths plus one separator between
/// each pair, which is exact for additive metrics such as characters.
fn merge_parts<L>(
    parts: &[&str],
    separator: &str,
    length: &L,
    options: &TextSplitterOptions,
) -> Vec<String>
where
    L: LengthFunction + ?Sized,
{
    let separator_len = length.length(separator);
    let mut merged = Vec::new();
    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    let mut total = 0usize;

    for &part in parts {
        let part_len = length.length(part);

        if !window.is_empty() && total + separator_len + part_len > options.chunk_size {
            push_joined(&mut merged, &window, separator);

            // Keep only the tail that fits in the overlap and leaves room for `part`.
            // Empty parts still cost a separator, so they are dropped too.
            while let Some(&(_, first_len)) = window.front() {
                let fits_next = total + separator_len + part_len <= options.chunk_size;
                if total <= options.chunk_overlap && fits_next {
                    break;
                }
                window.pop_front();
                total -= first_len + if window.is_empty() { 0 } else { separator_len };
            }
        }

        total += part_len + if window.is_empty() { 0 } else { separator_len };
        window.push_back((part, part_len));
    }

    push_joined(&mut merged, &window, separator);
    merged
}

fn push_joined(merged: &mut Vec<String>, window: &VecDeque<(&str, usize)>, separator: &str) {
    let joined = window
        .iter()
        .map(|&(part, _)| part)
        .collect::<Vec<_>>()
        .join(separator);
    if !joined.is_empty() {
        merged.push(joined);
    }
}

/// Recursive separator splitter.
///
/// Holds a length function and an options source; every call to
/// [`split`](TextSplitter::split) takes a fresh options snapshot.
///
/// ## Example
///
/// ```rust
/// use kerf::{RecursiveSplitter, TextSplitter, TextSplitterOptions};
///
/// let splitter = RecursiveSplitter::new(TextSplitterOptions::prose(50));
/// let text = "Paragraph one.\n\nParagraph two is longer and might need splitting.";
/// let chunks = splitter.split(text)?;
///
/// assert_eq!(chunks[0], "Paragraph one.");
/// # Ok::<(), kerf::Error>(())
/// ```
pub struct RecursiveSplitter<L = CharCount> {
    options: Arc<dyn OptionsSource<TextSplitterOptions>>,
    length: L,
}

impl RecursiveSplitter {
    /// Create a splitter with fixed options, measuring in characters.
    #[must_use]
    pub fn new(options: TextSplitterOptions) -> Self {
        Self::from_source(Arc::new(Arc::new(options)))
    }

    /// Create a splitter that reads options from `source` on every call.
    #[must_use]
    pub fn from_source(source: Arc<dyn OptionsSource<TextSplitterOptions>>) -> Self {
        Self {
            options: source,
            length: CharCount,
        }
    }
}

impl<L: LengthFunction> RecursiveSplitter<L> {
    /// Measure chunks with `length` instead.
    #[must_use]
    pub fn with_length<M: LengthFunction>(self, length: M) -> RecursiveSplitter<M> {
        RecursiveSplitter {
            options: self.options,
            length,
        }
    }

    /// The options the next call would use.
    pub fn options(&self) -> Arc<TextSplitterOptions> {
        self.options.snapshot()
    }
}

impl<L: LengthFunction> TextSplitter for RecursiveSplitter<L> {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let options = self.options.snapshot();
        split_recursive(text, &self.length, &options)
    }
}

impl<L: std::fmt::Debug> std::fmt::Debug for RecursiveSplitter<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveSplitter")
            .field("options", &self.options.snapshot())
            .field("length", &self.length)
            .finish()
    }
}
