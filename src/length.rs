//! Length functions: how big is a piece of text?
//!
//! Every size comparison in kerf goes through a [`LengthFunction`]. What
//! "size" means depends on where the chunks are going:
//!
//! | Metric | Type | Good for |
//! |--------|------|----------|
//! | Unicode scalar values | [`CharCount`] | Default, human-facing limits |
//! | UTF-8 bytes | [`ByteCount`] | Storage or wire limits |
//! | Grapheme clusters | [`GraphemeCount`] | Emoji- and accent-heavy text |
//! | Words (UAX #29) | [`WordCount`] | Rough token budgets |
//!
//! For real token budgets, wrap your tokenizer in a closure:
//!
//! ```rust
//! use kerf::LengthFunction;
//!
//! // Pretend every 4 bytes is a token.
//! let tokens = |text: &str| text.len().div_ceil(4);
//! assert_eq!(tokens.length("twelve bytes"), 3);
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// A pure, total cost metric over strings.
///
/// Implementations must be deterministic: the splitters assume the same
/// text always has the same length.
pub trait LengthFunction: Send + Sync {
    /// The length of `text` in this metric's units.
    fn length(&self, text: &str) -> usize;
}

impl<F> LengthFunction for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn length(&self, text: &str) -> usize {
        self(text)
    }
}

/// Counts Unicode scalar values (`char`s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCount;

impl LengthFunction for CharCount {
    fn length(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteCount;

impl LengthFunction for ByteCount {
    fn length(&self, text: &str) -> usize {
        text.len()
    }
}

/// Counts extended grapheme clusters, i.e. user-perceived characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphemeCount;

impl LengthFunction for GraphemeCount {
    fn length(&self, text: &str) -> usize {
        text.graphemes(true).count()
    }
}

/// Counts words using Unicode word boundaries. Punctuation and whitespace
/// are free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordCount;

impl LengthFunction for WordCount {
    fn length(&self, text: &str) -> usize {
        text.unicode_words().count()
    }
}
