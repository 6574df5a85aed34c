//! Sentence segmentation.
//!
//! Splits text into sentences on terminal punctuation.
//!
//! ## The Rule
//!
//! A sentence ends at `.`, `!` or `?` when the next character is whitespace
//! or the end of the text. The punctuation stays with its sentence, and the
//! whitespace between sentences is dropped:
//!
//! ```text
//! "Wait... what?! Pi is 3.14. Ok"
//!        ^      ^          ^
//!  ["Wait...", "what?!", "Pi is 3.14.", "Ok"]
//! ```
//!
//! Runs of punctuation (`...`, `?!`) end the sentence only at their last
//! character, and decimals like `3.14` never split because a digit follows
//! the dot.
//!
//! ## What It Does Not Do
//!
//! This is deliberately simpler than UAX #29. Abbreviations split:
//!
//! ```text
//! "Dr. Smith arrived." -> ["Dr.", "Smith arrived."]
//! ```
//!
//! The semantic splitter only needs stable, reproducible units to embed, and
//! a misplaced boundary costs at most one extra distance in the series.
//!
//! ## Buffering
//!
//! [`buffer_sentences`] builds the texts that get embedded: each sentence
//! together with `buffer_size` neighbors on either side. Short sentences
//! ("Yes.", "Indeed.") embed poorly alone; with context they land closer to
//! their topic.
//!
//! ```text
//! buffer_size = 1
//!
//! sentences: [A] [B] [C] [D]
//! embedded:  "A B"  "A B C"  "B C D"  "C D"
//! ```

/// A sentence and its place in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Zero-based position in the sentence sequence.
    pub index: usize,
    /// Byte offset of the sentence in the source text.
    pub start: usize,
    /// The sentence text, punctuation included.
    pub text: &'a str,
}

impl Sentence<'_> {
    /// Byte offset one past the end of the sentence in the source text.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Split `text` into sentences.
///
/// Leading and trailing whitespace never belongs to a sentence, so
/// whitespace-only text has no sentences.
///
/// ```rust
/// use kerf::split_sentences;
///
/// let sentences = split_sentences("Hello world. How are you? I am fine.");
/// let texts: Vec<&str> = sentences.iter().map(|s| s.text).collect();
///
/// assert_eq!(texts, ["Hello world.", "How are you?", "I am fine."]);
/// assert_eq!(sentences[1].index, 1);
/// ```
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if start.is_none() {
            if c.is_whitespace() {
                continue;
            }
            start = Some(i);
        }

        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().map_or(true, |&(_, next)| next.is_whitespace());

        if at_boundary {
            if let Some(begin) = start.take() {
                push_sentence(&mut sentences, text, begin, i + c.len_utf8());
            }
        }
    }

    if let Some(begin) = start {
        push_sentence(&mut sentences, text, begin, text.len());
    }

    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<Sentence<'a>>, text: &'a str, start: usize, end: usize) {
    let body = text[start..end].trim_end();
    if !body.is_empty() {
        sentences.push(Sentence {
            index: sentences.len(),
            start,
            text: body,
        });
    }
}

/// Texts to embed: each sentence joined with up to `buffer_size` neighbors
/// on each side, separated by single spaces.
///
/// The output has exactly one entry per sentence, in order. With
/// `buffer_size == 0` it is just the sentence texts.
pub fn buffer_sentences(sentences: &[Sentence<'_>], buffer_size: usize) -> Vec<String> {
    (0..sentences.len())
        .map(|i| {
            let from = i.saturating_sub(buffer_size);
            let to = (i + buffer_size + 1).min(sentences.len());
            join_sentences(&sentences[from..to])
        })
        .collect()
}

/// Join sentence texts with single spaces.
pub fn join_sentences(sentences: &[Sentence<'_>]) -> String {
    sentences
        .iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join(" ")
}
