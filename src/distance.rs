//! Cosine distance between consecutive embeddings.
//!
//! ```text
//! similarity(a, b) = (a · b) / (|a| |b|)        in [-1, 1]
//! distance(a, b)   = 1 - similarity(a, b)       in [0, 2]
//! ```
//!
//! A vector with zero magnitude has no direction. Its similarity to anything
//! is taken as `0.0` (orthogonal), so its distance is `1.0`: a zero vector
//! neither glues sentences together nor forces a break on its own.

use crate::{Error, Result};

/// Cosine similarity between two vectors of equal length.
///
/// Returns `0.0` if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a > 0.0 && norm_b > 0.0 {
        (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// `1 - cosine_similarity(a, b)`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// Distances between each pair of consecutive embeddings.
///
/// `n` embeddings give `n - 1` distances; fewer than two give none.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the vectors differ in length.
pub fn distance_series(embeddings: &[Vec<f32>]) -> Result<Vec<f64>> {
    if let Some(first) = embeddings.first() {
        let expected = first.len();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
            return Err(Error::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }
    }

    Ok(embeddings
        .windows(2)
        .map(|pair| cosine_distance(&pair[0], &pair[1]))
        .collect())
}
