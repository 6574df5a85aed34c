//! The embedding generator boundary.
//!
//! kerf never computes embeddings itself. The semantic splitter hands a batch
//! of texts to an [`EmbeddingGenerator`] and expects exactly one vector back
//! per text, in the same order. Retries, rate limits and connection pooling
//! are the generator's business.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// An asynchronous batch embedding function.
///
/// Implementations must return one vector per input text, in input order,
/// all of the same dimension. The splitter treats any other shape as a
/// contract violation.
///
/// The cancellation token is the caller's; generators may watch it to abort
/// in-flight requests early. The splitter races it against the call either
/// way.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    /// Embed `texts`.
    async fn generate(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<Vec<f32>>>;
}

#[async_trait]
impl<T: EmbeddingGenerator + ?Sized> EmbeddingGenerator for Arc<T> {
    async fn generate(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<Vec<f32>>> {
        (**self).generate(texts, cancel).await
    }
}

/// Adapts an async closure into an [`EmbeddingGenerator`].
///
/// ```rust
/// use kerf::{CancellationToken, FnGenerator};
///
/// // Toy embedding: length and a constant.
/// let generator = FnGenerator::new(|texts: Vec<String>, _cancel: CancellationToken| async move {
///     anyhow::Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect::<Vec<_>>())
/// });
/// # let _ = generator;
/// ```
#[derive(Clone)]
pub struct FnGenerator<F> {
    f: F,
}

impl<F> FnGenerator<F> {
    /// Wrap `f`. It receives owned copies of the texts and the token.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> EmbeddingGenerator for FnGenerator<F>
where
    F: Fn(Vec<String>, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<Vec<f32>>>> + Send + 'static,
{
    async fn generate(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<Vec<f32>>> {
        (self.f)(texts.to_vec(), cancel.clone()).await
    }
}

impl<F> std::fmt::Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGenerator").finish_non_exhaustive()
    }
}
