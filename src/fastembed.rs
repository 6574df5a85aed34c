//! Local embeddings with `fastembed` (ONNX Runtime).
//!
//! Inference is CPU-bound and blocking, so each batch runs on tokio's
//! blocking pool. Requires a tokio runtime.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::EmbeddingGenerator;

/// An [`EmbeddingGenerator`] backed by a local `fastembed` model.
///
/// ```rust,ignore
/// use kerf::{CancellationToken, FastEmbedGenerator, SemanticSplitter, SemanticTextSplitterOptions};
///
/// // Downloads BGE-small-en (384 dimensions) on first use.
/// let generator = FastEmbedGenerator::new()?;
/// let splitter = SemanticSplitter::new(generator, SemanticTextSplitterOptions::default());
///
/// let chunks = splitter
///     .split("Intro to machine learning. ML is powerful. The weather is sunny.", &CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct FastEmbedGenerator {
    model: Arc<::fastembed::TextEmbedding>,
    batch_size: Option<usize>,
}

impl FastEmbedGenerator {
    /// Load fastembed's default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be downloaded or loaded.
    pub fn new() -> anyhow::Result<Self> {
        let model = ::fastembed::TextEmbedding::try_new(Default::default())
            .context("failed to load fastembed model")?;
        Ok(Self::from_model(model))
    }

    /// Wrap an already loaded model.
    pub fn from_model(model: ::fastembed::TextEmbedding) -> Self {
        Self {
            model: Arc::new(model),
            batch_size: None,
        }
    }

    /// Texts per inference batch. fastembed picks when unset.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

#[async_trait]
impl EmbeddingGenerator for FastEmbedGenerator {
    async fn generate(
        &self,
        texts: &[String],
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        let batch_size = self.batch_size;

        tokio::task::spawn_blocking(move || model.embed(texts, batch_size))
            .await
            .context("embedding task panicked")?
    }
}

impl std::fmt::Debug for FastEmbedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedGenerator")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
