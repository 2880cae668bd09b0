// SPDX-License-Identifier: MIT OR Apache-2.0

//! BridgeTower embeddings behind the generic [`Embeddings`] interface.
//!
//! The adapter owns no mutable state. Each call walks its inputs in order,
//! invokes the embedding function once per unit and collects the vectors.

use crate::errors::EmbedError;

use super::image::{Base64ImageEncoder, ImageEncoder};
use super::progress::ProgressObserver;
use super::provider::EmbeddingFunction;

/// Generic embeddings provider shape consumed by indexing and retrieval code.
pub trait Embeddings {
    /// Embeds image-text pairs; `texts[i]` is paired with `images[i]`.
    fn embed_image_text_pairs(
        &self,
        texts: &[String],
        images: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embeds plain text documents.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embeds a single query string.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.embed_documents(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::Collaborator(anyhow::anyhow!("No embedding returned")))
    }
}

/// BridgeTower embedding model adapter.
pub struct BridgeTowerEmbeddings<F, E = Base64ImageEncoder> {
    embedder: F,
    encoder: E,
    progress: Option<Box<dyn ProgressObserver>>,
}

impl<F: EmbeddingFunction> BridgeTowerEmbeddings<F> {
    /// Adapter reading images from disk as base64.
    pub fn new(embedder: F) -> Self {
        Self::with_encoder(embedder, Base64ImageEncoder)
    }
}

impl<F: EmbeddingFunction, E: ImageEncoder> BridgeTowerEmbeddings<F, E> {
    pub fn with_encoder(embedder: F, encoder: E) -> Self {
        Self {
            embedder,
            encoder,
            progress: None,
        }
    }

    /// Reports per-pair progress to `observer`.
    pub fn with_progress(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.progress = Some(Box::new(observer));
        self
    }

    pub fn embedder(&self) -> &F {
        &self.embedder
    }

    fn embed_pairs(
        &self,
        texts: &[String],
        images: &[String],
        on_unit: &mut dyn FnMut(),
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for (text, image) in texts.iter().zip(images) {
            let encoded = self.encoder.encode(image)?;
            embeddings.push(self.embedder.embed(text, Some(&encoded))?);
            on_unit();
        }
        Ok(embeddings)
    }
}

impl<F: EmbeddingFunction, E: ImageEncoder> Embeddings for BridgeTowerEmbeddings<F, E> {
    fn embed_image_text_pairs(
        &self,
        texts: &[String],
        images: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.len() != images.len() {
            return Err(EmbedError::LengthMismatch {
                texts: texts.len(),
                images: images.len(),
            });
        }

        tracing::info!(
            model = self.embedder.model_id(),
            "Embedding {} image-text pairs",
            texts.len()
        );

        let mut run = self.progress.as_ref().map(|p| p.start(texts.len()));
        let result = self.embed_pairs(texts, images, &mut || {
            if let Some(run) = run.as_mut() {
                run.advance();
            }
        });
        if let Some(run) = run {
            match &result {
                Ok(_) => run.finish(),
                Err(_) => run.abandon(),
            }
        }
        result
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        tracing::debug!(
            model = self.embedder.model_id(),
            "Embedding {} documents",
            texts.len()
        );
        texts
            .iter()
            .map(|text| self.embedder.embed(text, None).map_err(EmbedError::from))
            .collect()
    }
}
