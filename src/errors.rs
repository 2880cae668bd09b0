// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types returned by the embedding adapter.

use thiserror::Error;

/// Failure of an [`Embeddings`](crate::embedding::Embeddings) call.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Paired inputs disagree in length. Caller bug, never retryable.
    #[error("the number of texts ({texts}) must equal the number of images ({images})")]
    LengthMismatch { texts: usize, images: usize },

    /// Failure raised by the image encoder or the embedding function, surfaced as-is.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl EmbedError {
    /// Whether this error is a broken precondition rather than a collaborator failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, EmbedError::LengthMismatch { .. })
    }
}
