// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image encoding for the embedding function.
//!
//! Image references are file paths; the model consumes the raw file bytes as
//! standard base64 text.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::Path;

/// An image in the form the embedding function consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Turns an image reference into an [`EncodedImage`].
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, reference: &str) -> Result<EncodedImage>;
}

impl<T: ImageEncoder + ?Sized> ImageEncoder for Box<T> {
    fn encode(&self, reference: &str) -> Result<EncodedImage> {
        (**self).encode(reference)
    }
}

/// Reads the referenced file and base64-encodes its bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64ImageEncoder;

impl ImageEncoder for Base64ImageEncoder {
    fn encode(&self, reference: &str) -> Result<EncodedImage> {
        if reference.is_empty() {
            bail!("Empty image reference");
        }
        let path = Path::new(reference);
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "encoded image");
        Ok(EncodedImage(BASE64.encode(bytes)))
    }
}
