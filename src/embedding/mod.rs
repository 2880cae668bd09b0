// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - multimodal embeddings behind a generic interface
//!
//! The adapter pairs texts with images, encodes each image, and hands every
//! unit to an injected embedding function, one call at a time.

pub mod adapter;
pub mod image;
pub mod progress;
pub mod provider;

pub use adapter::{BridgeTowerEmbeddings, Embeddings};
pub use image::{Base64ImageEncoder, EncodedImage, ImageEncoder};
pub use progress::{BarProgress, CallbackProgress, ProgressObserver, ProgressRun};
pub use provider::{
    create_embedder, CommandEmbedder, DummyEmbedder, EmbeddingFunction, HttpEmbedder,
};
