// SPDX-License-Identifier: MIT OR Apache-2.0

//! btembed - BridgeTower image-text embeddings library
//!
//! Shared modules for the btembed CLI tool.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod manifest;
pub mod output;
