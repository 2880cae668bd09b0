// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image-text pair manifests
//!
//! A manifest is a JSON array of `{"text": ..., "image": ...}` objects. Video
//! frame metadata (`transcript` / `extracted_frame_path`) is accepted as well.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One image-text pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairEntry {
    #[serde(alias = "caption", alias = "transcript")]
    pub text: String,
    #[serde(alias = "image_path", alias = "extracted_frame_path")]
    pub image: String,
}

/// Ordered list of pairs loaded from a manifest file
#[derive(Debug, Clone, Default)]
pub struct PairManifest {
    entries: Vec<PairEntry>,
}

impl PairManifest {
    /// Load a manifest; relative image paths are resolved against the manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let mut manifest = Self::from_json(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in manifest.entries.iter_mut() {
            entry.image = resolve(base, &entry.image)?;
        }
        Ok(manifest)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<PairEntry> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PairEntry] {
        &self.entries
    }

    /// Split into the parallel `(texts, images)` columns the adapter takes.
    pub fn into_columns(self) -> (Vec<String>, Vec<String>) {
        self.entries
            .into_iter()
            .map(|entry| (entry.text, entry.image))
            .unzip()
    }
}

fn resolve(base: &Path, image: &str) -> Result<String> {
    let image_path = PathBuf::from(image);
    if image.is_empty() || image_path.is_absolute() {
        return Ok(image.to_string());
    }
    base.join(image_path)
        .into_os_string()
        .into_string()
        .map_err(|path| {
            anyhow!(
                "Image path {} is not valid UTF-8",
                Path::new(&path).display()
            )
        })
}
