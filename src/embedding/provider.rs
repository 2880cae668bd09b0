// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding function interface and implementations.
//!
//! The embedding function is the only place model inference happens. It takes
//! a text and an optional encoded image and returns one vector. A missing image
//! is sent to the model as an empty string.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use super::image::EncodedImage;
use crate::config::{EmbeddingConfig, EmbeddingProviderType};

/// Computes one joint (or text-only) embedding per call.
pub trait EmbeddingFunction: Send + Sync {
    /// Returns the model identifier.
    fn model_id(&self) -> &str;

    /// Embeds `text` together with `image`; `None` selects the text-only path.
    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>>;
}

impl<T: EmbeddingFunction + ?Sized> EmbeddingFunction for Box<T> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        (**self).embed(text, image)
    }
}

impl<T: EmbeddingFunction + ?Sized> EmbeddingFunction for &T {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        (**self).embed(text, image)
    }
}

/// Builds the embedding function selected by `config`.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingFunction>> {
    let embedder: Box<dyn EmbeddingFunction> = match config.provider() {
        EmbeddingProviderType::Command => {
            let provider =
                CommandEmbedder::new(config.command().to_string(), config.model().to_string());
            provider.check_available()?;
            Box::new(provider)
        }
        EmbeddingProviderType::Http => {
            let api_key = std::env::var(config.api_key_env())
                .ok()
                .filter(|key| !key.trim().is_empty());
            if api_key.is_none() {
                tracing::warn!(
                    env = config.api_key_env(),
                    "no API key set; sending unauthenticated embedding requests"
                );
            }
            Box::new(
                HttpEmbedder::new(config.endpoint(), config.model(), api_key)
                    .with_timeout(Duration::from_secs(config.timeout_secs())),
            )
        }
        EmbeddingProviderType::Dummy => Box::new(DummyEmbedder::new(config.dimension())),
    };
    tracing::debug!(model = embedder.model_id(), provider = ?config.provider(), "embedder ready");
    Ok(embedder)
}

/// Wire payload for a single embedding unit.
#[derive(Debug, Serialize)]
struct EmbeddingInput<'a> {
    text: &'a str,
    image: &'a str,
}

impl<'a> EmbeddingInput<'a> {
    fn new(text: &'a str, image: Option<&'a EncodedImage>) -> Self {
        Self {
            text,
            image: image.map(EncodedImage::as_str).unwrap_or(""),
        }
    }
}

/// Command provider that shells out to an external process.
///
/// The command receives `{"model", "text", "image"}` on stdin and prints the
/// vector as JSON on stdout.
pub struct CommandEmbedder {
    command: String,
    model: String,
}

impl CommandEmbedder {
    pub fn new(command: String, model: String) -> Self {
        Self { command, model }
    }

    /// Fails early when the command's program cannot be found on `PATH`.
    pub fn check_available(&self) -> Result<()> {
        let program = self
            .command
            .split_whitespace()
            .next()
            .ok_or_else(|| anyhow!("Embedding command is empty"))?;
        which::which(program).with_context(|| {
            format!("Embedding command '{}' was not found on PATH", program)
        })?;
        Ok(())
    }

    fn run_command(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        let input = EmbeddingInput::new(text, image);
        let payload = serde_json::json!({
            "model": self.model,
            "text": input.text,
            "image": input.image,
        });

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn embedding command: {}", self.command))?;

        // A command that dies early closes stdin; its status and stderr explain why.
        let write_error = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(payload.to_string().as_bytes()).err(),
            None => None,
        };

        let output = child
            .wait_with_output()
            .context("Failed to read embedding command output")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Embedding command failed (status {}): {}",
                output.status,
                stderr.trim()
            );
        }
        if let Some(err) = write_error {
            return Err(err).context("Failed to write embedding payload to stdin");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: Value = serde_json::from_str(stdout.trim())
            .context("Failed to parse embedding command output as JSON")?;
        extract_vector(parsed)
    }
}

impl EmbeddingFunction for CommandEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        self.run_command(text, image)
    }
}

#[derive(Debug, Serialize)]
struct HttpEmbeddingRequest<'a> {
    model: &'a str,
    input: [EmbeddingInput<'a>; 1],
}

/// Hosted embeddings endpoint speaking the `{"model", "input": [{"text", "image"}]}` dialect.
pub struct HttpEmbedder {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            agent: build_agent(Duration::from_secs(60)),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

impl EmbeddingFunction for HttpEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        let request = HttpEmbeddingRequest {
            model: &self.model,
            input: [EmbeddingInput::new(text, image)],
        };

        let mut req = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(ref api_key) = self.api_key {
            req = req.set("Authorization", &format!("Bearer {}", api_key));
        }

        let response = match req.send_json(&request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                bail!(
                    "Embedding request failed (status {}): {}",
                    code,
                    body.trim()
                );
            }
            Err(e) => bail!("Embedding request failed: {}", e),
        };
        let body: Value = response
            .into_json()
            .map_err(|e| anyhow!("Failed to parse embedding response: {}", e))?;
        extract_vector(body)
    }
}

/// Offline provider returning a deterministic unit vector per input.
///
/// Identical `(text, image)` inputs always map to the same vector.
pub struct DummyEmbedder {
    model: String,
    dimension: usize,
}

impl DummyEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            model: "dummy".to_string(),
            dimension,
        }
    }
}

impl EmbeddingFunction for DummyEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed(&self, text: &str, image: Option<&EncodedImage>) -> Result<Vec<f32>> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
        match image {
            Some(image) => {
                hasher.update(&[1]);
                hasher.update(image.as_str().as_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }

        let byte_len = self
            .dimension
            .checked_mul(4)
            .ok_or_else(|| anyhow!("Dummy dimension {} is too large", self.dimension))?;
        let mut bytes = vec![0u8; byte_len];
        hasher.finalize_xof().fill(&mut bytes);

        let mut vector: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                (raw as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect();
        l2_normalize(&mut vector);
        Ok(vector)
    }
}

/// Pulls a single vector out of a provider response.
///
/// Accepts a bare array, `{"embedding": [...]}`, `{"embeddings": [[...]]}` or
/// `{"data": [{"embedding": [...]}]}`.
fn extract_vector(value: Value) -> Result<Vec<f32>> {
    let row = match value {
        Value::Array(arr) => first_row(arr)?,
        Value::Object(mut obj) => {
            if let Some(value) = obj.remove("embedding") {
                value
            } else if let Some(Value::Array(rows)) = obj.remove("embeddings") {
                first_row(rows)?
            } else if let Some(Value::Array(data)) = obj.remove("data") {
                match data.into_iter().next() {
                    Some(Value::Object(mut item)) => item
                        .remove("embedding")
                        .ok_or_else(|| anyhow!("Embedding response item missing 'embedding'"))?,
                    Some(other) => other,
                    None => bail!("No embedding in response"),
                }
            } else {
                bail!("Embedding output missing 'embedding' field");
            }
        }
        _ => bail!("Embedding output must be a JSON array or object"),
    };

    row.as_array()
        .ok_or_else(|| anyhow!("Embedding must be a JSON array"))?
        .iter()
        .map(|value| {
            value
                .as_f64()
                .ok_or_else(|| anyhow!("Embedding value must be a number"))
                .map(|v| v as f32)
        })
        .collect()
}

/// A bare array is either the vector itself or a one-row batch.
fn first_row(arr: Vec<Value>) -> Result<Value> {
    if matches!(arr.first(), Some(Value::Array(_))) {
        arr.into_iter()
            .next()
            .ok_or_else(|| anyhow!("No embedding in response"))
    } else {
        Ok(Value::Array(arr))
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}
