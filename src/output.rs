//! Output and color utilities for consistent terminal formatting
//!
//! Provides shared color functions respecting NO_COLOR environment variable.

use colored::Colorize;

/// Number of leading components shown in text output
pub const PREVIEW_LEN: usize = 4;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Colorize vector index (yellow)
pub fn colorize_index(index: usize, use_color: bool) -> String {
    if use_color {
        index.to_string().yellow().to_string()
    } else {
        index.to_string()
    }
}

/// Colorize dimension label (green)
pub fn colorize_dim(dim: usize, use_color: bool) -> String {
    let text = format!("dim={}", dim);
    if use_color {
        text.green().to_string()
    } else {
        text
    }
}

/// Colorize component preview (dimmed)
pub fn colorize_preview(text: &str, use_color: bool) -> String {
    if use_color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// One line per vector: `<index> dim=<n> [v0, v1, v2, v3, ...]`
pub fn format_vector_line(index: usize, vector: &[f32], use_color: bool) -> String {
    let mut preview: Vec<String> = vector
        .iter()
        .take(PREVIEW_LEN)
        .map(|v| format!("{:.4}", v))
        .collect();
    if vector.len() > PREVIEW_LEN {
        preview.push("...".to_string());
    }
    format!(
        "{} {} {}",
        colorize_index(index, use_color),
        colorize_dim(vector.len(), use_color),
        colorize_preview(&format!("[{}]", preview.join(", ")), use_color)
    )
}
