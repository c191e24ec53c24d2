//! # Public API
//!
//! Convenience entry points that run on the default [`ChartEngine`]. Use the
//! engine directly to tune the configuration.
//!
//! ## Transposition
//!
//! - [`transpose()`] - Inline charts in place, above-line charts column-aligned
//! - [`transpose_chart()`] - Rewrite chords in place in either dialect
//! - [`transpose_visual()`] - Above-line charts, chords held in their columns
//!
//! ## Conversion and Normalization
//!
//! - [`inline_to_above_line()`] / [`above_line_to_inline()`]
//! - [`ensure_metadata()`], [`normalize_metadata_spacing()`],
//!   [`auto_insert_arrangement_line()`] and the combined [`normalize()`]
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordchart::{inline_to_above_line, parse_steps, transpose};
//!
//! let chart = "{title: Amazing Grace}\n{key: G}\n[G]Amazing [D]grace";
//! let steps = parse_steps("+2")?;
//!
//! let moved = transpose(chart, steps);
//! assert_eq!(moved, "{title: Amazing Grace}\n{key: G}\n[A]Amazing [E]grace");
//!
//! let above = inline_to_above_line(&moved);
//! assert_eq!(above, "Amazing Grace | Key: G\nA       E\nAmazing grace");
//! # Ok::<(), chordchart::ChartError>(())
//! ```

use crate::document::SongDocument;
use crate::error::ChartError;
use crate::nashville::NashvilleMode;
use crate::normalize::NormalizeReport;
use crate::render::RenderOptions;
use crate::ChartEngine;

/// Parse a semitone count such as `2`, `+2` or `-5`.
///
/// # Example
/// ```rust
/// use chordchart::parse_steps;
///
/// assert_eq!(parse_steps("+2").unwrap(), 2);
/// assert_eq!(parse_steps(" -5 ").unwrap(), -5);
/// assert!(parse_steps("two").is_err());
/// ```
///
/// # Errors
/// Returns [`ChartError::InvalidSteps`] when `text` is not an integer.
pub fn parse_steps(text: &str) -> Result<i32, ChartError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| ChartError::InvalidSteps(text.to_string()))
}

/// Transpose a chart for display.
///
/// Charts with bracketed chords are rewritten in place; above-line charts keep
/// every chord in its column. A multiple of 12 returns the chart unchanged.
pub fn transpose(text: &str, steps: i32) -> String {
    ChartEngine::default().transpose_for_display(text, steps)
}

/// Transpose a chart, rewriting chords in place.
///
/// # Example
/// ```rust
/// use chordchart::transpose_chart;
///
/// let moved = transpose_chart("[G]    [D/F#]    [Em7]    [C2]", 2);
/// assert_eq!(moved, "[A]    [E/Ab]    [F#m7]    [D2]");
/// ```
pub fn transpose_chart(text: &str, steps: i32) -> String {
    ChartEngine::default().transpose_chart(text, steps)
}

/// Transpose an above-line chart, keeping chords in their columns.
///
/// # Example
/// ```rust
/// use chordchart::transpose_visual;
///
/// let chart = "G     C     D\nAmazing grace how sweet";
/// assert_eq!(transpose_visual(chart, 1), "G#    C#    D#\nAmazing grace how sweet");
/// ```
pub fn transpose_visual(text: &str, steps: i32) -> String {
    ChartEngine::default().transpose_visual(text, steps)
}

pub fn inline_to_above_line(text: &str) -> String {
    ChartEngine::default().to_above_line(text)
}

pub fn above_line_to_inline(text: &str) -> String {
    ChartEngine::default().to_inline(text)
}

pub fn ensure_metadata(text: &str) -> String {
    ChartEngine::default().ensure_metadata(text)
}

pub fn normalize_metadata_spacing(text: &str) -> String {
    ChartEngine::default().normalize_metadata_spacing(text)
}

pub fn auto_insert_arrangement_line(text: &str) -> String {
    ChartEngine::default().auto_insert_arrangement_line(text)
}

/// Run every normalization pass, section-header promotion included.
pub fn normalize(text: &str) -> NormalizeReport {
    ChartEngine::default().normalize(text, true)
}

/// Replace chords with Nashville numbers (or chord + number in `Combined` mode).
pub fn nashville(text: &str, key: Option<&str>, mode: NashvilleMode) -> String {
    ChartEngine::default().nashville(text, key, mode)
}

/// Split a chart into classified lines and header fields.
pub fn classify(text: &str) -> SongDocument {
    ChartEngine::default().parse(text)
}

pub fn render_html(text: &str, options: &RenderOptions) -> String {
    ChartEngine::default().render_html(text, options)
}
