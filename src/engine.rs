//! # Chart Engine
//!
//! [`ChartEngine`] bundles an [`EngineConfig`] with the [`LineClassifier`] built
//! from it and exposes every chart operation as a method, so a caller that
//! tunes the configuration once gets consistent classification everywhere.
//!
//! ```rust
//! use chordchart::{ChartEngine, EngineConfig};
//!
//! let config = EngineConfig::from_yaml("compact: false")?;
//! let engine = ChartEngine::new(config);
//!
//! let above = engine.to_above_line("[G]Amazing [D]grace\nChorus\n[C]How [G]sweet");
//! assert_eq!(above, "G       D\nAmazing grace\nChorus:\nC   G\nHow sweet");
//! # Ok::<(), chordchart::ChartError>(())
//! ```

use crate::config::EngineConfig;
use crate::convert::{above_line_to_inline, inline_to_above_line};
use crate::direction::{detect_direction, TextDirection};
use crate::document::SongDocument;
use crate::grammar::{ChordLineScorer, LineClassifier};
use crate::nashville::{nashville_chart, NashvilleMode};
use crate::normalize::{
    auto_insert_arrangement_line, ensure_metadata, normalize, normalize_metadata_spacing,
    promote_section_headers, NormalizeReport,
};
use crate::render::{render_html, RenderOptions};
use crate::transpose::{transpose_chart, transpose_chord, transpose_for_display, transpose_visual_format};

#[derive(Debug, Default)]
pub struct ChartEngine {
    config: EngineConfig,
    classifier: LineClassifier,
}

impl ChartEngine {
    pub fn new(config: EngineConfig) -> Self {
        let classifier = LineClassifier::new(&config);
        Self { config, classifier }
    }

    /// Engine whose chord-line decisions come from `scorer` instead of the
    /// configured thresholds.
    pub fn with_scorer(config: EngineConfig, scorer: impl ChordLineScorer + 'static) -> Self {
        let classifier = LineClassifier::with_scorer(scorer, config.header_scan_lines);
        Self { config, classifier }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn parse(&self, text: &str) -> SongDocument {
        SongDocument::parse(text, &self.classifier)
    }

    pub fn transpose_chord(&self, token: &str, steps: i32) -> String {
        transpose_chord(token, steps, self.config.bass_spelling)
    }

    pub fn transpose_chart(&self, text: &str, steps: i32) -> String {
        transpose_chart(text, steps, &self.classifier, self.config.bass_spelling)
    }

    pub fn transpose_visual(&self, text: &str, steps: i32) -> String {
        transpose_visual_format(text, steps, &self.classifier, self.config.bass_spelling)
    }

    pub fn transpose_for_display(&self, text: &str, steps: i32) -> String {
        transpose_for_display(text, steps, &self.classifier, self.config.bass_spelling)
    }

    pub fn to_above_line(&self, text: &str) -> String {
        inline_to_above_line(text, &self.classifier, self.config.compact)
    }

    pub fn to_inline(&self, text: &str) -> String {
        above_line_to_inline(text, &self.classifier, self.config.bracket_standalone_chords)
    }

    pub fn ensure_metadata(&self, text: &str) -> String {
        ensure_metadata(text, &self.classifier, &self.config)
    }

    pub fn normalize_metadata_spacing(&self, text: &str) -> String {
        normalize_metadata_spacing(text, &self.classifier)
    }

    pub fn auto_insert_arrangement_line(&self, text: &str) -> String {
        auto_insert_arrangement_line(text, &self.classifier, &self.config)
    }

    pub fn promote_section_headers(&self, text: &str) -> String {
        promote_section_headers(text, &self.classifier)
    }

    pub fn normalize(&self, text: &str, promote_sections: bool) -> NormalizeReport {
        normalize(text, &self.classifier, &self.config, promote_sections)
    }

    pub fn nashville(&self, text: &str, key: Option<&str>, mode: NashvilleMode) -> String {
        nashville_chart(text, key, mode, &self.classifier)
    }

    pub fn direction(&self, text: &str) -> TextDirection {
        detect_direction(text)
    }

    pub fn render_html(&self, text: &str, options: &RenderOptions) -> String {
        render_html(text, &self.classifier, options)
    }
}
