//! Engine configuration.
//!
//! All keys are optional; a missing key takes the default listed on the field.
//!
//! ```rust
//! use chordchart::{BassSpelling, EngineConfig};
//!
//! let config = EngineConfig::from_yaml(
//!     "chord-line:\n  max-length: 60\nbass-spelling: follow-root\n",
//! )
//! .unwrap();
//! assert_eq!(config.chord_line.max_length, 60);
//! assert_eq!(config.chord_line.min_matches, 2);
//! assert_eq!(config.bass_spelling, BassSpelling::FollowRoot);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// How the bass note of a slash chord is spelled after transposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BassSpelling {
    /// Always flat-spelled, regardless of how the chord root is spelled.
    #[default]
    ForceFlat,
    /// Same accidental-family rule as chord roots.
    FollowRoot,
}

/// Thresholds of the default chord-line scoring rule.
///
/// A line scores as a chord line when it has at least `min_matches` chord
/// tokens, is shorter than `max_length` characters and has fewer than
/// `max_lowercase` lowercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChordLineThresholds {
    pub min_matches: usize,
    pub max_length: usize,
    pub max_lowercase: usize,
}

impl Default for ChordLineThresholds {
    fn default() -> Self {
        Self {
            min_matches: 2,
            max_length: 50,
            max_lowercase: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub chord_line: ChordLineThresholds,
    /// How many leading lines are searched for metadata labels embedded in text.
    pub header_scan_lines: usize,
    pub bass_spelling: BassSpelling,
    /// Insert a blank line before each section header when converting to above-line.
    pub compact: bool,
    /// Bracket chord lines that have no lyric under them when converting to inline.
    pub bracket_standalone_chords: bool,
    pub default_tempo: u16,
    pub default_time: String,
    pub default_arrangement: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chord_line: ChordLineThresholds::default(),
            header_scan_lines: 5,
            bass_spelling: BassSpelling::ForceFlat,
            compact: true,
            bracket_standalone_chords: false,
            default_tempo: 120,
            default_time: "4/4".to_string(),
            default_arrangement: ["I", "V1", "PC", "C", "V2", "PC", "C", "B", "C", "O"]
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ChartError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ChartError::ConfigError(e.to_string()))
    }

    /// The arrangement line inserted when a chart has none, e.g. `(I) (V1) (C)`.
    pub fn arrangement_line(&self) -> String {
        self.default_arrangement
            .iter()
            .map(|code| format!("({})", code))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
