//! Transposition history of the chart on display.
//!
//! The displayed chart is always derived from the untouched baseline and the
//! total shift, never from the previously displayed text, so repeated relative
//! steps cannot drift: three `+1` steps render exactly like one `+3`.
//!
//! ```rust
//! use chordchart::{ChartEngine, TranspositionState};
//!
//! let engine = ChartEngine::default();
//! let state = TranspositionState::new("[G]Amazing [D/F#]grace", Some("G Major".to_string()));
//!
//! let stepped = state.clone().transpose_by(1).transpose_by(1).transpose_by(1);
//! let jumped = state.transpose_by(3);
//! assert_eq!(stepped.render(&engine), jumped.render(&engine));
//! assert_eq!(stepped.current_key().as_deref(), Some("A# Major"));
//!
//! let reset = stepped.reset();
//! assert_eq!(reset.render(&engine), "[G]Amazing [D/F#]grace");
//! assert_eq!(reset.shift(), 0);
//! ```

use serde::Serialize;

use crate::engine::ChartEngine;
use crate::pitch::transpose_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspositionState {
    baseline: String,
    shift: i32,
    original_key: Option<String>,
}

impl TranspositionState {
    pub fn new(baseline: impl Into<String>, original_key: Option<String>) -> Self {
        Self {
            baseline: baseline.into(),
            shift: 0,
            original_key,
        }
    }

    /// Start from a freshly analyzed chart, taking the key from its header.
    pub fn analyze(baseline: impl Into<String>, engine: &ChartEngine) -> Self {
        let baseline = baseline.into();
        let key = engine.parse(&baseline).header.key;
        Self::new(baseline, key)
    }

    /// Replace the baseline wholesale (re-analysis or a different song).
    pub fn load(self, baseline: impl Into<String>, original_key: Option<String>) -> Self {
        Self::new(baseline, original_key)
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Total shift in semitones since the baseline. Not reduced modulo 12.
    pub fn shift(&self) -> i32 {
        self.shift
    }

    pub fn original_key(&self) -> Option<&str> {
        self.original_key.as_deref()
    }

    pub fn transpose_by(self, delta: i32) -> Self {
        let shift = self.shift.saturating_add(delta);
        self.transpose_to(shift)
    }

    pub fn transpose_to(self, total: i32) -> Self {
        log::debug!("transposition shift {} -> {}", self.shift, total);
        Self {
            shift: total,
            ..self
        }
    }

    pub fn reset(self) -> Self {
        self.transpose_to(0)
    }

    /// The original key moved by the total shift.
    pub fn current_key(&self) -> Option<String> {
        self.original_key
            .as_deref()
            .map(|key| transpose_key(key, self.shift))
    }

    /// The chart to display: the baseline transposed by the total shift.
    pub fn render(&self, engine: &ChartEngine) -> String {
        engine.transpose_for_display(&self.baseline, self.shift)
    }
}
