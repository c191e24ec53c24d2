pub mod api;
pub mod chord;
pub mod config;
pub mod convert;
pub mod direction;
pub mod document;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod nashville;
pub mod normalize;
pub mod pitch;
pub mod render;
pub mod state;
pub mod transpose;

pub use api::*;
pub use chord::ChordSymbol;
pub use config::{BassSpelling, ChordLineThresholds, EngineConfig};
pub use convert::combined_header;
pub use direction::{detect_direction, TextDirection};
pub use document::{Header, Line, Record, SongDocument};
pub use engine::ChartEngine;
pub use error::{ChartError, Notice};
pub use grammar::{ChordLineScorer, ChordToken, LineClassifier, LineKind, Segment};
pub use nashville::{nashville_number, NashvilleKey, NashvilleMode};
pub use normalize::NormalizeReport;
pub use pitch::{KeySignature, Mode, PitchClass};
pub use render::RenderOptions;
pub use state::TranspositionState;
pub use transpose::{transpose_chord, transpose_key, try_transpose_chord, try_transpose_key};
