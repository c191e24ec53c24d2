//! Reading direction of a chart region.
//!
//! One right-to-left character anywhere makes the whole region right-to-left.
//! Direction is decided per region, never per line, so a Hebrew chart keeps a
//! consistent layout even on its chord-only lines.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for an HTML `dir` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the reading direction of `text`.
///
/// # Example
/// ```
/// use chordchart::{detect_direction, TextDirection};
///
/// assert_eq!(detect_direction("שיר ABC"), TextDirection::Rtl);
/// assert_eq!(detect_direction("Amazing Grace"), TextDirection::Ltr);
/// ```
pub fn detect_direction(text: &str) -> TextDirection {
    if text.chars().any(is_rtl) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

fn is_rtl(c: char) -> bool {
    matches!(c,
        // Hebrew, Arabic, Syriac, Arabic Supplement, Thaana, NKo, Samaritan,
        // Mandaic, Arabic Extended-A
        '\u{0590}'..='\u{08FF}'
        // Hebrew presentation forms, Arabic presentation forms A
        | '\u{FB1D}'..='\u{FDFF}'
        // Arabic presentation forms B
        | '\u{FE70}'..='\u{FEFC}'
    )
}
