//! # Nashville Number Mapper
//!
//! Maps chords to scale degrees of the song's key (`F` in C major → `4`).
//!
//! ## Lookup
//! The key is first normalized to one canonical spelling per pitch class (`A#
//! major` is read as `Bb Major`, `Db minor` as `C# Minor`). Each canonical key
//! owns a table from note name to degree label, filled with the key's own
//! spelling. A chord root missing from the table is retried with its enharmonic
//! names (`A#` in the key of F is found as `Bb`). Chord quality is ignored.
//!
//! ## Labels
//! ```text
//! semitones  0  1   2  3   4  5  6   7  8   9  10  11
//! major      1  b2  2  b3  3  4  #4  5  b6  6  b7  7
//! minor      1  b2  2  3   #3 4  #4  5  6   #6 7   #7
//! ```
//! Minor labels count from the natural minor scale, so `3` in A minor is `C`.

use std::collections::HashMap;

use serde::Serialize;

use crate::chord::ChordSymbol;
use crate::direction::{detect_direction, TextDirection};
use crate::document::SongDocument;
use crate::error::Notice;
use crate::grammar::{chord_tokens, replace_bracketed, LineClassifier, LineKind};
use crate::pitch::{parse_root, Accidental, KeySignature, Mode, PitchClass, Spelling};

const MAJOR_KEYS: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];
const MINOR_KEYS: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "G#", "A", "Bb", "B",
];

const MAJOR_DEGREES: [&str; 12] = [
    "1", "b2", "2", "b3", "3", "4", "#4", "5", "b6", "6", "b7", "7",
];
const MINOR_DEGREES: [&str; 12] = [
    "1", "b2", "2", "3", "#3", "4", "#4", "5", "6", "#6", "7", "#7",
];

/// What a chord position shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NashvilleMode {
    /// Degree labels only.
    Numbers,
    /// The chord as written.
    #[default]
    Chords,
    /// Both, ordered by reading direction.
    Combined,
}

impl NashvilleMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbers" | "number" | "nashville" => Some(NashvilleMode::Numbers),
            "chords" | "chord" => Some(NashvilleMode::Chords),
            "combined" | "both" => Some(NashvilleMode::Combined),
            _ => None,
        }
    }
}

/// The degree table of one canonical key.
#[derive(Debug, Clone)]
pub struct NashvilleKey {
    name: String,
    degrees: HashMap<&'static str, &'static str>,
}

impl NashvilleKey {
    /// Build the table for a key name such as `G`, `Bb Major` or `F#m`.
    pub fn new(key: &str) -> Result<Self, Notice> {
        let signature =
            KeySignature::from_str(key).ok_or_else(|| Notice::UnsupportedKey(key.to_string()))?;
        let tonic = signature.root;
        let (root_name, labels, mode) = match signature.mode {
            Mode::Major => (MAJOR_KEYS[tonic.value() as usize], &MAJOR_DEGREES, "Major"),
            Mode::Minor => (MINOR_KEYS[tonic.value() as usize], &MINOR_DEGREES, "Minor"),
        };
        let spelling = key_spelling(root_name, signature.mode);
        let degrees = labels
            .iter()
            .enumerate()
            .map(|(offset, label)| (tonic.transpose(offset as i32).name(spelling), *label))
            .collect();
        Ok(Self {
            name: format!("{} {}", root_name, mode),
            degrees,
        })
    }

    /// Canonical key name, e.g. `Eb Major`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Degree label of a note, trying its written name first, then its enharmonics.
    fn degree(&self, written: &str, pitch: PitchClass) -> Option<&'static str> {
        [
            written,
            pitch.name(Spelling::Sharps),
            pitch.name(Spelling::Flats),
        ]
        .iter()
        .find_map(|name| self.degrees.get(*name).copied())
    }

    /// Nashville number of a chord token. Slash chords give `<root>/<bass>`.
    pub fn number(&self, chord: &str) -> Result<String, Notice> {
        let no_mapping = || Notice::NoNashvilleMapping {
            chord: chord.to_string(),
            key: self.name.clone(),
        };
        let symbol = ChordSymbol::parse(chord).ok_or_else(no_mapping)?;
        let root = self
            .degree(&written_name(chord).ok_or_else(no_mapping)?, symbol.root)
            .ok_or_else(no_mapping)?;

        let bass = symbol.bass.as_ref().and_then(|bass| {
            let text = chord.rsplit_once('/')?.1;
            self.degree(&written_name(text)?, bass.root)
        });
        Ok(match bass {
            Some(bass) => format!("{}/{}", root, bass),
            None => root.to_string(),
        })
    }

    /// Text shown for `chord` in `mode`. A chord without a number shows as written.
    pub fn label(&self, chord: &str, mode: NashvilleMode, direction: TextDirection) -> String {
        if mode == NashvilleMode::Chords {
            return chord.to_string();
        }
        match self.number(chord) {
            Ok(number) => match (mode, direction) {
                (NashvilleMode::Numbers, _) => number,
                (_, TextDirection::Ltr) => format!("{} | {}", chord, number),
                (_, TextDirection::Rtl) => format!("{} | {}", number, chord),
            },
            Err(notice) => {
                notice.logged();
                chord.to_string()
            }
        }
    }
}

/// Which spelling table a canonical key writes its notes with.
fn key_spelling(root: &str, mode: Mode) -> Spelling {
    let flat = match mode {
        Mode::Major => root.ends_with('b') || root == "F",
        Mode::Minor => root.ends_with('b') || matches!(root, "D" | "G" | "C" | "F"),
    };
    if flat {
        Spelling::Flats
    } else {
        Spelling::Sharps
    }
}

/// The root of `token` as written, with `♯`/`♭` folded to `#`/`b`.
fn written_name(token: &str) -> Option<String> {
    let root = parse_root(token)?;
    let accidental = match root.accidental {
        Accidental::Natural => "",
        Accidental::Sharp => "#",
        Accidental::Flat => "b",
    };
    Some(format!("{}{}", root.letter, accidental))
}

/// Nashville number of one chord in one key.
///
/// # Example
/// ```
/// use chordchart::nashville_number;
///
/// assert_eq!(nashville_number("F", "C Major").unwrap(), "4");
/// assert_eq!(nashville_number("Em", "C Major").unwrap(), "3");
/// assert_eq!(nashville_number("D/F#", "G").unwrap(), "5/7");
/// assert!(nashville_number("N.C.", "C").is_err());
/// ```
pub fn nashville_number(chord: &str, key: &str) -> Result<String, Notice> {
    NashvilleKey::new(key)
        .map_err(|_| Notice::NoNashvilleMapping {
            chord: chord.to_string(),
            key: key.to_string(),
        })?
        .number(chord)
}

/// Replace every chord of a chart with its label in `mode`.
///
/// The key comes from `key`, else from the chart's header. Without a usable key
/// the chart comes back unchanged. Above-line chords are rewritten in place.
pub fn nashville_chart(
    text: &str,
    key: Option<&str>,
    mode: NashvilleMode,
    classifier: &LineClassifier,
) -> String {
    let doc = SongDocument::parse(text, classifier);
    let Some(key_name) = key.map(str::to_string).or_else(|| doc.header.key.clone()) else {
        log::debug!("no key for Nashville numbers");
        return text.to_string();
    };
    let key = match NashvilleKey::new(&key_name) {
        Ok(key) => key,
        Err(notice) => {
            notice.logged();
            return text.to_string();
        }
    };
    let direction = detect_direction(text);

    doc.lines
        .iter()
        .map(|line| match line.kind {
            LineKind::Chord => {
                let mut out = String::with_capacity(line.text.len());
                let mut last = 0;
                for token in chord_tokens(&line.text) {
                    out.push_str(&line.text[last..token.start]);
                    out.push_str(&key.label(&token.text, mode, direction));
                    last = token.end;
                }
                out.push_str(&line.text[last..]);
                out
            }
            LineKind::Lyric => {
                replace_bracketed(&line.text, |chord| key.label(chord, mode, direction))
            }
            _ => line.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(chord: &str, key: &str) -> String {
        nashville_number(chord, key).unwrap()
    }

    #[test]
    fn test_c_major() {
        assert_eq!(number("F", "C Major"), "4");
        assert_eq!(number("Em", "C Major"), "3");
        assert_eq!(number("G", "C Major"), "5");
        assert_eq!(number("Bb", "C Major"), "b7");
        assert_eq!(number("Cmaj7", "C"), "1");
    }

    #[test]
    fn test_minor_key() {
        assert_eq!(number("C", "A minor"), "3");
        assert_eq!(number("E7", "Am"), "5");
        assert_eq!(number("G#dim", "Am"), "#7");
    }

    #[test]
    fn test_enharmonic_key_is_canonical() {
        let key = NashvilleKey::new("A# major").unwrap();
        assert_eq!(key.name(), "Bb Major");
        assert_eq!(NashvilleKey::new("Db minor").unwrap().name(), "C# Minor");
        assert_eq!(number("Eb", "A# major"), "4");
    }

    #[test]
    fn test_enharmonic_chord_retry() {
        assert_eq!(number("A#", "F"), "4");
        assert_eq!(number("Gb", "D"), "3");
        assert_eq!(number("Cb", "G"), "3");
        assert_eq!(number("B♭", "F"), "4");
    }

    #[test]
    fn test_slash_chords() {
        assert_eq!(number("D/F#", "G"), "5/7");
        assert_eq!(number("C6/9", "C"), "1");
    }

    #[test]
    fn test_no_mapping() {
        assert_eq!(
            nashville_number("N.C.", "C Major"),
            Err(Notice::NoNashvilleMapping {
                chord: "N.C.".to_string(),
                key: "C Major".to_string()
            })
        );
        assert!(nashville_number("G", "Hm").is_err());
        assert!(matches!(NashvilleKey::new("Hm"), Err(Notice::UnsupportedKey(_))));
    }

    #[test]
    fn test_labels() {
        let key = NashvilleKey::new("C").unwrap();
        assert_eq!(key.label("F", NashvilleMode::Numbers, TextDirection::Ltr), "4");
        assert_eq!(key.label("F", NashvilleMode::Chords, TextDirection::Ltr), "F");
        assert_eq!(key.label("F", NashvilleMode::Combined, TextDirection::Ltr), "F | 4");
        assert_eq!(key.label("F", NashvilleMode::Combined, TextDirection::Rtl), "4 | F");
        assert_eq!(key.label("N.C.", NashvilleMode::Numbers, TextDirection::Ltr), "N.C.");
    }

    #[test]
    fn test_chart() {
        let classifier = LineClassifier::default();
        assert_eq!(
            nashville_chart("Key: G\nG    C    D\nla", None, NashvilleMode::Numbers, &classifier),
            "Key: G\n1    4    5\nla"
        );
        assert_eq!(
            nashville_chart("[C]la [F]la [Bridge]", Some("C"), NashvilleMode::Combined, &classifier),
            "[C | 1]la [F | 4]la [Bridge]"
        );
        assert_eq!(
            nashville_chart("[C]la", None, NashvilleMode::Numbers, &classifier),
            "[C]la"
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(NashvilleMode::from_str("Numbers"), Some(NashvilleMode::Numbers));
        assert_eq!(NashvilleMode::from_str("both"), Some(NashvilleMode::Combined));
        assert_eq!(NashvilleMode::from_str("roman"), None);
    }
}
