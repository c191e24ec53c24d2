//! # Pitch-Class Model
//!
//! Semitone arithmetic over the twelve chromatic pitch classes, sharp/flat spelling
//! and key-name transposition.
//!
//! ## Spelling Rule
//! A transposed root keeps the accidental family it was written with: a flat root
//! comes out flat, a sharp or natural root comes out sharp. The caller may force
//! flat spelling instead; slash-chord bass notes use this (see
//! [`crate::BassSpelling`]). The rule is mechanical and does not consult the key,
//! so it can produce spellings a theorist would not choose (e.g. `A#` in F major).
//!
//! ```text
//! 0=C  1=C#/Db  2=D  3=D#/Eb  4=E  5=F  6=F#/Gb  7=G  8=G#/Ab  9=A  10=A#/Bb  11=B
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::Notice;

pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the twelve chromatic steps, always in `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(semitone: i32) -> Self {
        Self(semitone.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn transpose(self, steps: i32) -> Self {
        Self::new(self.0 as i32 + steps.rem_euclid(12))
    }

    /// Semitones to climb from `self` to `other`, in `0..=11`.
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }

    pub fn name(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharps => SHARP_NAMES[self.0 as usize],
            Spelling::Flats => FLAT_NAMES[self.0 as usize],
        }
    }
}

/// Accidental family a root was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Spelling table used when a root of this family is transposed.
    pub fn spelling(self) -> Spelling {
        match self {
            Accidental::Flat => Spelling::Flats,
            Accidental::Sharp | Accidental::Natural => Spelling::Sharps,
        }
    }

    fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    Sharps,
    Flats,
}

/// A root note parsed from the head of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root {
    pub letter: char,
    pub accidental: Accidental,
    pub pitch: PitchClass,
    /// Bytes of the token the root occupies.
    pub len: usize,
}

fn letter_semitone(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Parse a root (`A`-`G` plus an optional `#`, `b`, `♯` or `♭`) at the start of `token`.
pub fn parse_root(token: &str) -> Option<Root> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    let base = letter_semitone(letter)?;
    let (accidental, accidental_len) = match chars.next() {
        Some(c @ ('#' | '♯')) => (Accidental::Sharp, c.len_utf8()),
        Some(c @ ('b' | '♭')) => (Accidental::Flat, c.len_utf8()),
        _ => (Accidental::Natural, 0),
    };
    Some(Root {
        letter,
        accidental,
        pitch: PitchClass::new(base + accidental.offset()),
        len: letter.len_utf8() + accidental_len,
    })
}

/// Spell `pitch` with the table chosen by `family`, or flats when `force_flat` is set.
pub fn spell(pitch: PitchClass, family: Accidental, force_flat: bool) -> &'static str {
    if force_flat {
        pitch.name(Spelling::Flats)
    } else {
        pitch.name(family.spelling())
    }
}

/// Transpose the root at the head of `token`, keeping whatever follows it.
///
/// Tokens that do not start with a root, and any token moved by a whole number
/// of octaves, come back unchanged.
pub fn transpose_note(token: &str, steps: i32, force_flat: bool) -> String {
    if steps.rem_euclid(12) == 0 {
        return token.to_string();
    }
    match parse_root(token) {
        Some(root) => {
            let name = spell(root.pitch.transpose(steps), root.accidental, force_flat);
            format!("{}{}", name, &token[root.len..])
        }
        None => {
            Notice::UnrecognizedRoot(token.to_string()).logged();
            token.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// A key such as `G Major`, `Bb minor` or `F#m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySignature {
    pub root: PitchClass,
    pub mode: Mode,
    pub spelling: Spelling,
}

impl KeySignature {
    /// Parse a key name: a root, then an optional mode (`Major`, `minor`, `m`, `min`, ...).
    pub fn from_str(s: &str) -> Option<Self> {
        let (root, mode_text) = split_key(s)?;
        let raw = mode_text.trim();
        let lower = raw.to_ascii_lowercase();
        let mode = if raw.is_empty() || raw == "M" || lower.starts_with("maj") {
            Mode::Major
        } else if raw == "m" || raw == "-" || lower.starts_with("min") {
            Mode::Minor
        } else {
            return None;
        };
        Some(Self {
            root: root.pitch,
            mode,
            spelling: root.accidental.spelling(),
        })
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
        };
        write!(f, "{} {}", self.root.name(self.spelling), mode)
    }
}

/// Split `"<Root><sep><Mode>"` into the parsed root and the verbatim remainder.
fn split_key(key: &str) -> Option<(Root, &str)> {
    let trimmed = key.trim_start();
    let root = parse_root(trimmed)?;
    let rest = &trimmed[root.len..];
    let well_formed = rest.is_empty()
        || rest.starts_with(char::is_whitespace)
        || matches!(rest.trim_end(), "m" | "min" | "maj" | "M" | "-");
    well_formed.then_some((root, rest))
}

/// Transpose a key name, carrying the mode text through verbatim.
///
/// # Example
/// ```
/// use chordchart::try_transpose_key;
///
/// assert_eq!(try_transpose_key("G Major", 2).unwrap(), "A Major");
/// assert_eq!(try_transpose_key("Bb minor", 1).unwrap(), "B minor");
/// assert!(try_transpose_key("Major", 1).is_err());
/// ```
pub fn try_transpose_key(key: &str, steps: i32) -> Result<String, Notice> {
    let leading = &key[..key.len() - key.trim_start().len()];
    let (root, rest) = split_key(key).ok_or_else(|| Notice::UnsupportedKey(key.to_string()))?;
    if steps.rem_euclid(12) == 0 {
        return Ok(key.to_string());
    }
    let name = spell(root.pitch.transpose(steps), root.accidental, false);
    Ok(format!("{}{}{}", leading, name, rest))
}

/// Transpose a key name; malformed key names come back unchanged.
pub fn transpose_key(key: &str, steps: i32) -> String {
    try_transpose_key(key, steps).unwrap_or_else(|notice| {
        notice.logged();
        key.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(PitchClass::new(14).value(), 2);
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(0).transpose(-13).value(), 11);
        assert_eq!(PitchClass::new(9).transpose(12), PitchClass::new(9));
    }

    #[test]
    fn test_pitch_class_extreme_shifts() {
        let d = PitchClass::new(2);
        assert_eq!(d.transpose(i32::MAX).value(), 9);
        assert_eq!(d.transpose(i32::MIN).value(), 6);
        assert_eq!(transpose_key("D", i32::MAX), "A");
    }

    #[test]
    fn test_interval_to() {
        let c = PitchClass::new(0);
        let a = PitchClass::new(9);
        assert_eq!(c.interval_to(a), 9);
        assert_eq!(a.interval_to(c), 3);
    }

    #[test]
    fn test_parse_root() {
        let root = parse_root("Bbm7").unwrap();
        assert_eq!(root.pitch.value(), 10);
        assert_eq!(root.accidental, Accidental::Flat);
        assert_eq!(root.len, 2);

        let root = parse_root("F♯").unwrap();
        assert_eq!(root.pitch.value(), 6);
        assert_eq!(root.len, 1 + '♯'.len_utf8());

        assert_eq!(parse_root("Cb").unwrap().pitch.value(), 11);
        assert!(parse_root("H7").is_none());
        assert!(parse_root("").is_none());
    }

    #[test]
    fn test_transpose_note_keeps_family() {
        assert_eq!(transpose_note("Bb", 2, false), "C");
        assert_eq!(transpose_note("Bb", 1, false), "B");
        assert_eq!(transpose_note("Eb", 1, false), "E");
        assert_eq!(transpose_note("Db", 1, false), "D");
        assert_eq!(transpose_note("Ab", 2, false), "Bb");
        assert_eq!(transpose_note("F#", 2, false), "G#");
        assert_eq!(transpose_note("E", 2, false), "F#");
        assert_eq!(transpose_note("G", -1, false), "F#");
    }

    #[test]
    fn test_transpose_note_force_flat() {
        assert_eq!(transpose_note("F#", 2, true), "Ab");
        assert_eq!(transpose_note("E", 2, true), "Gb");
        assert_eq!(transpose_note("B", 2, true), "Db");
    }

    #[test]
    fn test_unrecognized_root_passes_through() {
        assert_eq!(transpose_note("N.C.", 3, false), "N.C.");
        assert_eq!(transpose_note("x", 3, true), "x");
    }

    #[test]
    fn test_transpose_note_octave_keeps_spelling() {
        for note in ["Cb", "Fb", "E#", "B#", "Bb", "F#"] {
            assert_eq!(transpose_note(note, 0, false), note);
            assert_eq!(transpose_note(note, 12, true), note);
            assert_eq!(transpose_note(note, -24, false), note);
        }
    }

    #[test]
    fn test_transpose_key() {
        assert_eq!(transpose_key("G Major", 2), "A Major");
        assert_eq!(transpose_key("E minor", 1), "F minor");
        assert_eq!(transpose_key("Eb Major", -1), "D Major");
        assert_eq!(transpose_key("F#m", 1), "Gm");
        assert_eq!(transpose_key("C", 5), "F");
        assert_eq!(transpose_key(" D  Dorian", 2), " E  Dorian");
        assert_eq!(transpose_key("Cb Major", 12), "Cb Major");
    }

    #[test]
    fn test_transpose_key_malformed() {
        assert_eq!(transpose_key("Hello", 2), "Hello");
        assert_eq!(transpose_key("", 2), "");
        assert_eq!(transpose_key("Gx Major", 2), "Gx Major");
        assert_eq!(
            try_transpose_key("Major", 1),
            Err(Notice::UnsupportedKey("Major".to_string()))
        );
    }

    #[test]
    fn test_key_signature_from_str() {
        let key = KeySignature::from_str("C Major").unwrap();
        assert_eq!(key.root.value(), 0);
        assert_eq!(key.mode, Mode::Major);

        let key = KeySignature::from_str("Bbm").unwrap();
        assert_eq!(key.root.value(), 10);
        assert_eq!(key.mode, Mode::Minor);
        assert_eq!(key.spelling, Spelling::Flats);

        let key = KeySignature::from_str("F# minor").unwrap();
        assert_eq!(key.to_string(), "F# Minor");

        assert!(KeySignature::from_str("D Dorian").is_none());
        assert!(KeySignature::from_str("X").is_none());
    }
}
