//! Chord symbols: a root, a free-form suffix and an optional bass note.
//!
//! The suffix (`m7`, `sus4`, `add9`, `6/9`, ...) is opaque. It is carried through
//! transposition byte for byte and never interpreted.

use std::fmt;

use serde::Serialize;

use crate::config::BassSpelling;
use crate::pitch::{parse_root, spell, Accidental, PitchClass};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordSymbol {
    pub root: PitchClass,
    /// Letter of the root as written, so `Cb` and `B` stay distinct.
    pub letter: char,
    pub accidental: Accidental,
    pub suffix: String,
    pub bass: Option<Box<ChordSymbol>>,
}

impl ChordSymbol {
    /// Parse a chord symbol such as `F#m7`, `D/F#` or `C6/9/E`.
    ///
    /// The bass is whatever follows the last `/` when it is a bare note name;
    /// otherwise that text stays part of the suffix.
    pub fn parse(token: &str) -> Option<Self> {
        let root = parse_root(token)?;
        let rest = &token[root.len..];
        let (suffix, bass) = match rest.rfind('/') {
            Some(idx) => match Self::parse_note(&rest[idx + 1..]) {
                Some(bass) => (&rest[..idx], Some(Box::new(bass))),
                None => (rest, None),
            },
            None => (rest, None),
        };
        Some(Self {
            root: root.pitch,
            letter: root.letter,
            accidental: root.accidental,
            suffix: suffix.to_string(),
            bass,
        })
    }

    fn parse_note(text: &str) -> Option<Self> {
        let root = parse_root(text)?;
        (root.len == text.len()).then(|| Self::note(root.pitch, root.letter, root.accidental))
    }

    fn note(root: PitchClass, letter: char, accidental: Accidental) -> Self {
        Self {
            root,
            letter,
            accidental,
            suffix: String::new(),
            bass: None,
        }
    }

    /// The root as written, with `♯`/`♭` folded to `#`/`b`.
    pub fn root_name(&self) -> String {
        let accidental = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        format!("{}{}", self.letter, accidental)
    }

    /// Move root and bass by `steps` semitones.
    ///
    /// The root keeps its accidental family. The bass is spelled per `bass_spelling`.
    /// Whole octaves leave the chord exactly as written.
    pub fn transpose(&self, steps: i32, bass_spelling: BassSpelling) -> Self {
        if steps.rem_euclid(12) == 0 {
            return self.clone();
        }
        let root = self.root.transpose(steps);
        let root_name = spell(root, self.accidental, false);
        let root_family = family_of(root_name);
        let bass = self.bass.as_ref().map(|bass| {
            let pitch = bass.root.transpose(steps);
            let name = match bass_spelling {
                BassSpelling::ForceFlat => {
                    let flat = spell(pitch, bass.accidental, true);
                    let conventional = spell(pitch, root_family, false);
                    if flat != conventional {
                        log::debug!(
                            "bass of {}{} spelled {} where the root suggests {}",
                            root_name,
                            self.suffix,
                            flat,
                            conventional
                        );
                    }
                    flat
                }
                BassSpelling::FollowRoot => spell(pitch, bass.accidental, false),
            };
            Box::new(Self::note(pitch, letter_of(name), family_of(name)))
        });
        Self {
            root,
            letter: letter_of(root_name),
            accidental: root_family,
            suffix: self.suffix.clone(),
            bass,
        }
    }
}

fn letter_of(name: &str) -> char {
    name.chars().next().unwrap_or('C')
}

fn family_of(name: &str) -> Accidental {
    if name.ends_with('b') {
        Accidental::Flat
    } else if name.ends_with('#') {
        Accidental::Sharp
    } else {
        Accidental::Natural
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root_name(), self.suffix)?;
        if let Some(bass) = &self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let chord = ChordSymbol::parse("F#m7").unwrap();
        assert_eq!(chord.root.value(), 6);
        assert_eq!(chord.accidental, Accidental::Sharp);
        assert_eq!(chord.suffix, "m7");
        assert!(chord.bass.is_none());
    }

    #[test]
    fn test_parse_slash_chord() {
        let chord = ChordSymbol::parse("D/F#").unwrap();
        assert_eq!(chord.suffix, "");
        let bass = chord.bass.unwrap();
        assert_eq!(bass.root.value(), 6);
        assert_eq!(bass.accidental, Accidental::Sharp);
    }

    #[test]
    fn test_six_nine_is_a_suffix() {
        let chord = ChordSymbol::parse("C6/9").unwrap();
        assert_eq!(chord.suffix, "6/9");
        assert!(chord.bass.is_none());
        assert_eq!(chord.to_string(), "C6/9");
    }

    #[test]
    fn test_parse_rejects_non_chords() {
        assert!(ChordSymbol::parse("N.C.").is_none());
        assert!(ChordSymbol::parse("").is_none());
    }

    #[test]
    fn test_display_round_trips() {
        for token in ["Am", "Bbmaj7", "Dsus4", "G/B", "Ebm7/Db", "C#dim"] {
            assert_eq!(ChordSymbol::parse(token).unwrap().to_string(), token);
        }
    }

    #[test]
    fn test_transpose_carries_suffix() {
        let chord = ChordSymbol::parse("Bbmaj7#11").unwrap();
        assert_eq!(chord.transpose(2, BassSpelling::ForceFlat).to_string(), "Cmaj7#11");
    }

    #[test]
    fn test_six_nine_over_bass() {
        let chord = ChordSymbol::parse("C6/9/E").unwrap();
        assert_eq!(chord.suffix, "6/9");
        assert_eq!(chord.bass.as_ref().unwrap().root.value(), 4);
        assert_eq!(chord.transpose(2, BassSpelling::ForceFlat).to_string(), "D6/9/Gb");
        assert_eq!(chord.transpose(2, BassSpelling::FollowRoot).to_string(), "D6/9/F#");
    }

    #[test]
    fn test_octave_keeps_written_spelling() {
        for token in ["Cb", "Fbmaj7", "E#", "B#m7", "Gb/Cb", "F#/E#"] {
            let chord = ChordSymbol::parse(token).unwrap();
            assert_eq!(chord.to_string(), token);
            assert_eq!(chord.transpose(0, BassSpelling::ForceFlat).to_string(), token);
            assert_eq!(chord.transpose(12, BassSpelling::ForceFlat).to_string(), token);
            assert_eq!(chord.transpose(-12, BassSpelling::FollowRoot).to_string(), token);
        }
    }

    #[test]
    fn test_transpose_bass_spelling() {
        let chord = ChordSymbol::parse("D/F#").unwrap();
        assert_eq!(chord.transpose(2, BassSpelling::ForceFlat).to_string(), "E/Ab");
        assert_eq!(chord.transpose(2, BassSpelling::FollowRoot).to_string(), "E/G#");
    }
}
