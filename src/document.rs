//! # Song Document
//!
//! A chart split into classified lines, plus the header fields found in it.
//!
//! ## Structure
//! ```text
//! SongDocument
//!   ├── Header (title, author, key, tempo, time, capo)
//!   └── Vec<Line>
//!         ├── text: String   (verbatim, without the newline)
//!         └── kind: LineKind (directive-metadata | legacy-metadata | section-header
//!                             | arrangement | chord | lyric | blank)
//! ```
//!
//! Lines are split on `\n` only, so `to_text()` reproduces the input byte for byte,
//! including a trailing newline and any `\r`.
//!
//! [`SongDocument::records`] turns the lines into a typed record stream shared by
//! the transposer, the converter and the normalizer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::grammar::{
    chord_tokens, parse_directive, section_name, segments, ChordToken, Directive, LineClassifier,
    LineKind, Segment,
};

static LABEL_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(title|key|artist|author|bpm|tempo|time signature|time|capo)\s*:\s*(.*?)\s*$",
    )
    .unwrap()
});

static BPM_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{2,3})\s*bpm\b").unwrap());

/// Header fields of a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: Option<String>,
    pub author: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<String>,
    pub time: Option<String>,
    pub capo: Option<String>,
}

impl Header {
    fn set(&mut self, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match label.to_ascii_lowercase().as_str() {
            "title" | "t" => &mut self.title,
            "artist" | "author" | "composer" => &mut self.author,
            "key" => &mut self.key,
            "bpm" | "tempo" => &mut self.tempo,
            "time" | "time signature" => &mut self.time,
            "capo" => &mut self.capo,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    /// Pull header fields out of one metadata line.
    fn absorb(&mut self, line: &str, kind: LineKind) {
        match kind {
            LineKind::DirectiveMetadata => {
                if let Some(Directive {
                    name,
                    value: Some(value),
                }) = parse_directive(line)
                {
                    self.set(&name, &value);
                }
            }
            LineKind::LegacyMetadata => {
                for (i, field) in line.split('|').enumerate() {
                    if let Some(caps) = LABEL_VALUE_RE.captures(field) {
                        self.set(&caps[1], &caps[2]);
                    } else if let Some(caps) = BPM_SUFFIX_RE.captures(field) {
                        self.set("bpm", &caps[1]);
                    } else if i == 0 && line.contains('|') {
                        self.set("title", field);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Header::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
}

/// One entry of the typed record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "record", rename_all = "kebab-case")]
pub enum Record<'a> {
    Directive { text: &'a str, directive: Option<Directive> },
    SectionHeader { text: &'a str, name: String },
    Arrangement { text: &'a str },
    ChordLine { text: &'a str, chords: Vec<ChordToken> },
    LyricLine { text: &'a str, segments: Vec<Segment> },
    Blank { text: &'a str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongDocument {
    pub lines: Vec<Line>,
    pub header: Header,
}

impl SongDocument {
    pub fn parse(text: &str, classifier: &LineClassifier) -> Self {
        let mut header = Header::default();
        let lines = text
            .split('\n')
            .enumerate()
            .map(|(index, line)| {
                let kind = classifier.classify(line, index);
                header.absorb(line, kind);
                Line {
                    text: line.to_string(),
                    kind,
                }
            })
            .collect();
        Self { lines, header }
    }

    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Does the chart annotate chords inline as `[G]`?
    pub fn is_inline(&self) -> bool {
        self.lines
            .iter()
            .any(|line| crate::grammar::has_bracketed_chord(&line.text))
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.lines.iter().map(|line| {
            let text = line.text.as_str();
            match line.kind {
                LineKind::DirectiveMetadata | LineKind::LegacyMetadata => Record::Directive {
                    text,
                    directive: parse_directive(text),
                },
                LineKind::SectionHeader => Record::SectionHeader {
                    text,
                    name: section_name(text).unwrap_or_else(|| text.trim().to_string()),
                },
                LineKind::Arrangement => Record::Arrangement { text },
                LineKind::Chord => Record::ChordLine {
                    text,
                    chords: chord_tokens(text),
                },
                LineKind::Lyric => Record::LyricLine {
                    text,
                    segments: segments(text),
                },
                LineKind::Blank => Record::Blank { text },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SongDocument {
        SongDocument::parse(text, &LineClassifier::default())
    }

    #[test]
    fn test_to_text_is_verbatim() {
        let text = "{title: Song}\r\n[G]Hello\n\n";
        assert_eq!(parse(text).to_text(), text);
    }

    #[test]
    fn test_directive_header() {
        let doc = parse("{title: Amazing Grace}\n{artist: John Newton}\n{key: G}\n{tempo: 72}\n{time: 3/4}\n[G]A-[D]maz");
        assert_eq!(doc.header.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(doc.header.author.as_deref(), Some("John Newton"));
        assert_eq!(doc.header.key.as_deref(), Some("G"));
        assert_eq!(doc.header.tempo.as_deref(), Some("72"));
        assert_eq!(doc.header.time.as_deref(), Some("3/4"));
        assert!(doc.is_inline());
    }

    #[test]
    fn test_legacy_header() {
        let doc = parse("Title: Be Thou My Vision\nKey: Eb\nCapo: 1\n\nEb    Bb\nBe thou my");
        assert_eq!(doc.header.title.as_deref(), Some("Be Thou My Vision"));
        assert_eq!(doc.header.key.as_deref(), Some("Eb"));
        assert_eq!(doc.header.capo.as_deref(), Some("1"));
        assert!(!doc.is_inline());
    }

    #[test]
    fn test_combined_header_line() {
        let doc = parse("Amazing Grace | Key: G | 72 BPM | Time: 3/4");
        assert_eq!(doc.header.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(doc.header.key.as_deref(), Some("G"));
        assert_eq!(doc.header.tempo.as_deref(), Some("72"));
        assert_eq!(doc.header.time.as_deref(), Some("3/4"));
    }

    #[test]
    fn test_first_value_wins() {
        let doc = parse("Key: G\nKey: A");
        assert_eq!(doc.header.key.as_deref(), Some("G"));
    }

    #[test]
    fn test_records() {
        let doc = parse("Key: G\n\nVerse 1:\nG    D\nAmazing grace\n(I) (V1) (C)");
        let kinds: Vec<&str> = doc
            .records()
            .map(|r| match r {
                Record::Directive { .. } => "directive",
                Record::SectionHeader { .. } => "section",
                Record::Arrangement { .. } => "arrangement",
                Record::ChordLine { .. } => "chords",
                Record::LyricLine { .. } => "lyric",
                Record::Blank { .. } => "blank",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["directive", "blank", "section", "chords", "lyric", "arrangement"]
        );
        let section = doc.records().nth(2).unwrap();
        assert_eq!(
            section,
            Record::SectionHeader {
                text: "Verse 1:",
                name: "Verse 1".to_string()
            }
        );
    }
}
