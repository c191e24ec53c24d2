//! # Chord Token Grammar
//!
//! Recognizes chord tokens and classifies chart lines.
//!
//! ## Chord Tokens
//! A chord token is a root letter `A`-`G`, an optional accidental, any run of
//! quality/extension pieces (`maj`, `min`, `m`, `dim`, `aug`, `sus`, `add`, digits,
//! altered extensions like `b9`) and an optional `/` plus bass note. A token only
//! counts when it is not glued to a letter or digit on either side, so `Am` in
//! `Amazing` is not a chord.
//!
//! ## Line Classification
//! Input comes from AI/OCR transcription, so classification is heuristic and always
//! yields a definite [`LineKind`]. Checks run in this order:
//!
//! 1. blank
//! 2. directive (`{title: ...}`, `{comment: Verse 1}`, `{soc}`)
//! 3. legacy label at line start (`Key: G`, `BPM: 72`)
//! 4. arrangement (`(I) (V1) (C) (V2)`, or `I V1 C V2` without parentheses)
//! 5. section header (`Verse 1:`, `Chorus`, `PC2:`)
//! 6. label anywhere in one of the first few lines (`Amazing Grace | Key: G`)
//! 7. chord line: only tokens and separators, or scored by a [`ChordLineScorer`]
//! 8. lyric

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{ChordLineThresholds, EngineConfig};

const ACCIDENTAL: &str = "(?:#|b|♯|♭)";

static CHORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&chord_pattern()).unwrap());

static CHORD_EXACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", chord_pattern())).unwrap());

static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]\n]*)\]").unwrap());

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\s*([A-Za-z_][A-Za-z0-9_-]*)\s*(?::\s*(.*?))?\s*\}\s*$").unwrap()
});

static LABEL_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(title|key|artist|author|bpm|tempo|time signature|time|capo)\s*:")
        .unwrap()
});

static LABEL_ANYWHERE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:key|bpm|tempo|time|capo|artist)\s*:|\b\d{2,3}\s*bpm\b").unwrap()
});

const SECTION_CODE: &str = r"(?:PC|[VBICOT])\d*(?:\s*[x×]\s*\d+)?";

static PAREN_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\(\s*{}\s*\)(?:\s*[x×]\s*\d+)?", SECTION_CODE)).unwrap()
});

static BARE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:PC|[VBICOT])\d*(?:[x×]\d+)?$").unwrap());

static ARRANGEMENT_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    let code = format!(r"\(\s*{}\s*\)", SECTION_CODE);
    Regex::new(&format!(r"{}[\s|]*{}", code, code)).unwrap()
});

static SECTION_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(verse|chorus|bridge|intro|outro|pre-?chorus|tag|coda)\s*\d*:?$").unwrap()
});

static SECTION_ABBREV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,2}\d+:$").unwrap());

static REPEAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(?[x×]\d+\)?$").unwrap());

fn chord_pattern() -> String {
    format!(
        r"[A-G]{acc}?(?:maj|min|dim|aug|sus|add|6/9|m|M|[0-9]|{acc}(?:5|9|11|13)|\+|°|ø)*(?:/[A-G]{acc}?)?",
        acc = ACCIDENTAL
    )
}

/// A chord token located in a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordToken {
    pub text: String,
    /// Byte range in the line.
    pub start: usize,
    pub end: usize,
    /// Character column of the first character.
    pub column: usize,
}

/// Is the whole of `text` a single chord token?
pub fn is_chord_token(text: &str) -> bool {
    CHORD_EXACT_RE.is_match(text)
}

/// Every free-standing chord token in `line`, left to right.
pub fn chord_tokens(line: &str) -> Vec<ChordToken> {
    CHORD_RE
        .find_iter(line)
        .filter(|m| {
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .map(|m| ChordToken {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            column: line[..m.start()].chars().count(),
        })
        .collect()
}

/// Piece of an inline-dialect line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Chord(String),
    Lyric(String),
}

/// Split an inline-dialect line into lyric runs and bracketed chords.
///
/// Brackets holding something other than a chord stay in the lyric text.
pub fn segments(line: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut lyric = String::new();
    let mut last = 0;
    for caps in BRACKET_RE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !is_chord_token(inner.as_str().trim()) {
            continue;
        }
        lyric.push_str(&line[last..whole.start()]);
        if !lyric.is_empty() {
            out.push(Segment::Lyric(std::mem::take(&mut lyric)));
        }
        out.push(Segment::Chord(inner.as_str().trim().to_string()));
        last = whole.end();
    }
    lyric.push_str(&line[last..]);
    if !lyric.is_empty() {
        out.push(Segment::Lyric(lyric));
    }
    out
}

/// Does `text` contain at least one bracketed chord token?
pub fn has_bracketed_chord(text: &str) -> bool {
    text.contains('[')
        && BRACKET_RE
            .captures_iter(text)
            .any(|caps| caps.get(1).is_some_and(|inner| is_chord_token(inner.as_str().trim())))
}

/// Call `f` on every bracketed chord in `line` and splice in what it returns.
pub(crate) fn replace_bracketed(line: &str, mut f: impl FnMut(&str) -> String) -> String {
    BRACKET_RE
        .replace_all(line, |caps: &regex::Captures| {
            let inner = &caps[1];
            if is_chord_token(inner.trim()) {
                format!("[{}]", f(inner.trim()))
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveKind {
    /// Header field: title, key, tempo, ...
    Metadata,
    /// Opens or labels a section: `{comment: Verse}`, `{start_of_chorus}`.
    Section,
    /// Closes a section: `{end_of_chorus}`, `{eoc}`.
    SectionEnd,
    Other,
}

/// A `{name: value}` directive line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub name: String,
    pub value: Option<String>,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        let name = self.name.to_ascii_lowercase();
        match name.as_str() {
            "title" | "t" | "subtitle" | "st" | "artist" | "author" | "composer" | "lyricist"
            | "key" | "tempo" | "bpm" | "time" | "capo" | "album" | "year" | "copyright"
            | "duration" | "meta" => DirectiveKind::Metadata,
            "comment" | "c" | "ci" | "cb" | "comment_italic" | "comment_box" | "highlight"
            | "sov" | "soc" | "sob" => DirectiveKind::Section,
            "eov" | "eoc" | "eob" => DirectiveKind::SectionEnd,
            _ if name.starts_with("start_of_") => DirectiveKind::Section,
            _ if name.starts_with("end_of_") => DirectiveKind::SectionEnd,
            _ => DirectiveKind::Other,
        }
    }

    /// Display name of a section directive, e.g. `Verse 1` or `Chorus`.
    pub fn section_name(&self) -> Option<String> {
        if self.kind() != DirectiveKind::Section {
            return None;
        }
        if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
            return Some(value.to_string());
        }
        let name = self.name.to_ascii_lowercase();
        let part = match name.as_str() {
            "sov" => "verse",
            "soc" => "chorus",
            "sob" => "bridge",
            _ => name.strip_prefix("start_of_")?,
        };
        Some(capitalize(&part.replace('_', " ")))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn parse_directive(line: &str) -> Option<Directive> {
    let caps = DIRECTIVE_RE.captures(line)?;
    Some(Directive {
        name: caps[1].to_string(),
        value: caps.get(2).map(|m| m.as_str().trim().to_string()),
    })
}

/// A bare line naming a section (`Verse 1:`, `Chorus`, `PC2:`).
pub fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    SECTION_NAME_RE.is_match(trimmed) || SECTION_ABBREV_RE.is_match(trimmed)
}

/// Section name of a bare header or a section directive, without trailing colon.
pub fn section_name(line: &str) -> Option<String> {
    if let Some(directive) = parse_directive(line) {
        return directive.section_name();
    }
    is_section_header(line).then(|| line.trim().trim_end_matches(':').trim_end().to_string())
}

/// A line listing the song's section order.
pub fn is_arrangement_line(line: &str) -> bool {
    let codes = PAREN_CODE_RE.find_iter(line).count();
    if codes > 0 {
        let rest = PAREN_CODE_RE.replace_all(line, "");
        return rest.chars().all(|c| c.is_whitespace() || c == '|');
    }

    let pieces: Vec<&str> = line.split_whitespace().filter(|p| *p != "|").collect();
    pieces.len() >= 3
        && pieces.iter().all(|p| BARE_CODE_RE.is_match(p))
        && pieces
            .iter()
            .any(|p| p.starts_with(['V', 'I', 'O', 'T']) || p.starts_with("PC"))
}

/// Two or more parenthesized section codes in a row anywhere in `text`.
pub fn has_arrangement_run(text: &str) -> bool {
    ARRANGEMENT_RUN_RE.is_match(text)
}

pub fn has_metadata_label(line: &str) -> bool {
    LABEL_LINE_RE.is_match(line)
}

/// A line holding nothing but chord tokens and bar/repeat separators.
pub fn is_chord_only_line(line: &str) -> bool {
    let mut chords = 0;
    for piece in line.split_whitespace() {
        let core = piece.trim_matches(|c: char| matches!(c, '|' | ',' | '(' | ')'));
        if core.is_empty() || core.chars().all(|c| matches!(c, '/' | '-' | '.' | '%' | ':' | '|')) {
            continue;
        }
        if REPEAT_RE.is_match(core) || core.eq_ignore_ascii_case("N.C.") {
            continue;
        }
        if !is_chord_token(core) {
            return false;
        }
        chords += 1;
    }
    chords > 0
}

/// Decides whether a line that is not purely chords still reads as a chord line.
pub trait ChordLineScorer: fmt::Debug {
    fn is_chord_line(&self, line: &str) -> bool;
}

impl ChordLineScorer for ChordLineThresholds {
    fn is_chord_line(&self, line: &str) -> bool {
        let matches = chord_tokens(line).len();
        let length = line.chars().count();
        let lowercase = line.chars().filter(|c| c.is_lowercase()).count();
        matches >= self.min_matches && length < self.max_length && lowercase < self.max_lowercase
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    DirectiveMetadata,
    LegacyMetadata,
    SectionHeader,
    Arrangement,
    Chord,
    Lyric,
    Blank,
}

impl LineKind {
    pub fn is_metadata(self) -> bool {
        matches!(self, LineKind::DirectiveMetadata | LineKind::LegacyMetadata)
    }
}

#[derive(Debug)]
pub struct LineClassifier {
    scorer: Box<dyn ChordLineScorer>,
    header_scan_lines: usize,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl LineClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scorer: Box::new(config.chord_line.clone()),
            header_scan_lines: config.header_scan_lines,
        }
    }

    /// Classifier with a caller-supplied chord-line scoring rule.
    pub fn with_scorer(scorer: impl ChordLineScorer + 'static, header_scan_lines: usize) -> Self {
        Self {
            scorer: Box::new(scorer),
            header_scan_lines,
        }
    }

    /// Classify `line`, the `index`-th line (0-based) of its document.
    pub fn classify(&self, line: &str, index: usize) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if let Some(directive) = parse_directive(trimmed) {
            return match directive.kind() {
                DirectiveKind::Section => LineKind::SectionHeader,
                _ => LineKind::DirectiveMetadata,
            };
        }
        if has_metadata_label(trimmed) {
            return LineKind::LegacyMetadata;
        }
        if is_arrangement_line(trimmed) {
            return LineKind::Arrangement;
        }
        if is_section_header(trimmed) {
            return LineKind::SectionHeader;
        }
        if index < self.header_scan_lines && LABEL_ANYWHERE_RE.is_match(trimmed) {
            return LineKind::LegacyMetadata;
        }
        if !has_bracketed_chord(trimmed)
            && (is_chord_only_line(trimmed) || self.scorer.is_chord_line(trimmed))
        {
            log::trace!("line {} scored as chord line: {:?}", index, trimmed);
            return LineKind::Chord;
        }
        LineKind::Lyric
    }
}
