//! # Metadata & Directive Normalizer
//!
//! Passes that fill in and tidy chart metadata. Every pass is idempotent: running
//! it on its own output changes nothing.
//!
//! | Pass | Effect |
//! |---|---|
//! | [`promote_section_headers`] | `Verse 1:` → `{comment: Verse 1}` |
//! | [`ensure_metadata`] | adds missing tempo and time signature |
//! | [`normalize_metadata_spacing`] | `Key: G|BPM: 72` → `Key: G | BPM: 72` |
//! | [`auto_insert_arrangement_line`] | adds the default section order |
//!
//! [`normalize`] runs them in that order and reports which ones had nothing to do.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EngineConfig;
use crate::document::{Line, SongDocument};
use crate::error::Notice;
use crate::grammar::{
    has_arrangement_run, has_bracketed_chord, parse_directive, section_name, LineClassifier,
    LineKind,
};

static TEMPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:bpm|tempo)\s*:|\b\d{2,3}\s*bpm\b").unwrap());

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btime(?:\s+signature)?\s*:").unwrap());

static KEY_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bkey\s*:").unwrap());

static PIPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\|[ \t]*").unwrap());

/// Result of the [`normalize`] pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    pub text: String,
    /// One [`Notice::AlreadyNormalized`] per pass that left the text unchanged.
    pub notices: Vec<Notice>,
}

/// Run the normalization passes in order.
///
/// Section-header promotion only runs when `promote_sections` is set.
pub fn normalize(
    text: &str,
    classifier: &LineClassifier,
    config: &EngineConfig,
    promote_sections: bool,
) -> NormalizeReport {
    let mut notices = Vec::new();
    let mut text = text.to_string();

    let mut run = |name: &'static str, pass: &dyn Fn(&str) -> String| {
        let next = pass(&text);
        if next == text {
            notices.push(Notice::AlreadyNormalized(name).logged());
        } else {
            log::debug!("normalize pass '{}' changed the chart", name);
            text = next;
        }
    };

    if promote_sections {
        run("section-headers", &|t: &str| promote_section_headers(t, classifier));
    }
    run("ensure-metadata", &|t: &str| ensure_metadata(t, classifier, config));
    run("metadata-spacing", &|t: &str| normalize_metadata_spacing(t, classifier));
    run("arrangement-line", &|t: &str| auto_insert_arrangement_line(t, classifier, config));

    NormalizeReport { text, notices }
}

/// Add a tempo and a time signature when the chart has none anywhere.
///
/// Missing fields go onto the key line: a `{key: ...}` directive is followed by
/// `{tempo: N}` / `{time: S}` lines, a legacy key line gets ` | BPM: N | Time: S`
/// appended. Without a key line a new metadata line is inserted after the header.
pub fn ensure_metadata(text: &str, classifier: &LineClassifier, config: &EngineConfig) -> String {
    let need_tempo = !TEMPO_RE.is_match(text);
    let need_time = !TIME_RE.is_match(text);
    if !need_tempo && !need_time {
        return text.to_string();
    }

    let tempo = need_tempo.then(|| config.default_tempo.to_string());
    let time = need_time.then(|| config.default_time.clone());
    let doc = SongDocument::parse(text, classifier);
    let mut lines: Vec<String> = doc.lines.iter().map(|line| line.text.clone()).collect();

    if let Some(index) = doc.lines.iter().position(is_key_line) {
        if doc.lines[index].kind == LineKind::DirectiveMetadata {
            let cr = split_cr(&lines[index]).1;
            let fields: Vec<String> = directive_fields(tempo.as_deref(), time.as_deref())
                .into_iter()
                .map(|field| field + cr)
                .collect();
            lines.splice(index + 1..index + 1, fields);
        } else {
            let (body, cr) = split_cr(&lines[index]);
            let mut line = body.trim_end().to_string();
            for field in legacy_fields(tempo.as_deref(), time.as_deref()) {
                line.push_str(" | ");
                line.push_str(&field);
            }
            line.push_str(cr);
            lines[index] = line;
        }
    } else {
        let at = header_end(&doc.lines);
        let uses_directives = doc
            .lines
            .iter()
            .any(|line| line.kind == LineKind::DirectiveMetadata);
        if uses_directives {
            lines.splice(at..at, directive_fields(tempo.as_deref(), time.as_deref()));
        } else {
            let line = legacy_fields(tempo.as_deref(), time.as_deref()).join(" | ");
            lines.insert(at, line);
        }
    }
    lines.join("\n")
}

/// Exactly one space on each side of every `|` in metadata lines.
///
/// Chord lines keep their bars as they are, since their spacing carries alignment.
pub fn normalize_metadata_spacing(text: &str, classifier: &LineClassifier) -> String {
    let doc = SongDocument::parse(text, classifier);
    doc.lines
        .iter()
        .map(|line| {
            if line.kind.is_metadata() && line.text.contains('|') {
                PIPE_RE.replace_all(&line.text, " | ").into_owned()
            } else {
                line.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert the default arrangement line after the header, unless the chart
/// already lists its section order somewhere.
pub fn auto_insert_arrangement_line(
    text: &str,
    classifier: &LineClassifier,
    config: &EngineConfig,
) -> String {
    if config.default_arrangement.is_empty() || has_arrangement_run(text) {
        return text.to_string();
    }
    let doc = SongDocument::parse(text, classifier);
    if doc.lines.iter().any(|line| line.kind == LineKind::Arrangement) {
        return text.to_string();
    }

    let body = doc
        .lines
        .iter()
        .position(|line| match line.kind {
            LineKind::SectionHeader | LineKind::Chord => true,
            LineKind::Lyric => has_bracketed_chord(&line.text),
            _ => false,
        })
        .unwrap_or(doc.lines.len());
    let at = doc.lines[..body]
        .iter()
        .rposition(|line| line.kind.is_metadata())
        .map(|index| index + 1)
        .unwrap_or_else(|| if is_title_line(&doc.lines, 0) && body > 0 { 1 } else { 0 });

    let mut lines: Vec<String> = doc.lines.into_iter().map(|line| line.text).collect();
    lines.insert(at, config.arrangement_line());
    lines.join("\n")
}

/// Rewrite bare section headers (`Chorus`, `Verse 2:`) as `{comment: ...}` directives.
pub fn promote_section_headers(text: &str, classifier: &LineClassifier) -> String {
    let doc = SongDocument::parse(text, classifier);
    doc.lines
        .iter()
        .map(|line| {
            if line.kind != LineKind::SectionHeader || parse_directive(&line.text).is_some() {
                return line.text.clone();
            }
            match section_name(&line.text) {
                Some(name) => format!("{{comment: {}}}", name),
                None => line.text.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_key_line(line: &Line) -> bool {
    match line.kind {
        LineKind::DirectiveMetadata => {
            parse_directive(&line.text).is_some_and(|d| d.name.eq_ignore_ascii_case("key"))
        }
        LineKind::LegacyMetadata => KEY_LABEL_RE.is_match(&line.text),
        _ => false,
    }
}

/// Where a new metadata line goes: after the leading metadata block, else after
/// a title line, else at the top.
fn header_end(lines: &[Line]) -> usize {
    match lines.iter().take_while(|line| line.kind.is_metadata()).count() {
        0 if is_title_line(lines, 0) => 1,
        n => n,
    }
}

/// A lone first line of text that reads as the song title.
fn is_title_line(lines: &[Line], index: usize) -> bool {
    let Some(line) = lines.get(index) else {
        return false;
    };
    line.kind == LineKind::Lyric
        && !has_bracketed_chord(&line.text)
        && lines
            .get(index + 1)
            .map_or(true, |next| !matches!(next.kind, LineKind::Lyric))
}

fn directive_fields(tempo: Option<&str>, time: Option<&str>) -> Vec<String> {
    let mut fields = Vec::new();
    if let Some(tempo) = tempo {
        fields.push(format!("{{tempo: {}}}", tempo));
    }
    if let Some(time) = time {
        fields.push(format!("{{time: {}}}", time));
    }
    fields
}

fn legacy_fields(tempo: Option<&str>, time: Option<&str>) -> Vec<String> {
    let mut fields = Vec::new();
    if let Some(tempo) = tempo {
        fields.push(format!("BPM: {}", tempo));
    }
    if let Some(time) = time {
        fields.push(format!("Time: {}", time));
    }
    fields
}

fn split_cr(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    }
}
