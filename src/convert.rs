//! # Format Converter
//!
//! Converts between the inline dialect (`[G]Amazing [D]grace`) and the above-line
//! dialect (a chord line column-aligned over its lyric line).
//!
//! ## Inline → above-line
//! Each line is scanned into two column-synchronized buffers. A bracketed chord is
//! written to the chord buffer at the lyric buffer's current column and takes no
//! lyric column itself. When the previous chord has run past that column, the new
//! chord goes one space after it instead. Trailing whitespace is trimmed from
//! both buffers; the chord line is emitted when non-empty, the lyric line when
//! non-empty or when the line had no chords at all.
//!
//! Header metadata before the first section or lyric collapses into one line
//! (`Title | Key: G | BPM: 72 | Time: 3/4`). Metadata further down, such as a key
//! change, stays where it is. Section directives become bare `Name:` lines.
//!
//! ## Above-line → inline
//! A chord line followed by a lyric line merges into one line with `[chord]` placed
//! at each chord's column. Every other line passes through unchanged, including a
//! chord line with no lyric under it unless `bracket_standalone` is set, in which
//! case it becomes a line of bracketed chords at their columns.
//!
//! ## Round trip
//! For charts without overlapping chords, inline → above-line → inline puts every
//! chord back immediately before the lyric text it preceded.

use crate::document::{Header, SongDocument};
use crate::grammar::{
    chord_tokens, parse_directive, section_name, segments, ChordToken, DirectiveKind,
    LineClassifier, LineKind, Segment,
};

/// Convert an inline chart to the above-line dialect.
///
/// With `compact` set, a blank line is inserted before each section header unless
/// the previous emitted line is already blank.
pub fn inline_to_above_line(text: &str, classifier: &LineClassifier, compact: bool) -> String {
    let doc = SongDocument::parse(text, classifier);
    let header_line = combined_header(&doc.header);
    let mut header_written = false;
    let mut in_body = false;
    let mut out: Vec<String> = Vec::with_capacity(doc.lines.len() * 2);

    for line in &doc.lines {
        match line.kind {
            LineKind::DirectiveMetadata | LineKind::LegacyMetadata => {
                let directive = parse_directive(&line.text);
                match directive.as_ref().map(|d| (d.kind(), is_header_field(&d.name))) {
                    Some((DirectiveKind::SectionEnd, _)) => {}
                    Some((DirectiveKind::Metadata, true)) | None if in_body => {
                        out.push(line.text.clone())
                    }
                    Some((DirectiveKind::Metadata, true)) | None => match &header_line {
                        Some(header) if !header_written => {
                            out.push(header.clone());
                            header_written = true;
                        }
                        Some(_) => {}
                        None => out.push(line.text.clone()),
                    },
                    Some(_) => out.push(line.text.clone()),
                }
            }
            LineKind::SectionHeader => {
                in_body = true;
                let name = section_name(&line.text).unwrap_or_else(|| line.text.trim().to_string());
                if compact && out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                    out.push(String::new());
                }
                out.push(format!("{}:", name));
            }
            LineKind::Arrangement => out.push(line.text.clone()),
            LineKind::Blank => out.push(line.text.trim_end().to_string()),
            LineKind::Chord | LineKind::Lyric => {
                in_body = true;
                let (chords, lyric) = split_inline(&line.text);
                let had_chords = !chords.is_empty();
                if had_chords {
                    out.push(chords);
                }
                if !lyric.is_empty() || !had_chords {
                    out.push(lyric);
                }
            }
        }
    }
    out.join("\n")
}

/// Convert an above-line chart to the inline dialect.
pub fn above_line_to_inline(
    text: &str,
    classifier: &LineClassifier,
    bracket_standalone: bool,
) -> String {
    let doc = SongDocument::parse(text, classifier);
    let mut out: Vec<String> = Vec::with_capacity(doc.lines.len());
    let mut lines = doc.lines.iter().peekable();

    while let Some(line) = lines.next() {
        if line.kind != LineKind::Chord {
            out.push(line.text.clone());
            continue;
        }
        let tokens = chord_tokens(&line.text);
        match lines.next_if(|next| next.kind == LineKind::Lyric) {
            Some(lyric) => out.push(merge(&tokens, &lyric.text)),
            None if bracket_standalone => out.push(merge(&tokens, "")),
            None => out.push(line.text.clone()),
        }
    }
    out.join("\n")
}

/// The combined header line, or `None` when the chart has no header fields.
pub fn combined_header(header: &Header) -> Option<String> {
    let mut fields = Vec::new();
    if let Some(title) = &header.title {
        fields.push(title.clone());
    }
    if let Some(author) = &header.author {
        fields.push(format!("Artist: {}", author));
    }
    if let Some(key) = &header.key {
        fields.push(format!("Key: {}", key));
    }
    if let Some(tempo) = &header.tempo {
        fields.push(format!("BPM: {}", tempo));
    }
    if let Some(time) = &header.time {
        fields.push(format!("Time: {}", time));
    }
    if let Some(capo) = &header.capo {
        fields.push(format!("Capo: {}", capo));
    }
    (!fields.is_empty()).then(|| fields.join(" | "))
}

fn is_header_field(directive: &str) -> bool {
    matches!(
        directive.to_ascii_lowercase().as_str(),
        "title" | "t" | "artist" | "author" | "composer" | "key" | "tempo" | "bpm" | "time" | "capo"
    )
}

/// Split one inline line into its chord line and lyric line.
fn split_inline(line: &str) -> (String, String) {
    let mut chords = String::new();
    let mut chord_cols = 0;
    let mut lyric = String::new();
    let mut lyric_cols = 0;

    for segment in segments(line) {
        match segment {
            Segment::Chord(chord) => {
                let column = if chord_cols > 0 && chord_cols >= lyric_cols {
                    chord_cols + 1
                } else {
                    lyric_cols
                };
                chords.extend(std::iter::repeat(' ').take(column - chord_cols));
                chords.push_str(&chord);
                chord_cols = column + chord.chars().count();
            }
            Segment::Lyric(text) => {
                lyric_cols += text.chars().count();
                lyric.push_str(&text);
            }
        }
    }
    (chords.trim_end().to_string(), lyric.trim_end().to_string())
}

/// Insert `[chord]` into `lyric` at each token's column.
fn merge(tokens: &[ChordToken], lyric: &str) -> String {
    let chars: Vec<char> = lyric.chars().collect();
    let mut out = String::with_capacity(lyric.len() + tokens.len() * 4);
    let mut pos = 0;
    for token in tokens {
        while pos < token.column {
            out.push(chars.get(pos).copied().unwrap_or(' '));
            pos += 1;
        }
        out.push('[');
        out.push_str(&token.text);
        out.push(']');
    }
    if pos < chars.len() {
        out.extend(&chars[pos..]);
    }
    out.truncate(out.trim_end().len());
    out
}
