//! # Transposition Engine
//!
//! Moves every chord of a chart by a number of semitones.
//!
//! ## Dialects
//! - **Inline** (`[G]Amazing [D]grace`): every bracketed chord token is rewritten,
//!   all other text is left alone.
//! - **Above-line** (chords on their own line, column-aligned over the lyric):
//!   lines are classified and only chord lines are touched. Metadata, arrangement,
//!   section and lyric lines pass through verbatim.
//!
//! [`transpose_chart`] rewrites above-line chords in place, so a chord that changes
//! length shifts the rest of its line. [`transpose_visual_format`] keeps every
//! chord in its original column instead.
//!
//! A shift that is a multiple of 12 returns the chart verbatim.

use crate::chord::ChordSymbol;
use crate::config::BassSpelling;
use crate::document::SongDocument;
use crate::error::Notice;
use crate::grammar::{chord_tokens, replace_bracketed, ChordToken, LineClassifier, LineKind};

pub use crate::pitch::{transpose_key, try_transpose_key};

/// Transpose one chord token, or report why it was left alone.
pub fn try_transpose_chord(
    token: &str,
    steps: i32,
    bass_spelling: BassSpelling,
) -> Result<String, Notice> {
    let chord =
        ChordSymbol::parse(token).ok_or_else(|| Notice::UnrecognizedRoot(token.to_string()))?;
    if steps.rem_euclid(12) == 0 {
        return Ok(token.to_string());
    }
    Ok(chord.transpose(steps, bass_spelling).to_string())
}

/// Transpose one chord token. Tokens without a recognizable root come back unchanged.
///
/// # Example
/// ```
/// use chordchart::{transpose_chord, BassSpelling};
///
/// assert_eq!(transpose_chord("F#m7", 2, BassSpelling::ForceFlat), "G#m7");
/// assert_eq!(transpose_chord("D/F#", 2, BassSpelling::ForceFlat), "E/Ab");
/// assert_eq!(transpose_chord("N.C.", 2, BassSpelling::ForceFlat), "N.C.");
/// ```
pub fn transpose_chord(token: &str, steps: i32, bass_spelling: BassSpelling) -> String {
    try_transpose_chord(token, steps, bass_spelling).unwrap_or_else(|notice| {
        notice.logged();
        token.to_string()
    })
}

/// Transpose a whole chart, rewriting chords in place.
pub fn transpose_chart(
    text: &str,
    steps: i32,
    classifier: &LineClassifier,
    bass_spelling: BassSpelling,
) -> String {
    if steps.rem_euclid(12) == 0 {
        return text.to_string();
    }
    let doc = SongDocument::parse(text, classifier);
    if doc.is_inline() {
        return transpose_inline(&doc, steps, bass_spelling);
    }
    rewrite_chord_lines(&doc, |line, tokens| {
        let mut out = String::with_capacity(line.len());
        let mut last = 0;
        for token in tokens {
            out.push_str(&line[last..token.start]);
            out.push_str(&transpose_chord(&token.text, steps, bass_spelling));
            last = token.end;
        }
        out.push_str(&line[last..]);
        out
    })
}

/// Transpose an above-line chart, keeping every chord in its original column.
///
/// A shorter replacement is right-padded with spaces. A longer one borrows the
/// surplus from the spaces that follow it, always leaving one separator.
pub fn transpose_visual_format(
    text: &str,
    steps: i32,
    classifier: &LineClassifier,
    bass_spelling: BassSpelling,
) -> String {
    if steps.rem_euclid(12) == 0 {
        return text.to_string();
    }
    let doc = SongDocument::parse(text, classifier);
    rewrite_chord_lines(&doc, |line, tokens| {
        let replacements: Vec<String> = tokens
            .iter()
            .map(|token| transpose_chord(&token.text, steps, bass_spelling))
            .collect();
        realign(line, tokens, &replacements)
    })
}

/// Transpose for display: inline charts in place, above-line charts column-aligned.
pub fn transpose_for_display(
    text: &str,
    steps: i32,
    classifier: &LineClassifier,
    bass_spelling: BassSpelling,
) -> String {
    if crate::grammar::has_bracketed_chord(text) {
        transpose_chart(text, steps, classifier, bass_spelling)
    } else {
        transpose_visual_format(text, steps, classifier, bass_spelling)
    }
}

fn transpose_inline(doc: &SongDocument, steps: i32, bass_spelling: BassSpelling) -> String {
    doc.lines
        .iter()
        .map(|line| replace_bracketed(&line.text, |chord| transpose_chord(chord, steps, bass_spelling)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_chord_lines(
    doc: &SongDocument,
    mut rewrite: impl FnMut(&str, &[ChordToken]) -> String,
) -> String {
    doc.lines
        .iter()
        .map(|line| match line.kind {
            LineKind::Chord => rewrite(line.text.as_str(), chord_tokens(&line.text).as_slice()),
            _ => line.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splice `replacements` over `tokens`, holding later tokens in their columns.
fn realign(line: &str, tokens: &[ChordToken], replacements: &[String]) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut last = 0;
    // Columns the output currently runs ahead of the original.
    let mut debt = 0usize;

    for (token, new) in tokens.iter().zip(replacements) {
        let gap = &line[last..token.start];
        let spaces = gap.chars().filter(|&c| c == ' ').count();
        let mut removable = spaces.saturating_sub(1).min(debt);
        debt -= removable;
        for c in gap.chars() {
            if c == ' ' && removable > 0 {
                removable -= 1;
                continue;
            }
            out.push(c);
        }

        out.push_str(new);
        let old_len = token.text.chars().count();
        let new_len = new.chars().count();
        if new_len < old_len {
            let pad = old_len - new_len;
            let repaid = pad.min(debt);
            debt -= repaid;
            out.extend(std::iter::repeat(' ').take(pad - repaid));
        } else {
            debt += new_len - old_len;
        }
        last = token.end;
    }
    out.push_str(&line[last..]);

    if !line.ends_with(char::is_whitespace) {
        out.truncate(out.trim_end().len());
    }
    out
}
