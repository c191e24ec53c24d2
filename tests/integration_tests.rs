//! Integration tests for the chord-chart engine
//!
//! Exercises whole charts through the public API: transposition, dialect
//! conversion, normalization, Nashville numbers and reading direction.

use chordchart::{
    above_line_to_inline, auto_insert_arrangement_line, classify, detect_direction,
    ensure_metadata, inline_to_above_line, nashville, nashville_number, normalize,
    normalize_metadata_spacing, transpose, transpose_chart, transpose_chord, transpose_visual,
    BassSpelling, ChartEngine, ChordSymbol, EngineConfig, NashvilleMode, Notice, TextDirection,
    TranspositionState,
};
use pretty_assertions::assert_eq;

const INLINE_SONG: &str = "\
{title: Amazing Grace}
{key: G}
{comment: Verse 1}
[G]Amazing [G7]grace, how [C]sweet the [G]sound
That [G]saved a [Em]wretch like [D]me";

const ABOVE_SONG: &str = "\
Amazing Grace | Key: G

Verse 1:
G       G7         C         G
Amazing grace, how sweet the sound
     G       Em          D
That saved a wretch like me";

#[test]
fn test_spec_line_fixture() {
    let line = "[G]    [D/F#]    [Em7]    [C2]";
    assert_eq!(transpose_chart(line, 2), "[A]    [E/Ab]    [F#m7]    [D2]");

    let follow = ChartEngine::new(EngineConfig {
        bass_spelling: BassSpelling::FollowRoot,
        ..EngineConfig::default()
    });
    assert_eq!(follow.transpose_chart(line, 2), "[A]    [E/G#]    [F#m7]    [D2]");
}

#[test]
fn test_transpose_identity_for_every_root() {
    for root in [
        "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb",
        "B", "Cb", "Fb", "E#", "B#", "B#m7", "Fb/Cb",
    ] {
        assert_eq!(transpose_chord(root, 0, BassSpelling::ForceFlat), root);
        assert_eq!(transpose_chord(root, 12, BassSpelling::ForceFlat), root);
        assert_eq!(transpose_chord(root, -12, BassSpelling::FollowRoot), root);
    }
}

#[test]
fn test_transpose_composition() {
    for chord in ["C", "Dbmaj7", "F#m", "Bb7sus4", "A/C#"] {
        for a in -12..=12 {
            for b in -12..=12 {
                let stepwise = transpose_chord(
                    &transpose_chord(chord, a, BassSpelling::ForceFlat),
                    b,
                    BassSpelling::ForceFlat,
                );
                let direct = transpose_chord(chord, (a + b).rem_euclid(12), BassSpelling::ForceFlat);
                let stepwise = ChordSymbol::parse(&stepwise).unwrap();
                let direct = ChordSymbol::parse(&direct).unwrap();
                assert_eq!(stepwise.root, direct.root, "{} by {} then {}", chord, a, b);
                assert_eq!(stepwise.suffix, direct.suffix);
            }
        }
    }
}

#[test]
fn test_inline_song_to_above_line() {
    assert_eq!(inline_to_above_line(INLINE_SONG), ABOVE_SONG);
}

#[test]
fn test_above_line_song_to_inline() {
    assert_eq!(
        above_line_to_inline(ABOVE_SONG),
        "Amazing Grace | Key: G\n\nVerse 1:\n[G]Amazing [G7]grace, how [C]sweet the [G]sound\nThat [G]saved a [Em]wretch like [D]me"
    );
}

#[test]
fn test_round_trips_keep_chord_placement() {
    let body = "[G]Amazing [G7]grace, how [C]sweet the [G]sound\nThat [G]saved a [Em]wretch like [D]me";
    assert_eq!(above_line_to_inline(&inline_to_above_line(body)), body);

    let above = "G       G7\nAmazing grace\n     G       Em\nThat saved a wretch";
    assert_eq!(inline_to_above_line(&above_line_to_inline(above)), above);
}

#[test]
fn test_visual_transposition_keeps_columns() {
    assert_eq!(
        transpose_visual(ABOVE_SONG, 2),
        "Amazing Grace | Key: G\n\nVerse 1:\nA       A7         D         A\nAmazing grace, how sweet the sound\n     A       F#m         E\nThat saved a wretch like me"
    );
}

#[test]
fn test_display_transposition_picks_dialect() {
    assert_eq!(
        transpose(INLINE_SONG, 5),
        "{title: Amazing Grace}\n{key: G}\n{comment: Verse 1}\n[C]Amazing [C7]grace, how [F]sweet the [C]sound\nThat [C]saved a [Am]wretch like [G]me"
    );
    assert_eq!(transpose(ABOVE_SONG, 12), ABOVE_SONG);
}

#[test]
fn test_transposition_state_reset() {
    let engine = ChartEngine::default();
    let mut state = TranspositionState::analyze(INLINE_SONG, &engine);
    assert_eq!(state.original_key(), Some("G"));

    for delta in [1, 1, 1, -4, 7, 2] {
        state = state.transpose_by(delta);
    }
    assert_eq!(state.shift(), 8);
    assert_eq!(state.current_key().as_deref(), Some("D#"));
    assert_eq!(state.render(&engine), transpose(INLINE_SONG, 8));

    let state = state.reset();
    assert_eq!(state.shift(), 0);
    assert_eq!(state.render(&engine), INLINE_SONG);
}

#[test]
fn test_normalization_passes_are_idempotent() {
    let charts = [
        INLINE_SONG,
        ABOVE_SONG,
        "Title: X|Key: Bb |  Capo: 1\n\nChorus\nBb   F\nla la",
        "G  D\nno header at all",
        "",
    ];
    for chart in charts {
        let once = ensure_metadata(chart);
        assert_eq!(ensure_metadata(&once), once, "ensure_metadata on {:?}", chart);

        let once = normalize_metadata_spacing(chart);
        assert_eq!(normalize_metadata_spacing(&once), once, "spacing on {:?}", chart);

        let once = auto_insert_arrangement_line(chart);
        assert_eq!(auto_insert_arrangement_line(&once), once, "arrangement on {:?}", chart);
    }
}

#[test]
fn test_normalize_legacy_chart() {
    let report = normalize("Title: X|Key: Bb |  Capo: 1\n\nChorus\nBb   F\nla la");
    assert_eq!(
        report.text,
        "Title: X | Key: Bb | Capo: 1 | BPM: 120 | Time: 4/4\n(I) (V1) (PC) (C) (V2) (PC) (C) (B) (C) (O)\n\n{comment: Chorus}\nBb   F\nla la"
    );
    assert!(report.notices.is_empty());

    let again = normalize(&report.text);
    assert_eq!(again.text, report.text);
    assert_eq!(again.notices.len(), 4);
    assert!(again
        .notices
        .iter()
        .all(|notice| matches!(notice, Notice::AlreadyNormalized(_))));
}

#[test]
fn test_nashville_in_c_major() {
    assert_eq!(nashville_number("F", "C Major").unwrap(), "4");
    assert_eq!(nashville_number("Em", "C Major").unwrap(), "3");
    assert_eq!(nashville_number("G", "C Major").unwrap(), "5");
}

#[test]
fn test_nashville_chart_uses_header_key() {
    assert_eq!(
        nashville(INLINE_SONG, None, NashvilleMode::Numbers),
        "{title: Amazing Grace}\n{key: G}\n{comment: Verse 1}\n[1]Amazing [1]grace, how [4]sweet the [1]sound\nThat [1]saved a [6]wretch like [5]me"
    );
}

#[test]
fn test_direction() {
    assert_eq!(detect_direction("שיר ABC"), TextDirection::Rtl);
    assert_eq!(detect_direction("Amazing Grace"), TextDirection::Ltr);
}

#[test]
fn test_classify_serializes_records() {
    let doc = classify(ABOVE_SONG);
    let records: Vec<_> = doc.records().collect();
    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["record"], "directive");
    assert_eq!(json[2]["record"], "section-header");
    assert_eq!(json[2]["name"], "Verse 1");
    assert_eq!(json[3]["record"], "chord-line");
    assert_eq!(json[3]["chords"][1]["text"], "G7");
    assert_eq!(json[3]["chords"][1]["column"], 8);
    assert_eq!(json[4]["record"], "lyric-line");
}
