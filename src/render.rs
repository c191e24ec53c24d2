//! HTML fragment rendering of a classified chart.
//!
//! Output is one `<div class="chart">` whose `dir` attribute comes from the
//! region's reading direction. Each source line becomes one output line, so
//! the fragment is meant for a `white-space: pre` container:
//!
//! ```text
//! <div class="chart" dir="ltr">
//! <span class="meta">Key: G</span>
//! <span class="chord">G</span>    <span class="chord">D</span>
//! Amazing grace
//! </div>
//! ```

use crate::direction::detect_direction;
use crate::document::SongDocument;
use crate::grammar::{chord_tokens, segments, LineClassifier, LineKind, Segment};
use crate::nashville::{NashvilleKey, NashvilleMode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: NashvilleMode,
    /// Key for Nashville labels; the chart's own key when `None`.
    pub key: Option<String>,
}

/// Render `text` as an HTML fragment.
pub fn render_html(text: &str, classifier: &LineClassifier, options: &RenderOptions) -> String {
    let doc = SongDocument::parse(text, classifier);
    let direction = detect_direction(text);
    let key = match options.mode {
        NashvilleMode::Chords => None,
        _ => options
            .key
            .as_deref()
            .or(doc.header.key.as_deref())
            .and_then(|key| NashvilleKey::new(key).map_err(|notice| notice.logged()).ok()),
    };
    let chord = |token: &str| {
        let label = match &key {
            Some(key) => key.label(token, options.mode, direction),
            None => token.to_string(),
        };
        format!("<span class=\"chord\">{}</span>", escape_html(&label))
    };

    let mut html = String::new();
    html.push_str(&format!("<div class=\"chart\" dir=\"{}\">\n", direction));
    for line in &doc.lines {
        match line.kind {
            LineKind::DirectiveMetadata | LineKind::LegacyMetadata => {
                html.push_str(&format!("<span class=\"meta\">{}</span>", escape_html(&line.text)));
            }
            LineKind::SectionHeader | LineKind::Arrangement => {
                html.push_str(&format!(
                    "<span class=\"section\">{}</span>",
                    escape_html(&line.text)
                ));
            }
            LineKind::Chord => {
                let mut last = 0;
                for token in chord_tokens(&line.text) {
                    html.push_str(&escape_html(&line.text[last..token.start]));
                    html.push_str(&chord(&token.text));
                    last = token.end;
                }
                html.push_str(&escape_html(&line.text[last..]));
            }
            LineKind::Lyric => {
                for segment in segments(&line.text) {
                    match segment {
                        Segment::Chord(token) => html.push_str(&chord(&token)),
                        Segment::Lyric(text) => html.push_str(&escape_html(&text)),
                    }
                }
            }
            LineKind::Blank => {}
        }
        html.push('\n');
    }
    html.push_str("</div>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, options: &RenderOptions) -> String {
        render_html(text, &LineClassifier::default(), options)
    }

    #[test]
    fn test_above_line_chart() {
        let html = render("Key: G\nG    D\nAmazing grace", &RenderOptions::default());
        assert_eq!(
            html,
            "<div class=\"chart\" dir=\"ltr\">\n<span class=\"meta\">Key: G</span>\n<span class=\"chord\">G</span>    <span class=\"chord\">D</span>\nAmazing grace\n</div>"
        );
    }

    #[test]
    fn test_inline_chart_drops_brackets() {
        let html = render("[G]Tom & [D]Jerry", &RenderOptions::default());
        assert!(html.contains("<span class=\"chord\">G</span>Tom &amp; <span class=\"chord\">D</span>Jerry"));
    }

    #[test]
    fn test_nashville_numbers() {
        let options = RenderOptions {
            mode: NashvilleMode::Numbers,
            key: Some("C".to_string()),
        };
        let html = render("[F]la [G]la", &options);
        assert!(html.contains("<span class=\"chord\">4</span>la <span class=\"chord\">5</span>la"));
    }

    #[test]
    fn test_combined_follows_direction() {
        let options = RenderOptions {
            mode: NashvilleMode::Combined,
            key: None,
        };
        let html = render("{key: C}\n[F]שלום", &options);
        assert!(html.starts_with("<div class=\"chart\" dir=\"rtl\">"));
        assert!(html.contains("<span class=\"chord\">4 | F</span>"));
    }

    #[test]
    fn test_sections_and_blank_lines() {
        let html = render("Verse 1:\n\n<b>", &RenderOptions::default());
        assert_eq!(
            html,
            "<div class=\"chart\" dir=\"ltr\">\n<span class=\"section\">Verse 1:</span>\n\n&lt;b&gt;\n</div>"
        );
    }
}
