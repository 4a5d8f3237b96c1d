//! Transcript to PDF document.
//!
//! The document is a bold centered title, an "Exported on" line, then one
//! paragraph per turn in transcript order: a bold role label, the content
//! with its line structure kept, and the turn's timestamp in small gray text.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use dost_config::AppConfig;
use dost_core::message::{format_timestamp, Role, Turn};
use tracing::{debug, info};

use crate::fonts::{FontMode, FontSet, FontSource};
use crate::layout::{Block, FlowLayout, PageGeometry, Paragraph, Span, TextStyle};
use crate::pdf;
use crate::RenderError;

const TITLE: TextStyle = TextStyle::bold(16.0, 20.0);
const BODY: TextStyle = TextStyle::regular(11.0, 14.0);
const LABEL: TextStyle = TextStyle::bold(11.0, 14.0);
const STAMP: TextStyle = TextStyle::regular(8.0, 10.0).with_gray(0.5);

const AFTER_TITLE: f32 = 6.0;
const AFTER_EXPORT_LINE: f32 = 8.0;
const AFTER_TURN: f32 = 6.0;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You:",
        _ => "Bot:",
    }
}

/// Build the block sequence for a transcript.
pub fn story(turns: &[Turn], title: &str, exported_at: NaiveDateTime) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(4 + 2 * turns.len());
    blocks.push(Block::Paragraph(Paragraph::centered(vec![Span::new(title, TITLE)])));
    blocks.push(Block::Spacer(AFTER_TITLE));
    blocks.push(Block::Paragraph(Paragraph::new(vec![Span::new(
        format!("Exported on: {}", format_timestamp(exported_at)),
        BODY,
    )])));
    blocks.push(Block::Spacer(AFTER_EXPORT_LINE));

    for turn in turns {
        let mut spans = vec![
            Span::new(role_label(turn.role), LABEL),
            Span::new(" ", BODY),
            Span::new(turn.content.as_str(), BODY),
        ];
        if turn.has_timestamp() {
            spans.push(Span::new(format!(" ({})", turn.created_at), STAMP));
        }
        blocks.push(Block::Paragraph(Paragraph::new(spans)));
        blocks.push(Block::Spacer(AFTER_TURN));
    }

    blocks
}

/// Renders transcripts into paginated PDF bytes.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    geometry: PageGeometry,
    font_path: Option<PathBuf>,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(PageGeometry::a4())
    }
}

impl DocumentRenderer {
    /// A renderer using the built-in fonts.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            font_path: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let export = &config.export;
        let geometry = PageGeometry::from_mm(
            export.page_width_mm,
            export.page_height_mm,
            [
                export.margin_left_mm,
                export.margin_right_mm,
                export.margin_top_mm,
                export.margin_bottom_mm,
            ],
        );
        Self::new(geometry).with_font_path(config.font_path())
    }

    /// Embed this TrueType file when it exists.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }

    /// Font mode a render would use right now, based on the file's presence.
    pub fn font_mode(&self) -> FontMode {
        match &self.font_path {
            Some(path) if path.is_file() => FontMode::Embedded,
            _ => FontMode::Builtin,
        }
    }

    /// Render with the current local time on the export line.
    pub fn render(&self, turns: &[Turn], title: &str) -> Result<Vec<u8>, RenderError> {
        self.render_at(turns, title, Local::now().naive_local())
    }

    /// Render with an explicit export time. Same inputs give the same bytes.
    pub fn render_at(
        &self,
        turns: &[Turn],
        title: &str,
        exported_at: NaiveDateTime,
    ) -> Result<Vec<u8>, RenderError> {
        let source = FontSource::select(self.font_path.as_deref())?;
        let fonts = FontSet::load(&source)?;
        debug!(font = %fonts.mode(), "Font selected");

        let blocks = story(turns, title, exported_at);
        let pages = FlowLayout::new(self.geometry, &fonts).layout(&blocks)?;
        let bytes = pdf::write_pdf(&pages, &self.geometry, &fonts, title);

        info!(
            turns = turns.len(),
            pages = pages.len(),
            bytes = bytes.len(),
            "Transcript rendered"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn seed() -> Turn {
        Turn::greeting("Hello! I am your DSA assistant.")
    }

    fn paragraphs(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.text()),
                Block::Spacer(_) => None,
            })
            .collect()
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02X}")).collect()
    }

    fn fixture_font() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("DejaVuSansMono.ttf")
    }

    #[test]
    fn seed_only_story_has_three_paragraphs() {
        let blocks = story(&[seed()], "Chat Export", at(10, 0, 0));
        let got = paragraphs(&blocks);
        assert_eq!(
            got,
            vec![
                "Chat Export".to_string(),
                "Exported on: 2024-05-01 10:00:00".to_string(),
                "Bot: Hello! I am your DSA assistant.".to_string(),
            ]
        );
        assert_eq!(blocks.len(), 6);
    }

    #[test]
    fn timestamps_follow_content() {
        let turns = vec![
            seed(),
            Turn::at(Role::User, "What is a stack?", at(9, 30, 0)),
        ];
        let got = paragraphs(&story(&turns, "T", at(10, 0, 0)));
        assert_eq!(got[3], "You: What is a stack? (2024-05-01 09:30:00)");
    }

    #[test]
    fn system_turns_are_labelled_bot() {
        let turns = vec![Turn {
            role: Role::System,
            content: "note".into(),
            created_at: String::new(),
        }];
        let got = paragraphs(&story(&turns, "T", at(10, 0, 0)));
        assert_eq!(got[2], "Bot: note");
    }

    #[test]
    fn same_input_gives_identical_bytes() {
        let turns = vec![
            seed(),
            Turn::at(Role::User, "hi", at(9, 0, 0)),
            Turn::at(Role::Assistant, "hello", at(9, 0, 1)),
        ];
        let renderer = DocumentRenderer::default();
        let a = renderer.render_at(&turns, "T", at(10, 0, 0)).unwrap();
        let b = renderer.render_at(&turns, "T", at(10, 0, 0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rendered_text_carries_labels_and_content() {
        let turns = vec![
            seed(),
            Turn::at(Role::User, "What is a stack?", at(9, 0, 0)),
            Turn::at(
                Role::Assistant,
                "A stack is a LIFO structure. Push adds to the top.",
                at(9, 0, 2),
            ),
        ];
        let bytes = DocumentRenderer::default()
            .render_at(&turns, "Chat Export", at(10, 0, 0))
            .unwrap();
        let body = text(&bytes);
        assert!(body.contains("(You:)"));
        assert!(body.contains("(Bot:)"));
        assert!(body.contains("LIFO"));
        assert!(body.contains("Exported on: 2024-05-01 10:00:00"));
    }

    #[test]
    fn smart_punctuation_survives_builtin_export() {
        let content = "It’s a “LIFO” stack — push";
        let turns = vec![Turn::at(Role::Assistant, content, at(9, 0, 2))];
        let bytes = DocumentRenderer::default()
            .render_at(&turns, "Chat Export", at(10, 0, 0))
            .unwrap();

        let encoded = FontSet::Builtin.encode(content);
        assert!(!encoded.contains(&b'?'));
        // Non-ASCII WinAnsi strings are written as hex operands.
        assert!(text(&bytes).contains(&hex(&encoded)));
    }

    #[test]
    fn embedded_font_export_is_extractable_and_stable() {
        let renderer = DocumentRenderer::default().with_font_path(fixture_font());
        assert_eq!(renderer.font_mode(), FontMode::Embedded);

        let turns = vec![
            seed(),
            Turn::at(Role::User, "What is a stack?", at(9, 0, 0)),
            Turn::at(Role::Assistant, "A stack is LIFO.", at(9, 0, 2)),
        ];
        let a = renderer.render_at(&turns, "Chat Export", at(10, 0, 0)).unwrap();
        let b = renderer.render_at(&turns, "Chat Export", at(10, 0, 0)).unwrap();
        assert_eq!(a, b);

        let body = text(&a);
        assert!(body.contains("/ToUnicode"));
        assert!(body.contains("beginbfchar"));
        assert!(body.contains("/DejaVuSansMono"));
        assert!(!body.contains("/Helvetica"));
    }

    #[test]
    fn long_transcript_spans_pages() {
        let mut turns = vec![seed()];
        for i in 0..80 {
            turns.push(Turn::at(Role::User, format!("question {i}"), at(9, 0, 0)));
            turns.push(Turn::at(
                Role::Assistant,
                format!("answer {i}\n    step one\n    step two"),
                at(9, 0, 1),
            ));
        }
        let renderer = DocumentRenderer::default();
        let fonts = FontSet::Builtin;
        let pages = FlowLayout::new(*renderer.geometry(), &fonts)
            .layout(&story(&turns, "T", at(10, 0, 0)))
            .unwrap();
        assert!(pages.len() > 1);

        let all: String = pages.iter().map(|p| p.text()).collect::<Vec<_>>().join("\n");
        assert!(all.contains("question 79"));
        assert!(all.contains("\n    step two"));

        let bytes = renderer.render_at(&turns, "T", at(10, 0, 0)).unwrap();
        assert!(text(&bytes).contains(&format!("/Count {}", pages.len())));
    }

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DocumentRenderer::default().with_font_path(dir.path().join("missing.ttf"));
        assert_eq!(renderer.font_mode(), FontMode::Builtin);

        let bytes = renderer.render_at(&[seed()], "T", at(10, 0, 0)).unwrap();
        assert!(text(&bytes).contains("/Helvetica"));
    }

    #[test]
    fn broken_font_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"garbage").unwrap();

        let renderer = DocumentRenderer::default().with_font_path(&path);
        assert_eq!(renderer.font_mode(), FontMode::Embedded);
        let err = renderer.render_at(&[seed()], "T", at(10, 0, 0)).unwrap_err();
        assert!(matches!(err, RenderError::Font { .. }));
    }

    #[test]
    fn geometry_from_config() {
        let mut config = AppConfig::default();
        config.export.margin_left_mm = 10.0;
        let renderer = DocumentRenderer::from_config(&config);
        let g = renderer.geometry();
        assert!((g.width - PageGeometry::a4().width).abs() < 0.001);
        assert!(g.margin_left < g.margin_right);
        assert!(renderer.font_path().is_some());
    }
}
