//! Flow layout: styled paragraphs and spacers poured into page frames.
//!
//! Paragraphs are broken into lines that fit the frame width and placed top
//! to bottom; when the next line does not fit above the bottom margin a new
//! page starts. Paragraphs may split across pages. Explicit newlines always
//! break, leading spaces after a newline are kept, tabs expand to four
//! spaces, and a word or indentation run wider than the frame is broken
//! between characters.

use crate::RenderError;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

const TAB: &str = "    ";

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// Build from millimetre measurements. Margins are `[left, right, top, bottom]`.
    pub fn from_mm(width: f32, height: f32, margins: [f32; 4]) -> Self {
        Self {
            width: width * MM,
            height: height * MM,
            margin_left: margins[0] * MM,
            margin_right: margins[1] * MM,
            margin_top: margins[2] * MM,
            margin_bottom: margins[3] * MM,
        }
    }

    /// A4 with 20 mm margins all round.
    pub fn a4() -> Self {
        Self::from_mm(210.0, 297.0, [20.0; 4])
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn frame_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Y coordinate of the top of the frame (PDF origin is bottom-left).
    pub fn frame_top(&self) -> f32 {
        self.height - self.margin_top
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub leading: f32,
    pub weight: Weight,
    /// Fill gray level, 0.0 is black.
    pub gray: f32,
}

impl TextStyle {
    pub const fn regular(size: f32, leading: f32) -> Self {
        Self {
            size,
            leading,
            weight: Weight::Regular,
            gray: 0.0,
        }
    }

    pub const fn bold(size: f32, leading: f32) -> Self {
        Self {
            size,
            leading,
            weight: Weight::Bold,
            gray: 0.0,
        }
    }

    pub const fn with_gray(mut self, gray: f32) -> Self {
        self.gray = gray;
        self
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
}

impl Span {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub align: Align,
}

impl Paragraph {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            align: Align::Left,
        }
    }

    pub fn centered(spans: Vec<Span>) -> Self {
        Self {
            spans,
            align: Align::Center,
        }
    }

    /// All span text concatenated.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    /// Vertical gap in points. Dropped when it would fall at a page top.
    Spacer(f32),
}

/// Text measurement used for line breaking.
pub trait TextMeasure {
    /// Width of `text` in points when set in `style`.
    fn width(&self, text: &str, style: &TextStyle) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFragment {
    pub x: f32,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub baseline: f32,
    pub fragments: Vec<PlacedFragment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    /// Every fragment's text on this page, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.fragments.iter().map(|f| f.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A broken but not yet positioned line.
#[derive(Debug)]
struct Line {
    fragments: Vec<(String, TextStyle, f32)>,
    width: f32,
    leading: f32,
    size: f32,
}

impl Line {
    fn new(style: &TextStyle) -> Self {
        Self {
            fragments: Vec::new(),
            width: 0.0,
            leading: style.leading,
            size: style.size,
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, text: &str, style: &TextStyle, width: f32) {
        match self.fragments.last_mut() {
            Some((last, last_style, last_width)) if *last_style == *style => {
                last.push_str(text);
                *last_width += width;
            }
            _ => self.fragments.push((text.to_string(), *style, width)),
        }
        self.width += width;
        self.leading = self.leading.max(style.leading);
        self.size = self.size.max(style.size);
    }
}

enum Token<'a> {
    Word(&'a str),
    Space(String),
    Newline,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '\n' => {
                tokens.push(Token::Newline);
                rest = &rest[1..];
            }
            '\r' => rest = &rest[1..],
            ' ' | '\t' => {
                let end = rest.find(|c: char| c != ' ' && c != '\t').unwrap_or(rest.len());
                let run = rest[..end].replace('\t', TAB);
                tokens.push(Token::Space(run));
                rest = &rest[end..];
            }
            _ => {
                let end = rest.find([' ', '\t', '\n', '\r']).unwrap_or(rest.len());
                tokens.push(Token::Word(&rest[..end]));
                rest = &rest[end..];
            }
        }
    }
    tokens
}

/// Lays blocks out into pages for one page geometry.
pub struct FlowLayout<'m, M: TextMeasure> {
    geometry: PageGeometry,
    measure: &'m M,
}

impl<'m, M: TextMeasure> FlowLayout<'m, M> {
    pub fn new(geometry: PageGeometry, measure: &'m M) -> Self {
        Self { geometry, measure }
    }

    /// Lay out every block. Always yields at least one page.
    pub fn layout(&self, blocks: &[Block]) -> Result<Vec<Page>, RenderError> {
        let g = &self.geometry;
        if g.frame_width() <= 0.0 || g.frame_height() <= 0.0 {
            return Err(RenderError::Layout {
                block: 0,
                reason: "page margins leave no room for text".into(),
            });
        }

        let mut pages = vec![Page::default()];
        let mut y = g.frame_top();

        for (index, block) in blocks.iter().enumerate() {
            match block {
                Block::Spacer(height) => {
                    if y < g.frame_top() {
                        y = (y - height).max(g.margin_bottom);
                    }
                }
                Block::Paragraph(paragraph) => {
                    for line in self.break_lines(paragraph) {
                        if line.leading > g.frame_height() {
                            return Err(RenderError::Layout {
                                block: index,
                                reason: format!(
                                    "line height {:.1}pt exceeds frame height {:.1}pt",
                                    line.leading,
                                    g.frame_height()
                                ),
                            });
                        }
                        if y - line.leading < g.margin_bottom {
                            pages.push(Page::default());
                            y = g.frame_top();
                        }

                        let offset = match paragraph.align {
                            Align::Left => 0.0,
                            Align::Center => ((g.frame_width() - line.width) / 2.0).max(0.0),
                        };
                        let mut x = g.margin_left + offset;
                        let fragments = line
                            .fragments
                            .into_iter()
                            .map(|(text, style, width)| {
                                let placed = PlacedFragment { x, text, style };
                                x += width;
                                placed
                            })
                            .collect();

                        let baseline = y - line.leading + line.size * 0.2;
                        if let Some(page) = pages.last_mut() {
                            page.lines.push(PlacedLine {
                                baseline,
                                fragments,
                            });
                        }
                        y -= line.leading;
                    }
                }
            }
        }

        Ok(pages)
    }

    fn break_lines(&self, paragraph: &Paragraph) -> Vec<Line> {
        let max_width = self.geometry.frame_width();
        let first_style = paragraph
            .spans
            .first()
            .map(|s| s.style)
            .unwrap_or(TextStyle::regular(11.0, 14.0));

        let mut lines = Vec::new();
        let mut current = Line::new(&first_style);
        // True when `current` was opened by wrapping rather than a newline.
        let mut wrapped = false;

        for span in &paragraph.spans {
            let style = &span.style;
            for token in tokenize(&span.text) {
                match token {
                    Token::Newline => {
                        lines.push(std::mem::replace(&mut current, Line::new(style)));
                        wrapped = false;
                    }
                    Token::Space(run) => {
                        if current.is_empty() && wrapped {
                            continue;
                        }
                        let width = self.measure.width(&run, style);
                        if current.width + width <= max_width {
                            current.push(&run, style, width);
                        } else if !current.is_empty() {
                            lines.push(std::mem::replace(&mut current, Line::new(style)));
                            wrapped = true;
                        } else {
                            // Indentation wider than the frame.
                            self.break_chars(&run, style, &mut lines, &mut current, &mut wrapped);
                        }
                    }
                    Token::Word(word) => {
                        let width = self.measure.width(word, style);
                        if current.width + width <= max_width {
                            current.push(word, style, width);
                        } else if !current.is_empty() && width <= max_width {
                            lines.push(std::mem::replace(&mut current, Line::new(style)));
                            wrapped = true;
                            current.push(word, style, width);
                        } else {
                            self.break_chars(word, style, &mut lines, &mut current, &mut wrapped);
                        }
                    }
                }
            }
        }

        lines.push(current);
        lines
    }

    /// Place `text` one character at a time, wrapping wherever it overflows.
    fn break_chars(
        &self,
        text: &str,
        style: &TextStyle,
        lines: &mut Vec<Line>,
        current: &mut Line,
        wrapped: &mut bool,
    ) {
        let max_width = self.geometry.frame_width();
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let piece = ch.encode_utf8(&mut buf);
            let w = self.measure.width(piece, style);
            if current.width + w > max_width && !current.is_empty() {
                lines.push(std::mem::replace(current, Line::new(style)));
                *wrapped = true;
            }
            current.push(piece, style, w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is half an em wide.
    struct Mono;

    impl TextMeasure for Mono {
        fn width(&self, text: &str, style: &TextStyle) -> f32 {
            text.chars().count() as f32 * style.size * 0.5
        }
    }

    const BODY: TextStyle = TextStyle::regular(10.0, 12.0);

    /// 100pt wide frame: 20 characters of BODY per line.
    fn narrow(height: f32) -> PageGeometry {
        PageGeometry {
            width: 120.0,
            height,
            margin_left: 10.0,
            margin_right: 10.0,
            margin_top: 10.0,
            margin_bottom: 10.0,
        }
    }

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph::new(vec![Span::new(text, BODY)]))
    }

    fn lines(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.text().lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn a4_geometry_in_points() {
        let g = PageGeometry::a4();
        assert!((g.width - 595.28).abs() < 0.01);
        assert!((g.height - 841.89).abs() < 0.01);
        assert!((g.margin_left - 56.69).abs() < 0.01);
        assert!((g.frame_width() - (g.width - 2.0 * g.margin_left)).abs() < 0.001);
    }

    #[test]
    fn words_wrap_at_frame_width() {
        let pages = FlowLayout::new(narrow(500.0), &Mono)
            .layout(&[para("alpha beta gamma delta epsilon")])
            .unwrap();
        let got = lines(&pages);
        assert_eq!(got, vec!["alpha beta gamma ", "delta epsilon"]);
    }

    #[test]
    fn newlines_break_and_keep_indentation() {
        let pages = FlowLayout::new(narrow(500.0), &Mono)
            .layout(&[para("fn f() {\n    x += 1;\n}")])
            .unwrap();
        assert_eq!(lines(&pages), vec!["fn f() {", "    x += 1;", "}"]);
    }

    #[test]
    fn tabs_expand_to_four_spaces() {
        let pages = FlowLayout::new(narrow(500.0), &Mono)
            .layout(&[para("a\n\tb")])
            .unwrap();
        assert_eq!(lines(&pages), vec!["a", "    b"]);
    }

    #[test]
    fn long_word_breaks_between_characters() {
        let word = "x".repeat(45);
        let pages = FlowLayout::new(narrow(500.0), &Mono).layout(&[para(&word)]).unwrap();
        let got = lines(&pages);
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].len(), 20);
        assert_eq!(got[2].len(), 5);
        assert_eq!(got.concat(), word);
    }

    #[test]
    fn indentation_wider_than_frame_breaks() {
        let text = format!("a\n{}b", " ".repeat(30));
        let pages = FlowLayout::new(narrow(400.0), &Mono)
            .layout(&[para(&text)])
            .unwrap();
        let got = lines(&pages);
        assert_eq!(
            got,
            vec!["a".to_string(), " ".repeat(20), format!("{}b", " ".repeat(10))]
        );
        assert!(got.iter().all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn blank_lines_take_vertical_space() {
        let pages = FlowLayout::new(narrow(500.0), &Mono).layout(&[para("a\n\nb")]).unwrap();
        let page = &pages[0];
        assert_eq!(page.lines.len(), 3);
        assert!(page.lines[1].fragments.is_empty());
        let gap = page.lines[0].baseline - page.lines[2].baseline;
        assert!((gap - 24.0).abs() < 0.001);
    }

    #[test]
    fn long_content_paginates() {
        // Frame of 60pt holds 5 lines of 12pt leading.
        let text = vec!["line"; 12].join("\n");
        let pages = FlowLayout::new(narrow(80.0), &Mono).layout(&[para(&text)]).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), 5);
        assert_eq!(pages[2].lines.len(), 2);
        for page in &pages {
            for line in &page.lines {
                assert!(line.baseline >= 10.0);
                assert!(line.baseline <= 70.0);
            }
        }
    }

    #[test]
    fn mixed_spans_share_a_line() {
        let label = TextStyle::bold(10.0, 12.0);
        let stamp = TextStyle::regular(6.0, 8.0).with_gray(0.5);
        let block = Block::Paragraph(Paragraph::new(vec![
            Span::new("You:", label),
            Span::new(" hi", BODY),
            Span::new(" (t)", stamp),
        ]));
        let pages = FlowLayout::new(narrow(500.0), &Mono).layout(&[block]).unwrap();
        let line = &pages[0].lines[0];
        assert_eq!(line.fragments.len(), 3);
        assert_eq!(line.fragments[0].x, 10.0);
        assert_eq!(line.fragments[1].x, 30.0);
        assert_eq!(line.fragments[2].x, 45.0);
        assert_eq!(line.fragments[2].style.gray, 0.5);
    }

    #[test]
    fn centered_paragraph_is_offset() {
        let block = Block::Paragraph(Paragraph::centered(vec![Span::new("abcd", BODY)]));
        let pages = FlowLayout::new(narrow(500.0), &Mono).layout(&[block]).unwrap();
        // 20pt of text in a 100pt frame starting at 10.
        assert_eq!(pages[0].lines[0].fragments[0].x, 50.0);
    }

    #[test]
    fn spacer_at_page_top_is_dropped() {
        let pages = FlowLayout::new(narrow(500.0), &Mono)
            .layout(&[Block::Spacer(50.0), para("a")])
            .unwrap();
        let first = pages[0].lines[0].baseline;
        assert!((first - (490.0 - 12.0 + 2.0)).abs() < 0.001);
    }

    #[test]
    fn trailing_spacer_adds_no_page() {
        let text = vec!["line"; 5].join("\n");
        let pages = FlowLayout::new(narrow(80.0), &Mono)
            .layout(&[para(&text), Block::Spacer(30.0)])
            .unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn empty_story_still_has_a_page() {
        let pages = FlowLayout::new(narrow(500.0), &Mono).layout(&[]).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn oversized_line_is_an_error() {
        let tall = TextStyle::regular(40.0, 70.0);
        let block = Block::Paragraph(Paragraph::new(vec![Span::new("x", tall)]));
        let err = FlowLayout::new(narrow(80.0), &Mono)
            .layout(&[para("fine"), block])
            .unwrap_err();
        assert!(matches!(err, RenderError::Layout { block: 1, .. }));
    }

    #[test]
    fn margins_wider_than_page_are_an_error() {
        let mut g = narrow(500.0);
        g.margin_left = 200.0;
        let err = FlowLayout::new(g, &Mono).layout(&[para("a")]).unwrap_err();
        assert!(matches!(err, RenderError::Layout { .. }));
    }
}
