//! Font selection for one render.
//!
//! If the configured TrueType file exists it is embedded as a CID font and
//! every weight draws with it. Otherwise the built-in Helvetica pair is used,
//! which only covers WinAnsi text; other characters render as `?`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use pdf_writer::Rect;
use ttf_parser::{Face, GlyphId};

use crate::layout::{TextMeasure, TextStyle, Weight};
use crate::metrics;
use crate::RenderError;

/// Resource name of the regular (or only) font on every page.
pub(crate) const REGULAR_RESOURCE: &[u8] = b"F1";
/// Resource name of the built-in bold font.
pub(crate) const BOLD_RESOURCE: &[u8] = b"F2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontMode {
    Builtin,
    Embedded,
}

impl fmt::Display for FontMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "built-in Helvetica"),
            Self::Embedded => write!(f, "embedded TrueType"),
        }
    }
}

/// Font bytes chosen for a render, before parsing.
#[derive(Debug)]
pub enum FontSource {
    Builtin,
    TrueType { path: PathBuf, data: Vec<u8> },
}

impl FontSource {
    /// Use the file at `path` if it exists, otherwise the built-in fonts.
    ///
    /// A path that exists but cannot be read is an error.
    pub fn select(path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) if path.is_file() => {
                let data = std::fs::read(path).map_err(|e| RenderError::Font {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                Ok(Self::TrueType {
                    path: path.to_path_buf(),
                    data,
                })
            }
            _ => Ok(Self::Builtin),
        }
    }

    pub fn mode(&self) -> FontMode {
        match self {
            Self::Builtin => FontMode::Builtin,
            Self::TrueType { .. } => FontMode::Embedded,
        }
    }
}

/// A parsed TrueType face borrowed from its [`FontSource`].
pub struct EmbeddedFont<'a> {
    pub(crate) base_name: String,
    pub(crate) data: &'a [u8],
    face: Face<'a>,
    scale: f32,
}

impl EmbeddedFont<'_> {
    fn units(&self, value: i16) -> f32 {
        value as f32 * self.scale
    }

    fn glyph(&self, ch: char) -> GlyphId {
        self.face.glyph_index(ch).unwrap_or(GlyphId(0))
    }

    fn advance(&self, glyph: GlyphId) -> f32 {
        self.face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * self.scale
    }

    /// Glyph id to character for every glyph `texts` draw, for `/ToUnicode`.
    ///
    /// The first character seen wins when several share a glyph. Characters
    /// the face lacks are left out.
    pub(crate) fn unicode_map<'t>(
        &self,
        texts: impl IntoIterator<Item = &'t str>,
    ) -> BTreeMap<u16, char> {
        let mut map = BTreeMap::new();
        for ch in texts.into_iter().flat_map(str::chars) {
            let GlyphId(id) = self.glyph(ch);
            if id != 0 {
                map.entry(id).or_insert(ch);
            }
        }
        map
    }

    /// Advance of every glyph in glyph-id order, in 1/1000 em.
    pub(crate) fn glyph_widths(&self) -> Vec<f32> {
        (0..self.face.number_of_glyphs())
            .map(|id| self.advance(GlyphId(id)))
            .collect()
    }

    pub(crate) fn bbox(&self) -> Rect {
        let b = self.face.global_bounding_box();
        Rect::new(
            self.units(b.x_min),
            self.units(b.y_min),
            self.units(b.x_max),
            self.units(b.y_max),
        )
    }

    pub(crate) fn ascent(&self) -> f32 {
        self.units(self.face.ascender())
    }

    pub(crate) fn descent(&self) -> f32 {
        self.units(self.face.descender())
    }

    pub(crate) fn cap_height(&self) -> f32 {
        self.units(self.face.capital_height().unwrap_or(self.face.ascender()))
    }
}

/// The fonts used by one render.
pub enum FontSet<'a> {
    Builtin,
    Embedded(EmbeddedFont<'a>),
}

impl<'a> FontSet<'a> {
    pub fn load(source: &'a FontSource) -> Result<Self, RenderError> {
        match source {
            FontSource::Builtin => Ok(Self::Builtin),
            FontSource::TrueType { path, data } => {
                let face = Face::parse(data, 0).map_err(|e| RenderError::Font {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                let scale = 1000.0 / face.units_per_em() as f32;
                Ok(Self::Embedded(EmbeddedFont {
                    base_name: base_name(path),
                    data,
                    face,
                    scale,
                }))
            }
        }
    }

    pub fn mode(&self) -> FontMode {
        match self {
            Self::Builtin => FontMode::Builtin,
            Self::Embedded(_) => FontMode::Embedded,
        }
    }

    /// Page resource name for a weight. Embedded fonts have a single face.
    pub(crate) fn resource_name(&self, weight: Weight) -> &'static [u8] {
        match (self, weight) {
            (Self::Builtin, Weight::Bold) => BOLD_RESOURCE,
            _ => REGULAR_RESOURCE,
        }
    }

    /// Encode text for a `Tj` operand: WinAnsi bytes, or big-endian glyph ids.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Builtin => text.chars().map(metrics::winansi_byte).collect(),
            Self::Embedded(font) => text
                .chars()
                .flat_map(|ch| font.glyph(ch).0.to_be_bytes())
                .collect(),
        }
    }
}

impl TextMeasure for FontSet<'_> {
    fn width(&self, text: &str, style: &TextStyle) -> f32 {
        let units: f32 = match self {
            Self::Builtin => {
                let bold = style.weight == Weight::Bold;
                text.chars()
                    .map(|ch| metrics::helvetica_width(ch, bold) as f32)
                    .sum()
            }
            Self::Embedded(font) => text.chars().map(|ch| font.advance(font.glyph(ch))).sum(),
        };
        units * style.size / 1000.0
    }
}

/// PDF base font name from the file stem, restricted to name-safe characters.
fn base_name(path: &Path) -> String {
    let stem: String = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if stem.is_empty() {
        "EmbeddedFont".into()
    } else {
        stem
    }
}
