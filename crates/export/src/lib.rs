//! PDF export of chat transcripts.
//!
//! [`DocumentRenderer`] turns a transcript snapshot into PDF bytes in one
//! call. Rendering either returns a complete document or a [`RenderError`];
//! nothing is written to disk here, so a failed render never leaves a
//! partial file behind.

pub mod fonts;
pub mod layout;
mod metrics;
pub mod pdf;
pub mod renderer;

use std::path::PathBuf;

pub use fonts::FontMode;
pub use layout::PageGeometry;
pub use renderer::{story, DocumentRenderer};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to load font {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("Cannot lay out block {block}: {reason}")]
    Layout { block: usize, reason: String },
}

impl From<RenderError> for dost_core::Error {
    fn from(e: RenderError) -> Self {
        dost_core::Error::Render {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_maps_into_core_error() {
        let err: dost_core::Error = RenderError::Layout {
            block: 3,
            reason: "too tall".into(),
        }
        .into();
        assert!(err.to_string().contains("too tall"));
        assert!(matches!(err, dost_core::Error::Render { .. }));
    }
}
