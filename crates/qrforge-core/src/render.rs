//! Renderer abstraction.
//!
//! The visual QR engine is an external collaborator. The history store
//! and frontends depend only on this trait: a pure function of
//! (payload, style) invoked freshly per thumbnail or export, never a
//! shared stateful instance.

use thiserror::Error;

use crate::models::ColorConfig;

/// Logical pixel size of history thumbnails.
pub const THUMBNAIL_SIZE: u32 = 100;

/// Output format for a full-size export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
    Jpeg,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Jpeg => "jpeg",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("payload cannot be encoded as a QR code: {0}")]
    Encoding(String),
    #[error("export format {0} is not supported by this renderer")]
    UnsupportedFormat(ExportFormat),
}

/// Produces images from a payload string and a style configuration.
pub trait Renderer {
    /// Render a small preview, returned as an embeddable image string
    /// (data URL or inline SVG).
    fn thumbnail(
        &self,
        payload: &str,
        colors: &ColorConfig,
        size_px: u32,
    ) -> Result<String, RenderError>;

    /// Render a full-size export in the requested format.
    fn export(
        &self,
        payload: &str,
        colors: &ColorConfig,
        format: ExportFormat,
        resolution: Option<u32>,
    ) -> Result<Vec<u8>, RenderError>;
}
