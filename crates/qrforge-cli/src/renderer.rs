//! SVG renderer backed by the `qrcode` crate.

use qrcode::render::svg;
use qrcode::QrCode;

use qrforge_core::models::ColorConfig;
use qrforge_core::render::{ExportFormat, RenderError, Renderer};

/// Renders payloads as SVG documents. Gradients, background images and
/// logos are compositing concerns and not applied here; foreground and
/// background colors are.
pub struct SvgRenderer;

impl SvgRenderer {
    fn render_svg(
        &self,
        payload: &str,
        colors: &ColorConfig,
        size_px: u32,
    ) -> Result<String, RenderError> {
        let code =
            QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Encoding(e.to_string()))?;
        let background = if colors.transparent_background == Some(true) {
            "transparent"
        } else {
            colors.background.as_str()
        };
        Ok(code
            .render::<svg::Color>()
            .min_dimensions(size_px, size_px)
            .dark_color(svg::Color(&colors.foreground))
            .light_color(svg::Color(background))
            .quiet_zone(true)
            .build())
    }
}

impl Renderer for SvgRenderer {
    fn thumbnail(
        &self,
        payload: &str,
        colors: &ColorConfig,
        size_px: u32,
    ) -> Result<String, RenderError> {
        self.render_svg(payload, colors, size_px)
    }

    fn export(
        &self,
        payload: &str,
        colors: &ColorConfig,
        format: ExportFormat,
        resolution: Option<u32>,
    ) -> Result<Vec<u8>, RenderError> {
        match format {
            ExportFormat::Svg => {
                let size = resolution.unwrap_or(1024);
                Ok(self.render_svg(payload, colors, size)?.into_bytes())
            }
            other => Err(RenderError::UnsupportedFormat(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_with_configured_colors() {
        let colors = ColorConfig {
            foreground: "#112233".to_string(),
            ..Default::default()
        };
        let svg = SvgRenderer
            .thumbnail("https://example.com", &colors, 100)
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#112233"));
    }

    #[test]
    fn png_export_is_unsupported() {
        let result = SvgRenderer.export(
            "tel:+1555",
            &ColorConfig::default(),
            ExportFormat::Png,
            None,
        );
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(_))));
    }
}
