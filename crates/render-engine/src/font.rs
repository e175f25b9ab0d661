//! Font loading, measurement, and glyph painting.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use shortsmith_common::error::{SmithError, SmithResult};
use shortsmith_compose_core::layout::TextMeasure;

/// Common system faces tried when no font is configured or the configured
/// file cannot be loaded.
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

/// Load the configured font, degrading to a system fallback face.
///
/// A missing or unparsable configured font is a warning, not a job
/// failure; the render only fails when no candidate face loads at all.
pub fn load_font(configured: Option<&Path>) -> SmithResult<Arc<Font>> {
    if let Some(path) = configured {
        match read_font(path) {
            Ok(font) => return Ok(Arc::new(font)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Configured font unusable, trying fallback faces"
                );
            }
        }
    }

    for candidate in FALLBACK_FONT_PATHS {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match read_font(path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "Using fallback font");
                return Ok(Arc::new(font));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Fallback font unusable");
            }
        }
    }

    Err(SmithError::font(
        "no usable font face found; set render.font_path in the config",
    ))
}

fn read_font(path: &Path) -> SmithResult<Font> {
    let bytes = std::fs::read(path)?;
    Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| SmithError::font(format!("failed to parse font {}: {e}", path.display())))
}

#[derive(Debug, Clone)]
struct GlyphBitmap {
    width: usize,
    height: usize,
    bitmap: Vec<u8>,
}

/// Paints single lines of text into an RGB24 frame buffer at a fixed size.
///
/// Rasterized glyphs are cached per (glyph, size) so repeated subtitle
/// frames reuse their bitmaps.
pub struct TextPainter {
    font: Arc<Font>,
    size: f32,
    glyph_cache: HashMap<GlyphRasterConfig, GlyphBitmap>,
}

impl TextPainter {
    pub fn new(font: Arc<Font>, size: f32) -> Self {
        Self {
            font,
            size,
            glyph_cache: HashMap::new(),
        }
    }

    /// Vertical advance between stacked lines at this size.
    pub fn line_height(&self) -> u32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map(|m| m.new_line_size)
            .unwrap_or(self.size * 1.2)
            .ceil()
            .max(1.0) as u32
    }

    /// Measured width of a single text run.
    pub fn line_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, self.size).advance_width)
            .sum()
    }

    /// Draw one line with its top-left corner at `(x, y)`.
    pub fn draw_line(
        &mut self,
        frame: &mut [u8],
        frame_width: u32,
        frame_height: u32,
        x: i32,
        y: i32,
        text: &str,
        color: [u8; 3],
    ) {
        if text.is_empty() {
            return;
        }

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: x as f32,
            y: y as f32,
            ..LayoutSettings::default()
        });
        layout.append(&[self.font.as_ref()], &TextStyle::new(text, self.size, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let bitmap = self.glyph_cache.entry(glyph.key).or_insert_with(|| {
                let (_, bitmap) = self.font.rasterize_config(glyph.key);
                GlyphBitmap {
                    width: glyph.width,
                    height: glyph.height,
                    bitmap,
                }
            });

            blend_glyph(
                frame,
                frame_width,
                frame_height,
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                bitmap,
                color,
            );
        }
    }
}

impl TextMeasure for TextPainter {
    fn text_width(&self, text: &str) -> f32 {
        self.line_width(text)
    }
}

fn blend_glyph(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    x: i32,
    y: i32,
    glyph: &GlyphBitmap,
    color: [u8; 3],
) {
    for row in 0..glyph.height {
        let py = y + row as i32;
        if py < 0 || py >= frame_height as i32 {
            continue;
        }

        for col in 0..glyph.width {
            let px = x + col as i32;
            if px < 0 || px >= frame_width as i32 {
                continue;
            }

            let coverage = glyph.bitmap[row * glyph.width + col];
            if coverage == 0 {
                continue;
            }

            let idx = ((py as u32 * frame_width + px as u32) * 3) as usize;
            blend_pixel(frame, idx, color, coverage);
        }
    }
}

/// Blend `color` over the RGB pixel at byte offset `idx` with the given
/// alpha.
pub fn blend_pixel(frame: &mut [u8], idx: usize, color: [u8; 3], alpha: u8) {
    let a = alpha as u16;
    for channel in 0..3 {
        let dst = frame[idx + channel] as u16;
        let src = color[channel] as u16;
        frame[idx + channel] = ((src * a + dst * (255 - a)) / 255) as u8;
    }
}
