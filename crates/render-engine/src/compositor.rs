//! Frame compositor: layers title, rotating image, and active subtitle
//! over the aspect-normalized base frame.
//!
//! Composition is a pure function of elapsed clip time and the immutable
//! per-job state built at construction. The compositor never touches
//! storage; it is invoked once per output frame by the export driver.

use std::path::PathBuf;
use std::sync::Arc;

use fontdue::Font;
use image::imageops::FilterType;
use image::RgbaImage;
use shortsmith_compose_core::carousel;
use shortsmith_compose_core::cue::{active_cue_at, SubtitleCue};
use shortsmith_compose_core::layout::wrap_text;

use crate::font::{blend_pixel, TextPainter};

const TITLE_COLOR: [u8; 3] = [255, 255, 255];
const SUBTITLE_COLOR: [u8; 3] = [255, 255, 0];
const SCRIM_COLOR: [u8; 3] = [0, 0, 0];
const SCRIM_ALPHA: u8 = 180;

/// Pixel layout constants derived from the output frame dimensions.
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle {
    pub width: u32,
    pub height: u32,

    /// Title face size (~5.5% of frame height).
    pub title_font_px: f32,
    /// Subtitle face size, slightly smaller for readability.
    pub subtitle_font_px: f32,

    /// Title wrap bound (~85% of frame width).
    pub title_max_width: f32,
    /// Subtitle wrap bound (~90% of frame width).
    pub subtitle_max_width: f32,

    /// Title block anchor below the top edge.
    pub top_margin: i32,
    /// Gap between stacked text lines.
    pub line_gap: i32,

    /// Square bound the overlay image is fitted into (~96% of width).
    pub image_max_dim: u32,
    /// Vertical buffer above and below the overlay image.
    pub image_buffer: i32,

    /// Target distance from the lowest subtitle line to the bottom edge.
    pub subtitle_bottom_margin: i32,
    /// Minimum clearance between subtitles and the content above them.
    pub subtitle_clearance: i32,

    /// Scrim padding around each subtitle line's bounding box.
    pub scrim_pad_x: i32,
    pub scrim_pad_y: i32,
}

impl FrameStyle {
    pub fn for_frame(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            width,
            height,
            title_font_px: h * 0.055,
            subtitle_font_px: h * 0.05,
            title_max_width: w * 0.85,
            subtitle_max_width: w * 0.90,
            top_margin: (h * 0.02) as i32,
            line_gap: (h * 0.005) as i32,
            image_max_dim: (w * 0.96) as u32,
            image_buffer: (h * 0.03) as i32,
            subtitle_bottom_margin: (h * 0.18) as i32,
            subtitle_clearance: (h * 0.02) as i32,
            scrim_pad_x: (w * 0.01) as i32,
            scrim_pad_y: (h * 0.005) as i32,
        }
    }
}

/// Per-job compositing state: wrapped title, cues, prepared images, and
/// the two text painters. Read-only across frames apart from the glyph
/// caches.
pub struct Compositor {
    style: FrameStyle,
    narration_secs: f64,
    title_lines: Vec<String>,
    title_bottom: i32,
    cues: Vec<SubtitleCue>,
    images: Vec<RgbaImage>,
    title_painter: TextPainter,
    subtitle_painter: TextPainter,
}

impl Compositor {
    pub fn new(
        font: Arc<Font>,
        style: FrameStyle,
        title: &str,
        cues: Vec<SubtitleCue>,
        images: Vec<RgbaImage>,
        narration_secs: f64,
    ) -> Self {
        let title_painter = TextPainter::new(font.clone(), style.title_font_px);
        let subtitle_painter = TextPainter::new(font, style.subtitle_font_px);

        // Title layout is static for the whole clip.
        let title_lines = wrap_text(title, &title_painter, style.title_max_width);
        let line_advance = title_painter.line_height() as i32 + style.line_gap;
        let title_bottom = style.top_margin + title_lines.len() as i32 * line_advance;

        Self {
            style,
            narration_secs,
            title_lines,
            title_bottom,
            cues,
            images,
            title_painter,
            subtitle_painter,
        }
    }

    /// Composite all overlay layers for time `t` onto `frame` in place.
    ///
    /// `frame` is the aspect-normalized base frame as packed RGB24,
    /// `width * height * 3` bytes.
    pub fn compose(&mut self, t: f64, frame: &mut [u8]) {
        debug_assert_eq!(
            frame.len(),
            (self.style.width * self.style.height * 3) as usize
        );

        self.draw_title(frame);
        let content_bottom = self.draw_image(t, frame);
        self.draw_subtitle(t, frame, content_bottom);
    }

    fn draw_title(&mut self, frame: &mut [u8]) {
        let advance = self.title_painter.line_height() as i32 + self.style.line_gap;
        let mut y = self.style.top_margin;

        for line in &self.title_lines {
            let line_width = self.title_painter.line_width(line);
            let x = ((self.style.width as f32 - line_width) / 2.0) as i32;
            self.title_painter.draw_line(
                frame,
                self.style.width,
                self.style.height,
                x,
                y,
                line,
                TITLE_COLOR,
            );
            y += advance;
        }
    }

    /// Returns the y coordinate below which subtitles may start.
    fn draw_image(&mut self, t: f64, frame: &mut [u8]) -> i32 {
        let Some(index) = carousel::asset_index(t, self.narration_secs, self.images.len()) else {
            return self.title_bottom;
        };

        let img = &self.images[index];
        let x = (self.style.width.saturating_sub(img.width()) / 2) as i32;
        let y = self.title_bottom + self.style.image_buffer;

        paste_rgba(frame, self.style.width, self.style.height, x, y, img);

        y + img.height() as i32 + self.style.image_buffer
    }

    fn draw_subtitle(&mut self, t: f64, frame: &mut [u8], content_bottom: i32) {
        let Some(cue) = active_cue_at(&self.cues, t) else {
            return;
        };

        let lines = wrap_text(
            &cue.text,
            &self.subtitle_painter,
            self.style.subtitle_max_width,
        );
        if lines.is_empty() {
            return;
        }

        let line_height = self.subtitle_painter.line_height() as i32;
        let advance = line_height + self.style.line_gap;
        let total_height = lines.len() as i32 * advance;

        let mut y = subtitle_origin_y(
            self.style.height as i32,
            self.style.subtitle_bottom_margin,
            total_height,
            content_bottom + self.style.subtitle_clearance,
        );

        for line in &lines {
            let line_width = self.subtitle_painter.line_width(line).ceil() as i32;
            let x = (self.style.width as i32 - line_width) / 2;

            fill_rect(
                frame,
                self.style.width,
                self.style.height,
                x - self.style.scrim_pad_x,
                y - self.style.scrim_pad_y,
                line_width + 2 * self.style.scrim_pad_x,
                line_height + 2 * self.style.scrim_pad_y,
                SCRIM_COLOR,
                SCRIM_ALPHA,
            );
            self.subtitle_painter.draw_line(
                frame,
                self.style.width,
                self.style.height,
                x,
                y,
                line,
                SUBTITLE_COLOR,
            );
            y += advance;
        }
    }
}

/// First-line y for a bottom-anchored subtitle block, pushed down when it
/// would collide with the content above it.
fn subtitle_origin_y(
    frame_height: i32,
    bottom_margin: i32,
    total_height: i32,
    min_y: i32,
) -> i32 {
    let desired = frame_height - bottom_margin - total_height;
    desired.max(min_y)
}

/// Fit `(width, height)` inside a `max_dim` square, preserving aspect.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let scale = (max_dim as f64 / width as f64).min(max_dim as f64 / height as f64);
    let fitted_w = ((width as f64 * scale).round() as u32).max(1);
    let fitted_h = ((height as f64 * scale).round() as u32).max(1);
    (fitted_w, fitted_h)
}

/// Decode and pre-fit overlay images. Unreadable files are skipped with a
/// warning; the carousel simply has fewer frames to rotate through.
pub fn prepare_overlay_images(paths: &[PathBuf], max_dim: u32) -> Vec<RgbaImage> {
    let mut prepared = Vec::with_capacity(paths.len());

    for path in paths {
        let decoded = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable image");
                continue;
            }
        };

        let (w, h) = fit_within(decoded.width(), decoded.height(), max_dim);
        prepared.push(image::imageops::resize(&decoded, w, h, FilterType::Lanczos3));
    }

    prepared
}

/// Alpha-composite an RGBA image onto a packed RGB24 frame at `(x, y)`.
fn paste_rgba(frame: &mut [u8], frame_width: u32, frame_height: u32, x: i32, y: i32, img: &RgbaImage) {
    for (col, row, pixel) in img.enumerate_pixels() {
        let px = x + col as i32;
        let py = y + row as i32;
        if px < 0 || py < 0 || px >= frame_width as i32 || py >= frame_height as i32 {
            continue;
        }

        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }

        let idx = ((py as u32 * frame_width + px as u32) * 3) as usize;
        blend_pixel(frame, idx, [r, g, b], a);
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: [u8; 3],
    alpha: u8,
) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(frame_width as i32);
    let y1 = (y + height).min(frame_height as i32);

    for py in y0..y1 {
        for px in x0..x1 {
            let idx = ((py as u32 * frame_width + px as u32) * 3) as usize;
            blend_pixel(frame, idx, color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_sits_at_bottom_margin_when_clear() {
        // 1920 tall, 346 margin, 120 of text: origin well below content.
        let y = subtitle_origin_y(1920, 346, 120, 400);
        assert_eq!(y, 1920 - 346 - 120);
    }

    #[test]
    fn test_subtitle_pushed_below_overlapping_content() {
        let y = subtitle_origin_y(1920, 346, 120, 1600);
        assert_eq!(y, 1600);
    }

    #[test]
    fn test_fit_within_shrinks_wide_image() {
        let (w, h) = fit_within(2000, 1000, 1000);
        assert_eq!((w, h), (1000, 500));
    }

    #[test]
    fn test_fit_within_scales_small_image_up() {
        let (w, h) = fit_within(100, 50, 1000);
        assert_eq!((w, h), (1000, 500));
    }

    #[test]
    fn test_fit_within_never_returns_zero() {
        let (w, h) = fit_within(10_000, 1, 100);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_fill_rect_clamps_to_frame() {
        let mut frame = vec![0u8; 4 * 4 * 3];
        fill_rect(&mut frame, 4, 4, -2, -2, 10, 10, [255, 255, 255], 255);
        assert!(frame.iter().all(|&c| c == 255));
    }

    #[test]
    fn test_paste_rgba_respects_transparency() {
        let mut frame = vec![7u8; 2 * 2 * 3];
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([200, 0, 0, 255]));
        // Remaining pixels stay fully transparent.

        paste_rgba(&mut frame, 2, 2, 0, 0, &img);

        assert_eq!(&frame[0..3], &[200, 0, 0]);
        assert_eq!(&frame[3..6], &[7, 7, 7]);
    }

    /// Fallback face from the host, when one is installed.
    fn test_font() -> Option<std::sync::Arc<fontdue::Font>> {
        crate::font::load_font(None).ok()
    }

    #[test]
    fn test_compose_without_cues_or_images_touches_only_the_title_band() {
        let Some(font) = test_font() else {
            return; // host has no font face to rasterize with
        };
        let style = FrameStyle::for_frame(120, 240);
        let mut compositor =
            Compositor::new(font, style, "Title", Vec::new(), Vec::new(), 10.0);

        let mut frame = vec![9u8; (120 * 240 * 3) as usize];
        compositor.compose(1.0, &mut frame);

        // No image layer and no subtitle layer: everything below the title
        // block stays the base footage.
        let first_clear_row = (compositor.title_bottom + 4).max(0) as usize;
        assert!(frame[first_clear_row * 120 * 3..].iter().all(|&b| b == 9));
        // The title itself did render something.
        assert!(frame.iter().any(|&b| b != 9));
    }

    #[test]
    fn test_no_images_leaves_subtitle_budget_at_title_bottom() {
        let Some(font) = test_font() else {
            return; // host has no font face to rasterize with
        };
        let style = FrameStyle::for_frame(120, 240);
        let mut compositor =
            Compositor::new(font, style, "Title", Vec::new(), Vec::new(), 10.0);

        let mut frame = vec![0u8; (120 * 240 * 3) as usize];
        let content_bottom = compositor.draw_image(1.0, &mut frame);

        assert_eq!(content_bottom, compositor.title_bottom);
        assert!(frame.iter().all(|&b| b == 0), "image layer drew pixels");
    }

    #[test]
    fn test_style_proportions() {
        let style = FrameStyle::for_frame(1080, 1920);
        assert_eq!(style.title_font_px, 1920.0 * 0.055);
        assert_eq!(style.title_max_width, 1080.0 * 0.85);
        assert_eq!(style.subtitle_max_width, 1080.0 * 0.90);
        assert_eq!(style.subtitle_bottom_margin, (1920.0f32 * 0.18) as i32);
        assert_eq!(style.image_max_dim, (1080.0f32 * 0.96) as u32);
    }
}
