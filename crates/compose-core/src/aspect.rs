//! Aspect normalization: center-crop math.
//!
//! Produces a same-aspect crop of the source that, once resized to the
//! target dimensions, fills every output pixel with source content. No
//! letterboxing in either direction.

/// A crop window in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centered crop matching the target aspect ratio.
///
/// A source wider than the target loses width (centered horizontally, full
/// height kept); otherwise it loses height (centered vertically, full width
/// kept).
pub fn crop_for(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropRect {
    let target_aspect = target_w as f64 / target_h as f64;
    let src_aspect = src_w as f64 / src_h as f64;

    if src_aspect > target_aspect {
        let new_w = ((src_h as f64 * target_aspect).round() as u32).min(src_w);
        CropRect {
            x: (src_w - new_w) / 2,
            y: 0,
            width: new_w,
            height: src_h,
        }
    } else {
        let new_h = ((src_w as f64 / target_aspect).round() as u32).min(src_h);
        CropRect {
            x: 0,
            y: (src_h - new_h) / 2,
            width: src_w,
            height: new_h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_source_crops_width() {
        // 16:9 landscape source to a 9:16 portrait target.
        let crop = crop_for(1920, 1080, 1080, 1920);
        assert_eq!(crop.height, 1080);
        assert_eq!(crop.width, 608); // 1080 * 9/16, rounded
        assert_eq!(crop.y, 0);
        assert_eq!(crop.x, (1920 - 608) / 2);
    }

    #[test]
    fn test_tall_source_crops_height() {
        // Very tall source to a portrait target: full width kept.
        let crop = crop_for(1080, 4000, 1080, 1920);
        assert_eq!(crop.width, 1080);
        assert_eq!(crop.height, 1920);
        assert_eq!(crop.x, 0);
        assert_eq!(crop.y, (4000 - 1920) / 2);
    }

    #[test]
    fn test_matching_aspect_keeps_full_frame() {
        let crop = crop_for(540, 960, 1080, 1920);
        assert_eq!(
            crop,
            CropRect {
                x: 0,
                y: 0,
                width: 540,
                height: 960
            }
        );
    }

    #[test]
    fn test_crop_never_exceeds_source() {
        for (w, h) in [(100, 100), (3840, 2160), (720, 1280), (1, 1)] {
            let crop = crop_for(w, h, 1080, 1920);
            assert!(crop.x + crop.width <= w);
            assert!(crop.y + crop.height <= h);
            assert!(crop.width > 0 && crop.height > 0);
        }
    }
}
