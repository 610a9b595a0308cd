// SVG2Icon - core/raster.rs
//
// SVG -> PNG rasterisation at a requested pixel width.
//
// The `Rasterizer` trait is the seam between the batch pipeline and the
// rendering library: production code uses `ResvgRasterizer`, tests inject
// fakes that fail on chosen sizes.

use crate::util::constants;
use crate::util::error::RasterizeError;
use resvg::{tiny_skia, usvg};
use std::sync::Arc;

/// Converts one SVG document into one PNG at one width.
pub trait Rasterizer {
    /// Render `svg` scaled so its width equals `width` pixels, aspect ratio
    /// preserved, on a fully transparent background. Returns encoded PNG bytes.
    fn rasterize(&self, svg: &[u8], width: u32) -> Result<Vec<u8>, RasterizeError>;
}

/// `resvg`-backed rasterizer.
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl ResvgRasterizer {
    /// Create a rasterizer. With `load_system_fonts`, `<text>` elements are
    /// rendered with the host's installed fonts; without it text is dropped.
    pub fn new(load_system_fonts: bool) -> Self {
        let mut options = usvg::Options::default();
        if load_system_fonts {
            // usvg 0.44: fontdb lives inside Options as an Arc<Database>.
            Arc::make_mut(&mut options.fontdb).load_system_fonts();
            tracing::debug!(
                faces = options.fontdb.len(),
                "Loaded system fonts for SVG text"
            );
        }
        Self { options }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &[u8], width: u32) -> Result<Vec<u8>, RasterizeError> {
        if width == 0 || width > constants::MAX_RASTER_WIDTH {
            return Err(RasterizeError::InvalidSize {
                size: width,
                max: constants::MAX_RASTER_WIDTH,
            });
        }

        let tree = usvg::Tree::from_data(svg, &self.options)
            .map_err(|e| RasterizeError::Parse { size: width, source: e })?;

        let (out_w, out_h, scale) = fit_to_width(tree.size().width(), tree.size().height(), width);
        if out_h > constants::MAX_RASTER_WIDTH {
            return Err(RasterizeError::Render {
                size: width,
                width: out_w,
                height: out_h,
            });
        }

        // Pixmap::new zero-fills, which is transparent black.
        let mut pixmap =
            tiny_skia::Pixmap::new(out_w, out_h).ok_or(RasterizeError::Render {
                size: width,
                width: out_w,
                height: out_h,
            })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        pixmap.encode_png().map_err(|e| RasterizeError::Encode {
            size: width,
            reason: e.to_string(),
        })
    }
}

/// Output dimensions and uniform scale for rendering a `svg_w` x `svg_h`
/// document at `width` pixels wide. Height rounds to the nearest pixel,
/// never below 1 px; a square document always yields a square raster.
pub fn fit_to_width(svg_w: f32, svg_h: f32, width: u32) -> (u32, u32, f32) {
    let scale = width as f32 / svg_w;
    let height = if svg_w == svg_h {
        width
    } else {
        // f64 keeps exact products exact; `as` saturates on overflow.
        (f64::from(svg_h) * f64::from(width) / f64::from(svg_w))
            .round()
            .max(1.0) as u32
    };
    (width, height, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::core::model::TargetPlatform;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">
        <circle cx="50" cy="50" r="40" fill="#3366ff"/>
    </svg>"##;

    const WIDE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100" width="200" height="100">
        <rect x="0" y="0" width="200" height="100" fill="#ff0000"/>
    </svg>"##;

    fn decode(png: &[u8]) -> image::RgbaImage {
        image::load_from_memory_with_format(png, image::ImageFormat::Png)
            .expect("valid png")
            .into_rgba8()
    }

    #[test]
    fn test_renders_requested_width() {
        let r = ResvgRasterizer::default();
        for size in [16, 72, 167] {
            let img = decode(&r.rasterize(SQUARE.as_bytes(), size).unwrap());
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn test_background_is_transparent() {
        let r = ResvgRasterizer::default();
        let img = decode(&r.rasterize(SQUARE.as_bytes(), 64).unwrap());
        assert_eq!(img.get_pixel(0, 0)[3], 0, "corner outside the circle");
        assert_eq!(img.get_pixel(32, 32)[3], 255, "centre of the circle");
    }

    #[test]
    fn test_preserves_aspect_ratio() {
        let r = ResvgRasterizer::default();
        let img = decode(&r.rasterize(WIDE.as_bytes(), 64).unwrap());
        assert_eq!(img.dimensions(), (64, 32));
    }

    #[test]
    fn test_malformed_svg_is_parse_error() {
        let r = ResvgRasterizer::default();
        let err = r.rasterize(b"\x00\x01 definitely not xml", 32).unwrap_err();
        assert!(matches!(err, RasterizeError::Parse { size: 32, .. }));
    }

    #[test]
    fn test_zero_width_rejected() {
        let r = ResvgRasterizer::default();
        let err = r.rasterize(SQUARE.as_bytes(), 0).unwrap_err();
        assert!(matches!(err, RasterizeError::InvalidSize { size: 0, .. }));
    }

    #[test]
    fn test_output_is_deterministic() {
        let r = ResvgRasterizer::default();
        let a = r.rasterize(SQUARE.as_bytes(), 48).unwrap();
        let b = r.rasterize(SQUARE.as_bytes(), 48).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_to_width_rounds_height_to_nearest() {
        assert_eq!(fit_to_width(300.0, 100.0, 16), (16, 5, 16.0 / 300.0));
        assert_eq!(fit_to_width(300.0, 200.0, 16).1, 11);
        assert_eq!(fit_to_width(200.0, 100.0, 120).1, 60);
        assert_eq!(fit_to_width(100.0, 0.0, 16).1, 1);
    }

    #[test]
    fn test_fit_to_width_square_stays_square() {
        for width in [16, 20, 29, 40, 58, 60, 76, 87, 120, 152, 167, 180, 1024] {
            for side in [1.0, 24.0, 100.0, 512.0, 333.3] {
                assert_eq!(fit_to_width(side, side, width).1, width, "{side} at {width}");
            }
        }
    }

    #[test]
    fn test_square_document_renders_square_at_every_catalog_size() {
        let r = ResvgRasterizer::default();
        let mut sizes: Vec<u32> = TargetPlatform::all()
            .iter()
            .flat_map(|&t| catalog::icon_sizes(t).iter().map(|s| s.size))
            .collect();
        sizes.sort_unstable();
        sizes.dedup();

        for size in sizes {
            let img = decode(&r.rasterize(SQUARE.as_bytes(), size).unwrap());
            assert_eq!(img.dimensions(), (size, size), "{size}px");
        }
    }

    #[test]
    fn test_tall_document_is_rejected_not_allocated() {
        let tall = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 100000" width="1" height="100000">
            <rect width="1" height="100000" fill="#000"/>
        </svg>"##;
        let r = ResvgRasterizer::default();
        let err = r.rasterize(tall.as_bytes(), 512).unwrap_err();
        match err {
            RasterizeError::Render { size, width, height } => {
                assert_eq!((size, width), (512, 512));
                assert!(height > constants::MAX_RASTER_WIDTH);
            }
            other => panic!("expected Render error, got {other:?}"),
        }
    }
}
