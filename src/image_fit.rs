//! Image fitting and embedding policy
//!
//! Photos keep their original JPEG bytes when PDF can carry them as-is (DCTDecode).
//! Anything else is decoded and re-encoded once as a quality-90 JPEG. Logos are
//! always stored losslessly as Flate-compressed RGB with an optional soft mask.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use jpeg_decoder::PixelFormat;
use log::{debug, warn};

use crate::error::{ReportError, ReportResult};

/// JPEG quality used when a source has to be re-encoded
pub const REENCODE_QUALITY: u8 = 90;

/// How an image ended up in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedStrategy {
    /// Source bytes embedded untouched
    Original,
    /// Decoded and re-encoded once as JPEG
    Reencoded,
    /// Raw pixels, Flate-compressed
    Lossless,
}

/// Image data in a form the emitter can write as an XObject
#[derive(Debug, Clone, PartialEq)]
pub enum ImageResource {
    /// JPEG stream, written with DCTDecode
    Jpeg {
        data: Vec<u8>,
        pixel_width: u32,
        pixel_height: u32,
        /// 1 (gray) or 3 (RGB)
        components: u8,
    },
    /// Zlib-compressed 8-bit RGB, with an optional zlib-compressed 8-bit alpha channel
    Flate {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
        pixel_width: u32,
        pixel_height: u32,
    },
}

impl ImageResource {
    pub fn pixel_size(&self) -> (u32, u32) {
        match self {
            ImageResource::Jpeg { pixel_width, pixel_height, .. }
            | ImageResource::Flate { pixel_width, pixel_height, .. } => (*pixel_width, *pixel_height),
        }
    }
}

/// A renderable image with its display size in points
#[derive(Debug, Clone, PartialEq)]
pub struct FittedImage {
    pub resource: ImageResource,
    pub width: f64,
    pub height: f64,
    pub strategy: EmbedStrategy,
}

/// Aspect-preserving size of a `natural_width` × `natural_height` image inside a box.
///
/// One uniform factor scales both axes; the limiting axis matches the box exactly.
pub fn fit_dimensions(natural_width: f64, natural_height: f64, max_width: f64, max_height: f64) -> (f64, f64) {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return (0.0, 0.0);
    }
    let scale_w = max_width / natural_width;
    let scale_h = max_height / natural_height;
    if scale_w <= scale_h {
        (max_width, (natural_height * scale_w).min(max_height))
    } else {
        ((natural_width * scale_h).min(max_width), max_height)
    }
}

/// Fit a photo into `max_width` × `max_height` points.
///
/// Returns `None` when the bytes cannot be decoded; callers draw a placeholder.
pub fn fit(source: &[u8], max_width: f64, max_height: f64) -> Option<FittedImage> {
    match prepare_photo(source) {
        Ok((resource, strategy)) => {
            let (w, h) = resource.pixel_size();
            let (width, height) = fit_dimensions(w as f64, h as f64, max_width, max_height);
            debug!(
                "Fitted {}x{} px image into {:.1}x{:.1} pt ({:?})",
                w, h, width, height, strategy
            );
            Some(FittedImage { resource, width, height, strategy })
        }
        Err(e) => {
            warn!("Image could not be decoded ({} bytes), using placeholder: {}", source.len(), e);
            None
        }
    }
}

/// Fit a logo to `target_width` points, deriving the height from the aspect ratio.
///
/// A logo that would be taller than `max_height` is scaled down uniformly to fit.
pub fn fit_logo(source: &[u8], target_width: f64, max_height: f64) -> Option<FittedImage> {
    let result = decode(source).and_then(|img| {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(ReportError::Image("logo has zero size".into()));
        }
        let mut width = target_width;
        let mut height = h as f64 * (target_width / w as f64);
        if height > max_height {
            (width, height) = fit_dimensions(w as f64, h as f64, target_width, max_height);
        }
        Ok(FittedImage {
            resource: lossless(&img),
            width,
            height,
            strategy: EmbedStrategy::Lossless,
        })
    });

    match result {
        Ok(fitted) => Some(fitted),
        Err(e) => {
            warn!("Logo could not be decoded, skipping it: {}", e);
            None
        }
    }
}

fn decode(source: &[u8]) -> ReportResult<DynamicImage> {
    if source.is_empty() {
        return Err(ReportError::Image("empty image data".into()));
    }
    Ok(image::load_from_memory(source)?)
}

fn prepare_photo(source: &[u8]) -> ReportResult<(ImageResource, EmbedStrategy)> {
    if source.is_empty() {
        return Err(ReportError::Image("empty image data".into()));
    }

    if matches!(image::guess_format(source), Ok(ImageFormat::Jpeg)) {
        if let Some(resource) = jpeg_passthrough(source)? {
            return Ok((resource, EmbedStrategy::Original));
        }
    }

    let img = decode(source)?;
    Ok((reencode_jpeg(&img)?, EmbedStrategy::Reencoded))
}

/// Validate a JPEG and return it untouched if PDF readers can use it directly.
///
/// `Ok(None)` means the JPEG is valid but needs re-encoding (CMYK, 16-bit).
fn jpeg_passthrough(source: &[u8]) -> ReportResult<Option<ImageResource>> {
    let mut decoder = jpeg_decoder::Decoder::new(source);
    decoder.decode()?;
    let info = decoder
        .info()
        .ok_or_else(|| ReportError::Image("JPEG header missing".into()))?;

    let components = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::RGB24 => 3,
        other => {
            debug!("JPEG pixel format {:?} cannot be embedded directly", other);
            return Ok(None);
        }
    };
    if info.width == 0 || info.height == 0 {
        return Err(ReportError::Image("JPEG has zero size".into()));
    }

    Ok(Some(ImageResource::Jpeg {
        data: source.to_vec(),
        pixel_width: info.width as u32,
        pixel_height: info.height as u32,
        components,
    }))
}

/// Re-encode once as RGB JPEG, flattening transparency onto white.
fn reencode_jpeg(img: &DynamicImage) -> ReportResult<ImageResource> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ReportError::Image("image has zero size".into()));
    }
    let rgb = flatten_on_white(&rgba);

    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, REENCODE_QUALITY).encode(&rgb, w, h, ColorType::Rgb8)?;

    Ok(ImageResource::Jpeg {
        data,
        pixel_width: w,
        pixel_height: h,
        components: 3,
    })
}

fn flatten_on_white(rgba: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.as_raw().len() / 4 * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u32;
        for c in [r, g, b] {
            rgb.push(((c as u32 * a + 255 * (255 - a)) / 255) as u8);
        }
    }
    rgb
}

/// Split RGBA into compressed RGB + alpha; alpha is dropped when fully opaque.
fn lossless(img: &DynamicImage) -> ImageResource {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut rgb: Vec<u8> = Vec::with_capacity((w * h * 3) as usize);
    let mut alpha: Vec<u8> = Vec::with_capacity((w * h) as usize);
    for chunk in rgba.as_raw().chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
        alpha.push(chunk[3]);
    }
    let has_alpha = alpha.iter().any(|a| *a < 255);

    ImageResource::Flate {
        rgb: miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6),
        alpha: has_alpha.then(|| miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6)),
        pixel_width: w,
        pixel_height: h,
    }
}


#[cfg(test)]
mod tests {
    use super::test_images::*;
    use super::*;

    #[test]
    fn test_fit_dimensions_width_limited() {
        let (w, h) = fit_dimensions(400.0, 300.0, 168.0, 151.2);
        assert_eq!(w, 168.0);
        assert!((h - 126.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_dimensions_height_limited() {
        let (w, h) = fit_dimensions(300.0, 600.0, 168.0, 151.2);
        assert_eq!(h, 151.2);
        assert!((w - 75.6).abs() < 1e-9);
    }

    #[test]
    fn test_small_images_are_scaled_up() {
        let (w, h) = fit_dimensions(10.0, 10.0, 100.0, 50.0);
        assert_eq!((w, h), (50.0, 50.0));
    }

    #[test]
    fn test_jpeg_is_embedded_untouched() {
        let bytes = jpeg(64, 48);
        let fitted = fit(&bytes, 168.0, 151.2).expect("jpeg decodes");
        assert_eq!(fitted.strategy, EmbedStrategy::Original);
        match &fitted.resource {
            ImageResource::Jpeg { data, pixel_width, pixel_height, components } => {
                assert_eq!(data, &bytes);
                assert_eq!((*pixel_width, *pixel_height), (64, 48));
                assert_eq!(*components, 3);
            }
            other => panic!("unexpected resource {:?}", other),
        }
    }

    #[test]
    fn test_png_is_reencoded_once_as_jpeg() {
        let fitted = fit(&png(20, 40), 100.0, 100.0).expect("png decodes");
        assert_eq!(fitted.strategy, EmbedStrategy::Reencoded);
        match &fitted.resource {
            ImageResource::Jpeg { data, .. } => {
                assert_eq!(image::guess_format(data).unwrap(), ImageFormat::Jpeg)
            }
            other => panic!("unexpected resource {:?}", other),
        }
        assert_eq!((fitted.width, fitted.height), (50.0, 100.0));
    }

    #[test]
    fn test_corrupt_bytes_fail_soft() {
        assert!(fit(b"definitely not an image", 100.0, 100.0).is_none());
        assert!(fit(&[], 100.0, 100.0).is_none());
        // JPEG magic followed by garbage
        assert!(fit(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x01, 0x02], 100.0, 100.0).is_none());
    }

    #[test]
    fn test_logo_uses_target_width_and_keeps_alpha() {
        let logo = fit_logo(&transparent_png(200, 50), 115.2, 45.0).expect("logo decodes");
        assert_eq!(logo.strategy, EmbedStrategy::Lossless);
        assert_eq!(logo.width, 115.2);
        assert!((logo.height - 28.8).abs() < 1e-9);
        match logo.resource {
            ImageResource::Flate { alpha, .. } => assert!(alpha.is_some()),
            other => panic!("unexpected resource {:?}", other),
        }
    }

    #[test]
    fn test_tall_logo_is_capped_by_band_height() {
        let logo = fit_logo(&png(100, 100), 115.2, 45.0).expect("logo decodes");
        assert_eq!(logo.height, 45.0);
        assert!((logo.width - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_opaque_logo_has_no_mask() {
        match fit_logo(&jpeg(30, 10), 90.0, 100.0).map(|l| l.resource) {
            Some(ImageResource::Flate { alpha, .. }) => assert!(alpha.is_none()),
            other => panic!("unexpected resource {:?}", other),
        }
    }
}
