use crate::constants::MAX_QUALITY;
use crate::error::{CompressionError, Result};
use crate::options::CompressionOptions;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

/// A successfully re-encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeResult {
    pub data: Vec<u8>,
    pub original_size: u64,
    pub new_size: u64,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
}

impl TranscodeResult {
    /// `1 - new / original`. Informational; negative when the image grew.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        1.0 - self.new_size as f64 / self.original_size as f64
    }

    pub fn was_resized(&self) -> bool {
        self.original_dimensions != self.final_dimensions
    }
}

/// Outcome of [`transcode`]. A `Fallback` still carries usable bytes (the
/// untouched input), so callers write it like any other result.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeOutcome {
    Optimized(TranscodeResult),
    Fallback { data: Vec<u8>, reason: String },
}

impl TranscodeOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TranscodeOutcome::Fallback { .. })
    }

    pub fn original_size(&self) -> u64 {
        match self {
            TranscodeOutcome::Optimized(result) => result.original_size,
            TranscodeOutcome::Fallback { data, .. } => data.len() as u64,
        }
    }

    pub fn new_size(&self) -> u64 {
        match self {
            TranscodeOutcome::Optimized(result) => result.new_size,
            TranscodeOutcome::Fallback { data, .. } => data.len() as u64,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            TranscodeOutcome::Optimized(result) => result.data,
            TranscodeOutcome::Fallback { data, .. } => data,
        }
    }
}

/// Re-encodes one image as JPEG: flatten transparency onto white, shrink to
/// fit `max_width` x `max_height`, encode at `quality`.
///
/// Never fails. Undecodable or unencodable input comes back unchanged as
/// [`TranscodeOutcome::Fallback`].
pub fn transcode(data: Vec<u8>, options: &CompressionOptions) -> TranscodeOutcome {
    match try_transcode(&data, options) {
        Ok(result) => TranscodeOutcome::Optimized(result),
        Err(e) => TranscodeOutcome::Fallback {
            data,
            reason: e.to_string(),
        },
    }
}

fn try_transcode(data: &[u8], options: &CompressionOptions) -> Result<TranscodeResult> {
    let img = image::load_from_memory(data)?;
    let original_dimensions = img.dimensions();

    let rgb = flatten_onto_white(img);
    let rgb = downsample(rgb, options.max_width, options.max_height);
    let final_dimensions = rgb.dimensions();

    let encoded = encode_jpeg(&rgb, options.quality)?;

    Ok(TranscodeResult {
        original_size: data.len() as u64,
        new_size: encoded.len() as u64,
        data: encoded,
        original_dimensions,
        final_dimensions,
    })
}

/// Converts any decoded image to opaque 8-bit RGB. Images with an alpha
/// channel are alpha-blended over a white background; the rest are
/// converted directly.
pub fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return match img {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        };
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([
            blend_over_white(r, a),
            blend_over_white(g, a),
            blend_over_white(b, a),
        ]);
    }
    out
}

fn blend_over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Largest size with the same aspect ratio that fits inside the box.
/// Sizes already inside the box are returned unchanged. A zero bound is
/// treated as 1.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (max_width, max_height) = (max_width.max(1), max_height.max(1));
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}

pub fn downsample(img: RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_within(width, height, max_width, max_height);
    if (new_width, new_height) == (width, height) {
        return img;
    }
    image::imageops::resize(&img, new_width, new_height, FilterType::Lanczos3)
}

/// Baseline JPEG with 4:2:0 chroma and per-image optimized Huffman tables.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(CompressionError::ImageTooLarge(width, height));
    };

    let mut buf = Vec::new();
    // JPEG quality scale is 1..=100
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, quality.clamp(1, MAX_QUALITY));
    encoder.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_2_0);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(img.as_raw(), w, h, jpeg_encoder::ColorType::Rgb)?;
    Ok(buf)
}
