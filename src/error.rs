use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(#[from] jpeg_encoder::EncodingError),

    #[error("Image too large to encode as JPEG: {0}x{1}")]
    ImageTooLarge(u32, u32),

    #[error("Invalid quality value: {0}. Must be between 0 and 100")]
    InvalidQuality(u8),

    #[error("Invalid maximum image dimensions: {0}x{1}. Both must be non-zero")]
    InvalidDimensions(u32, u32),

    #[error("Invalid target size: {0} MB")]
    InvalidTargetSize(f64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Cannot write destination archive {0}: {1}")]
    DestinationUnwritable(PathBuf, #[source] std::io::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
