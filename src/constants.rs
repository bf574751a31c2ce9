pub const DEFAULT_QUALITY: u8 = 85;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 2560;

pub const BYTES_PER_MIB: u64 = 1024 * 1024;
pub const DEFAULT_TARGET_SIZE_MIB: f64 = 49.0;

/// Deflate level used for every compressed entry of the rewritten archive.
pub const ARCHIVE_DEFLATE_LEVEL: i64 = 9;

/// Number of entries read ahead per parallel transcode round, per worker.
pub const ENTRIES_PER_WORKER: usize = 2;

/// Raster formats the transcoder accepts, by lowercase file extension.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

// macOS metadata that zip tools drag into archives
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["__MACOSX/"];
pub const DEFAULT_SKIP_SUFFIXES: &[&str] = &[".DS_Store"];

pub const OUTPUT_SUFFIX: &str = "_compressed";

/// Quality suggested to the user when the size target was missed.
pub const SUGGESTED_RETRY_QUALITY: u8 = 80;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Final size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression achieved:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
