use crate::constants::IMAGE_EXTENSIONS;
use crate::options::CompressionOptions;
use std::path::Path;

/// What the rewriter does with an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// OS junk; dropped from the output.
    Skip,
    /// Recognized raster image; sent through the transcoder.
    Image,
    /// Copied byte-for-byte.
    Passthrough,
}

/// Classifies an entry by name alone. Never fails: anything unrecognized is
/// `Passthrough`.
pub fn classify(entry_name: &str, options: &CompressionOptions) -> EntryKind {
    if is_skipped(entry_name, options) {
        EntryKind::Skip
    } else if is_image_name(entry_name) {
        EntryKind::Image
    } else {
        EntryKind::Passthrough
    }
}

pub fn is_skipped(entry_name: &str, options: &CompressionOptions) -> bool {
    options
        .skip_prefixes
        .iter()
        .any(|prefix| entry_name.starts_with(prefix.as_str()))
        || options
            .skip_suffixes
            .iter()
            .any(|suffix| entry_name.ends_with(suffix.as_str()))
}

pub fn is_image_name(entry_name: &str) -> bool {
    // Directory entries end in '/' and never count as images.
    if entry_name.ends_with('/') {
        return false;
    }

    Path::new(entry_name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
