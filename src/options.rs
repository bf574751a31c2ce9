use crate::constants::{
    BYTES_PER_MIB, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY, DEFAULT_SKIP_PREFIXES,
    DEFAULT_SKIP_SUFFIXES, DEFAULT_TARGET_SIZE_MIB, MAX_QUALITY,
};
use crate::error::{CompressionError, Result};

/// Settings for one archive rewrite.
///
/// Built once by the caller and shared read-only by every stage of the
/// pipeline, including the transcode workers.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    /// Informational only: compared against the final archive size.
    pub target_size_bytes: u64,
    pub skip_prefixes: Vec<String>,
    pub skip_suffixes: Vec<String>,
    /// Worker count for transcoding; `None` means one per CPU core.
    pub threads: Option<usize>,
    pub show_progress: bool,
}

impl CompressionOptions {
    pub fn new(
        quality: Option<u8>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        target_size_mib: Option<f64>,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if quality > MAX_QUALITY {
            return Err(CompressionError::InvalidQuality(quality));
        }

        let max_width = max_width.unwrap_or(DEFAULT_MAX_WIDTH);
        let max_height = max_height.unwrap_or(DEFAULT_MAX_HEIGHT);
        if max_width == 0 || max_height == 0 {
            return Err(CompressionError::InvalidDimensions(max_width, max_height));
        }

        let target_mib = target_size_mib.unwrap_or(DEFAULT_TARGET_SIZE_MIB);
        if !target_mib.is_finite() || target_mib <= 0.0 {
            return Err(CompressionError::InvalidTargetSize(target_mib));
        }

        Ok(Self {
            max_width,
            max_height,
            quality,
            target_size_bytes: (target_mib * BYTES_PER_MIB as f64).round() as u64,
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            skip_suffixes: DEFAULT_SKIP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            threads: None,
            show_progress: false,
        })
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    pub fn with_skip_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.skip_suffixes.push(suffix.into());
        self
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            target_size_bytes: (DEFAULT_TARGET_SIZE_MIB * BYTES_PER_MIB as f64) as u64,
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            skip_suffixes: DEFAULT_SKIP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            threads: None,
            show_progress: false,
        }
    }
}
