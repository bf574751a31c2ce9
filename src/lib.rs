pub mod archive;
pub mod classify;
pub mod cli;
pub mod constants;
pub mod error;
pub mod logger;
pub mod options;
pub mod report;
pub mod stats;
pub mod transcode;
pub mod utils;

pub use archive::{compress_epub, rewrite_archive};
pub use classify::{classify, is_image_name, EntryKind};
pub use error::{CompressionError, Result};
pub use options::CompressionOptions;
pub use report::CompressionReport;
pub use stats::{CompressionStats, EntryRecord, TranscodeWarning};
pub use transcode::{fit_within, transcode, TranscodeOutcome, TranscodeResult};
