use crate::classify::EntryKind;
use crate::transcode::TranscodeOutcome;

/// An image entry that kept its original bytes because transcoding failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeWarning {
    pub entry_name: String,
    pub reason: String,
}

/// Per-entry line of the rewrite, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub name: String,
    pub kind: EntryKind,
    pub original_size: u64,
    pub new_size: u64,
    /// Only set for images that were re-encoded.
    pub dimensions: Option<((u32, u32), (u32, u32))>,
}

/// Running totals for one archive rewrite. Skipped entries only bump
/// `skipped_entries` and never reach the byte totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub files_processed: usize,
    pub images_optimized: usize,
    pub images_failed: usize,
    pub skipped_entries: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub entries: Vec<EntryRecord>,
    pub warnings: Vec<TranscodeWarning>,
}

impl CompressionStats {
    pub fn record_skip(&mut self) {
        self.skipped_entries += 1;
    }

    pub fn record_passthrough(&mut self, name: &str, size: u64) {
        self.files_processed += 1;
        self.total_original_bytes += size;
        self.total_compressed_bytes += size;
        self.entries.push(EntryRecord {
            name: name.to_string(),
            kind: EntryKind::Passthrough,
            original_size: size,
            new_size: size,
            dimensions: None,
        });
    }

    pub fn record_image(&mut self, name: &str, outcome: &TranscodeOutcome) {
        self.files_processed += 1;
        self.total_original_bytes += outcome.original_size();
        self.total_compressed_bytes += outcome.new_size();

        let dimensions = match outcome {
            TranscodeOutcome::Optimized(result) => {
                self.images_optimized += 1;
                Some((result.original_dimensions, result.final_dimensions))
            }
            TranscodeOutcome::Fallback { reason, .. } => {
                self.images_failed += 1;
                self.warnings.push(TranscodeWarning {
                    entry_name: name.to_string(),
                    reason: reason.clone(),
                });
                None
            }
        };

        self.entries.push(EntryRecord {
            name: name.to_string(),
            kind: EntryKind::Image,
            original_size: outcome.original_size(),
            new_size: outcome.new_size(),
            dimensions,
        });
    }

    pub fn bytes_saved(&self) -> i64 {
        self.total_original_bytes as i64 - self.total_compressed_bytes as i64
    }
}
