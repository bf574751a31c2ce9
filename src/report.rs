use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ORIGINAL_SIZE_PREFIX, SUCCESS_PREFIX,
    SUGGESTED_RETRY_QUALITY, WARNING_PREFIX,
};
use crate::error::Result;
use crate::info;
use crate::stats::CompressionStats;
use crate::utils::{bytes_to_mib, calculate_compression_ratio, format_file_size};
use std::fs;
use std::path::Path;

/// Final figures of one run: entry totals plus the on-disk size of both
/// archives. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub stats: CompressionStats,
    pub original_file_size: u64,
    pub final_file_size: u64,
    pub target_size_bytes: u64,
}

impl CompressionReport {
    pub fn new(
        stats: CompressionStats,
        original_file_size: u64,
        final_file_size: u64,
        target_size_bytes: u64,
    ) -> Self {
        Self {
            stats,
            original_file_size,
            final_file_size,
            target_size_bytes,
        }
    }

    /// Measures both archives on disk. Call after the destination is finalized.
    pub fn measure(
        source: &Path,
        destination: &Path,
        stats: CompressionStats,
        target_size_bytes: u64,
    ) -> Result<Self> {
        let original_file_size = fs::metadata(source)?.len();
        let final_file_size = fs::metadata(destination)?.len();
        Ok(Self::new(
            stats,
            original_file_size,
            final_file_size,
            target_size_bytes,
        ))
    }

    /// Percent saved on disk, archive to archive.
    pub fn achieved_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_file_size, self.final_file_size)
    }

    /// Percent the source would have to shrink to meet the target.
    pub fn required_ratio(&self) -> f64 {
        required_ratio(self.original_file_size, self.target_size_bytes)
    }

    pub fn target_achieved(&self) -> bool {
        self.final_file_size <= self.target_size_bytes
    }

    pub fn print_summary(&self) {
        let stats = &self.stats;
        info!("\n{}", "=".repeat(60));
        info!("📁 Files processed: {}", stats.files_processed);
        info!("🖼️  Images optimized: {}", stats.images_optimized);
        if stats.skipped_entries > 0 {
            info!("🗑️  Entries skipped: {}", stats.skipped_entries);
        }
        info!(
            "📊 Entry payloads: {} -> {}",
            format_file_size(stats.total_original_bytes),
            format_file_size(stats.total_compressed_bytes)
        );

        if !stats.warnings.is_empty() {
            info!(
                "{}  {} image(s) kept their original bytes:",
                WARNING_PREFIX,
                stats.warnings.len()
            );
            for warning in &stats.warnings {
                info!("  - {}: {}", warning.entry_name, warning.reason);
            }
        }

        info!("\n{}", "=".repeat(60));
        info!(
            "{} {:.2} MB",
            ORIGINAL_SIZE_PREFIX,
            bytes_to_mib(self.original_file_size)
        );
        info!(
            "{} {:.2} MB",
            COMPRESSED_SIZE_PREFIX,
            bytes_to_mib(self.final_file_size)
        );
        info!("{} {:.1}%", COMPRESSION_RATIO_PREFIX, self.achieved_ratio());

        let target_mib = bytes_to_mib(self.target_size_bytes);
        if self.target_achieved() {
            info!(
                "{} Target reached: file is under {:.2} MB",
                SUCCESS_PREFIX, target_mib
            );
        } else {
            info!(
                "{}  File is still larger than {:.2} MB. You could try:",
                WARNING_PREFIX, target_mib
            );
            info!("  - lowering --quality to {}", SUGGESTED_RETRY_QUALITY);
            info!("  - lowering --max-width / --max-height");
        }
    }
}

pub fn required_ratio(original_file_size: u64, target_size_bytes: u64) -> f64 {
    calculate_compression_ratio(original_file_size, target_size_bytes)
}

/// What the caller prints before starting a run.
pub fn print_plan(original_file_size: u64, target_size_bytes: u64) {
    info!("{} {:.2} MB", ORIGINAL_SIZE_PREFIX, bytes_to_mib(original_file_size));
    info!("🎯 Target size: {:.2} MB", bytes_to_mib(target_size_bytes));
    let required = required_ratio(original_file_size, target_size_bytes);
    if required > 0.0 {
        info!("📉 Required reduction: {:.1}%", required);
    } else {
        info!("{} Already under target", SUCCESS_PREFIX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn test_target_achieved() {
        let report = CompressionReport::new(CompressionStats::default(), 80 * MIB, 40 * MIB, 49 * MIB);
        assert!(report.target_achieved());
        assert_eq!(report.achieved_ratio(), 50.0);
    }

    #[test]
    fn test_target_missed_is_not_an_error() {
        let report = CompressionReport::new(CompressionStats::default(), 80 * MIB, 60 * MIB, 49 * MIB);
        assert!(!report.target_achieved());
        assert_eq!(report.achieved_ratio(), 25.0);
        report.print_summary();
    }

    #[test]
    fn test_target_exactly_met() {
        let report = CompressionReport::new(CompressionStats::default(), 60 * MIB, 49 * MIB, 49 * MIB);
        assert!(report.target_achieved());
    }

    #[test]
    fn test_required_ratio() {
        assert_eq!(required_ratio(100 * MIB, 50 * MIB), 50.0);
        assert!(required_ratio(10 * MIB, 49 * MIB) < 0.0);
        assert_eq!(required_ratio(0, 49 * MIB), 0.0);
    }

    #[test]
    fn test_measure_reads_file_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.epub");
        let destination = dir.path().join("out.epub");
        fs::write(&source, vec![0u8; 300]).unwrap();
        fs::write(&destination, vec![0u8; 100]).unwrap();

        let report =
            CompressionReport::measure(&source, &destination, CompressionStats::default(), 200)
                .unwrap();
        assert_eq!(report.original_file_size, 300);
        assert_eq!(report.final_file_size, 100);
        assert!(report.target_achieved());
    }
}
