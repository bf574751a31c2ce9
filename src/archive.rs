use crate::classify::{classify, EntryKind};
use crate::constants::{ARCHIVE_DEFLATE_LEVEL, ENTRIES_PER_WORKER, PROGRESS_BAR_TEMPLATE};
use crate::error::{CompressionError, Result};
use crate::options::CompressionOptions;
use crate::report::CompressionReport;
use crate::stats::CompressionStats;
use crate::transcode::{transcode, TranscodeOutcome};
use crate::utils::validate_file_exists;
use crate::{verbose, warn};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::FullFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

// Extra fields the writer regenerates, or that would no longer match the
// rewritten entry: zip64 sizes, AES, Info-ZIP unicode comment and path.
const REGENERATED_EXTRA_FIELDS: &[u16] = &[0x0001, 0x9901, 0x6375, 0x7075];

/// Everything needed to recreate an entry in the output, minus the payload.
#[derive(Debug)]
struct EntryHeader {
    name: String,
    kind: EntryKind,
    is_dir: bool,
    stored: bool,
    last_modified: Option<DateTime>,
    unix_mode: Option<u32>,
    extra_fields: Vec<(u16, Box<[u8]>)>,
}

#[derive(Debug)]
struct SourceEntry {
    header: EntryHeader,
    data: Vec<u8>,
}

#[derive(Debug)]
enum Payload {
    Raw(Vec<u8>),
    Image(TranscodeOutcome),
}

/// Rewrites `source` into `destination` and measures both files.
///
/// This is the whole pipeline as a caller sees it: a failure here means the
/// archive itself could not be read or written, never that an image failed.
pub fn compress_epub(
    source: &Path,
    destination: &Path,
    options: &CompressionOptions,
) -> Result<CompressionReport> {
    let stats = rewrite_archive(source, destination, options)?;
    CompressionReport::measure(source, destination, stats, options.target_size_bytes)
}

/// Copies every entry of the zip at `source` into a new zip at
/// `destination`, re-encoding image entries on the way.
///
/// Entries keep their names and order. Skip-listed entries are dropped.
/// The output is staged in a temporary file beside `destination` and only
/// renamed into place once complete, so a failed run leaves nothing behind.
pub fn rewrite_archive(
    source: &Path,
    destination: &Path,
    options: &CompressionOptions,
) -> Result<CompressionStats> {
    validate_file_exists(source)?;
    let mut archive = ZipArchive::new(BufReader::new(File::open(source)?))?;

    let staging = create_staging_file(destination)?;
    let mut writer = ZipWriter::new(staging);
    writer.set_raw_comment(archive.comment().into());

    let workers = options.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let chunk_size = workers * ENTRIES_PER_WORKER;

    let total = archive.len();
    let progress = create_progress_bar(total as u64, options.show_progress);
    let mut stats = CompressionStats::default();

    let mut start = 0;
    while start < total {
        let end = (start + chunk_size).min(total);

        let mut chunk = Vec::with_capacity(end - start);
        for index in start..end {
            match read_entry(&mut archive, index, options)? {
                Some(entry) => chunk.push(entry),
                None => {
                    stats.record_skip();
                    progress.inc(1);
                }
            }
        }

        // collect() on an indexed parallel iterator keeps source order
        let prepared: Vec<(EntryHeader, Payload)> = pool.install(|| {
            chunk
                .into_par_iter()
                .map(|entry| prepare_entry(entry, options))
                .collect()
        });

        for (header, payload) in prepared {
            progress.set_message(header.name.clone());
            write_entry(&mut writer, &header, payload, &mut stats)?;
            progress.inc(1);
        }

        start = end;
    }

    let staging = writer.finish()?;
    staging
        .persist(destination)
        .map_err(|e| CompressionError::DestinationUnwritable(destination.to_path_buf(), e.error))?;

    progress.finish_and_clear();
    Ok(stats)
}

fn create_staging_file(destination: &Path) -> Result<NamedTempFile> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    tempfile::Builder::new()
        .prefix(".epub-squeeze-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CompressionError::DestinationUnwritable(destination.to_path_buf(), e))
}

fn create_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Reads one entry fully into memory. Returns `None` for skip-listed names.
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    options: &CompressionOptions,
) -> Result<Option<SourceEntry>> {
    let mut file = archive.by_index(index)?;
    let name = file.name().to_string();

    let kind = classify(&name, options);
    if kind == EntryKind::Skip {
        verbose!("Skipping {}", name);
        return Ok(None);
    }

    let is_dir = file.is_dir();
    let header = EntryHeader {
        kind: if is_dir { EntryKind::Passthrough } else { kind },
        is_dir,
        stored: file.compression() == CompressionMethod::Stored,
        last_modified: file.last_modified(),
        unix_mode: file.unix_mode(),
        extra_fields: file.extra_data().map(split_extra_fields).unwrap_or_default(),
        name,
    };

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    Ok(Some(SourceEntry { header, data }))
}

/// Splits a raw extra-data block into `(header id, payload)` fields, keeping
/// the ones that still describe the entry after its payload is replaced.
/// A truncated trailing field is dropped.
fn split_extra_fields(mut raw: &[u8]) -> Vec<(u16, Box<[u8]>)> {
    let mut fields = Vec::new();
    while raw.len() >= 4 {
        let id = u16::from_le_bytes([raw[0], raw[1]]);
        let len = u16::from_le_bytes([raw[2], raw[3]]) as usize;
        let Some(data) = raw.get(4..4 + len) else {
            break;
        };
        if !REGENERATED_EXTRA_FIELDS.contains(&id) {
            fields.push((id, data.into()));
        }
        raw = &raw[4 + len..];
    }
    fields
}

/// Runs on a worker thread; touches nothing but its own entry.
fn prepare_entry(entry: SourceEntry, options: &CompressionOptions) -> (EntryHeader, Payload) {
    let SourceEntry { header, data } = entry;
    let payload = match header.kind {
        EntryKind::Image => Payload::Image(transcode(data, options)),
        _ => Payload::Raw(data),
    };
    (header, payload)
}

fn entry_options(header: &EntryHeader, len: usize) -> Result<FullFileOptions<'static>> {
    // Stored entries stay stored: EPUB readers require an uncompressed `mimetype`.
    let mut opts = if header.stored {
        FullFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        FullFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(ARCHIVE_DEFLATE_LEVEL))
    };

    if let Some(modified) = header.last_modified {
        opts = opts.last_modified_time(modified);
    }
    if let Some(mode) = header.unix_mode {
        opts = opts.unix_permissions(mode);
    }
    for (id, data) in &header.extra_fields {
        opts.add_extra_data(*id, data.clone(), false)?;
    }
    Ok(opts.large_file(len as u64 >= u32::MAX as u64))
}

fn write_entry<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    header: &EntryHeader,
    payload: Payload,
    stats: &mut CompressionStats,
) -> Result<()> {
    let data = match payload {
        Payload::Raw(data) => {
            stats.record_passthrough(&header.name, data.len() as u64);
            data
        }
        Payload::Image(outcome) => {
            log_image_outcome(&header.name, &outcome);
            stats.record_image(&header.name, &outcome);
            outcome.into_bytes()
        }
    };

    let opts = entry_options(header, data.len())?;
    if header.is_dir {
        writer.add_directory(header.name.as_str(), opts)?;
    } else {
        writer.start_file(header.name.as_str(), opts)?;
        writer.write_all(&data)?;
    }
    Ok(())
}

fn log_image_outcome(name: &str, outcome: &TranscodeOutcome) {
    match outcome {
        TranscodeOutcome::Optimized(result) => {
            let (w, h) = result.original_dimensions;
            verbose!(
                "Optimized {} ({}x{}) {:.1}KB -> {:.1}KB ({:.1}% smaller)",
                name,
                w,
                h,
                result.original_size as f64 / 1024.0,
                result.new_size as f64 / 1024.0,
                result.compression_ratio() * 100.0
            );
        }
        TranscodeOutcome::Fallback { reason, .. } => {
            warn!("Could not optimize {}, keeping original: {}", name, reason);
        }
    }
}
