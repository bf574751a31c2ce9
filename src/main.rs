use anyhow::{Context, Result};
use clap::Parser;
use epub_squeeze::cli::Args;
use epub_squeeze::logger::LogLevel;
use epub_squeeze::utils::{default_output_path, validate_file_exists};
use epub_squeeze::{compress_epub, error, info, logger, report, CompressionOptions};
use std::fs;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    logger::set_level(LogLevel::from_flags(args.quiet, args.verbose));

    let options = CompressionOptions::new(
        args.quality,
        args.max_width,
        args.max_height,
        args.target_size_mb,
    )?
    .with_threads(args.threads)
    .with_progress(args.progress && !args.quiet);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    validate_file_exists(&args.input)?;
    let original_size = fs::metadata(&args.input)?.len();

    info!("{}", "=".repeat(60));
    info!("📚 epub-squeeze");
    info!("{}", "=".repeat(60));
    report::print_plan(original_size, options.target_size_bytes);
    info!("\n🚀 Processing {:?}...\n", args.input);

    let summary = compress_epub(&args.input, &output, &options)
        .with_context(|| format!("failed to compress {}", args.input.display()))?;
    summary.print_summary();

    info!("\n✅ Done! Saved as: {}", output.display());
    Ok(())
}
