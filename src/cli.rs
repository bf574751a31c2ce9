use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "epub-squeeze",
    about = "Shrink an EPUB for e-readers by recompressing its images",
    long_about = "epub-squeeze rewrites an EPUB (or any zip container), re-encoding every raster image \
                  as JPEG, flattening transparency onto white and shrinking oversized pictures to fit \
                  the reader's screen. All other entries are copied byte-for-byte.",
    version,
    after_help = "EXAMPLES:\n  \
    epub-squeeze book.epub\n  \
    epub-squeeze book.epub book_small.epub\n  \
    epub-squeeze book.epub book_small.epub 49 -q 80 -w 1440 -H 1920"
)]
pub struct Args {
    #[arg(help = "Input EPUB file path")]
    pub input: PathBuf,

    #[arg(
        help = "Output EPUB file path",
        long_help = "Output path. Defaults to <input>_compressed.<ext> next to the input file."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        help = "Target size in MB (default: 49)",
        long_help = "Size the output should fit under, in MB. Only used to report whether the \
                     target was reached; the tool never loops to hit it."
    )]
    pub target_size_mb: Option<f64>,

    #[arg(
        short = 'q',
        long,
        help = "JPEG quality (0-100, default: 85)"
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'w',
        long,
        help = "Maximum image width in pixels (default: 1920)",
        long_help = "Images wider than this are scaled down, preserving aspect ratio. \
                     Smaller images are never enlarged."
    )]
    pub max_width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        help = "Maximum image height in pixels (default: 2560)",
        long_help = "Images taller than this are scaled down, preserving aspect ratio. \
                     Smaller images are never enlarged."
    )]
    pub max_height: Option<u32>,

    #[arg(
        short = 'j',
        long,
        help = "Number of parallel threads (default: auto)",
        long_help = "Number of threads used to transcode images. \
                     If not specified, uses number of CPU cores."
    )]
    pub threads: Option<usize>,

    #[arg(long, help = "Show a progress bar")]
    pub progress: bool,

    #[arg(short = 'v', long, help = "Print one line per optimized image")]
    pub verbose: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,
}
