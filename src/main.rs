use batch_resize::config::{self, DEFAULT_RESOLUTION, DEFAULT_TYPE, RunConfig};
use batch_resize::imaging::ResizeMode;
use batch_resize::{output, walk};
use clap::{CommandFactory, Parser};
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "batch-resize")]
#[command(about = "Resize and convert every image in a directory tree")]
#[command(long_about = "\
Resize and convert every image in a directory tree

Walks <source> recursively in lexical order and converts every .jpg, .jpeg,
.tif, .tiff and .cr2 file (any letter case) into <output>, flat:

  photos/                          photos/1920x1080/
  ├── IMG_0001.CR2        ──►      ├── IMG_0001.jpeg
  ├── notes.txt                    ├── IMG_0001.jpeg.json
  └── 2023/scan.tif                └── scan.jpeg

The EXIF tags of each source are written next to its output as
<output file>.json. Absolute output paths are printed to stdout, one per line;
diagnostics go to stderr.

Output types:
  jpeg          JPEG, quality 95 (default; unknown types also mean jpeg)
  tiff          TIFF, Deflate compressed
  tiff-deflate  TIFF, Deflate compressed
  tiff-lzw      TIFF, LZW compressed
  tiff-none     TIFF, uncompressed
  png           PNG

Long flags also work with a single dash: -res 800x600 -type=png")]
#[command(version)]
struct Cli {
    /// Directory to walk
    source: Option<PathBuf>,

    /// Target size as <width>x<height>
    #[arg(long, default_value = DEFAULT_RESOLUTION)]
    res: String,

    /// Output type
    #[arg(long = "type", default_value = DEFAULT_TYPE)]
    format: String,

    /// Destination directory [default: <source>/<res>]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Parallel conversions (0 = one per CPU core)
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Keep the aspect ratio, fitting inside <res> instead of stretching
    #[arg(long)]
    fit: bool,

    /// Reproduce source subdirectories under the destination
    #[arg(long)]
    mirror: bool,

    /// Log converted/failed counts when done
    #[arg(long)]
    summary: bool,

    /// Exit with status 2 if any file failed or any entry was unreadable
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(config::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print().ok();
            return ExitCode::from(code);
        }
    };
    init_logger(cli.verbose);

    let Some(source) = cli.source.as_deref() else {
        log::error!(target: "path", "no <source> specified");
        eprintln!("{}", Cli::command().render_usage());
        return ExitCode::from(1);
    };

    let config = match RunConfig::resolve(source, cli.output.as_deref(), &cli.res, &cli.format) {
        Ok(config) => config
            .with_mode(if cli.fit {
                ResizeMode::Fit
            } else {
                ResizeMode::Exact
            })
            .with_mirror(cli.mirror)
            .with_jobs(cli.jobs),
        Err(e) => {
            log::error!(target: e.log_target(), "{}", e);
            return ExitCode::from(1);
        }
    };

    if cli.output.is_none() {
        log::info!(
            target: "path",
            "no <destination>, creating {}",
            config.dest_root.display()
        );
    }
    if let Err(e) = config.create_destination() {
        log::debug!(
            target: "path",
            "cannot create {}: {}",
            config.dest_root.display(),
            e
        );
    }
    log::debug!(
        target: "config",
        "{}x{} {} ({:?}) with {} job(s) into {}",
        config.width,
        config.height,
        config.format,
        config.mode,
        config.jobs,
        config.dest_root.display()
    );

    init_thread_pool(config.jobs);
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            match output::format_event(&event) {
                Ok(line) => println!("{}", line),
                Err(message) => log::error!(target: "convert", "{}", message),
            }
        }
    });
    let summary = walk::run(&config, Some(tx));
    if printer.join().is_err() {
        log::error!(target: "convert", "output thread panicked");
    }
    for line in output::format_walk_errors(&summary) {
        log::error!(target: "walk", "{}", line);
    }

    if cli.summary {
        for line in output::format_summary(&summary) {
            log::info!(target: "summary", "{}", line);
        }
    }

    if cli.strict && !summary.is_clean() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr as `[target] message`. `-v` enables debug; `RUST_LOG`
/// overrides both.
fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.target(), record.args()))
        .init();
}

/// Initialize the rayon thread pool with the resolved worker count.
fn init_thread_pool(threads: usize) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
