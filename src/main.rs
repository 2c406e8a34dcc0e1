//! CLI entrypoint for `credsift`.
//!
//! Parses command-line arguments, checks the input against the size cap,
//! builds the allow-list, runs the streaming pipeline with a stderr progress
//! meter, prints a terminal summary, and optionally writes TXT/CSV exports of
//! the selected hosts when an output directory is provided.
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{LevelFilter, error, warn};

use credsift::{
    allowlist::AllowList,
    export::{save_buckets_csv, save_buckets_txt},
    pipeline::{
        DEFAULT_BATCH_LINES, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SAMPLES, SiftConfig, SiftOutcome,
        run_file,
    },
    report::render_summary_with_top,
    source::DEFAULT_MMAP_THRESHOLD_BYTES,
};

/// Inputs above this size are refused unless the cap is overridden.
const DEFAULT_MAX_INPUT_BYTES: u64 = 15 * 1024 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "credsift",
    version,
    about = "Streaming host:user:pass credential log sorter"
)]
struct Args {
    /// Path to the credential dump file
    #[arg(short = 'i', long = "input", required = true)]
    input: PathBuf,

    /// File with one allowed host per line (default: built-in Garena hosts)
    #[arg(short = 'a', long = "allowlist")]
    allowlist: Option<PathBuf>,

    /// Allowed host; repeatable, overrides --allowlist and the defaults
    #[arg(long = "host")]
    hosts: Vec<String>,

    /// Path to the output directory for TXT/CSV exports
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Restrict exports to this host; repeatable (default: all with matches)
    #[arg(long = "select")]
    select: Vec<String>,

    /// Read-unit size in bytes
    #[arg(long = "chunk-size", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Lines processed between cooperative yields
    #[arg(long = "batch-lines", default_value_t = DEFAULT_BATCH_LINES)]
    batch_lines: usize,

    /// Maximum number of rejected lines kept as diagnostics
    #[arg(long = "max-samples", default_value_t = DEFAULT_MAX_SAMPLES)]
    max_samples: usize,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Refuse inputs larger than this many bytes. If zero, no cap.
    #[arg(long = "max-input-size", default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_input_size: u64,

    /// Limit number of entries in "Top Reused Passwords"
    #[arg(long = "top", default_value_t = 10)]
    top_limit: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress summary and progress output (still writes exports with -o)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

const ASCII_TITLE: &str = r#"
  ___             _ ___ _  __ _
 / __|_ _ ___  __| / __(_)/ _| |_
| (__| '_/ -_)/ _` \__ \ |  _|  _|
 \___|_| \___|\__,_|___/_|_| \__|
"#;

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn verify_input(args: &Args) -> Result<()> {
    if !args.input.exists() {
        bail!("input file not found: {}", args.input.display());
    }
    let meta = fs::metadata(&args.input)?;
    if args.max_input_size > 0 && meta.len() > args.max_input_size {
        bail!(
            "input too big: {} bytes (max {}, override with --max-input-size)",
            meta.len(),
            args.max_input_size
        );
    }
    Ok(())
}

fn build_allowlist(args: &Args) -> Result<AllowList> {
    if !args.hosts.is_empty() {
        return Ok(AllowList::new(&args.hosts));
    }
    if let Some(path) = &args.allowlist {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read allowlist {}: {}", path.display(), e))?;
        let allow = AllowList::parse(&contents);
        if allow.is_empty() {
            bail!("allowlist {} contains no hosts", path.display());
        }
        return Ok(allow);
    }
    Ok(AllowList::garena_defaults())
}

fn selected_hosts<'a>(outcome: &'a SiftOutcome, args: &'a Args) -> Vec<&'a str> {
    if args.select.is_empty() {
        return outcome.buckets.active_hosts();
    }
    let mut hosts = Vec::new();
    for sel in &args.select {
        let sel = sel.trim().to_lowercase();
        match outcome.buckets.iter().find(|(h, _)| *h == sel) {
            Some((host, _)) => hosts.push(host),
            None => warn!("--select {}: not in the allow-list, ignoring", sel),
        }
    }
    hosts
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_input(&args) {
        error!("{}", e);
        std::process::exit(2);
    }
    let allow = match build_allowlist(&args) {
        Ok(a) => a,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let config = SiftConfig {
        allow,
        chunk_size: args.chunk_size.max(1),
        batch_lines: args.batch_lines.max(1),
        max_samples: args.max_samples,
    };
    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };

    let quiet = args.quiet;
    let mut last_whole: i64 = -1;
    let mut progress = move |pct: f64| {
        if quiet {
            return;
        }
        let whole = pct.floor() as i64;
        if whole > last_whole {
            last_whole = whole;
            eprint!("\rprocessing {:>3}%", whole);
            if whole >= 100 {
                eprintln!();
            }
        }
    };

    let outcome = match run_file(
        config,
        &args.input,
        threshold,
        &mut progress,
        &mut std::thread::yield_now,
    ) {
        Ok(o) => o,
        Err(e) => {
            error!("run failed: {:#}", e);
            std::process::exit(3);
        }
    };

    if !args.quiet {
        println!("{}", ASCII_TITLE.bold().green());
        println!("{}", render_summary_with_top(&outcome, args.top_limit));
    }

    if let Some(outdir) = &args.output {
        if let Err(e) = fs::create_dir_all(outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            std::process::exit(4);
        }
        let hosts = selected_hosts(&outcome, &args);
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let txt = outdir.join(format!("credsift_selected_{}.txt", ts));
        let csv = outdir.join(format!("credsift_records_{}.csv", ts));
        if let Err(e) = save_buckets_txt(&outcome.buckets, &hosts, &txt) {
            error!("failed to write {}: {}", txt.display(), e);
            std::process::exit(5);
        }
        if let Err(e) = save_buckets_csv(&outcome.buckets, &hosts, &csv) {
            error!("failed to write {}: {}", csv.display(), e);
            std::process::exit(6);
        }
    }
}
