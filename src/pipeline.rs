//! The streaming sift pipeline.
//!
//! [`Sifter`] is the push-based core: feed it raw chunks, then call
//! [`Sifter::finish`] to flush the trailing partial line and take the result.
//! Each line is fully parsed, filtered, deduplicated, and bucketed before
//! control returns, so abandoning a run between feeds leaves nothing half
//! done. [`run_source`] is the bundled driver: it pulls bounded chunks from a
//! [`ByteSource`], reports progress after every read, and calls the
//! cooperative yield hook after each batch of processed lines. Per-line
//! problems are counted and sampled, never fatal; only a source read failure
//! aborts a run, and it carries the number of bytes processed so far.
use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::allowlist::AllowList;
use crate::bucket::BucketMap;
use crate::lines::LineAssembler;
use crate::parse::{ParseOutcome, RecordParser, RejectReason};
use crate::progress::{ProgressSink, percent};
use crate::source::{ByteSource, open_auto};
use crate::summary::RunSummary;

/// Default read unit; small enough to keep progress and yields frequent.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;
/// Default lines per cooperative yield.
pub const DEFAULT_BATCH_LINES: usize = 10_000;
/// Default cap on sampled rejected lines.
pub const DEFAULT_MAX_SAMPLES: usize = 5;

/// Pipeline tunables. All of them are caller decisions; the defaults here
/// are only starting points for the CLI.
#[derive(Debug, Clone)]
pub struct SiftConfig {
    pub allow: AllowList,
    pub chunk_size: usize,
    pub batch_lines: usize,
    pub max_samples: usize,
}

impl SiftConfig {
    pub fn new(allow: AllowList) -> Self {
        Self {
            allow,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_lines: DEFAULT_BATCH_LINES,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

/// Run-scoped duplicate suppression keyed on the joined fingerprint.
#[derive(Debug, Default)]
struct DedupSet {
    seen: HashSet<String>,
}

impl DedupSet {
    /// True on first observation of this fingerprint; marks it seen.
    fn is_new(&mut self, fingerprint: String) -> bool {
        self.seen.insert(fingerprint)
    }
}

/// Final result of a run, handed to the presentation layer.
#[derive(Debug)]
pub struct SiftOutcome {
    pub buckets: BucketMap,
    pub summary: RunSummary,
}

impl SiftOutcome {
    /// Accepted-record counts per host, allow-list order.
    pub fn per_host_counts(&self) -> Vec<(&str, usize)> {
        self.buckets
            .iter()
            .map(|(host, records)| (host, records.len()))
            .collect()
    }
}

/// The only fatal condition: the byte source failed mid-run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("source read failed after {bytes_processed} bytes: {source}")]
    SourceRead {
        bytes_processed: u64,
        #[source]
        source: io::Error,
    },
}

/// Push-based pipeline state: line assembly, parsing, filtering, dedup and
/// bucketing for one run.
pub struct Sifter {
    config: SiftConfig,
    assembler: LineAssembler,
    parser: RecordParser,
    dedup: DedupSet,
    buckets: BucketMap,
    summary: RunSummary,
    lines_since_yield: usize,
}

impl Sifter {
    pub fn new(config: SiftConfig) -> Self {
        let buckets = BucketMap::with_hosts(&config.allow);
        Self {
            config,
            assembler: LineAssembler::new(),
            parser: RecordParser::new(),
            dedup: DedupSet::default(),
            buckets,
            summary: RunSummary::default(),
            lines_since_yield: 0,
        }
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// Feed the next chunk of input.
    pub fn feed_chunk(&mut self, chunk: &[u8]) {
        self.feed_chunk_with(chunk, &mut || {});
    }

    /// Feed the next chunk, calling `yield_hook` after every
    /// `batch_lines` processed lines. The hook only ever runs between fully
    /// processed records, never mid-record.
    pub fn feed_chunk_with(&mut self, chunk: &[u8], yield_hook: &mut dyn FnMut()) {
        for raw in self.assembler.feed(chunk) {
            self.feed_line(&raw);
            self.lines_since_yield += 1;
            if self.lines_since_yield >= self.config.batch_lines {
                self.lines_since_yield = 0;
                yield_hook();
            }
        }
    }

    fn feed_line(&mut self, raw: &[u8]) {
        match self.parser.parse(raw) {
            ParseOutcome::Blank => {}
            ParseOutcome::Rejected(reason) => {
                self.summary
                    .record_reject(reason, raw, self.config.max_samples);
            }
            ParseOutcome::Record(record) => {
                if !self.config.allow.contains(&record.host) {
                    self.summary.record_reject(
                        RejectReason::UnsupportedHost,
                        raw,
                        self.config.max_samples,
                    );
                    return;
                }
                self.summary.accepted += 1;
                if self.dedup.is_new(record.fingerprint()) {
                    self.buckets.put(record);
                } else {
                    self.summary.duplicates += 1;
                }
            }
        }
    }

    /// Flush the trailing unterminated line and take the run's result.
    pub fn finish(mut self) -> SiftOutcome {
        if let Some(last) = self.assembler.flush() {
            self.feed_line(&last);
        }
        self.summary.fallback_engaged = self.parser.fallback_engaged();
        SiftOutcome {
            buckets: self.buckets,
            summary: self.summary,
        }
    }
}

/// Drive a full run over `source`: bounded reads, progress after each one,
/// cooperative yields at line-batch boundaries. The final progress report of
/// a successful run is exactly 100.
pub fn run_source(
    config: SiftConfig,
    source: &mut dyn ByteSource,
    progress: &mut dyn ProgressSink,
    yield_hook: &mut dyn FnMut(),
) -> Result<SiftOutcome, RunError> {
    let total = source.total_len();
    let mut buf = vec![0u8; config.chunk_size.max(1)];
    let mut sifter = Sifter::new(config);
    let mut processed: u64 = 0;
    loop {
        let n = source
            .read_chunk(&mut buf)
            .map_err(|e| RunError::SourceRead {
                bytes_processed: processed,
                source: e,
            })?;
        if n == 0 {
            break;
        }
        sifter.feed_chunk_with(&buf[..n], yield_hook);
        processed += n as u64;
        if processed < total {
            progress.on_progress(percent(processed, total));
        }
    }
    let outcome = sifter.finish();
    progress.on_progress(100.0);
    Ok(outcome)
}

/// Convenience driver over a file path, choosing mmap or buffered reads by
/// threshold.
pub fn run_file<P: AsRef<Path>>(
    config: SiftConfig,
    path: P,
    mmap_threshold_bytes: u64,
    progress: &mut dyn ProgressSink,
    yield_hook: &mut dyn FnMut(),
) -> anyhow::Result<SiftOutcome> {
    let mut source = open_auto(path, mmap_threshold_bytes)?;
    Ok(run_source(config, source.as_mut(), progress, yield_hook)?)
}
