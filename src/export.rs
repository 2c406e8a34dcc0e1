//! Export helpers for writing selected buckets to files.
//!
//! - `save_buckets_txt` writes `host:user:pass` lines, fields verbatim, in
//!   bucket order — the same shape the input grammar accepts.
//! - `save_buckets_csv` writes one row per record with a header.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::bucket::BucketMap;

/// Write the records of the chosen hosts as plain `host:user:pass` lines.
pub fn save_buckets_txt<P: AsRef<Path>>(
    buckets: &BucketMap,
    hosts: &[&str],
    path: P,
) -> Result<()> {
    let mut f = File::create(path)?;
    for host in hosts {
        if let Some(records) = buckets.get(host) {
            for r in records {
                writeln!(f, "{}", r)?;
            }
        }
    }
    Ok(())
}

/// Write the records of the chosen hosts as CSV with a `host,user,pass`
/// header.
pub fn save_buckets_csv<P: AsRef<Path>>(
    buckets: &BucketMap,
    hosts: &[&str],
    path: P,
) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for host in hosts {
        if let Some(records) = buckets.get(host) {
            for r in records {
                wtr.serialize(r)?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
