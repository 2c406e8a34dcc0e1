//! Byte sources feeding the pipeline.
//!
//! A [`ByteSource`] is a sequential reader of known total length; the driver
//! pulls bounded chunks from it and turns read failures into the run's only
//! fatal error. Files go through either a plain buffered reader or, above a
//! size threshold, a memory map.
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;

/// Threshold in bytes above which we attempt to use mmap for reading.
/// Callers can override via API; this is a reasonable default.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Decide whether to use mmap based on file size and threshold.
pub fn should_use_mmap(file_size_bytes: u64, threshold_bytes: u64) -> bool {
    file_size_bytes >= threshold_bytes
}

/// A seekless sequential byte source of known total length.
pub trait ByteSource {
    fn total_len(&self) -> u64;

    /// Read the next chunk into `buf`, returning the number of bytes read;
    /// 0 means end of input. Short reads are fine.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Buffered file reader source.
pub struct FileSource {
    reader: BufReader<File>,
    len: u64,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file =
            File::open(&path).with_context(|| format!("open {}", path.as_ref().display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("stat {}", path.as_ref().display()))?
            .len();
        Ok(Self {
            reader: BufReader::new(file),
            len,
        })
    }
}

impl ByteSource for FileSource {
    fn total_len(&self) -> u64 {
        self.len
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Memory-mapped file source; chunks are copied out of the map.
pub struct MmapSource {
    mmap: Mmap,
    pos: usize,
}

impl MmapSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file =
            File::open(&path).with_context(|| format!("open {}", path.as_ref().display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap {}", path.as_ref().display()))?;
        Ok(Self { mmap, pos: 0 })
    }
}

impl ByteSource for MmapSource {
    fn total_len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data: &[u8] = &self.mmap;
        let n = buf.len().min(data.len() - self.pos);
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// In-memory source, used by tests and programmatic callers.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn total_len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Choose mmap or buffered reading for a file based on its size.
pub fn open_auto<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> Result<Box<dyn ByteSource>> {
    let meta =
        std::fs::metadata(&path).with_context(|| format!("stat {}", path.as_ref().display()))?;
    if meta.is_file() && should_use_mmap(meta.len(), threshold_bytes) {
        Ok(Box::new(MmapSource::open(path)?))
    } else {
        Ok(Box::new(FileSource::open(path)?))
    }
}
