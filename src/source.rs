//! Byte sources from which a header can be read.
//!
//! A [`NiftiSource`] only needs to hand out byte ranges. Sources may
//! also expose a path, which is used to guess whether the content is
//! gzip-compressed.
//!
//! [`NiftiSource`]: ./trait.NiftiSource.html
use crate::util::is_gz_file;
use log::trace;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A readable file: anything which can produce the bytes in a range.
pub trait NiftiSource {
    /// Read the bytes in `range`. The returned buffer is shorter than
    /// the range only when the source ends before `range.end`, and is
    /// empty when `range.start` is past the end.
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>>;

    /// The path of this source, if it has one.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Whether the source claims to be gzip-compressed.
    /// By default this is decided by a ".gz" suffix in the path.
    fn gz_hint(&self) -> bool {
        self.path().map(is_gz_file).unwrap_or(false)
    }
}

impl<'a, S: NiftiSource + ?Sized> NiftiSource for &'a S {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        (**self).read_range(range)
    }

    fn path(&self) -> Option<&Path> {
        (**self).path()
    }

    fn gz_hint(&self) -> bool {
        (**self).gz_hint()
    }
}

impl NiftiSource for [u8] {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        Ok(slice_range(self, range).to_vec())
    }
}

impl NiftiSource for Vec<u8> {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        self.as_slice().read_range(range)
    }
}

fn slice_range(data: &[u8], range: Range<u64>) -> &[u8] {
    let len = data.len() as u64;
    let start = range.start.min(len) as usize;
    let end = range.end.min(len).max(range.start.min(len)) as usize;
    &data[start..end]
}

/// An in-memory buffer with an associated file name.
#[derive(Debug, Clone, PartialEq)]
pub struct MemSource {
    path: PathBuf,
    data: Vec<u8>,
}

impl MemSource {
    /// Wrap the given bytes, named after `path`.
    pub fn new<P: Into<PathBuf>>(path: P, data: Vec<u8>) -> Self {
        MemSource {
            path: path.into(),
            data,
        }
    }
}

impl NiftiSource for MemSource {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        self.data.read_range(range)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// A file in the file system. The file is opened anew for each range
/// read, so no handle outlives a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Refer to the file at `path`. The file is not touched until read.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSource { path: path.into() }
    }
}

impl NiftiSource for FileSource {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        trace!("reading {:?} from {}", range, self.path.display());
        let mut file = File::open(&self.path)?;
        let _ = file.seek(SeekFrom::Start(range.start))?;
        let len = range.end.saturating_sub(range.start);
        let mut buf = Vec::with_capacity(len.min(1 << 16) as usize);
        let _ = file.take(len).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Sequential reader over a source, pulling one range of at most
/// `chunk_size` bytes at a time.
#[derive(Debug)]
pub(crate) struct SourceReader<S> {
    source: S,
    pos: u64,
    chunk_size: usize,
    buf: Vec<u8>,
    buf_pos: usize,
    source_failed: bool,
}

impl<S: NiftiSource> SourceReader<S> {
    /// Start reading after `prefix`, which holds bytes already read
    /// from the start of the source.
    pub fn with_prefix(source: S, chunk_size: usize, prefix: Vec<u8>) -> Self {
        SourceReader {
            source,
            pos: prefix.len() as u64,
            chunk_size: chunk_size.max(1),
            buf: prefix,
            buf_pos: 0,
            source_failed: false,
        }
    }

    /// Whether a range read of the underlying source has failed.
    pub fn source_failed(&self) -> bool {
        self.source_failed
    }
}

impl<S: NiftiSource> Read for SourceReader<S> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.buf_pos == self.buf.len() {
            let end = self.pos + self.chunk_size as u64;
            self.buf = match self.source.read_range(self.pos..end) {
                Ok(buf) => buf,
                Err(e) => {
                    self.source_failed = true;
                    return Err(e);
                }
            };
            self.buf_pos = 0;
            self.pos += self.buf.len() as u64;
            trace!("pulled {} bytes, now at offset {}", self.buf.len(), self.pos);
        }
        let available = &self.buf[self.buf_pos..];
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.buf_pos += n;
        Ok(n)
    }
}
