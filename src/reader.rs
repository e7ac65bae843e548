//! Reading headers out of byte sources, with optional gzip decoding.
//!
//! Only the header-sized prefix of the (decompressed) source is ever
//! realized, so inspecting a large `.nii.gz` volume costs a few
//! kilobytes of I/O at most.

use crate::error::{NiftiError, Result};
use crate::header::{read_header_block, NiftiHeader};
use crate::source::{FileSource, NiftiSource, SourceReader};
use crate::util::has_gz_magic;
use flate2::read::GzDecoder;
use log::debug;
use std::io;
use std::path::Path;

/// Default number of bytes pulled from a source per range read.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// How to decide whether a source is gzip-compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Look for the gzip magic number at the start of the source.
    Auto,
    /// Trust the source's own hint (a ".gz" file name).
    ByExtension,
    /// Always decode as gzip.
    Gzip,
    /// Never decode as gzip.
    Uncompressed,
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Auto
    }
}

/// Options and flags which can be used to configure how a header is read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    compression: Compression,
    chunk_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            compression: Compression::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ReaderOptions {
    /// Creates a blank new set of options ready for configuration.
    pub fn new() -> Self {
        ReaderOptions::default()
    }

    /// Set the compression detection policy (default: `Compression::Auto`).
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the number of bytes requested from the source per range read
    /// (default: 1024). Zero is treated as one.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Read a header from the file at `path`.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<NiftiHeader> {
        self.read_header(FileSource::new(path.as_ref()))
    }

    /// Read a header from any byte source.
    ///
    /// # Errors
    ///
    /// - `NiftiError::HeaderUnreadable` if the (decompressed) prefix is not
    ///   a valid header, or if a gzip source is corrupt.
    /// - `NiftiError::Io` for failures of the source itself.
    pub fn read_header<S: NiftiSource>(&self, source: S) -> Result<NiftiHeader> {
        let prefix = source.read_range(0..self.chunk_size as u64)?;
        let gz = match self.compression {
            Compression::Auto => has_gz_magic(&prefix),
            Compression::ByExtension => source.gz_hint(),
            Compression::Gzip => true,
            Compression::Uncompressed => false,
        };
        debug!(
            "reading header from {} ({})",
            source
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string()),
            if gz { "gzip" } else { "uncompressed" }
        );

        let reader = SourceReader::with_prefix(source, self.chunk_size, prefix);
        let block = if gz {
            let mut decoder = GzDecoder::new(reader);
            match read_header_block(&mut decoder) {
                Ok(block) => block,
                Err(e) if decoder.get_ref().source_failed() => return Err(e.into()),
                Err(e) => return Err(gz_error(e)),
            }
        } else {
            read_header_block(reader)?
        };
        debug!("realized {} header bytes", block.len());
        NiftiHeader::from_bytes(&block)
    }
}

/// Read a header from the given source with the default options.
///
/// # Example
///
/// ```
/// # use nifti_header::{load_header, MemSource};
/// let source = MemSource::new("sub-01_events.tsv", b"onset\tduration\n".to_vec());
/// let err = load_header(&source).unwrap_err();
/// assert_eq!(err.key(), Some("NIFTI_HEADER_UNREADABLE"));
/// ```
pub fn load_header<S: NiftiSource>(source: S) -> Result<NiftiHeader> {
    ReaderOptions::new().read_header(source)
}

/// Errors raised by the gzip decoder itself. Malformed streams become
/// unreadable headers.
fn gz_error(e: io::Error) -> NiftiError {
    match e.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            NiftiError::HeaderUnreadable("corrupt gzip stream")
        }
        _ => NiftiError::Io(e),
    }
}
