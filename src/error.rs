//! Types for error handling go here.
use quick_error::quick_error;
use std::io::Error as IOError;

/// Machine-readable key attached to every unreadable header failure.
pub const NIFTI_HEADER_UNREADABLE: &str = "NIFTI_HEADER_UNREADABLE";

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiftiError {
        /// The source could not be interpreted as a NIfTI header: it is
        /// truncated, carries the wrong magic code, or its `sizeof_hdr`
        /// is not self-consistent in either byte order.
        HeaderUnreadable(reason: &'static str) {
            display("NIfTI header unreadable: {}", reason)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

impl NiftiError {
    /// The key identifying this failure for the consuming validator.
    /// Only header interpretation failures carry one; I/O errors from
    /// the byte source are passed through untouched.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            NiftiError::HeaderUnreadable(_) => Some(NIFTI_HEADER_UNREADABLE),
            NiftiError::Io(_) => None,
        }
    }

    /// Whether this is a header interpretation failure.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, NiftiError::HeaderUnreadable(_))
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
