//! Reading of NIfTI-1 (and NIfTI-2) headers for dataset validation.
//!
//! The crate decodes the header block of a `.nii`, `.hdr` or `.nii.gz`
//! file into a [`NiftiHeader`] record: dimensions, voxel sizes, units,
//! the bit-packed MRI axis roles and the voxel-to-world affine. The
//! anatomical orientation of an affine is summarized by [`axis_codes`].
//!
//! Only the header-sized prefix of a source is read (and decompressed),
//! so even multi-gigabyte volumes are inspected quickly.
//!
//! # Example
//!
//! ```no_run
//! use nifti_header::{load_header, FileSource};
//! # use nifti_header::Result;
//!
//! # fn run() -> Result<()> {
//! let header = load_header(FileSource::new("sub-01_T1w.nii.gz"))?;
//! assert_eq!(header.shape.len(), header.voxel_sizes.len());
//! println!("{:?} {}", header.shape, header.xyzt_units.xyz);
//! if let Some(codes) = header.axis_codes {
//!     println!("orientation: {}", codes.iter().collect::<String>());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`NiftiHeader`]: ./header/struct.NiftiHeader.html
//! [`axis_codes`]: ./orientation/fn.axis_codes.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod affine;
pub mod error;
pub mod header;
pub mod orientation;
pub mod reader;
pub mod source;
pub mod typedef;
mod util;

pub use affine::{Affine3, Affine4, QuaternionParams};
pub use byteordered::Endianness;
pub use error::{NiftiError, Result, NIFTI_HEADER_UNREADABLE};
pub use header::{NiftiHeader, MAGIC_CODE_NI1, MAGIC_CODE_NIP1};
pub use orientation::{axis_codes, AxisCodes};
pub use reader::{load_header, Compression, ReaderOptions};
pub use source::{FileSource, MemSource, NiftiSource};
pub use typedef::{DimInfo, NiftiVersion, SpaceUnit, Storage, TimeUnit, XForm, XyztUnits};
