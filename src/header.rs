//! This module defines the `NiftiHeader` struct, which is used
//! to provide important information about NIfTI volumes.
//!
//! Only the header block is ever decoded: the geometry and unit
//! metadata are extracted from their fixed offsets, the bit-packed
//! bytes are unpacked, and the affine is resolved from the sform or
//! qform fields.

use crate::affine::{sform_affine, Affine4, QuaternionParams};
use crate::error::{NiftiError, Result};
use crate::orientation::{axis_codes, AxisCodes};
use crate::reader::ReaderOptions;
use crate::typedef::{DimInfo, NiftiVersion, Storage, XForm, XyztUnits};
use crate::util::nul_trimmed_string;
use byteordered::{Endian, Endianness};
use log::debug;
use std::io::{self, Read};
use std::path::Path;

/// Magic code for NIFTI-1 header files (extention ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extention ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";
/// Magic code for NIFTI-2 header files (extention ".hdr[.gz]").
pub const MAGIC_CODE_NI2: &[u8; 8] = b"ni2\0\r\n\x1a\n";
/// Magic code for full NIFTI-2 files (extention ".nii[.gz]").
pub const MAGIC_CODE_NIP2: &[u8; 8] = b"n+2\0\r\n\x1a\n";

/// Size of the NIfTI-1 header block.
pub const NIFTI1_HEADER_SIZE: usize = 348;
/// Size of the NIfTI-2 header block, which is also the most
/// that ever needs to be realized from a source.
pub const NIFTI2_HEADER_SIZE: usize = 540;

/// Byte offsets of the NIfTI-1 fields that are decoded.
pub(crate) mod offsets_v1 {
    pub const SIZEOF_HDR: usize = 0;
    pub const DIM_INFO: usize = 39;
    pub const DIM: usize = 40;
    pub const DATATYPE: usize = 70;
    pub const BITPIX: usize = 72;
    pub const PIXDIM: usize = 76;
    pub const VOX_OFFSET: usize = 108;
    pub const XYZT_UNITS: usize = 123;
    pub const DESCRIP: usize = 148;
    pub const QFORM_CODE: usize = 252;
    pub const SFORM_CODE: usize = 254;
    pub const QUATERN_B: usize = 256;
    pub const QOFFSET_X: usize = 268;
    pub const SROW_X: usize = 280;
    pub const SROW_Y: usize = 296;
    pub const SROW_Z: usize = 312;
    pub const MAGIC: usize = 344;
}

/// Byte offsets of the NIfTI-2 fields that are decoded.
pub(crate) mod offsets_v2 {
    pub const MAGIC: usize = 4;
    pub const DATATYPE: usize = 12;
    pub const BITPIX: usize = 14;
    pub const DIM: usize = 16;
    pub const PIXDIM: usize = 104;
    pub const VOX_OFFSET: usize = 168;
    pub const DESCRIP: usize = 240;
    pub const QFORM_CODE: usize = 344;
    pub const SFORM_CODE: usize = 348;
    pub const QUATERN_B: usize = 352;
    pub const QOFFSET_X: usize = 376;
    pub const SROW_X: usize = 400;
    pub const SROW_Y: usize = 432;
    pub const SROW_Z: usize = 464;
    pub const XYZT_UNITS: usize = 500;
    pub const DIM_INFO: usize = 524;
}

/// The normalized NIfTI header record.
///
/// Multi-byte fields are widened to a common type so that both header
/// versions fit the same record: dimensions become `i64` and all
/// floating point fields `f64`.
///
/// # Examples
///
/// ```no_run
/// use nifti_header::{axis_codes, NiftiHeader};
/// # use nifti_header::Result;
///
/// # fn run() -> Result<()> {
/// let hdr = NiftiHeader::from_file("sub-01/anat/sub-01_T1w.nii.gz")?;
/// println!("shape: {:?}, units: {}", hdr.shape, hdr.xyzt_units.xyz);
/// if let Some(affine) = &hdr.affine {
///     println!("orientation: {:?}", axis_codes(affine));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header layout version
    pub version: NiftiVersion,
    /// Byte order of the header (and of the data that follows it)
    pub endianness: Endianness,
    /// Single file or header/image pair, from the magic code
    pub storage: Storage,
    /// Data array dimensions; `dim[0]` is the rank
    pub dim: [i64; 8],
    /// Grid spacings; `pixdim[0]` is qfac
    pub pixdim: [f64; 8],
    /// `dim[1..=dim[0]]`
    pub shape: Vec<i64>,
    /// `pixdim[1..=dim[0]]`
    pub voxel_sizes: Vec<f64>,
    /// MRI slice ordering
    pub dim_info: DimInfo,
    /// Units of pixdim[1..4]
    pub xyzt_units: XyztUnits,
    /// NIFTI_XFORM_* code of the quaternion transform
    pub qform_code: i32,
    /// NIFTI_XFORM_* code of the matrix transform
    pub sform_code: i32,
    /// Voxel data type code
    pub datatype: i16,
    /// Number of bits per voxel
    pub bitpix: i16,
    /// Offset into .nii file to reach the volume
    pub vox_offset: f64,
    /// Any text you like
    pub descrip: String,
    /// Affine built from the quaternion parameters, if `qform_code != 0`
    pub qform_affine: Option<Affine4>,
    /// Affine built from the sform rows, if `sform_code != 0`
    pub sform_affine: Option<Affine4>,
    /// The authoritative affine: the sform one when available,
    /// the qform one otherwise
    pub affine: Option<Affine4>,
    /// Orientation of the voxel axes under `affine`
    pub axis_codes: Option<AxisCodes>,
}

impl NiftiHeader {
    /// Retrieve a NIfTI header from a file in the file system.
    /// Compression is detected from the file's content.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiHeader> {
        ReaderOptions::new().read_file(path)
    }

    /// Read a header from the given byte stream, which must already be
    /// decompressed and positioned at the start of the header. At most
    /// one header block is consumed.
    pub fn from_reader<R: Read>(input: R) -> Result<NiftiHeader> {
        let block = read_header_block(input)?;
        NiftiHeader::from_bytes(&block)
    }

    /// Decode a header from a block of decompressed bytes.
    ///
    /// # Errors
    ///
    /// `NiftiError::HeaderUnreadable` if the block is shorter than the
    /// header it claims to be, if `sizeof_hdr` matches no header size in
    /// either byte order, if the magic code is wrong, or if the rank
    /// `dim[0]` is not between 1 and 7.
    pub fn from_bytes(block: &[u8]) -> Result<NiftiHeader> {
        if block.len() < NIFTI1_HEADER_SIZE {
            return Err(NiftiError::HeaderUnreadable("fewer than 348 header bytes"));
        }
        let (version, endianness) = detect_layout(block)?;
        if block.len() < version.header_size() {
            return Err(NiftiError::HeaderUnreadable("fewer than 540 header bytes"));
        }
        debug!("decoding {:?} header in {:?} byte order", version, endianness);

        let fields = Fields { block, endianness };
        let (storage, raw) = match version {
            NiftiVersion::Nifti1 => parse_nifti1(&fields)?,
            NiftiVersion::Nifti2 => parse_nifti2(&fields)?,
        };
        raw.normalize(version, endianness, storage)
    }

    /// Rank of the volume, `dim[0]`.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Get the qform coordinate mapping method as an enum.
    /// `None` if the code is not one defined by the standard.
    pub fn qform(&self) -> Option<XForm> {
        XForm::from_code(self.qform_code)
    }

    /// Get the sform coordinate mapping method as an enum.
    /// `None` if the code is not one defined by the standard.
    pub fn sform(&self) -> Option<XForm> {
        XForm::from_code(self.sform_code)
    }
}

/// Read up to one NIfTI-2 header's worth of bytes, the most that either
/// header version needs.
pub(crate) fn read_header_block<R: Read>(input: R) -> io::Result<Vec<u8>> {
    let mut block = Vec::with_capacity(NIFTI2_HEADER_SIZE);
    let _ = input
        .take(NIFTI2_HEADER_SIZE as u64)
        .read_to_end(&mut block)?;
    Ok(block)
}

/// Resolve the header version and byte order from `sizeof_hdr`,
/// which sits at the start of both header versions.
fn detect_layout(block: &[u8]) -> Result<(NiftiVersion, Endianness)> {
    use self::offsets_v1::SIZEOF_HDR;

    let sizeof_hdr = block
        .get(SIZEOF_HDR..SIZEOF_HDR + 4)
        .ok_or(NiftiError::HeaderUnreadable("header is truncated"))?;
    for &version in &[NiftiVersion::Nifti1, NiftiVersion::Nifti2] {
        for &endianness in &[Endianness::Little, Endianness::Big] {
            let size = endianness.read_i32(sizeof_hdr).map_err(truncated)?;
            if size as usize == version.header_size() {
                return Ok((version, endianness));
            }
        }
    }
    Err(NiftiError::HeaderUnreadable(
        "sizeof_hdr is inconsistent in both byte orders",
    ))
}

fn truncated(_: io::Error) -> NiftiError {
    NiftiError::HeaderUnreadable("header is truncated")
}

/// Fixed-offset field access in a resolved byte order.
struct Fields<'a> {
    block: &'a [u8],
    endianness: Endianness,
}

impl<'a> Fields<'a> {
    fn at(&self, offset: usize) -> Result<&'a [u8]> {
        self.block
            .get(offset..)
            .ok_or(NiftiError::HeaderUnreadable("header is truncated"))
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        self.block
            .get(offset..offset + len)
            .ok_or(NiftiError::HeaderUnreadable("header is truncated"))
    }

    fn u8(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes(offset, 1)?[0])
    }

    fn i16(&self, offset: usize) -> Result<i16> {
        self.endianness.read_i16(self.at(offset)?).map_err(truncated)
    }

    fn i32(&self, offset: usize) -> Result<i32> {
        self.endianness.read_i32(self.at(offset)?).map_err(truncated)
    }

    fn i64(&self, offset: usize) -> Result<i64> {
        self.endianness.read_i64(self.at(offset)?).map_err(truncated)
    }

    fn f32(&self, offset: usize) -> Result<f64> {
        self.endianness
            .read_f32(self.at(offset)?)
            .map(f64::from)
            .map_err(truncated)
    }

    fn f64(&self, offset: usize) -> Result<f64> {
        self.endianness.read_f64(self.at(offset)?).map_err(truncated)
    }

    /// Fill `out` with consecutive `f32` values starting at `offset`.
    fn f32s(&self, offset: usize, out: &mut [f64]) -> Result<()> {
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.f32(offset + 4 * i)?;
        }
        Ok(())
    }

    /// Fill `out` with consecutive `f64` values starting at `offset`.
    fn f64s(&self, offset: usize, out: &mut [f64]) -> Result<()> {
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.f64(offset + 8 * i)?;
        }
        Ok(())
    }
}

/// Header fields as stored, before any derivation.
#[derive(Debug, Default)]
struct RawHeader {
    dim: [i64; 8],
    pixdim: [f64; 8],
    dim_info: u8,
    xyzt_units: u8,
    qform_code: i32,
    sform_code: i32,
    datatype: i16,
    bitpix: i16,
    vox_offset: f64,
    descrip: String,
    quatern: [f64; 3],
    qoffset: [f64; 3],
    srow_x: [f64; 4],
    srow_y: [f64; 4],
    srow_z: [f64; 4],
}

fn parse_nifti1(f: &Fields) -> Result<(Storage, RawHeader)> {
    use self::offsets_v1::*;

    let magic = f.bytes(MAGIC, 4)?;
    let storage = if magic == MAGIC_CODE_NIP1 {
        Storage::SingleFile
    } else if magic == MAGIC_CODE_NI1 {
        Storage::FilePair
    } else {
        return Err(NiftiError::HeaderUnreadable("bad NIfTI-1 magic code"));
    };

    let mut h = RawHeader::default();
    for (i, v) in h.dim.iter_mut().enumerate() {
        *v = i64::from(f.i16(DIM + 2 * i)?);
    }
    f.f32s(PIXDIM, &mut h.pixdim)?;
    h.dim_info = f.u8(DIM_INFO)?;
    h.xyzt_units = f.u8(XYZT_UNITS)?;
    h.qform_code = i32::from(f.i16(QFORM_CODE)?);
    h.sform_code = i32::from(f.i16(SFORM_CODE)?);
    h.datatype = f.i16(DATATYPE)?;
    h.bitpix = f.i16(BITPIX)?;
    h.vox_offset = f.f32(VOX_OFFSET)?;
    h.descrip = nul_trimmed_string(f.bytes(DESCRIP, 80)?);
    f.f32s(QUATERN_B, &mut h.quatern)?;
    f.f32s(QOFFSET_X, &mut h.qoffset)?;
    f.f32s(SROW_X, &mut h.srow_x)?;
    f.f32s(SROW_Y, &mut h.srow_y)?;
    f.f32s(SROW_Z, &mut h.srow_z)?;
    Ok((storage, h))
}

fn parse_nifti2(f: &Fields) -> Result<(Storage, RawHeader)> {
    use self::offsets_v2::*;

    let magic = f.bytes(MAGIC, 8)?;
    let storage = if magic == MAGIC_CODE_NIP2 {
        Storage::SingleFile
    } else if magic == MAGIC_CODE_NI2 {
        Storage::FilePair
    } else {
        return Err(NiftiError::HeaderUnreadable("bad NIfTI-2 magic code"));
    };

    let mut h = RawHeader::default();
    for (i, v) in h.dim.iter_mut().enumerate() {
        *v = f.i64(DIM + 8 * i)?;
    }
    f.f64s(PIXDIM, &mut h.pixdim)?;
    h.dim_info = f.u8(DIM_INFO)?;
    // only the low 6 bits carry unit codes
    h.xyzt_units = (f.i32(XYZT_UNITS)? & 0xff) as u8;
    h.qform_code = f.i32(QFORM_CODE)?;
    h.sform_code = f.i32(SFORM_CODE)?;
    h.datatype = f.i16(DATATYPE)?;
    h.bitpix = f.i16(BITPIX)?;
    h.vox_offset = f.i64(VOX_OFFSET)? as f64;
    h.descrip = nul_trimmed_string(f.bytes(DESCRIP, 80)?);
    f.f64s(QUATERN_B, &mut h.quatern)?;
    f.f64s(QOFFSET_X, &mut h.qoffset)?;
    f.f64s(SROW_X, &mut h.srow_x)?;
    f.f64s(SROW_Y, &mut h.srow_y)?;
    f.f64s(SROW_Z, &mut h.srow_z)?;
    Ok((storage, h))
}

impl RawHeader {
    fn normalize(
        self,
        version: NiftiVersion,
        endianness: Endianness,
        storage: Storage,
    ) -> Result<NiftiHeader> {
        let rank = self.dim[0];
        if !(1..=7).contains(&rank) {
            return Err(NiftiError::HeaderUnreadable("dim[0] is not between 1 and 7"));
        }
        let rank = rank as usize;

        let qform_affine = if self.qform_code != 0 {
            let params = QuaternionParams {
                quatern: self.quatern,
                qoffset: self.qoffset,
                zooms: [self.pixdim[1], self.pixdim[2], self.pixdim[3]],
                qfac: self.pixdim[0],
            };
            Some(params.to_affine())
        } else {
            None
        };
        let sform_affine = if self.sform_code != 0 {
            Some(sform_affine(&self.srow_x, &self.srow_y, &self.srow_z))
        } else {
            None
        };
        let affine = sform_affine.or(qform_affine);
        debug!(
            "affine source: {}",
            match (&sform_affine, &qform_affine) {
                (Some(_), _) => "sform",
                (None, Some(_)) => "qform",
                (None, None) => "none",
            }
        );

        Ok(NiftiHeader {
            version,
            endianness,
            storage,
            dim: self.dim,
            pixdim: self.pixdim,
            shape: self.dim[1..=rank].to_vec(),
            voxel_sizes: self.pixdim[1..=rank].to_vec(),
            dim_info: DimInfo::from_byte(self.dim_info),
            xyzt_units: XyztUnits::from_byte(self.xyzt_units),
            qform_code: self.qform_code,
            sform_code: self.sform_code,
            datatype: self.datatype,
            bitpix: self.bitpix,
            vox_offset: self.vox_offset,
            descrip: self.descrip,
            axis_codes: affine.as_ref().map(axis_codes),
            qform_affine,
            sform_affine,
            affine,
        })
    }
}
