//! This module contains the code tables and bit-packed field types defined
//! by the standard. Unit and transform codes are converted from their
//! primitive form through `FromPrimitive`; codes outside of the tables
//! degrade to an "unknown" value instead of failing.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

/// Mask of the spatial unit code within `xyzt_units`.
pub const SPACE_UNIT_MASK: u8 = 0o0007;
/// Mask of the temporal unit code within `xyzt_units`.
pub const TIME_UNIT_MASK: u8 = 0o0070;

/// An enum type which represents a spatial unit.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum SpaceUnit {
    /// NIFTI code for unspecified units.
    Unknown = 0,
    /// NIFTI code for meters.
    Meter = 1,
    /// NIFTI code for millimeters.
    Mm = 2,
    /// NIFTI code for micrometers.
    Micron = 3,
}

impl SpaceUnit {
    /// Decode the spatial part of an `xyzt_units` byte.
    pub fn from_xyzt(xyzt_units: u8) -> SpaceUnit {
        SpaceUnit::from_u8(xyzt_units & SPACE_UNIT_MASK).unwrap_or(SpaceUnit::Unknown)
    }

    /// The unit's label.
    pub fn label(self) -> &'static str {
        match self {
            SpaceUnit::Unknown => "unknown",
            SpaceUnit::Meter => "meter",
            SpaceUnit::Mm => "mm",
            SpaceUnit::Micron => "um",
        }
    }
}

impl fmt::Display for SpaceUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An enum type which represents a temporal (or spectral) unit.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum TimeUnit {
    /// NIFTI code for unspecified units.
    Unknown = 0,
    /* Time codes are multiples of 8. */
    /// NIFTI code for seconds.
    Sec = 8,
    /// NIFTI code for milliseconds.
    Msec = 16,
    /// NIFTI code for microseconds.
    Usec = 24,
    /* These units are for spectral data: */
    /// NIFTI code for Hertz.
    Hz = 32,
    /// NIFTI code for ppm.
    Ppm = 40,
    /// NIFTI code for radians per second.
    Rads = 48,
}

impl TimeUnit {
    /// Decode the temporal part of an `xyzt_units` byte.
    pub fn from_xyzt(xyzt_units: u8) -> TimeUnit {
        TimeUnit::from_u8(xyzt_units & TIME_UNIT_MASK).unwrap_or(TimeUnit::Unknown)
    }

    /// The unit's label.
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Unknown => "unknown",
            TimeUnit::Sec => "sec",
            TimeUnit::Msec => "msec",
            TimeUnit::Usec => "usec",
            TimeUnit::Hz => "hz",
            TimeUnit::Ppm => "ppm",
            TimeUnit::Rads => "rad/s",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The units of `pixdim[1..4]`, unpacked from the `xyzt_units` byte.
///
/// ```text
/// bit   7 6 | 5 4 3 | 2 1 0
///     (n/a) |  time | space
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct XyztUnits {
    /// Unit of the spatial dimensions
    pub xyz: SpaceUnit,
    /// Unit of the temporal dimension
    pub t: TimeUnit,
}

impl XyztUnits {
    /// Unpack a raw `xyzt_units` byte.
    pub fn from_byte(xyzt_units: u8) -> Self {
        XyztUnits {
            xyz: SpaceUnit::from_xyzt(xyzt_units),
            t: TimeUnit::from_xyzt(xyzt_units),
        }
    }

    /// Pack both units back into a single byte.
    pub fn to_byte(self) -> u8 {
        self.xyz as u8 | self.t as u8
    }
}

impl Default for XyztUnits {
    fn default() -> Self {
        XyztUnits {
            xyz: SpaceUnit::Unknown,
            t: TimeUnit::Unknown,
        }
    }
}

/// MRI acquisition axes, unpacked from the `dim_info` byte.
/// Each field is 0 when unspecified, or the 1-based voxel axis
/// playing that role.
///
/// ```text
/// bit  7 6 |  5 4  |  3 2  | 1 0
///    (n/a) | slice | phase | freq
/// ```
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct DimInfo {
    /// Frequency encoding axis
    pub freq: u8,
    /// Phase encoding axis
    pub phase: u8,
    /// Slice acquisition axis
    pub slice: u8,
}

impl DimInfo {
    /// Unpack a raw `dim_info` byte.
    pub fn from_byte(dim_info: u8) -> Self {
        DimInfo {
            freq: dim_info & 0x03,
            phase: (dim_info >> 2) & 0x03,
            slice: (dim_info >> 4) & 0x03,
        }
    }

    /// Pack the three fields back into a single byte.
    /// Only the two lower bits of each field are kept.
    pub fn to_byte(self) -> u8 {
        (self.freq & 0x03) | ((self.phase & 0x03) << 2) | ((self.slice & 0x03) << 4)
    }
}

/// An enum type for representing a NIFTI XForm.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum XForm {
    /// Arbitrary coordinates (Method 1).
    Unknown = 0,
    /// Scanner-based anatomical coordinates
    ScannerAnat = 1,
    /// Coordinates aligned to another file's,
    /// or to anatomical "truth".
    AlignedAnat = 2,
    /// Coordinates aligned to Talairach-Tournoux
    /// Atlas; (0,0,0)=AC, etc.
    Talairach = 3,
    /// MNI 152 normalized coordinates.
    Mni152 = 4,
}

impl XForm {
    /// Interpret a qform or sform code.
    /// Returns `None` if the code is not in the table.
    pub fn from_code(code: i32) -> Option<XForm> {
        XForm::from_i32(code)
    }
}

/// Version of the header layout.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NiftiVersion {
    /// 348-byte header
    Nifti1,
    /// 540-byte header
    Nifti2,
}

impl NiftiVersion {
    /// Size in bytes of a header of this version, which is also the value
    /// of its `sizeof_hdr` field.
    pub fn header_size(self) -> usize {
        match self {
            NiftiVersion::Nifti1 => 348,
            NiftiVersion::Nifti2 => 540,
        }
    }
}

/// Where the volume data lives, as declared by the magic code.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Storage {
    /// Header and data in one file (".nii")
    SingleFile,
    /// Header in ".hdr", data in a separate ".img"
    FilePair,
}
