//! Synthesized header fixtures.
#![allow(dead_code)]

use byteordered::{Endian, Endianness};
use flate2::write::GzEncoder;
use flate2::Compression;
use nifti_header::{NiftiSource, NiftiVersion};
use std::cell::Cell;
use std::io::{self, Write};
use std::ops::Range;

/// Field values of a header to be encoded.
#[derive(Debug, Clone)]
pub struct HeaderFixture {
    pub version: NiftiVersion,
    pub endianness: Endianness,
    pub single_file: bool,
    pub dim: [i64; 8],
    pub pixdim: [f64; 8],
    pub dim_info: u8,
    pub xyzt_units: u8,
    pub datatype: i16,
    pub bitpix: i16,
    pub descrip: &'static str,
    pub qform_code: i32,
    pub sform_code: i32,
    pub quatern: [f64; 3],
    pub qoffset: [f64; 3],
    pub srow_x: [f64; 4],
    pub srow_y: [f64; 4],
    pub srow_z: [f64; 4],
}

impl Default for HeaderFixture {
    fn default() -> Self {
        HeaderFixture {
            version: NiftiVersion::Nifti1,
            endianness: Endianness::Little,
            single_file: true,
            dim: [3, 64, 64, 10, 1, 1, 1, 1],
            pixdim: [1., 3., 3., 3., 0., 0., 0., 0.],
            dim_info: 0,
            xyzt_units: 0,
            datatype: 2,
            bitpix: 8,
            descrip: "",
            qform_code: 0,
            sform_code: 0,
            quatern: [0.; 3],
            qoffset: [0.; 3],
            srow_x: [0.; 4],
            srow_y: [0.; 4],
            srow_z: [0.; 4],
        }
    }
}

struct Block {
    data: Vec<u8>,
    e: Endianness,
}

impl Block {
    fn i16(&mut self, at: usize, v: i16) {
        self.e.write_i16(&mut self.data[at..at + 2], v).unwrap();
    }
    fn i32(&mut self, at: usize, v: i32) {
        self.e.write_i32(&mut self.data[at..at + 4], v).unwrap();
    }
    fn i64(&mut self, at: usize, v: i64) {
        self.e.write_i64(&mut self.data[at..at + 8], v).unwrap();
    }
    fn f32s(&mut self, at: usize, v: &[f64]) {
        for (i, x) in v.iter().enumerate() {
            let o = at + 4 * i;
            self.e.write_f32(&mut self.data[o..o + 4], *x as f32).unwrap();
        }
    }
    fn f64s(&mut self, at: usize, v: &[f64]) {
        for (i, x) in v.iter().enumerate() {
            let o = at + 8 * i;
            self.e.write_f64(&mut self.data[o..o + 8], *x).unwrap();
        }
    }
    fn bytes(&mut self, at: usize, v: &[u8]) {
        self.data[at..at + v.len()].copy_from_slice(v);
    }
}

impl HeaderFixture {
    /// Encode the header block, followed by an empty extender
    /// when it is a single-file header.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.version {
            NiftiVersion::Nifti1 => self.to_bytes_v1(),
            NiftiVersion::Nifti2 => self.to_bytes_v2(),
        }
    }

    fn to_bytes_v1(&self) -> Vec<u8> {
        let mut b = Block {
            data: vec![0; 348],
            e: self.endianness,
        };
        b.i32(0, 348);
        b.data[39] = self.dim_info;
        for (i, d) in self.dim.iter().enumerate() {
            b.i16(40 + 2 * i, *d as i16);
        }
        b.i16(70, self.datatype);
        b.i16(72, self.bitpix);
        b.f32s(76, &self.pixdim);
        b.f32s(108, &[if self.single_file { 352. } else { 0. }]);
        b.data[123] = self.xyzt_units;
        b.bytes(148, self.descrip.as_bytes());
        b.i16(252, self.qform_code as i16);
        b.i16(254, self.sform_code as i16);
        b.f32s(256, &self.quatern);
        b.f32s(268, &self.qoffset);
        b.f32s(280, &self.srow_x);
        b.f32s(296, &self.srow_y);
        b.f32s(312, &self.srow_z);
        b.bytes(344, if self.single_file { b"n+1\0" } else { b"ni1\0" });
        if self.single_file {
            b.data.extend_from_slice(&[0; 4]);
        }
        b.data
    }

    fn to_bytes_v2(&self) -> Vec<u8> {
        let mut b = Block {
            data: vec![0; 540],
            e: self.endianness,
        };
        b.i32(0, 540);
        b.bytes(
            4,
            if self.single_file {
                b"n+2\0\r\n\x1a\n"
            } else {
                b"ni2\0\r\n\x1a\n"
            },
        );
        b.i16(12, self.datatype);
        b.i16(14, self.bitpix);
        for (i, d) in self.dim.iter().enumerate() {
            b.i64(16 + 8 * i, *d);
        }
        b.f64s(104, &self.pixdim);
        b.i64(168, if self.single_file { 544 } else { 0 });
        b.bytes(240, self.descrip.as_bytes());
        b.i32(344, self.qform_code);
        b.i32(348, self.sform_code);
        b.f64s(352, &self.quatern);
        b.f64s(376, &self.qoffset);
        b.f64s(400, &self.srow_x);
        b.f64s(432, &self.srow_y);
        b.f64s(464, &self.srow_z);
        b.i32(500, i32::from(self.xyzt_units));
        b.data[524] = self.dim_info;
        if self.single_file {
            b.data.extend_from_slice(&[0; 4]);
        }
        b.data
    }
}

/// Append `n` bytes of noise, standing in for voxel data.
pub fn with_voxels(mut bytes: Vec<u8>, n: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    bytes.extend((0..n).map(|_| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as u8
    }));
    bytes
}

/// Compress the given bytes as a single gzip member.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut e = GzEncoder::new(Vec::new(), Compression::default());
    e.write_all(bytes).unwrap();
    e.finish().unwrap()
}

/// An in-memory source which keeps track of how many bytes were read.
#[derive(Debug, Default)]
pub struct CountingSource {
    pub data: Vec<u8>,
    pub bytes_read: Cell<u64>,
}

impl CountingSource {
    pub fn new(data: Vec<u8>) -> Self {
        CountingSource {
            data,
            bytes_read: Cell::new(0),
        }
    }
}

impl NiftiSource for CountingSource {
    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let out = self.data.read_range(range)?;
        self.bytes_read.set(self.bytes_read.get() + out.len() as u64);
        Ok(out)
    }
}
