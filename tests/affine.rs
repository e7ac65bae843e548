extern crate nifti_header;

mod util;

use approx::assert_relative_eq;
use nalgebra::Vector4;
use nifti_header::{load_header, Affine4, QuaternionParams, XForm};
use util::HeaderFixture;

/// Round a value through the `f32` header field, as the fixture stores it.
fn w(v: f64) -> f64 {
    f64::from(v as f32)
}

#[test]
#[rustfmt::skip]
fn sform() {
    let fixture = HeaderFixture {
        sform_code: 1,
        qform_code: 0,
        srow_x: [2.4, -0.0008, -0.0411765, -114.766396],
        srow_y: [0.1, 2.4995277, 0.0485984, -97.420204],
        srow_z: [0.4, -0.0485, 2.4991884, -89.12282],
        ..Default::default()
    };
    let header = load_header(fixture.to_bytes()).unwrap();

    let real_affine = Affine4::new(
        w(2.4), w(-0.0008),    w(-0.0411765), w(-114.766396),
        w(0.1), w(2.4995277),  w(0.0485984),  w(-97.420204),
        w(0.4), w(-0.0485),    w(2.4991884),  w(-89.12282),
        0.0,    0.0,           0.0,           1.0
    );
    assert_eq!(header.affine, Some(real_affine));
    assert_eq!(header.sform_affine, Some(real_affine));
    assert_eq!(header.qform_affine, None);
    assert_eq!(header.axis_codes, Some(['R', 'A', 'S']));
}

#[test]
#[rustfmt::skip]
fn qform() {
    let fixture = HeaderFixture {
        sform_code: 0,
        qform_code: 1,
        pixdim: [-1.0, 0.9375, 0.9375, 3.0, 0.0, 0.0, 0.0, 0.0],
        quatern: [0.0, 1.0, 0.0],
        qoffset: [59.557503, 73.172, 43.4291],
        ..Default::default()
    };
    let header = load_header(fixture.to_bytes()).unwrap();

    let real_affine = Affine4::new(
        -0.9375, 0.0,    0.0, w(59.557503),
        0.0,     0.9375, 0.0, w(73.172),
        0.0,     0.0,    3.0, w(43.4291),
        0.0,     0.0,    0.0, 1.0
    );
    let affine = header.affine.unwrap();
    assert_relative_eq!(affine, real_affine, epsilon = 1e-12);
    assert_eq!(header.qform(), Some(XForm::ScannerAnat));
    assert_eq!(header.sform_affine, None);
    assert_eq!(header.axis_codes, Some(['L', 'A', 'S']));
}

#[test]
#[rustfmt::skip]
fn both_valid() {
    let fixture = HeaderFixture {
        sform_code: 1,
        srow_x: [2.4, 0.0, 0.0, -114.766396],
        srow_y: [0.1, 2.4, 0.0, -97.420204],
        srow_z: [0.4, 0.4, 2.4, -89.12282],

        // All this only goes into the qform affine
        qform_code: 1,
        pixdim: [-1.0, 0.9375, 0.9375, 3.0, 0.0, 0.0, 0.0, 0.0],
        quatern: [0.0, 1.0, 0.0],
        qoffset: [59.0, 73.0, 43.0],
        ..Default::default()
    };
    let header = load_header(fixture.to_bytes()).unwrap();

    let real_affine = Affine4::new(
        w(2.4), 0.0,    0.0,    w(-114.766396),
        w(0.1), w(2.4), 0.0,    w(-97.420204),
        w(0.4), w(0.4), w(2.4), w(-89.12282),
        0.0,    0.0,    0.0,    1.0
    );
    assert_eq!(header.affine, Some(real_affine));
    assert_eq!(header.sform_affine, Some(real_affine));

    let qform = header.qform_affine.unwrap();
    assert_relative_eq!(qform[(0, 0)], -0.9375);
    assert_relative_eq!(qform[(0, 3)], 59.0);
    assert_eq!(header.axis_codes, Some(['R', 'A', 'S']));
}

#[test]
fn none_valid() {
    let fixture = HeaderFixture {
        dim: [3, 100, 100, 100, 0, 0, 0, 0],
        pixdim: [-1.0, 0.9, 0.9, 3.0, 0.0, 0.0, 0.0, 0.0],

        // All this should be ignored
        sform_code: 0,
        srow_x: [1.0, 0.0, 0.0, 1.0],
        srow_y: [0.0, 1.0, 0.0, 1.0],
        srow_z: [0.0, 0.0, 1.0, 1.0],
        qform_code: 0,
        quatern: [0.0, 1.0, 0.0],
        qoffset: [59.0, 73.0, 43.0],
        ..Default::default()
    };
    let header = load_header(fixture.to_bytes()).unwrap();
    assert_eq!(header.affine, None);
    assert_eq!(header.axis_codes, None);
}

#[test]
fn quaternion_round_trip() {
    // a rotation around a skewed axis, with a flipped third axis
    let params = QuaternionParams {
        quatern: [0.1, -0.3, 0.2],
        qoffset: [-90.5, 126.25, -72.0],
        zooms: [2.0, 3.0, 4.0],
        qfac: -1.0,
    };
    let affine = params.to_affine();

    let back = QuaternionParams::from_affine(&affine);
    assert_relative_eq!(back.qfac, -1.0);
    for i in 0..3 {
        assert_relative_eq!(back.quatern[i], params.quatern[i], epsilon = 1e-9);
        assert_relative_eq!(back.qoffset[i], params.qoffset[i], epsilon = 1e-9);
        assert_relative_eq!(back.zooms[i], params.zooms[i], epsilon = 1e-9);
    }
    assert_relative_eq!(back.to_affine(), affine, epsilon = 1e-9);
}

#[test]
fn quaternion_round_trip_through_header() {
    let params = QuaternionParams {
        quatern: [0.0, 0.0, 0.5],
        qoffset: [10.0, -20.0, 30.0],
        zooms: [1.5, 1.5, 2.5],
        qfac: 1.0,
    };
    let fixture = HeaderFixture {
        qform_code: 2,
        pixdim: [1.0, 1.5, 1.5, 2.5, 1.0, 0.0, 0.0, 0.0],
        quatern: params.quatern,
        qoffset: params.qoffset,
        ..Default::default()
    };
    let header = load_header(fixture.to_bytes()).unwrap();
    let affine = header.qform_affine.unwrap();
    assert_relative_eq!(affine, params.to_affine(), epsilon = 1e-9);

    let back = QuaternionParams::from_affine(&affine);
    assert_relative_eq!(back.to_affine(), affine, epsilon = 1e-9);
    assert_eq!(header.qform(), Some(XForm::AlignedAnat));
}

#[test]
fn non_positive_zooms_count_as_one() {
    let params = QuaternionParams {
        quatern: [0.0, 0.0, 0.0],
        qoffset: [0.0, 0.0, 0.0],
        zooms: [0.0, -2.0, 3.0],
        qfac: 0.0,
    };
    assert_eq!(
        params.to_affine(),
        Affine4::from_diagonal(&Vector4::new(1.0, 1.0, 3.0, 1.0))
    );
}
