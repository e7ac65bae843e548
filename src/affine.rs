//! Construction of voxel-to-world affine transforms from the two
//! encodings a NIfTI header may carry: the sform rows and the qform
//! quaternion parameters.
use nalgebra::{Matrix3, Matrix4, Quaternion, SymmetricEigen, Vector3};

/// A 3x3 linear transform (rotation and zooms).
pub type Affine3 = Matrix3<f64>;
/// A 4x4 homogeneous voxel-to-world transform.
pub type Affine4 = Matrix4<f64>;

/// Below this, the quaternion's implied `w` is taken to be 0 and the
/// remaining components are renormalized.
const QUATERNION_W2_FLOOR: f64 = 1.0e-7;

/// Build the sform affine out of its three stored rows.
/// The bottom row is always `[0, 0, 0, 1]`.
#[rustfmt::skip]
pub fn sform_affine(srow_x: &[f64; 4], srow_y: &[f64; 4], srow_z: &[f64; 4]) -> Affine4 {
    Affine4::new(
        srow_x[0], srow_x[1], srow_x[2], srow_x[3],
        srow_y[0], srow_y[1], srow_y[2], srow_y[3],
        srow_z[0], srow_z[1], srow_z[2], srow_z[3],
        0.0,       0.0,       0.0,       1.0,
    )
}

/// Separate a 4x4 affine into its 3x3 affine and translation components.
pub fn get_affine_and_translation(affine: &Affine4) -> (Affine3, Vector3<f64>) {
    let translation = Vector3::new(affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]);
    let linear = Affine3::from_fn(|i, j| affine[(i, j)]);
    (linear, translation)
}

/// The qform parameters of a header: quaternion `b`, `c`, `d`, the
/// offsets, the voxel zooms (`pixdim[1..4]`) and `qfac` (`pixdim[0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuaternionParams {
    /// Quaternion b, c and d parameters
    pub quatern: [f64; 3],
    /// Quaternion x, y and z shift
    pub qoffset: [f64; 3],
    /// Grid spacings of the three spatial axes
    pub zooms: [f64; 3],
    /// Handedness sign; negative values flip the third axis
    pub qfac: f64,
}

impl QuaternionParams {
    /// Build the qform affine.
    ///
    /// Zooms which are not strictly positive are replaced by 1, and any
    /// negative `qfac` is taken as -1 (anything else as +1).
    pub fn to_affine(&self) -> Affine4 {
        let [b, c, d] = self.quatern;
        let rotation = quaternion_to_affine(fill_positive(Vector3::new(b, c, d)));

        let zoom = |z: f64| if z > 0.0 { z } else { 1.0 };
        let qfac = if self.qfac < 0.0 { -1.0 } else { 1.0 };
        let zooms = [
            zoom(self.zooms[0]),
            zoom(self.zooms[1]),
            zoom(self.zooms[2]) * qfac,
        ];

        let mut affine = Affine4::identity();
        for i in 0..3 {
            for j in 0..3 {
                affine[(i, j)] = rotation[(i, j)] * zooms[j];
            }
            affine[(i, 3)] = self.qoffset[i];
        }
        affine
    }

    /// Decompose an affine into qform parameters. Shears are lost; the
    /// affine is assumed to be a rotation with positive zooms, possibly
    /// with a flipped third axis.
    pub fn from_affine(affine: &Affine4) -> Self {
        let (mut linear, translation) = get_affine_and_translation(affine);

        let mut zooms = [0.0; 3];
        for (j, z) in zooms.iter_mut().enumerate() {
            *z = linear.column(j).norm();
            if *z > 0.0 {
                for i in 0..3 {
                    linear[(i, j)] /= *z;
                }
            }
        }

        let qfac = if linear.determinant() < 0.0 {
            for i in 0..3 {
                linear[(i, 2)] = -linear[(i, 2)];
            }
            -1.0
        } else {
            1.0
        };

        let q = affine_to_quaternion(&linear);
        QuaternionParams {
            quatern: [q.i, q.j, q.k],
            qoffset: [translation.x, translation.y, translation.z],
            zooms,
            qfac,
        }
    }
}

/// Compute unit quaternion from last 3 values.
///
/// If w, x, y, z are the values in the full quaternion, assumes w is positive.
/// w = 0.0 corresponds to a 180 degree rotation.
///
/// If w is positive (assumed here), w is given by:
///     w = (1.0 - (x*x + y*y + z*z)).sqrt()
/// When `1.0 - (x*x + y*y + z*z)` is near zero or negative, w is set to 0
/// and `xyz` is rescaled to unit length.
pub(crate) fn fill_positive(xyz: Vector3<f64>) -> Quaternion<f64> {
    let w2 = 1.0 - xyz.dot(&xyz);
    if w2 < QUATERNION_W2_FLOOR {
        let norm = xyz.norm();
        if norm == 0.0 {
            return Quaternion::identity();
        }
        let xyz = xyz / norm;
        Quaternion::new(0.0, xyz.x, xyz.y, xyz.z)
    } else {
        Quaternion::new(w2.sqrt(), xyz.x, xyz.y, xyz.z)
    }
}

/// Calculate quaternion corresponding to given rotation matrix.
///
/// Method claimed to be robust to numerical errors in `affine`. Constructs quaternion by
/// calculating maximum eigenvector for matrix `k` (constructed from input `affine`). A
/// maximum eigenvalue of 1 corresponds to a valid rotation.
///
/// A quaternion `q * -1.0` corresponds to the same rotation as `q`; thus the sign of the
/// reconstructed quaternion is arbitrary, and we return quaternions with positive `w`.
///
/// Bar-Itzhack, Itzhack Y. "New method for extracting the quaternion from a rotation
/// matrix", AIAA Journal of Guidance, Control and Dynamics 23(6):1085-1087, 2000
#[rustfmt::skip]
pub(crate) fn affine_to_quaternion(affine: &Affine3) -> Quaternion<f64> {
    // qyx refers to the contribution of the y input vector component to the x output vector
    // component. qyx is therefore the same as M[0, 1].
    let qxx = affine[(0, 0)];
    let qyx = affine[(0, 1)];
    let qzx = affine[(0, 2)];
    let qxy = affine[(1, 0)];
    let qyy = affine[(1, 1)];
    let qzy = affine[(1, 2)];
    let qxz = affine[(2, 0)];
    let qyz = affine[(2, 1)];
    let qzz = affine[(2, 2)];

    // Fill only lower half of symmetric matrix
    let k = Affine4::new(
        qxx - qyy - qzz, 0.0,             0.0,             0.0,
        qyx + qxy,       qyy - qxx - qzz, 0.0,             0.0,
        qzx + qxz,       qzy + qyz,       qzz - qxx - qyy, 0.0,
        qyz - qzy,       qzx - qxz,       qxy - qyx,       qxx + qyy + qzz,
    );

    let SymmetricEigen { eigenvalues: values, eigenvectors: vectors } = k.symmetric_eigen();

    // Select largest eigenvector, reorder to w,x,y,z quaternion
    let max_idx = values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(3);
    let v = vectors.column(max_idx);
    let quaternion = Quaternion::new(v[3], v[0], v[1], v[2]);

    // Prefer quaternion with positive `w`.
    if quaternion.w < 0.0 {
        -quaternion
    } else {
        quaternion
    }
}

/// Calculate rotation matrix corresponding to quaternion.
///
/// Rotation matrix applies to column vectors, and is applied to the left of coordinate vectors.
/// The algorithm here allows non-unit quaternions.
///
/// Algorithm from https://en.wikipedia.org/wiki/Rotation_matrix#Quaternion
#[rustfmt::skip]
pub(crate) fn quaternion_to_affine(q: Quaternion<f64>) -> Affine3 {
    let nq = q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k;
    if nq < ::std::f64::EPSILON {
        return Affine3::identity();
    }
    let s = 2.0 / nq;
    let x = q.i * s;
    let y = q.j * s;
    let z = q.k * s;
    let wx = q.w * x;
    let wy = q.w * y;
    let wz = q.w * z;
    let xx = q.i * x;
    let xy = q.i * y;
    let xz = q.i * z;
    let yy = q.j * y;
    let yz = q.j * z;
    let zz = q.k * z;
    Affine3::new(
        1.0 - (yy + zz), xy - wz,         xz + wy,
        xy + wz,         1.0 - (xx + zz), yz - wx,
        xz - wy,         yz + wx,         1.0 - (xx + yy),
    )
}
