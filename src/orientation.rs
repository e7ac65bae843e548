//! Anatomical orientation codes of a voxel-to-world affine.
//!
//! Each voxel axis is summarized by the world direction it points most
//! closely toward: Right/Left for world x, Anterior/Posterior for world y
//! and Superior/Inferior for world z.
use crate::affine::Affine4;

/// Orientation letters of the three voxel axes, in voxel axis order.
pub type AxisCodes = [char; 3];

/// Positive and negative pole letters, one pair per world axis (row).
const POLES: [(char, char); 3] = [('R', 'L'), ('A', 'P'), ('S', 'I')];

/// Obtain the orientation code of an affine.
///
/// For each of the first three columns, the row holding the entry with
/// the largest magnitude picks the letter pair, and that entry's sign picks
/// the letter (zero counts as positive). Ties go to the lowest row, so a
/// column of zeros yields the positive letter of row 0.
///
/// # Example
///
/// ```
/// # use nifti_header::{axis_codes, Affine4};
/// assert_eq!(axis_codes(&Affine4::identity()), ['R', 'A', 'S']);
/// ```
pub fn axis_codes(affine: &Affine4) -> AxisCodes {
    let mut codes = ['?'; 3];
    for (j, code) in codes.iter_mut().enumerate() {
        let mut row = 0;
        for i in 1..3 {
            if affine[(i, j)].abs() > affine[(row, j)].abs() {
                row = i;
            }
        }
        let (pos, neg) = POLES[row];
        *code = if affine[(row, j)] >= 0.0 { pos } else { neg };
    }
    codes
}
