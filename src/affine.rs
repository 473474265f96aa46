//! Affine transformations placing sources in the viewer's global space.
use nalgebra::{Matrix3, Matrix4, Vector3};

/// A 3D affine transformation in homogeneous coordinates.
pub type Affine4 = Matrix4<f64>;

/// Separate a 4x4 affine into its 3x3 linear and translation components.
pub fn get_affine_and_translation(affine: &Affine4) -> (Matrix3<f64>, Vector3<f64>) {
    let translation = Vector3::new(affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]);
    let linear = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (linear, translation)
}

/// Affine scaling each axis by the voxel size and moving the origin to `offset`.
pub fn voxel_affine(voxel_size: [f64; 3], offset: [f64; 3]) -> Affine4 {
    #[rustfmt::skip]
    let affine = Affine4::new(
        voxel_size[0], 0.0, 0.0, offset[0],
        0.0, voxel_size[1], 0.0, offset[1],
        0.0, 0.0, voxel_size[2], offset[2],
        0.0, 0.0, 0.0, 1.0,
    );
    affine
}

/// Flatten an affine in row-major order, the layout used on the wire.
pub fn to_row_major(affine: &Affine4) -> [f64; 16] {
    let mut out = [0.; 16];
    for (i, v) in out.iter_mut().enumerate() {
        *v = affine[(i / 4, i % 4)];
    }
    out
}

/// Rebuild an affine from its row-major entries.
pub fn from_row_major(values: &[f64; 16]) -> Affine4 {
    Affine4::from_row_slice(values)
}
