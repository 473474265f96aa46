#![allow(dead_code)]

use ndarray::{Array, IxDyn};
use spimview::AxisOrder;

/// A stack whose voxels hold their own row-major linear index.
pub fn ramp(shape: &[usize]) -> Array<u32, IxDyn> {
    let n = shape.iter().product::<usize>() as u32;
    Array::from_shape_vec(IxDyn(shape), (0..n).collect()).unwrap()
}

/// Extents used for each kind of axis in the test stacks.
pub const X: usize = 6;
pub const Y: usize = 5;
pub const Z: usize = 4;
pub const C: usize = 3;
pub const T: usize = 2;

/// A representative shape for a concrete axis order, with a distinct
/// extent per kind of axis.
pub fn shape_for(order: AxisOrder) -> Vec<usize> {
    order
        .name()
        .chars()
        .map(|a| match a {
            'X' => X,
            'Y' => Y,
            'Z' => Z,
            'C' => C,
            'T' => T,
            _ => panic!("unexpected axis {} in {}", a, order),
        })
        .collect()
}
