//! This module defines the stack view API consumed by the axis order
//! pipeline, as well as an implementation over `ndarray` views.
//!
//! A stack view is a non-copying reinterpretation of some N-dimensional
//! storage. Slicing, inserting an axis and permuting two axes all produce
//! new views over the same elements, so splitting a large stack never
//! duplicates voxel data.
//!
//! Unlike plain `ndarray` views, coordinates do not have to start at zero:
//! [`OffsetView`] keeps an origin per axis, so that a stack cropped out of a
//! larger acquisition keeps addressing voxels in the acquisition's frame.
//!
//! [`OffsetView`]: ./struct.OffsetView.html
use crate::error::{Result, SpimError};
use crate::interval::Interval;
use ndarray::{ArrayViewD, Axis};

/// Public API for N-dimensional views that the axis order pipeline can
/// reshape.
pub trait StackView: Sized {
    /// Get the view's number of dimensions.
    fn ndim(&self) -> usize;

    /// Get the number of coordinates along the given axis.
    fn dimension(&self, axis: usize) -> usize;

    /// Get the smallest valid coordinate along the given axis.
    fn min(&self, axis: usize) -> i64;

    /// Get the largest valid coordinate along the given axis.
    fn max(&self, axis: usize) -> i64 {
        self.min(axis) + self.dimension(axis) as i64 - 1
    }

    /// Get the extents of all axes.
    fn shape(&self) -> Vec<usize> {
        (0..self.ndim()).map(|d| self.dimension(d)).collect()
    }

    /// Get the interval covered by this view.
    fn interval(&self) -> Interval {
        Interval::of(self)
    }

    /// Obtain the (N-1)-dimensional view at a fixed coordinate of `axis`.
    ///
    /// # Errors
    ///
    /// - `SpimError::AxisOutOfBounds` if `axis` is not below `self.ndim()`.
    /// - `SpimError::OutOfBounds` if `position` is outside `min(axis)..=max(axis)`.
    fn hyper_slice(&self, axis: usize, position: i64) -> Result<Self>;

    /// Append a trailing unit-length axis whose only coordinate is 0.
    fn add_dimension(self) -> Self;

    /// Exchange two axes.
    ///
    /// # Errors
    ///
    /// - `SpimError::AxisOutOfBounds` if either axis is not below `self.ndim()`.
    fn permute(self, a: usize, b: usize) -> Result<Self>;
}

/// A borrowed `ndarray` view with a coordinate origin on every axis.
#[derive(Debug)]
pub struct OffsetView<'a, A> {
    data: ArrayViewD<'a, A>,
    origin: Vec<i64>,
}

impl<'a, A> Clone for OffsetView<'a, A> {
    fn clone(&self) -> Self {
        OffsetView {
            data: self.data.clone(),
            origin: self.origin.clone(),
        }
    }
}

impl<'a, A> OffsetView<'a, A> {
    /// Wrap an array view whose coordinates start at zero.
    pub fn new(data: ArrayViewD<'a, A>) -> Self {
        let origin = vec![0; data.ndim()];
        OffsetView { data, origin }
    }

    /// Wrap an array view whose first element sits at `origin`.
    ///
    /// # Errors
    ///
    /// - `SpimError::DimensionMismatch` if `origin` does not have one entry
    ///   per axis of `data`.
    /// - `SpimError::OutOfBounds` if the last coordinate of an axis does not
    ///   fit in an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// # use ndarray::{Array, IxDyn};
    /// # use spimview::{OffsetView, StackView};
    /// let data = Array::<u16, _>::zeros(IxDyn(&[8, 8, 3]));
    /// let view = OffsetView::with_origin(data.view(), vec![0, 0, 10])?;
    /// assert_eq!(view.min(2), 10);
    /// assert_eq!(view.max(2), 12);
    /// # Ok::<(), spimview::SpimError>(())
    /// ```
    pub fn with_origin(data: ArrayViewD<'a, A>, origin: Vec<i64>) -> Result<Self> {
        if origin.len() != data.ndim() {
            return Err(SpimError::DimensionMismatch(data.ndim(), origin.len()));
        }
        for (axis, (&o, &len)) in origin.iter().zip(data.shape()).enumerate() {
            if o.checked_add(len.saturating_sub(1) as i64).is_none() {
                return Err(SpimError::OutOfBounds(axis, o));
            }
        }
        Ok(OffsetView { data, origin })
    }

    /// Retrieve the coordinate origin.
    pub fn origin(&self) -> &[i64] {
        &self.origin
    }

    /// Retrieve the underlying array view, indexed from zero.
    pub fn as_array(&self) -> &ArrayViewD<'a, A> {
        &self.data
    }

    /// Fetch a single element at the given coordinates, expressed in this
    /// view's coordinate frame. Returns `None` outside of the view.
    pub fn get(&self, coords: &[i64]) -> Option<&A> {
        if coords.len() != self.origin.len() {
            return None;
        }
        let mut index = Vec::with_capacity(coords.len());
        for (c, o) in coords.iter().zip(&self.origin) {
            let i = c.checked_sub(*o)?;
            if i < 0 {
                return None;
            }
            index.push(i as usize);
        }
        self.data.get(index.as_slice())
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.data.ndim() {
            return Err(SpimError::AxisOutOfBounds(axis, self.data.ndim()));
        }
        Ok(())
    }
}

impl<'a, A> From<ArrayViewD<'a, A>> for OffsetView<'a, A> {
    fn from(data: ArrayViewD<'a, A>) -> Self {
        OffsetView::new(data)
    }
}

impl<'a, A> StackView for OffsetView<'a, A> {
    fn ndim(&self) -> usize {
        self.data.ndim()
    }

    fn dimension(&self, axis: usize) -> usize {
        self.data.len_of(Axis(axis))
    }

    fn min(&self, axis: usize) -> i64 {
        self.origin[axis]
    }

    fn hyper_slice(&self, axis: usize, position: i64) -> Result<Self> {
        self.check_axis(axis)?;
        let index = match position.checked_sub(self.origin[axis]) {
            Some(i) if i >= 0 && i < self.dimension(axis) as i64 => i,
            _ => return Err(SpimError::OutOfBounds(axis, position)),
        };
        let data = self.data.clone().index_axis_move(Axis(axis), index as usize);
        let mut origin = self.origin.clone();
        let _ = origin.remove(axis);
        Ok(OffsetView { data, origin })
    }

    fn add_dimension(self) -> Self {
        let ndim = self.data.ndim();
        let data = self.data.insert_axis(Axis(ndim));
        let mut origin = self.origin;
        origin.push(0);
        OffsetView { data, origin }
    }

    fn permute(mut self, a: usize, b: usize) -> Result<Self> {
        self.check_axis(a)?;
        self.check_axis(b)?;
        self.data.swap_axes(a, b);
        self.origin.swap(a, b);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{OffsetView, StackView};
    use crate::error::SpimError;
    use ndarray::{Array, IxDyn};

    fn ramp(shape: &[usize]) -> Array<u32, IxDyn> {
        let n = shape.iter().product::<usize>() as u32;
        Array::from_shape_vec(IxDyn(shape), (0..n).collect()).unwrap()
    }

    #[test]
    fn test_hyper_slice_with_origin() {
        let data = ramp(&[2, 3, 4]);
        let view = OffsetView::with_origin(data.view(), vec![0, 0, 5]).unwrap();

        let slice = view.hyper_slice(2, 6).unwrap();
        assert_eq!(slice.shape(), vec![2, 3]);
        assert_eq!(slice.origin(), &[0, 0]);
        assert_eq!(slice.get(&[1, 2]), data.get(&[1, 2, 1][..]));

        assert!(matches!(
            view.hyper_slice(2, 4),
            Err(SpimError::OutOfBounds(2, 4))
        ));
        assert!(matches!(
            view.hyper_slice(2, 9),
            Err(SpimError::OutOfBounds(2, 9))
        ));
        assert!(matches!(
            view.hyper_slice(3, 0),
            Err(SpimError::AxisOutOfBounds(3, 3))
        ));
    }

    #[test]
    fn test_add_dimension() {
        let data = ramp(&[2, 3]);
        let view = OffsetView::new(data.view()).add_dimension();
        assert_eq!(view.shape(), vec![2, 3, 1]);
        assert_eq!(view.min(2), 0);
        assert_eq!(view.max(2), 0);
        assert_eq!(view.get(&[1, 1, 0]), Some(&4));
        assert_eq!(view.get(&[1, 1, 1]), None);
    }

    #[test]
    fn test_permute() {
        let data = ramp(&[2, 3, 4, 5]);
        let view = OffsetView::with_origin(data.view(), vec![0, 0, 1, 7]).unwrap();
        let view = view.permute(2, 3).unwrap();
        assert_eq!(view.shape(), vec![2, 3, 5, 4]);
        assert_eq!(view.origin(), &[0, 0, 7, 1]);
        assert_eq!(view.get(&[1, 2, 9, 3]), data.get(&[1, 2, 2, 2][..]));

        assert!(view.permute(0, 4).is_err());
    }

    #[test]
    fn test_extreme_coordinates() {
        let data = ramp(&[2, 3]);
        let view = OffsetView::with_origin(data.view(), vec![i64::MIN, 0]).unwrap();
        assert_eq!(view.get(&[i64::MAX, 0]), None);
        assert_eq!(view.get(&[i64::MIN + 1, 2]), Some(&5));
        assert!(matches!(
            view.hyper_slice(0, i64::MAX),
            Err(SpimError::OutOfBounds(0, i64::MAX))
        ));

        let view = OffsetView::new(data.view());
        assert_eq!(view.get(&[i64::MIN, 0]), None);
        assert!(matches!(
            view.hyper_slice(1, i64::MIN),
            Err(SpimError::OutOfBounds(1, i64::MIN))
        ));

        assert!(matches!(
            OffsetView::with_origin(data.view(), vec![0, i64::MAX]),
            Err(SpimError::OutOfBounds(1, i64::MAX))
        ));
    }

    #[test]
    fn test_interval() {
        let data = ramp(&[2, 3, 4]);
        let view = OffsetView::with_origin(data.view(), vec![-1, 0, 10]).unwrap();
        let interval = view.interval();
        assert_eq!(interval.min_slice(), &[-1, 0, 10]);
        assert_eq!(interval.max_slice(), &[0, 2, 13]);
    }
}
