//! Bounding intervals of N-dimensional stacks.
//!
//! An [`Interval`] describes the finite region of validity of a stack view
//! as a pair of inclusive `min`/`max` coordinate vectors. The axis order
//! pipeline transforms intervals in lock-step with the views they describe,
//! through [`remove_axis`], [`append_axis`] and [`swap_axes`].
//!
//! [`Interval`]: ./struct.Interval.html
//! [`remove_axis`]: ./struct.Interval.html#method.remove_axis
//! [`append_axis`]: ./struct.Interval.html#method.append_axis
//! [`swap_axes`]: ./struct.Interval.html#method.swap_axes
use crate::error::{Result, SpimError};
use crate::view::StackView;

/// An N-dimensional, inclusive integer bounding box.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl Interval {
    /// Create an interval from explicit bounds.
    ///
    /// Bounds are not checked for `min <= max`; see [`validate`].
    ///
    /// # Errors
    ///
    /// - `SpimError::DimensionMismatch` if `min` and `max` differ in length.
    ///
    /// # Example
    ///
    /// ```
    /// # use spimview::Interval;
    /// let interval = Interval::new(vec![0, 0, 1], vec![63, 31, 2])?;
    /// assert_eq!(interval.dimensions(), vec![64, 32, 2]);
    /// # Ok::<(), spimview::SpimError>(())
    /// ```
    ///
    /// [`validate`]: #method.validate
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(SpimError::DimensionMismatch(min.len(), max.len()));
        }
        Ok(Interval { min, max })
    }

    /// Create an interval starting at the origin with the given extents.
    pub fn from_shape(shape: &[usize]) -> Self {
        Interval {
            min: vec![0; shape.len()],
            max: shape.iter().map(|&d| d as i64 - 1).collect(),
        }
    }

    /// Create the interval covered by a stack view.
    pub fn of<V: StackView>(view: &V) -> Self {
        Interval {
            min: (0..view.ndim()).map(|d| view.min(d)).collect(),
            max: (0..view.ndim()).map(|d| view.max(d)).collect(),
        }
    }

    /// The rank of this interval.
    pub fn ndim(&self) -> usize {
        self.min.len()
    }

    /// Lower bounds, one per axis.
    pub fn min_slice(&self) -> &[i64] {
        &self.min
    }

    /// Upper bounds (inclusive), one per axis.
    pub fn max_slice(&self) -> &[i64] {
        &self.max
    }

    /// Lower bound on the given axis.
    ///
    /// # Panic
    ///
    /// Panics if `axis` is not below `self.ndim()`.
    pub fn min(&self, axis: usize) -> i64 {
        self.min[axis]
    }

    /// Upper bound on the given axis.
    ///
    /// # Panic
    ///
    /// Panics if `axis` is not below `self.ndim()`.
    pub fn max(&self, axis: usize) -> i64 {
        self.max[axis]
    }

    /// Number of coordinates covered on the given axis, saturating at
    /// `i64::MAX` for intervals that [`validate`] would reject.
    ///
    /// [`validate`]: #method.validate
    pub fn dimension(&self, axis: usize) -> i64 {
        extent(self.min[axis], self.max[axis]).unwrap_or(i64::MAX)
    }

    /// Extents on all axes.
    pub fn dimensions(&self) -> Vec<i64> {
        (0..self.ndim()).map(|d| self.dimension(d)).collect()
    }

    /// Check that every axis has `min <= max`, with an extent that fits in
    /// an `i64`.
    ///
    /// # Errors
    ///
    /// - `SpimError::InvalidInterval` naming the first offending axis.
    pub fn validate(&self) -> Result<()> {
        match self
            .min
            .iter()
            .zip(&self.max)
            .enumerate()
            .find(|&(_, (&lo, &hi))| lo > hi || extent(lo, hi).is_none())
        {
            Some((axis, (&lo, &hi))) => Err(SpimError::InvalidInterval(axis, lo, hi)),
            None => Ok(()),
        }
    }

    /// Drop an axis, shifting the bounds of the following axes down by one.
    ///
    /// # Errors
    ///
    /// - `SpimError::AxisOutOfBounds` if `axis` is not below `self.ndim()`.
    pub fn remove_axis(&self, axis: usize) -> Result<Interval> {
        if axis >= self.ndim() {
            return Err(SpimError::AxisOutOfBounds(axis, self.ndim()));
        }
        let keep = |v: &[i64]| -> Vec<i64> {
            v.iter()
                .enumerate()
                .filter(|&(d, _)| d != axis)
                .map(|(_, x)| *x)
                .collect()
        };
        Ok(Interval {
            min: keep(&self.min),
            max: keep(&self.max),
        })
    }

    /// Add a trailing axis with the given bounds.
    pub fn append_axis(&self, min: i64, max: i64) -> Interval {
        let mut out = self.clone();
        out.min.push(min);
        out.max.push(max);
        out
    }

    /// Exchange the bounds of two axes. Minimum and maximum move together.
    ///
    /// # Errors
    ///
    /// - `SpimError::AxisOutOfBounds` if either axis is not below `self.ndim()`.
    pub fn swap_axes(&self, a: usize, b: usize) -> Result<Interval> {
        let ndim = self.ndim();
        if let Some(&bad) = [a, b].iter().find(|&&x| x >= ndim) {
            return Err(SpimError::AxisOutOfBounds(bad, ndim));
        }
        let mut out = self.clone();
        out.min.swap(a, b);
        out.max.swap(a, b);
        Ok(out)
    }
}

fn extent(min: i64, max: i64) -> Option<i64> {
    max.checked_sub(min)?.checked_add(1)
}
