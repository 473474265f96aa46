//! Types for error handling go here.
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum SpimError {
        /// Automatic axis order inference was requested for an unsupported rank.
        UnsupportedDimensionality(ndim: usize) {
            display("image dimensionality {} is not supported", ndim)
        }
        /// The rank of a stack or interval does not match the axis order.
        DimensionMismatch(expected: usize, got: usize) {
            display("axis order expects {} dimensions, got {}", expected, got)
        }
        /// An interval has a lower bound above its upper bound.
        InvalidInterval(axis: usize, min: i64, max: i64) {
            display("invalid interval on axis {}: min {} > max {}", axis, min, max)
        }
        /// Attempted to address an axis beyond the view's rank.
        AxisOutOfBounds(axis: usize, ndim: usize) {
            display("axis {} out of bounds for a view of {} dimensions", axis, ndim)
        }
        /// Attempted to slice a view outside of its boundaries.
        OutOfBounds(axis: usize, position: i64) {
            display("position {} on axis {} is out of bounds", position, axis)
        }
        /// No serialization adapter exists for this kind of source.
        UnsupportedConfiguration(kind: String) {
            display("unsupported source configuration: {}", kind)
        }
        /// The name does not correspond to any axis order.
        UnknownAxisOrder(name: String) {
            display("unknown axis order `{}`", name)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
        /// JSON (de)serialization error
        Json(err: serde_json::Error) {
            from()
            source(err)
            display("JSON error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, SpimError>;
