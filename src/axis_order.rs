//! Axis order tags and the canonicalization of multi-dimensional stacks.
//!
//! Acquisitions arrive with many different axis layouts: plain `XY`
//! planes, `XYZ` volumes, time-lapses with or without channels, and so on.
//! The viewer only understands one layout per source, `X,Y,Z[,T]`. An
//! [`AxisOrder`] names the layout of an input stack, and [`split`] turns
//! such a stack into one canonical sub-stack per channel:
//!
//! 1. the channel axis, if any, is sliced away, one sub-stack per channel;
//! 2. 2D layouts get a trailing unit-length Z axis;
//! 3. layouts whose time axis now sits before Z get axes 2 and 3 swapped.
//!
//! [`split_with_interval`] does the same on stacks whose valid region is
//! given by a separate [`Interval`], keeping that interval in step.
//!
//! # Example
//!
//! ```
//! # use ndarray::{Array, IxDyn};
//! # use spimview::{AxisOrder, OffsetView, StackView};
//! // 64x64 pixels, 2 channels, 10 time points
//! let data = Array::<u8, _>::zeros(IxDyn(&[64, 64, 2, 10]));
//! let order = AxisOrder::resolve(AxisOrder::XYCT, 4, false)?;
//! let stacks = spimview::axis_order::split(&OffsetView::new(data.view()), order)?;
//! assert_eq!(stacks.len(), 2);
//! assert_eq!(stacks[0].shape(), vec![64, 64, 1, 10]);
//! # Ok::<(), spimview::SpimError>(())
//! ```
//!
//! [`AxisOrder`]: ./enum.AxisOrder.html
//! [`split`]: ./fn.split.html
//! [`split_with_interval`]: ./fn.split_with_interval.html
//! [`Interval`]: ../interval/struct.Interval.html
use crate::error::{Result, SpimError};
use crate::interval::Interval;
use crate::view::StackView;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Parameters of an axis order, as found in the layout table.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct AxisLayout {
    /// Expected rank of the input stack.
    pub num_dimensions: usize,
    /// Index of the channel axis.
    pub channel_dimension: Option<usize>,
    /// Index of the time axis.
    pub time_dimension: Option<usize>,
    /// Whether a unit Z axis must be appended.
    pub add_z: bool,
    /// Whether axes 2 and 3 must be swapped after the Z axis is added.
    pub flip_z: bool,
}

const fn layout(
    num_dimensions: usize,
    channel_dimension: Option<usize>,
    time_dimension: Option<usize>,
    add_z: bool,
    flip_z: bool,
) -> AxisLayout {
    AxisLayout {
        num_dimensions,
        channel_dimension,
        time_dimension,
        add_z,
        flip_z,
    }
}

const LAYOUT_XYZ: AxisLayout = layout(3, None, None, false, false);
const LAYOUT_XYZC: AxisLayout = layout(4, Some(3), None, false, false);
const LAYOUT_XYZT: AxisLayout = layout(4, None, Some(3), false, false);
const LAYOUT_XYZCT: AxisLayout = layout(5, Some(3), Some(4), false, false);
const LAYOUT_XYZTC: AxisLayout = layout(5, Some(4), Some(3), false, false);
const LAYOUT_XYCZT: AxisLayout = layout(5, Some(2), Some(4), false, false);
const LAYOUT_XY: AxisLayout = layout(2, None, None, true, false);
const LAYOUT_XYC: AxisLayout = layout(3, Some(2), None, true, false);
const LAYOUT_XYT: AxisLayout = layout(3, None, Some(2), true, true);
const LAYOUT_XYCT: AxisLayout = layout(4, Some(2), Some(3), true, true);
const LAYOUT_XYTC: AxisLayout = layout(4, Some(3), Some(2), true, true);
const LAYOUT_XYCZ: AxisLayout = layout(4, Some(2), None, false, false);
const LAYOUT_DEFAULT: AxisLayout = layout(0, None, None, true, true);

/// Axis layout of an input stack.
///
/// Each concrete tag lists the meaning of the input axes in order; for
/// instance `XYCT` is a 4D stack with the channel on axis 2 and time on
/// axis 3. `Default` asks for the layout to be inferred with [`resolve`].
///
/// [`resolve`]: #method.resolve
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum AxisOrder {
    /// 3D volume.
    XYZ,
    /// 3D volume, one per channel.
    XYZC,
    /// 3D time-lapse.
    XYZT,
    /// 3D time-lapse, channel before time.
    XYZCT,
    /// 3D time-lapse, time before channel.
    XYZTC,
    /// 3D time-lapse, channel before Z.
    XYCZT,
    /// Single plane.
    XY,
    /// Single plane, one per channel.
    XYC,
    /// 2D time-lapse.
    XYT,
    /// 2D time-lapse, channel before time.
    XYCT,
    /// 2D time-lapse, time before channel.
    XYTC,
    /// 3D volume, channel before Z.
    XYCZ,
    /// Infer the layout from the stack rank and the viewer mode.
    Default,
}

impl AxisOrder {
    /// All concrete axis orders, excluding `Default`.
    pub const ALL: [AxisOrder; 12] = [
        AxisOrder::XYZ,
        AxisOrder::XYZC,
        AxisOrder::XYZT,
        AxisOrder::XYZCT,
        AxisOrder::XYZTC,
        AxisOrder::XYCZT,
        AxisOrder::XY,
        AxisOrder::XYC,
        AxisOrder::XYT,
        AxisOrder::XYCT,
        AxisOrder::XYTC,
        AxisOrder::XYCZ,
    ];

    /// Retrieve this tag's entry in the layout table.
    pub fn layout(self) -> &'static AxisLayout {
        use AxisOrder::*;
        match self {
            XYZ => &LAYOUT_XYZ,
            XYZC => &LAYOUT_XYZC,
            XYZT => &LAYOUT_XYZT,
            XYZCT => &LAYOUT_XYZCT,
            XYZTC => &LAYOUT_XYZTC,
            XYCZT => &LAYOUT_XYCZT,
            XY => &LAYOUT_XY,
            XYC => &LAYOUT_XYC,
            XYT => &LAYOUT_XYT,
            XYCT => &LAYOUT_XYCT,
            XYTC => &LAYOUT_XYTC,
            XYCZ => &LAYOUT_XYCZ,
            Default => &LAYOUT_DEFAULT,
        }
    }

    /// The upper-case name of this tag.
    pub fn name(self) -> &'static str {
        use AxisOrder::*;
        match self {
            XYZ => "XYZ",
            XYZC => "XYZC",
            XYZT => "XYZT",
            XYZCT => "XYZCT",
            XYZTC => "XYZTC",
            XYCZT => "XYCZT",
            XY => "XY",
            XYC => "XYC",
            XYT => "XYT",
            XYCT => "XYCT",
            XYTC => "XYTC",
            XYCZ => "XYCZ",
            Default => "DEFAULT",
        }
    }

    /// Replace `Default` with a concrete axis order.
    ///
    /// Concrete tags are returned as is. `Default` is inferred from the
    /// number of dimensions of the stack: a 3D stack is a Z stack in a 3D
    /// viewer but a time-lapse in a 2D viewer.
    ///
    /// # Errors
    ///
    /// - `SpimError::UnsupportedDimensionality` if `Default` is given with a
    /// rank other than 2, 3, 4 or 5.
    ///
    /// # Example
    ///
    /// ```
    /// # use spimview::AxisOrder;
    /// assert_eq!(AxisOrder::resolve(AxisOrder::Default, 3, false)?, AxisOrder::XYZ);
    /// assert_eq!(AxisOrder::resolve(AxisOrder::Default, 3, true)?, AxisOrder::XYT);
    /// assert_eq!(AxisOrder::resolve(AxisOrder::XYC, 3, true)?, AxisOrder::XYC);
    /// # Ok::<(), spimview::SpimError>(())
    /// ```
    pub fn resolve(order: AxisOrder, ndim: usize, viewer_is_2d: bool) -> Result<AxisOrder> {
        if order != AxisOrder::Default {
            return Ok(order);
        }
        let resolved = match (viewer_is_2d, ndim) {
            (_, 2) => AxisOrder::XY,
            (true, 3) => AxisOrder::XYT,
            (true, 4) => AxisOrder::XYTC,
            (false, 3) => AxisOrder::XYZ,
            (false, 4) => AxisOrder::XYZT,
            (_, 5) => AxisOrder::XYZTC,
            _ => return Err(SpimError::UnsupportedDimensionality(ndim)),
        };
        debug!(
            "resolved default axis order for {}D stack (2D viewer: {}) to {}",
            ndim, viewer_is_2d, resolved
        );
        Ok(resolved)
    }

    /// Expected rank of the input stack.
    pub fn num_dimensions(self) -> usize {
        self.layout().num_dimensions
    }

    /// Index of the channel axis, if there is one.
    pub fn channel_dimension(self) -> Option<usize> {
        self.layout().channel_dimension
    }

    /// Index of the time axis, if there is one.
    pub fn time_dimension(self) -> Option<usize> {
        self.layout().time_dimension
    }

    /// Whether a unit Z axis is appended during canonicalization.
    pub fn add_z(self) -> bool {
        self.layout().add_z
    }

    /// Whether axes 2 and 3 are swapped during canonicalization.
    pub fn flip_z(self) -> bool {
        self.layout().flip_z
    }

    /// Whether the input stack has a channel axis.
    pub fn has_channels(self) -> bool {
        self.channel_dimension().is_some()
    }

    /// Whether the input stack has a time axis.
    pub fn has_timepoints(self) -> bool {
        self.time_dimension().is_some()
    }

    /// Number of channels of a stack with the given extents, 1 if there
    /// is no channel axis.
    ///
    /// # Panic
    ///
    /// Panics if `dims` is shorter than the channel axis index.
    pub fn channel_count(self, dims: &[usize]) -> usize {
        self.channel_dimension().map_or(1, |c| dims[c])
    }

    /// Number of time points of a stack with the given extents, 1 if there
    /// is no time axis.
    ///
    /// # Panic
    ///
    /// Panics if `dims` is shorter than the time axis index.
    pub fn timepoint_count(self, dims: &[usize]) -> usize {
        self.time_dimension().map_or(1, |t| dims[t])
    }

    fn check_rank(self, ndim: usize) -> Result<()> {
        if ndim != self.num_dimensions() {
            return Err(SpimError::DimensionMismatch(self.num_dimensions(), ndim));
        }
        Ok(())
    }
}

impl std::default::Default for AxisOrder {
    fn default() -> Self {
        AxisOrder::Default
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisOrder {
    type Err = SpimError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        AxisOrder::ALL
            .iter()
            .chain(std::iter::once(&AxisOrder::Default))
            .find(|o| o.name() == upper)
            .copied()
            .ok_or_else(|| SpimError::UnknownAxisOrder(s.to_string()))
    }
}

/// Split a stack into canonical `X,Y,Z[,T]` sub-stacks, one per channel.
///
/// The sub-stacks are views over the same storage as `source`, in ascending
/// channel coordinate order. Without a channel axis a single sub-stack is
/// returned.
///
/// # Errors
///
/// - `SpimError::DimensionMismatch` if `source` does not have the rank
/// expected by `order`.
pub fn split<V>(source: &V, order: AxisOrder) -> Result<Vec<V>>
where
    V: StackView + Clone,
{
    order.check_rank(source.ndim())?;

    let stacks = match order.channel_dimension() {
        Some(c) => {
            let min = source.min(c);
            (0..source.dimension(c) as i64)
                .map(|s| source.hyper_slice(c, min + s))
                .collect::<Result<Vec<_>>>()?
        }
        None => vec![source.clone()],
    };

    let stacks = canonicalize(stacks, order)?;
    debug!("split {} stack into {} sub-stacks", order, stacks.len());
    Ok(stacks)
}

/// Split a stack into canonical sub-stacks over a region of interest.
///
/// Works like [`split`], except that channels are taken from `interval`
/// rather than from the source's own bounds, so a region of interest that
/// covers only some channels produces only those sub-stacks. The interval
/// is returned transformed to the canonical layout: without the channel
/// axis, with a `0..=0` Z axis when one is added, and with axes 2 and 3
/// swapped when the sub-stacks are.
///
/// # Errors
///
/// - `SpimError::DimensionMismatch` if `source` or `interval` does not have
/// the rank expected by `order`.
/// - `SpimError::InvalidInterval` if `interval` has `min > max` on any axis.
/// - `SpimError::OutOfBounds` if the interval's channel range falls outside
/// of `source`.
///
/// [`split`]: ./fn.split.html
pub fn split_with_interval<V>(
    source: &V,
    interval: &Interval,
    order: AxisOrder,
) -> Result<(Vec<V>, Interval)>
where
    V: StackView + Clone,
{
    order.check_rank(source.ndim())?;
    order.check_rank(interval.ndim())?;
    interval.validate()?;

    let (stacks, mut interval) = match order.channel_dimension() {
        Some(c) => {
            let min = interval.min(c);
            let stacks = (0..interval.dimension(c))
                .map(|s| source.hyper_slice(c, min + s))
                .collect::<Result<Vec<_>>>()?;
            (stacks, interval.remove_axis(c)?)
        }
        None => (vec![source.clone()], interval.clone()),
    };

    if order.add_z() {
        interval = interval.append_axis(0, 0);
    }
    if order.flip_z() {
        interval = interval.swap_axes(2, 3)?;
    }

    let stacks = canonicalize(stacks, order)?;
    debug!(
        "split {} stack into {} sub-stacks over {:?}",
        order,
        stacks.len(),
        interval
    );
    Ok((stacks, interval))
}

fn canonicalize<V: StackView>(stacks: Vec<V>, order: AxisOrder) -> Result<Vec<V>> {
    stacks
        .into_iter()
        .map(|s| if order.add_z() { s.add_dimension() } else { s })
        .map(|s| if order.flip_z() { s.permute(2, 3) } else { Ok(s) })
        .collect()
}
