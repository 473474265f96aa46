//! Registration of stacks with a viewer.
//!
//! The viewer is always passed explicitly: [`add_stack`] resolves the axis
//! order of a stack, splits it into canonical sub-stacks and hands each of
//! them, wrapped as a source, to a [`ViewerSink`].
//!
//! [`add_stack`]: ./fn.add_stack.html
//! [`ViewerSink`]: ./trait.ViewerSink.html
use crate::axis_order::{split, AxisOrder};
use crate::display::ColorConverter;
use crate::error::Result;
use crate::session::{SessionSerializer, SourceRecord};
use crate::source::{Source, SourceAndConverter};
use crate::view::{OffsetView, StackView};
use log::debug;
use rgb::RGBA8;

/// Options used when registering stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    is_2d: bool,
    axis_order: AxisOrder,
    display_range: (f64, f64),
    colors: Vec<RGBA8>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            is_2d: false,
            axis_order: AxisOrder::Default,
            display_range: (0., 255.),
            colors: vec![RGBA8::new(255, 255, 255, 255)],
        }
    }
}

impl ViewerOptions {
    /// Options for a 3D viewer, inferring axis orders, white sources and a
    /// display range of `0..=255`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the target viewer shows planes rather than volumes. This
    /// changes how the axis order of 3D and 4D stacks is inferred.
    pub fn with_2d(mut self, is_2d: bool) -> Self {
        self.is_2d = is_2d;
        self
    }

    /// Axis order of the registered stacks.
    pub fn with_axis_order(mut self, axis_order: AxisOrder) -> Self {
        self.axis_order = axis_order;
        self
    }

    /// Initial display range of new sources.
    pub fn with_display_range(mut self, min: f64, max: f64) -> Self {
        self.display_range = (min, max);
        self
    }

    /// Colors assigned to channels, in order and repeating. An empty list
    /// falls back to white.
    pub fn with_colors(mut self, colors: Vec<RGBA8>) -> Self {
        self.colors = colors;
        self
    }

    /// Whether the target viewer is 2D.
    pub fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// The configured axis order.
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// The initial display range.
    pub fn display_range(&self) -> (f64, f64) {
        self.display_range
    }

    /// The color of the given channel.
    pub fn color(&self, channel: usize) -> RGBA8 {
        if self.colors.is_empty() {
            return RGBA8::new(255, 255, 255, 255);
        }
        self.colors[channel % self.colors.len()]
    }
}

/// Something that displays sources.
pub trait ViewerSink<'a, A> {
    /// Register a source for display.
    fn add_source(&mut self, sac: SourceAndConverter<'a, A>) -> Result<()>;
}

/// In-memory list of displayed sources.
#[derive(Debug)]
pub struct ViewerState<'a, A> {
    sources: Vec<SourceAndConverter<'a, A>>,
}

impl<'a, A> Default for ViewerState<'a, A> {
    fn default() -> Self {
        ViewerState {
            sources: Vec::new(),
        }
    }
}

impl<'a, A> ViewerState<'a, A> {
    /// Create an empty viewer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed sources, in registration order.
    pub fn sources(&self) -> &[SourceAndConverter<'a, A>] {
        &self.sources
    }

    /// Find a source by name.
    pub fn get(&self, name: &str) -> Option<&SourceAndConverter<'a, A>> {
        self.sources.iter().find(|sac| sac.source.name() == name)
    }

    /// Find a source by name, for changing its converter.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SourceAndConverter<'a, A>> {
        self.sources.iter_mut().find(|sac| sac.source.name() == name)
    }

    /// Stop displaying a source.
    pub fn remove(&mut self, name: &str) -> Option<SourceAndConverter<'a, A>> {
        let pos = self.sources.iter().position(|sac| sac.source.name() == name)?;
        Some(self.sources.remove(pos))
    }

    /// Number of displayed sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Records of all displayed sources that can be persisted.
    pub fn records(&self, serializer: &mut SessionSerializer) -> Vec<SourceRecord> {
        serializer.serialize_all(&self.sources)
    }
}

impl<'a, A> ViewerSink<'a, A> for ViewerState<'a, A> {
    fn add_source(&mut self, sac: SourceAndConverter<'a, A>) -> Result<()> {
        self.sources.push(sac);
        Ok(())
    }
}

/// Split a stack into canonical sources and register them with a viewer.
///
/// Sources are named after `name`, with a `-ch{i}` suffix per channel when
/// the axis order has a channel axis. Returns the number of sources added.
///
/// # Errors
///
/// - `SpimError::UnsupportedDimensionality` if the axis order must be
/// inferred and the stack rank is not supported.
/// - `SpimError::DimensionMismatch` if the stack rank does not match the
/// configured axis order.
/// - Any error returned by the sink.
///
/// # Example
///
/// ```
/// # use ndarray::{Array, IxDyn};
/// # use spimview::{add_stack, OffsetView, ViewerOptions, ViewerState};
/// let data = Array::<u16, _>::zeros(IxDyn(&[32, 32, 12, 3]));
/// let mut viewer = ViewerState::new();
/// let options = ViewerOptions::new().with_axis_order("XYZC".parse()?);
/// let added = add_stack(&mut viewer, "embryo", OffsetView::new(data.view()), &options)?;
/// assert_eq!(added, 3);
/// assert!(viewer.get("embryo-ch2").is_some());
/// # Ok::<(), spimview::SpimError>(())
/// ```
pub fn add_stack<'a, A, S>(
    sink: &mut S,
    name: &str,
    data: OffsetView<'a, A>,
    options: &ViewerOptions,
) -> Result<usize>
where
    S: ViewerSink<'a, A>,
{
    let order = AxisOrder::resolve(options.axis_order(), data.ndim(), options.is_2d())?;
    let stacks = split(&data, order)?;
    let timepoints = order.timepoint_count(&data.shape());
    let (min, max) = options.display_range();

    let count = stacks.len();
    for (channel, stack) in stacks.into_iter().enumerate() {
        let source_name = if order.has_channels() {
            format!("{}-ch{}", name, channel)
        } else {
            name.to_string()
        };
        let source = Source::new(source_name, stack).with_timepoints(timepoints);
        let converter = ColorConverter::new(options.color(channel), min, max);
        sink.add_source(SourceAndConverter::new(source, converter))?;
    }
    debug!("added {} as {} sources ({})", name, count, order);
    Ok(count)
}
