//! Display sources: canonical stacks with a name, a placement in global
//! space and a color converter.
use crate::affine::Affine4;
use crate::display::ColorConverter;
use crate::error::{Result, SpimError};
use crate::view::{OffsetView, StackView};
use std::fmt;
use std::str::FromStr;

/// The concrete implementation behind a source, which decides how it is
/// persisted.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum SourceKind {
    /// A stack shown as is.
    Spim,
    /// A stack placed with an additional affine transform.
    Transformed,
    /// A stack deformed by a non-linear warp field.
    Warped,
    /// A stack resampled on the grid of another source.
    Resampled,
}

impl SourceKind {
    /// The class name identifying this kind on the wire.
    pub fn class_name(self) -> &'static str {
        match self {
            SourceKind::Spim => "SpimSource",
            SourceKind::Transformed => "TransformedSource",
            SourceKind::Warped => "WarpedSource",
            SourceKind::Resampled => "ResampledSource",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for SourceKind {
    type Err = SpimError;

    fn from_str(s: &str) -> Result<Self> {
        [
            SourceKind::Spim,
            SourceKind::Transformed,
            SourceKind::Warped,
            SourceKind::Resampled,
        ]
        .iter()
        .find(|k| k.class_name() == s)
        .copied()
        .ok_or_else(|| SpimError::UnsupportedConfiguration(s.to_string()))
    }
}

/// A named canonical stack.
#[derive(Debug, Clone)]
pub struct Source<'a, A> {
    name: String,
    kind: SourceKind,
    data: OffsetView<'a, A>,
    transform: Affine4,
    timepoints: usize,
}

impl<'a, A> Source<'a, A> {
    /// Create a `Spim` source with an identity transform and a single time
    /// point.
    pub fn new<S: Into<String>>(name: S, data: OffsetView<'a, A>) -> Self {
        Source {
            name: name.into(),
            kind: SourceKind::Spim,
            data,
            transform: Affine4::identity(),
            timepoints: 1,
        }
    }

    /// Set the source kind.
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the transform to global space.
    pub fn with_transform(mut self, transform: Affine4) -> Self {
        self.transform = transform;
        self
    }

    /// Set the number of time points.
    pub fn with_timepoints(mut self, timepoints: usize) -> Self {
        self.timepoints = timepoints;
        self
    }

    /// The source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source kind.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The stack shown by this source.
    pub fn data(&self) -> &OffsetView<'a, A> {
        &self.data
    }

    /// The transform from voxel coordinates to global space.
    pub fn transform(&self) -> &Affine4 {
        &self.transform
    }

    /// Number of time points.
    pub fn timepoints(&self) -> usize {
        self.timepoints
    }

    /// Extents of the stack.
    pub fn shape(&self) -> Vec<usize> {
        self.data.shape()
    }
}

/// A source together with the converter used to display it.
#[derive(Debug, Clone)]
pub struct SourceAndConverter<'a, A> {
    /// The displayed source.
    pub source: Source<'a, A>,
    /// Color and display range.
    pub converter: ColorConverter,
}

impl<'a, A> SourceAndConverter<'a, A> {
    /// Pair a source with a converter.
    pub fn new(source: Source<'a, A>, converter: ColorConverter) -> Self {
        SourceAndConverter { source, converter }
    }
}

#[cfg(test)]
mod tests {
    use super::{Source, SourceKind};
    use crate::affine::voxel_affine;
    use crate::view::OffsetView;
    use ndarray::{Array, IxDyn};

    #[test]
    fn test_kind_names() {
        for kind in [
            SourceKind::Spim,
            SourceKind::Transformed,
            SourceKind::Warped,
            SourceKind::Resampled,
        ]
        .iter()
        {
            assert_eq!(kind.to_string().parse::<SourceKind>().unwrap(), *kind);
        }
        assert!("bdv.util.PlaceHolderSource".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_builder() {
        let data = Array::<u8, _>::zeros(IxDyn(&[4, 4, 1]));
        let affine = voxel_affine([1.0, 1.0, 3.0], [0.0; 3]);
        let source = Source::new("nuclei", OffsetView::new(data.view()))
            .with_kind(SourceKind::Transformed)
            .with_transform(affine)
            .with_timepoints(5);
        assert_eq!(source.name(), "nuclei");
        assert_eq!(source.kind(), SourceKind::Transformed);
        assert_eq!(source.transform(), &affine);
        assert_eq!(source.timepoints(), 5);
        assert_eq!(source.shape(), vec![4, 4, 1]);
    }
}
