//! Axis-order canonicalization and display-source bookkeeping for
//! multi-dimensional microscopy stacks.
//!
//! Acquisitions come in many layouts (`XY`, `XYZ`, `XYCZT`, ...), while a
//! viewer displays sources in a single canonical `X,Y,Z[,T]` layout. The
//! [`axis_order`] module converts a stack into canonical sub-stacks, one per
//! channel, without copying voxel data. The remaining modules deal with
//! what happens around that conversion: wrapping sub-stacks as colored
//! sources, registering them with a viewer, and persisting the display
//! settings of a session.
//!
//! # Example
//!
//! ```
//! # use ndarray::{Array, IxDyn};
//! use spimview::{add_stack, OffsetView, ViewerOptions, ViewerState};
//!
//! // a 2D time-lapse with 2 channels, axes X,Y,T,C
//! let data = Array::<u16, _>::zeros(IxDyn(&[128, 128, 20, 2]));
//!
//! let mut viewer = ViewerState::new();
//! let options = ViewerOptions::new().with_2d(true);
//! add_stack(&mut viewer, "cells", OffsetView::new(data.view()), &options)?;
//!
//! assert_eq!(viewer.len(), 2);
//! let source = &viewer.sources()[0].source;
//! assert_eq!(source.shape(), vec![128, 128, 1, 20]);
//! assert_eq!(source.timepoints(), 20);
//! # Ok::<(), spimview::SpimError>(())
//! ```
//!
//! [`axis_order`]: ./axis_order/index.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod affine;
pub mod axis_order;
pub mod display;
pub mod error;
pub mod interval;
pub mod session;
pub mod source;
pub mod view;
pub mod viewer;

pub use crate::axis_order::{split, split_with_interval, AxisOrder};
pub use crate::display::ColorConverter;
pub use crate::error::{Result, SpimError};
pub use crate::interval::Interval;
pub use crate::session::{load_session, save_session, SessionSerializer, SourceRecord};
pub use crate::source::{Source, SourceAndConverter, SourceKind};
pub use crate::view::{OffsetView, StackView};
pub use crate::viewer::{add_stack, ViewerOptions, ViewerSink, ViewerState};
