//! Isoline (contour line) extraction for gridded scalar fields.
//!
//! Given a field sampled on a possibly curvilinear grid and one or more
//! levels, the builder traces the polylines along which the field equals
//! each level:
//! - Table-driven edge following from cell to cell
//! - Saddle cells resolved by recursive sub-cell subdivision
//! - Missing samples excluded from every crossing
//! - Label anchors placed along finished lines
//!
//! ```
//! use isolines::{GridField, IsolineBuilder};
//!
//! let field = GridField::from_fn(3, 3, |i, _| i as f64);
//! let lines = IsolineBuilder::new()
//!     .with_data_source(&field)
//!     .build_isoline_for_level(1.5)
//!     .unwrap();
//! assert_eq!(lines.len(), 1);
//! ```

pub mod annotate;
pub mod builder;
pub mod cell;
pub mod collection;
pub mod config;
pub mod edge;
pub mod error;
pub mod field;
pub mod saddle;
pub mod tracer;

pub use annotate::{Annotator, IsolineTextLabel, Rect};
pub use builder::{auto_levels, interval_levels, IsolineBuilder};
pub use collection::{IsolineCollection, LevelLine};
pub use config::{AnnotationConfig, IsolineConfig, LevelFailurePolicy};
pub use edge::{CellBitmask, Edge};
pub use error::{IsolineError, Result};
pub use field::{GridField, GridGeometry, Point, ScalarField, ValueRange};
