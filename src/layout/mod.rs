//! Coordinate and dimension resolution
//!
//! Turns declared placements (literals, references, anchors and offsets) into
//! positions and sizes expressed both in author units and in rendering units.

pub mod anchor;
pub mod config;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod position;
pub mod types;

pub use anchor::{Anchor, AnchorSpec};
pub use config::{ConfigError, PageConfig, PageDocument, ResolveConfig, ScaleConfig};
pub use dimension::{resolve_dimension, DimensionResult};
pub use engine::resolve;
pub use error::{GeometryError, ResolveError};
pub use position::{resolve_position, NamedPosition, PositionResult, ResolutionContext};
pub use types::*;
