//! Data model for street/sun alignment analysis
//!
//! Plain data types shared across the pipeline: input street ways,
//! unit and batched segments, and spatial bounds.

pub mod segments;
pub mod streets;

pub use segments::{RepresentativeSegment, ScoredSegment, UnitSegment};
pub use streets::{BoundingBox, StreetWay};
