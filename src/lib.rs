//! Street network solar alignment analysis.
//!
//! Given a set of street polylines, `sunline` merges them into straight
//! sections, scores how well each section's bearing aligns with the
//! sun's azimuth at sunrise or sunset, and searches a whole year of
//! solar positions for the locally-maximal alignment dates of a street.
//!
//! The pipeline:
//!
//! ```text
//! street ways -> SegmentBatcher -> RepresentativeSegment
//!             -> AlignmentScorer (+ sun azimuth) -> ScoredSegment
//!
//! street bearing + location -> OptimalDaySearch -> ranked best days
//! ```
//!
//! Rendering, tile handling and HTTP live outside this crate; geometry
//! arrives pre-parsed through the [`loading::StreetSource`] seam and
//! results leave as plain serializable records.

pub mod batching;
pub mod cache;
mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod scoring;
pub mod search;
pub mod solar;

pub use error::Error;
