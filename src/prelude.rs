// Re-export of key components
pub use crate::batching::{SegmentBatcher, decompose_way};
pub use crate::loading::{AlignmentConfig, SourceError, StreetLoader, StreetSource};
pub use crate::pipeline::score_street_network;
pub use crate::scoring::{AlignmentScorer, AlignmentStats, ScoreBand, stats};
pub use crate::search::{DaySearchOutcome, DaySearchParams, OptimalDaySearch};
pub use crate::solar::{CachedSunProvider, SolarCalculator, SunAzimuthProvider, SunEvent};

// Core data types
pub use crate::model::{BoundingBox, RepresentativeSegment, ScoredSegment, StreetWay, UnitSegment};

pub use crate::Error;
