//! End-to-end scoring pass: filter → batch → score.

use log::info;

use crate::batching::SegmentBatcher;
use crate::loading::{AlignmentConfig, filter_ways};
use crate::model::{ScoredSegment, StreetWay};
use crate::scoring::AlignmentScorer;

/// Runs the full scoring pipeline over a set of street ways against one
/// sun azimuth. The caller keeps the batcher and scorer (and their
/// caches) alive across repeated passes.
pub fn score_street_network(
    ways: Vec<StreetWay>,
    sun_azimuth: f64,
    config: &AlignmentConfig,
    batcher: &mut SegmentBatcher,
    scorer: &mut AlignmentScorer,
) -> Vec<ScoredSegment> {
    let ways = filter_ways(ways, config);
    let batched = batcher.batch_ways(&ways);
    info!(
        "Batched {} ways into {} straight sections",
        ways.len(),
        batched.len()
    );

    let scored = scorer.score(&batched, sun_azimuth);
    info!(
        "Scored {} sections against sun azimuth {sun_azimuth:.1}",
        scored.len()
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn pipeline_filters_batches_and_scores() {
        let config = AlignmentConfig {
            bearing_tolerance: 5.0,
            min_batch_length: 10.0,
            max_bearing_drift: 10.0,
            excluded_types: vec!["footway".into()],
            ..AlignmentConfig::default()
        };
        let mut batcher = SegmentBatcher::new(&config);
        let mut scorer = AlignmentScorer::new(&config);

        let ways = vec![
            StreetWay {
                id: 1,
                geometry: line_string![
                    (x: 0.0, y: 0.0),
                    (x: 0.0, y: 0.001),
                    (x: 0.0, y: 0.002),
                ],
                road_type: Some("residential".into()),
            },
            StreetWay {
                id: 2,
                geometry: line_string![(x: 0.1, y: 0.0), (x: 0.1, y: 0.001)],
                road_type: Some("footway".into()),
            },
        ];

        let scored = score_street_network(ways, 0.0, &config, &mut batcher, &mut scorer);

        // The footway is filtered; the remaining way batches into one
        // north-south section perfectly aligned with azimuth 0
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].segment.way_id, 1);
        assert!((scored[0].alignment_score - 1.0).abs() < 1e-9);
    }
}
