//! End-to-end coverage across the textual/WKB/MF-JSON readers, the sync
//! kernel, restriction, aggregation, and trajectory operators, exercised
//! together the way a caller actually chains them rather than module by
//! module.

use chronogeo::aggregate::{centroid_final, centroid_transition};
use chronogeo::geomops;
use chronogeo::octree::Octree;
use chronogeo::parser::{emit_temporal_point, parse_temporal_point};
use chronogeo::restrict;
use chronogeo::sync::lift_distance;
use chronogeo::time::Range;
use chronogeo::wkb::{from_hexwkb, from_wkb, to_hexwkb, to_wkb};
use chronogeo::{GeomPoint, Instant, Interpolation, Sequence, Temporal, Timestamp};

fn line(coords: &[(f64, f64, i64)], lower_inc: bool, upper_inc: bool) -> Sequence<GeomPoint> {
    let instants = coords
        .iter()
        .map(|&(x, y, t)| Instant::new(GeomPoint::new_2d(x, y, 4326), Timestamp::from_micros(t)))
        .collect();
    Sequence::new(instants, lower_inc, upper_inc, Interpolation::Linear).unwrap()
}

#[test]
fn parser_round_trips_a_sequence() {
    let text = "[POINT(0 0)@2001-01-01 00:00:00, POINT(10 0)@2001-01-01 00:00:10)";
    let t = parse_temporal_point(text).unwrap();
    assert_eq!(t.kind(), "Sequence");
    let back = emit_temporal_point(&t);
    let reparsed = parse_temporal_point(&back).unwrap();
    assert_eq!(reparsed.kind(), "Sequence");
    assert_eq!(reparsed.start_timestamp(), t.start_timestamp());
}

#[test]
fn wkb_and_hexwkb_round_trip_a_sequence() {
    let seq = line(&[(0.0, 0.0, 0), (10.0, 0.0, 10_000_000)], true, true);
    let t = Temporal::Sequence(seq);

    let bytes = to_wkb(&t);
    let back = from_wkb(&bytes).unwrap();
    assert_eq!(back.kind(), "Sequence");
    assert_eq!(back.start_timestamp(), t.start_timestamp());
    assert_eq!(back.end_timestamp(), t.end_timestamp());

    let hex = to_hexwkb(&t);
    let back_hex = from_hexwkb(&hex).unwrap();
    assert_eq!(back_hex.kind(), "Sequence");
}

#[test]
fn length_and_speed_agree_on_a_straight_line() {
    let seq = line(&[(0.0, 0.0, 0), (10.0, 0.0, 10_000_000)], true, true);
    assert!((geomops::length(&seq) - 10.0).abs() < 1e-9);

    let speed = geomops::speed(&seq).unwrap();
    // 10 metres (degrees treated as planar units here) over 10 seconds.
    assert!((speed.value_at(Timestamp::from_micros(5_000_000)).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn restrict_at_value_isolates_the_matching_sub_run() {
    let seq = Sequence::new(
        vec![
            Instant::new(0.0f64, Timestamp::from_micros(0)),
            Instant::new(10.0f64, Timestamp::from_micros(10)),
            Instant::new(0.0f64, Timestamp::from_micros(20)),
        ],
        true,
        true,
        Interpolation::Linear,
    )
    .unwrap();

    let at_zero = restrict::at_value(&seq, &0.0).unwrap();
    assert!(at_zero.sequences().iter().all(|s| s.value_at(s.start_timestamp()) == Some(0.0)));

    let at_range = restrict::at_range(&seq, &Range::new(5.0, 10.0, true, true).unwrap()).unwrap();
    assert!(!at_range.sequences().is_empty());
}

#[test]
fn lift_distance_tracks_two_converging_points() {
    let a = line(&[(0.0, 0.0, 0), (10.0, 0.0, 10_000_000)], true, true);
    let b = line(&[(10.0, 0.0, 0), (0.0, 0.0, 10_000_000)], true, true);

    let dist = lift_distance(&a, &b).unwrap();
    // They cross in the middle, so distance goes 10 -> 0 -> 10.
    assert!(dist.value_at(Timestamp::from_micros(0)).unwrap() > 9.0);
    assert!(dist.value_at(Timestamp::from_micros(5_000_000)).unwrap() < 1e-6);
    assert!(dist.value_at(Timestamp::from_micros(10_000_000)).unwrap() > 9.0);
}

#[test]
fn nearest_approach_distance_matches_the_crossing_point() {
    let a = line(&[(0.0, 0.0, 0), (10.0, 0.0, 10_000_000)], true, true);
    let b = line(&[(10.0, 0.0, 0), (0.0, 0.0, 10_000_000)], true, true);
    let nad = geomops::nearest_approach_distance(&a, &b).unwrap();
    assert!(nad < 1e-6);
}

#[test]
fn centroid_transition_then_final_averages_colocated_instants() {
    let a = Temporal::Instant(Instant::new(GeomPoint::new_2d(0.0, 0.0, 4326), Timestamp::from_micros(0)));
    let b = Temporal::Instant(Instant::new(GeomPoint::new_2d(10.0, 0.0, 4326), Timestamp::from_micros(0)));

    let state = centroid_transition(None, &a).unwrap();
    let state = centroid_transition(Some(state), &b).unwrap();
    let result = centroid_final(&state).unwrap();

    match result {
        Temporal::InstantSet(set) => {
            let v = set.value_at(Timestamp::from_micros(0)).unwrap();
            assert!((v.x() - 5.0).abs() < 1e-9);
        }
        other => panic!("expected InstantSet, got {:?}", other.kind()),
    }
}

#[test]
fn octree_finds_a_point_inside_its_own_bbox_query() {
    let mut tree: Octree<&'static str> = Octree::new();
    let seq = line(&[(0.0, 0.0, 0), (10.0, 0.0, 10_000_000)], true, true);
    tree.insert(&seq.bbox(), "trip-1");

    let hits = tree.range_query(&seq.bbox());
    assert_eq!(hits, vec![&"trip-1"]);
}
