//! MF-JSON reader (`spec.md` §4.E / §6.3) for moving points.
//!
//! Recognizes `{"type":"MovingPoint", "interpolations":[...], ...}` and
//! builds the matching `Temporal<GeomPoint>` variant. The JSON tokenizer
//! itself is out of scope (per the surrounding spec) — `serde_json::Value`
//! does that part, same as the teacher's config/snapshot loaders
//! (`src/persistence.rs`) delegate tokenizing to `serde_json` rather than
//! hand-rolling it. Coordinate arrays are read into `geojson::PointType`
//! (a plain `Vec<f64>`) to keep reusing the teacher's `geojson` dependency
//! for the coordinate shape instead of inventing a parallel type.

use geojson::PointType;
use serde_json::Value;

use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::temporal::instant_set::InstantSet;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::temporal::sequence_set::SequenceSet;
use crate::temporal::Temporal;
use crate::time::Timestamp;
use chronogeo_types::point::GeomPoint;

fn err(msg: impl Into<String>) -> ChronoError {
    ChronoError::InvalidTextRepresentation(msg.into())
}

fn point_from_coords(coords: &PointType, srid: i32) -> Result<GeomPoint> {
    match coords.len() {
        2 => Ok(GeomPoint::new_2d(coords[0], coords[1], srid)),
        3 => Ok(GeomPoint::new_3d(coords[0], coords[1], coords[2], srid)),
        n => Err(err(format!("MF-JSON coordinate array must have 2 or 3 members, found {n}"))),
    }
}

fn coords_from_json(v: &Value) -> Result<PointType> {
    v.as_array()
        .ok_or_else(|| err("expected a coordinate array"))?
        .iter()
        .map(|n| n.as_f64().ok_or_else(|| err("coordinate must be numeric")))
        .collect()
}

/// `crs` is resolved to an SRID by reading the member MobilityDB's own
/// MF-JSON writer uses (`properties.name`, e.g. `"EPSG:4326"`), not by
/// reprojecting coordinates — the returned value keeps its original
/// numbers and is simply tagged with the resolved SRID.
fn resolve_srid(obj: &serde_json::Map<String, Value>) -> i32 {
    obj.get("crs")
        .and_then(|crs| crs.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .and_then(|name| name.rsplit(':').next())
        .and_then(|tail| tail.parse::<i32>().ok())
        .unwrap_or(0)
}

fn parse_datetime(v: &Value) -> Result<Timestamp> {
    let s = v.as_str().ok_or_else(|| err("datetimes entry must be a string"))?;
    Timestamp::parse(s)
}

/// Parses one MF-JSON document into a `Temporal<GeomPoint>`. Dispatch is
/// driven by shape, matching the four cases `spec.md` enumerates:
/// a bare `coordinates`+`datetimes` pair is an `Instant`; `Discrete`
/// interpolation with parallel arrays is an `InstantSet`; `Linear` with
/// flat arrays plus `lower_inc`/`upper_inc` is a `Sequence`; `Linear` with
/// a `sequences` array is a `SequenceSet`.
pub fn parse_mfjson_point(text: &str) -> Result<Temporal<GeomPoint>> {
    let value: Value = serde_json::from_str(text).map_err(|e| err(format!("invalid JSON: {e}")))?;
    let obj = value.as_object().ok_or_else(|| err("expected a JSON object"))?;
    let srid = resolve_srid(obj);

    if let Some(sequences) = obj.get("sequences").and_then(Value::as_array) {
        let seqs: Vec<Sequence<GeomPoint>> = sequences
            .iter()
            .map(|s| parse_sequence_member(s, srid))
            .collect::<Result<_>>()?;
        return Ok(Temporal::SequenceSet(SequenceSet::new(seqs)?));
    }

    let interpolations: Vec<&str> = obj
        .get("interpolations")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let datetimes = obj.get("datetimes");
    match datetimes {
        None => Err(err("MF-JSON document is missing required member 'datetimes'")),
        Some(Value::Array(dts)) if dts.len() == 1 => {
            let coords = coords_from_json(obj.get("coordinates").ok_or_else(|| err("missing 'coordinates'"))?)?;
            let point = point_from_coords(&coords, srid)?;
            let t = parse_datetime(&dts[0])?;
            Ok(Temporal::Instant(Instant::new(point, t)))
        }
        Some(Value::Array(dts)) if interpolations.first() == Some(&"Discrete") => {
            let coords_list = obj
                .get("coordinates")
                .and_then(Value::as_array)
                .ok_or_else(|| err("missing 'coordinates'"))?;
            let instants = zip_instants(coords_list, dts, srid)?;
            Ok(Temporal::InstantSet(InstantSet::new(instants)?))
        }
        Some(Value::Array(_)) => Ok(Temporal::Sequence(parse_sequence_member(&value, srid)?)),
        Some(_) => Err(err("'datetimes' must be an array")),
    }
}

fn zip_instants(coords_list: &[Value], dts: &[Value], srid: i32) -> Result<Vec<Instant<GeomPoint>>> {
    if coords_list.len() != dts.len() {
        return Err(err("'coordinates' and 'datetimes' must have the same length"));
    }
    coords_list
        .iter()
        .zip(dts)
        .map(|(c, d)| {
            let coords = coords_from_json(c)?;
            let point = point_from_coords(&coords, srid)?;
            let t = parse_datetime(d)?;
            Ok(Instant::new(point, t))
        })
        .collect()
}

fn parse_sequence_member(v: &Value, srid: i32) -> Result<Sequence<GeomPoint>> {
    let obj = v.as_object().ok_or_else(|| err("sequence member must be a JSON object"))?;
    let coords_list = obj
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| err("sequence is missing 'coordinates'"))?;
    let dts = obj
        .get("datetimes")
        .and_then(Value::as_array)
        .ok_or_else(|| err("sequence is missing 'datetimes'"))?;
    let instants = zip_instants(coords_list, dts, srid)?;
    let lower_inc = obj.get("lower_inc").and_then(Value::as_bool).unwrap_or(true);
    let upper_inc = obj.get("upper_inc").and_then(Value::as_bool).unwrap_or(true);
    Ok(Sequence::new(instants, lower_inc, upper_inc, Interpolation::Linear)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instant() {
        let json = r#"{"type":"MovingPoint","coordinates":[1.0,2.0],"datetimes":["2001-01-01 00:00:00"]}"#;
        let t = parse_mfjson_point(json).unwrap();
        assert_eq!(t.kind(), "Instant");
    }

    #[test]
    fn parses_instant_set() {
        let json = r#"{"type":"MovingPoint","interpolations":["Discrete"],"coordinates":[[0.0,0.0],[1.0,1.0]],"datetimes":["2001-01-01 00:00:00","2001-01-01 00:01:00"]}"#;
        let t = parse_mfjson_point(json).unwrap();
        assert_eq!(t.kind(), "InstantSet");
    }

    #[test]
    fn parses_sequence_with_bounds() {
        let json = r#"{"type":"MovingPoint","interpolations":["Linear"],"coordinates":[[0.0,0.0],[1.0,1.0]],"datetimes":["2001-01-01 00:00:00","2001-01-01 00:01:00"],"lower_inc":true,"upper_inc":false}"#;
        let t = parse_mfjson_point(json).unwrap();
        match t {
            Temporal::Sequence(s) => assert!(!s.upper_inc()),
            _ => panic!("expected Sequence"),
        }
    }

    #[test]
    fn parses_sequence_set() {
        let json = r#"{"type":"MovingPoint","interpolations":["Linear"],"sequences":[
            {"coordinates":[[0.0,0.0],[1.0,1.0]],"datetimes":["2001-01-01 00:00:00","2001-01-01 00:01:00"],"lower_inc":true,"upper_inc":true},
            {"coordinates":[[2.0,2.0],[3.0,3.0]],"datetimes":["2001-01-01 00:02:00","2001-01-01 00:03:00"],"lower_inc":true,"upper_inc":true}
        ]}"#;
        let t = parse_mfjson_point(json).unwrap();
        assert_eq!(t.kind(), "SequenceSet");
    }

    #[test]
    fn resolves_srid_from_crs() {
        let json = r#"{"type":"MovingPoint","coordinates":[1.0,2.0],"datetimes":["2001-01-01 00:00:00"],"crs":{"type":"name","properties":{"name":"EPSG:4326"}}}"#;
        let t = parse_mfjson_point(json).unwrap();
        if let Temporal::Instant(i) = &t {
            assert_eq!(i.value().srid(), 4326);
        } else {
            panic!("expected Instant");
        }
    }

    #[test]
    fn rejects_missing_datetimes() {
        let json = r#"{"type":"MovingPoint","coordinates":[1.0,2.0]}"#;
        assert!(parse_mfjson_point(json).is_err());
    }
}
