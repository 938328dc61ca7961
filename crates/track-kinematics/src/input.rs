//! JSON track loading
//!
//! Only the top-level layout is matched by serde. Records are picked apart one
//! by one so that a bad field is reported with its record index.

use crate::CliError;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use track_kinematics_lib::{InvalidField, PointField, RawCoordinate, RawPoint};

const LATITUDE_KEYS: &[&str] = &["lat", "latitude"];
const LONGITUDE_KEYS: &[&str] = &["lng", "longitude", "lon"];
const TIMESTAMP_KEYS: &[&str] = &["shot_date", "timestamp", "time"];

/// Accepted top-level layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Photos { photos: Vec<Value> },
    Records(Vec<Value>),
}

/// Parse records from a JSON document, keeping their order
pub fn parse_records(json: &str) -> Result<Vec<RawPoint>, CliError> {
    let records = match serde_json::from_str::<Document>(json)? {
        Document::Photos { photos } => photos,
        Document::Records(records) => records,
    };
    records
        .iter()
        .enumerate()
        .map(|(index, record)| raw_point(record).map_err(|e| CliError::from(e.at(index))))
        .collect()
}

pub fn load_records(path: &Path) -> Result<Vec<RawPoint>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&json)
}

fn raw_point(record: &Value) -> Result<RawPoint, InvalidField> {
    if !record.is_object() {
        return Err(InvalidField::new(
            PointField::Latitude,
            format!("record {record} is not a JSON object"),
        ));
    }
    let lat = coordinate(field(record, PointField::Latitude, LATITUDE_KEYS)?)
        .map_err(|reason| InvalidField::new(PointField::Latitude, reason))?;
    let lng = coordinate(field(record, PointField::Longitude, LONGITUDE_KEYS)?)
        .map_err(|reason| InvalidField::new(PointField::Longitude, reason))?;
    let shot_date = match field(record, PointField::Timestamp, TIMESTAMP_KEYS)? {
        Value::String(text) => text.clone(),
        other => {
            return Err(InvalidField::new(
                PointField::Timestamp,
                format!("{other} is not a string"),
            ));
        }
    };
    Ok(RawPoint {
        lat,
        lng,
        shot_date,
    })
}

/// First present key among `keys`
fn field<'a>(
    record: &'a Value,
    name: PointField,
    keys: &[&str],
) -> Result<&'a Value, InvalidField> {
    keys.iter()
        .find_map(|key| record.get(*key))
        .ok_or_else(|| InvalidField::new(name, format!("missing (expected `{}`)", keys[0])))
}

fn coordinate(value: &Value) -> Result<RawCoordinate, String> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(RawCoordinate::Number)
            .ok_or_else(|| format!("{number} is not representable as f64")),
        Value::String(text) => Ok(RawCoordinate::Text(text.clone())),
        other => Err(format!("{other} is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_kinematics_lib::KinematicsError;

    fn malformed(json: &str) -> (usize, PointField, String) {
        match parse_records(json) {
            Err(CliError::Kinematics(KinematicsError::MalformedPoint {
                index,
                field,
                reason,
            })) => (index, field, reason),
            other => panic!("expected a malformed point, got {other:?}"),
        }
    }

    #[test]
    fn test_photos_object() {
        let json = r#"{
            "count": 2,
            "photos": [
                {"lat": "-22.9068", "lng": "-43.1729", "shot_date": "2018-03-10 09:12:00"},
                {"lat": -22.9070, "lng": -43.1731, "shot_date": "2018-03-10 09:12:30", "t": 1}
            ]
        }"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lat, RawCoordinate::Text("-22.9068".to_string()));
        assert_eq!(records[1].lng, RawCoordinate::Number(-43.1731));
        assert_eq!(records[1].shot_date, "2018-03-10 09:12:30");
    }

    #[test]
    fn test_bare_array_with_long_field_names() {
        let json = r#"[
            {"latitude": 1, "longitude": 2.5, "timestamp": "2018-03-10 09:12:00"}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].lat, RawCoordinate::Number(1.0));
        assert_eq!(records[0].lng, RawCoordinate::Number(2.5));
    }

    #[test]
    fn test_missing_field_reports_index() {
        let json = r#"[
            {"lat": 1, "lng": 2, "shot_date": "2018-03-10 09:12:00"},
            {"lat": 1, "shot_date": "2018-03-10 09:12:00"}
        ]"#;
        let (index, field, reason) = malformed(json);
        assert_eq!(index, 1);
        assert_eq!(field, PointField::Longitude);
        assert!(reason.starts_with("missing"));
    }

    #[test]
    fn test_non_numeric_coordinate_reports_index() {
        let json = r#"{"photos": [
            {"lat": 1, "lng": 2, "shot_date": "2018-03-10 09:12:00"},
            {"lat": 1, "lng": 2, "shot_date": "2018-03-10 09:12:10"},
            {"lat": null, "lng": 1, "shot_date": "2018-03-10 09:12:20"}
        ]}"#;
        assert_eq!(
            malformed(json),
            (2, PointField::Latitude, "null is not a number".to_string())
        );

        let json = r#"[{"lat": 1, "lng": true, "shot_date": "2018-03-10 09:12:00"}]"#;
        assert_eq!(malformed(json).1, PointField::Longitude);

        let json = r#"[{"lat": {"deg": 1}, "lng": 1, "shot_date": "2018-03-10 09:12:00"}]"#;
        assert_eq!(malformed(json).1, PointField::Latitude);

        let json = r#"[{"lat": 1, "lng": 1, "shot_date": 1520673120}]"#;
        assert_eq!(malformed(json).1, PointField::Timestamp);
    }

    #[test]
    fn test_record_that_is_not_an_object() {
        let json = r#"[{"lat": 1, "lng": 2, "shot_date": "2018-03-10 09:12:00"}, 42]"#;
        assert_eq!(malformed(json).0, 1);
    }

    #[test]
    fn test_unrecognised_document() {
        assert!(matches!(parse_records("42"), Err(CliError::Json(_))));
        assert!(matches!(parse_records("{\"tracks\": []}"), Err(CliError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/track.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
