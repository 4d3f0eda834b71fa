//! Shared fixtures for engine unit tests.

use geojson::{feature::Id, Feature, Geometry, JsonObject, JsonValue, Value};

use lampioni_domain::{IsoDate, Lamp, LampData, Stats, BASELINE_DATE};

pub fn point_feature(osm_id: i64, date_added: Option<&str>) -> Feature {
    let mut props = JsonObject::new();
    props.insert("osm_type".into(), JsonValue::from("node"));
    props.insert("osm_id".into(), JsonValue::from(osm_id));
    props.insert("user".into(), JsonValue::from("mapper"));
    if let Some(date) = date_added {
        props.insert("date_added".into(), JsonValue::from(date));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![12.49, 41.89]))),
        id: Some(Id::String(format!("node/{osm_id}"))),
        properties: Some(props),
        foreign_members: None,
    }
}

pub fn new_lamp(osm_id: i64, date_added: &str) -> Lamp {
    Lamp::from_feature(point_feature(osm_id, Some(date_added))).expect("valid fixture feature")
}

pub fn baseline_lamp(osm_id: i64) -> Lamp {
    Lamp::from_feature(point_feature(osm_id, None)).expect("valid fixture feature")
}

pub fn stats(baseline_count: u64, new_count: u64) -> Stats {
    serde_json::from_value(serde_json::json!({
        "baseline_count": baseline_count,
        "new_count": new_count,
        "last_updated": "2026-02-05T06:12:44Z",
    }))
    .expect("valid stats fixture")
}

pub fn lamp_data(baseline: Vec<Lamp>, new: Vec<Lamp>) -> LampData {
    let stats = stats(baseline.len() as u64, new.len() as u64);
    LampData::new(stats, baseline, new, IsoDate::from(BASELINE_DATE))
}
