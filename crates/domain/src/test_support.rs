//! GeoJSON feature fixtures shared by the unit tests.

use geojson::{feature::Id, Feature, Geometry, JsonObject, JsonValue, Value};

use crate::Lamp;

pub(crate) fn feature(osm_id: i64, date_added: Option<&str>) -> Feature {
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

pub(crate) fn lamp(osm_id: i64, date_added: &str) -> Lamp {
    Lamp::from_feature(feature(osm_id, Some(date_added))).expect("valid fixture feature")
}

pub(crate) fn lamp_without_date(osm_id: i64) -> Lamp {
    Lamp::from_feature(feature(osm_id, None)).expect("valid fixture feature")
}
