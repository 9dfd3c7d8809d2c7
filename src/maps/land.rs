// src/maps/land.rs
//! Land polygons from GeoJSON (Polygon / MultiPolygon, bare or inside
//! Feature / FeatureCollection). Other geometry types are ignored.

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::store;

/// One ring of `(lon, lat)` vertices.
pub type Ring = Vec<(f64, f64)>;
/// Outer ring plus holes; filled with the even-odd rule.
pub type Polygon = Vec<Ring>;

pub fn load_land(path: &Path) -> Result<Vec<Polygon>> {
    let value: Value = store::load_json(path)?;
    let polygons = polygons_from_geojson(&value)
        .map_err(|msg| Error::Schema(format!("{}: {msg}", path.display())))?;
    logf!("Loaded {} land polygons from {}", polygons.len(), path.display());
    Ok(polygons)
}

pub fn polygons_from_geojson(value: &Value) -> std::result::Result<Vec<Polygon>, String> {
    let mut out = Vec::new();
    collect(value, &mut out)?;
    Ok(out)
}

fn collect(value: &Value, out: &mut Vec<Polygon>) -> std::result::Result<(), String> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = value.get("features").and_then(Value::as_array).ok_or("FeatureCollection without features")?;
            for f in features {
                collect(f, out)?;
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect(geometry, out)?;
            }
        }
        Some("Polygon") => out.push(polygon(coordinates(value)?)?),
        Some("MultiPolygon") => {
            let polys = coordinates(value)?.as_array().ok_or("MultiPolygon coordinates must be an array")?;
            for p in polys {
                out.push(polygon(p)?);
            }
        }
        Some(_) => {}
        None => return Err(s!("GeoJSON object without a type")),
    }
    Ok(())
}

fn coordinates(value: &Value) -> std::result::Result<&Value, String> {
    value.get("coordinates").ok_or_else(|| s!("geometry without coordinates"))
}

fn polygon(value: &Value) -> std::result::Result<Polygon, String> {
    let rings = value.as_array().ok_or("polygon must be an array of rings")?;
    rings.iter().map(ring).collect()
}

fn ring(value: &Value) -> std::result::Result<Ring, String> {
    let points = value.as_array().ok_or("ring must be an array of positions")?;
    points
        .iter()
        .map(|p| {
            let lon = p.get(0).and_then(Value::as_f64);
            let lat = p.get(1).and_then(Value::as_f64);
            lon.zip(lat).ok_or_else(|| format!("bad position {p}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_feature_collection_with_both_polygon_kinds() {
        let gj = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 0]]]
                }},
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 20], [30, 20], [30, 30], [20, 20]]],
                        [[[40, 40], [50, 40], [50, 50], [40, 40]]]
                    ]
                }},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 1]}}
            ]
        });
        let polys = polygons_from_geojson(&gj).unwrap();
        assert_eq!(polys.len(), 3);
        assert_eq!(polys[0][0][1], (10.0, 0.0));
    }

    #[test]
    fn bad_position_is_an_error() {
        let gj = json!({"type": "Polygon", "coordinates": [[[0, 0], ["x", 1]]]});
        assert!(polygons_from_geojson(&gj).is_err());
    }
}
