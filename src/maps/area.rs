// src/maps/area.rs
//! Named map extents.
//!
//! Each area has a central longitude `c`. A longitude is projected as `lon − c`
//! wrapped to `[−180, 180)`, and the extent is given in that projected space.
//! Order matters: a point set is drawn in the first area that holds all of it.

use crate::core::sanitize::slugify;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapArea {
    pub name: &'static str,
    pub central_lon: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

const fn area(name: &'static str, central_lon: f64, extent: (f64, f64, f64, f64)) -> MapArea {
    MapArea { name, central_lon, min_lon: extent.0, max_lon: extent.1, min_lat: extent.2, max_lat: extent.3 }
}

pub static AREAS: [MapArea; 6] = [
    area("Australia", 0.0, (90.0, 180.0, -50.0, 17.5)),
    area("Europe", 0.0, (-30.0, 42.0, 10.0, 64.0)),
    area("North America", 0.0, (-135.0, -10.0, -3.75, 90.0)),
    area("Atlantic", 0.0, (-120.0, 40.0, -60.0, 60.0)),
    area("Indian", 0.0, (10.0, 130.0, -50.0, 40.0)),
    area("Pacific", 180.0, (-70.0, 118.0, -70.0, 71.0)),
];

pub static WORLD: MapArea = area("World", 180.0, (-180.0, 180.0, -90.0, 90.0));

/// Wrap a longitude to `[−180, 180)`.
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl MapArea {
    pub fn project_lon(&self, lon: f64) -> f64 {
        wrap_lon(lon - self.central_lon)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let x = self.project_lon(lon);
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&x)
    }

    pub fn lon_span(&self) -> f64 { self.max_lon - self.min_lon }
    pub fn lat_span(&self) -> f64 { self.max_lat - self.min_lat }

    /// File stem for this area's map, e.g. `north-america`.
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// First area containing every `(lon, lat)` point; [`WORLD`] otherwise.
pub fn area_for(points: &[(f64, f64)]) -> &'static MapArea {
    AREAS
        .iter()
        .find(|a| points.iter().all(|&(lon, lat)| a.contains(lon, lat)))
        .unwrap_or(&WORLD)
}
