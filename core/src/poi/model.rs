use crate::geo::geodesy::{destination, distance_m};
use crate::geo::GeoPosition;
use crate::math::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named geographic point, as delivered by a POI data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Zero means "unassigned"; [`PoiGroup::add_point`] fills it in.
    #[serde(default)]
    pub identifier: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl PointOfInterest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> Self {
        Self {
            identifier: 0,
            name: name.into(),
            description: description.into(),
            latitude,
            longitude,
            altitude,
            metadata: BTreeMap::new(),
        }
    }

    pub fn at(position: GeoPosition) -> Self {
        Self::new("", "", position.latitude, position.longitude, position.altitude)
    }

    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude, self.altitude)
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Inserts or replaces a metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Local tangent-plane vector from `origin` to this point: `x` metres
    /// east, `y` metres up, `z` metres south.
    ///
    /// Each horizontal component is measured along its own great circle, so
    /// the result is only meaningful for nearby points.
    pub fn world_vector(&self, origin: &GeoPosition) -> Vector3 {
        let mut z = distance_m(origin.latitude, origin.longitude, self.latitude, origin.longitude);
        let mut x = distance_m(origin.latitude, origin.longitude, origin.latitude, self.longitude);
        if origin.latitude < self.latitude {
            z = -z;
        }
        if origin.longitude > self.longitude {
            x = -x;
        }
        Vector3::new(x, self.altitude - origin.altitude, z)
    }
}

/// Inverse of [`PointOfInterest::world_vector`]: walks the north/south leg,
/// then the east/west leg, from `origin`.
pub fn vector_to_location(vector: Vector3, origin: &GeoPosition) -> GeoPosition {
    let north_south = if vector.z > 0.0 { 180.0 } else { 0.0 };
    let east_west = if vector.x < 0.0 { 270.0 } else { 90.0 };

    let midway = destination(origin, north_south, vector.z.abs());
    let end = destination(&midway, east_west, vector.x.abs());
    GeoPosition::new(end.latitude, end.longitude, origin.altitude + vector.y)
}

/// An ordered, named collection of points. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoiGroupRecord")]
pub struct PoiGroup {
    pub name: String,
    pub description: String,
    points: Vec<Arc<PointOfInterest>>,
}

#[derive(Deserialize)]
struct PoiGroupRecord {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    points: Vec<PointOfInterest>,
}

impl From<PoiGroupRecord> for PoiGroup {
    fn from(record: PoiGroupRecord) -> Self {
        let mut group = PoiGroup::new(record.name, record.description);
        for point in record.points {
            group.add_point(point);
        }
        group
    }
}

impl PoiGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            points: Vec::new(),
        }
    }

    /// Appends `point`; an unassigned identifier becomes its 1-based slot.
    pub fn add_point(&mut self, mut point: PointOfInterest) -> Arc<PointOfInterest> {
        if point.identifier == 0 {
            point.identifier = (self.points.len() + 1) as u32;
        }
        let point = Arc::new(point);
        self.points.push(Arc::clone(&point));
        point
    }

    pub fn points(&self) -> &[Arc<PointOfInterest>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn point_at_the_device_maps_to_altitude_difference_only() {
        let origin = GeoPosition::new(41.15, -8.61, 120.0);
        let poi = PointOfInterest::new("tower", "", 41.15, -8.61, 155.5);
        let v = poi.world_vector(&origin);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.z, 0.0);
        assert_abs_diff_eq!(v.y, 35.5, epsilon = 1e-12);
    }

    #[test]
    fn north_is_negative_z_and_east_is_positive_x() {
        let origin = GeoPosition::new(0.0, 0.0, 0.0);
        let north = PointOfInterest::new("n", "", 0.01, 0.0, 0.0).world_vector(&origin);
        assert!(north.z < 0.0);
        assert_abs_diff_eq!(north.z, -1111.95, epsilon = 0.01);

        let west = PointOfInterest::new("w", "", 0.0, -0.01, 0.0).world_vector(&origin);
        assert!(west.x < 0.0);
        assert_abs_diff_eq!(west.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn vector_to_location_inverts_world_vector() {
        let origin = GeoPosition::new(38.72, -9.14, 50.0);
        let poi = PointOfInterest::new("p", "", 38.73, -9.16, 80.0);
        let back = vector_to_location(poi.world_vector(&origin), &origin);
        // the legs are walked at different latitudes, so allow about a metre
        assert_abs_diff_eq!(back.latitude, poi.latitude, epsilon = 1e-5);
        assert_abs_diff_eq!(back.longitude, poi.longitude, epsilon = 1e-5);
        assert_abs_diff_eq!(back.altitude, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn group_assigns_missing_identifiers_by_position() {
        let mut group = PoiGroup::new("museums", "");
        let first = group.add_point(PointOfInterest::new("a", "", 0.0, 0.0, 0.0));
        let mut named = PointOfInterest::new("b", "", 0.0, 0.0, 0.0);
        named.identifier = 42;
        let second = group.add_point(named);
        let third = group.add_point(PointOfInterest::new("c", "", 0.0, 0.0, 0.0));

        assert_eq!(first.identifier, 1);
        assert_eq!(second.identifier, 42);
        assert_eq!(third.identifier, 3);
        let names: Vec<&str> = group.points().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn deserialized_group_goes_through_add_point() {
        let json = r#"{
            "name": "harbour",
            "points": [
                {"name": "pier", "latitude": 1.0, "longitude": 2.0},
                {"name": "light", "latitude": 1.1, "longitude": 2.1, "identifier": 9,
                 "metadata": {"url": "http://example.org"}}
            ]
        }"#;
        let group: PoiGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.points()[0].identifier, 1);
        assert_eq!(group.points()[1].identifier, 9);
        assert_eq!(group.points()[1].metadata("url"), Some("http://example.org"));
        assert_eq!(group.points()[0].metadata("url"), None);
    }

    #[test]
    fn metadata_keys_are_unique() {
        let mut poi = PointOfInterest::default();
        poi.add_metadata("k", "1");
        poi.add_metadata("k", "2");
        assert_eq!(poi.metadata.len(), 1);
        assert_eq!(poi.metadata("k"), Some("2"));
    }
}
