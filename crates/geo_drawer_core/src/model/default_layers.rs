//! Layers written into every new repository.
//!
//! Each default layer holds one placeholder feature so that it carries an id
//! column and a point geometry column from the start.

use geo_types::Point;
use std::collections::BTreeSet;

pub const POINT_LAYER: &str = "point_layer";
pub const LINE_LAYER: &str = "line_layer";

pub const PLACEHOLDER_ID: i64 = 1;
pub const GEOMETRY_COLUMN: &str = "geom";
pub const ID_COLUMN: &str = "id";

/// Names of the default layers, iterated in ascending order.
pub fn default_layer_set() -> BTreeSet<&'static str> {
    BTreeSet::from([POINT_LAYER, LINE_LAYER])
}

/// `true` when `name` equals a default layer name ignoring ASCII case.
pub fn is_default_layer_name(name: &str) -> bool {
    default_layer_set()
        .iter()
        .any(|layer| layer.eq_ignore_ascii_case(name))
}

/// Geometry of the placeholder feature.
pub fn placeholder_point() -> Point<f64> {
    Point::new(0.0, 0.0)
}
