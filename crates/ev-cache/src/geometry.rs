//! GeoJSON polygon helpers.

use ev_core::{BBox, LonLat};
use serde_json::Value;

use crate::{CacheError, CacheResult};

/// Outer and inner rings of a `Polygon` or `MultiPolygon`, flattened.
pub fn geometry_rings(geometry: &Value) -> CacheResult<Vec<Vec<LonLat>>> {
    let kind = geometry.get("type").and_then(Value::as_str);
    let coords = geometry.get("coordinates").ok_or_else(|| invalid("no coordinates"))?;
    match kind {
        Some("Polygon") => polygon_rings(coords),
        Some("MultiPolygon") => {
            let polys = coords.as_array().ok_or_else(|| invalid("multipolygon is not an array"))?;
            let mut rings = Vec::new();
            for poly in polys {
                rings.extend(polygon_rings(poly)?);
            }
            Ok(rings)
        }
        other => Err(invalid(&format!("unsupported geometry type {other:?}"))),
    }
}

/// Bounding box over every vertex of every ring.
pub fn geometry_bbox(geometry: &Value) -> CacheResult<BBox> {
    let rings = geometry_rings(geometry)?;
    BBox::from_points(rings.into_iter().flatten())
        .ok_or_else(|| invalid("geometry has no vertices"))
}

fn polygon_rings(coords: &Value) -> CacheResult<Vec<Vec<LonLat>>> {
    coords
        .as_array()
        .ok_or_else(|| invalid("polygon is not an array"))?
        .iter()
        .map(|ring| -> CacheResult<Vec<LonLat>> {
            ring.as_array()
                .ok_or_else(|| invalid("ring is not an array"))?
                .iter()
                .map(position)
                .collect()
        })
        .collect()
}

/// GeoJSON positions are `[lon, lat, ...]`.
fn position(v: &Value) -> CacheResult<LonLat> {
    match v.as_array().map(Vec::as_slice) {
        Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(LonLat::new(lon, lat)),
            _ => Err(invalid("non-numeric position")),
        },
        _ => Err(invalid("position needs two numbers")),
    }
}

fn invalid(reason: &str) -> CacheError {
    CacheError::InvalidGeometry {
        reason: reason.to_string(),
    }
}
