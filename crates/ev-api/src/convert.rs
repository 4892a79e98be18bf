//! Wire -> domain conversion.
//!
//! Coordinates arrive as `[lat, lon]` pairs or separate `lat`/`lon` fields and
//! leave as [`LonLat`]. Timestamps go through the lenient parser in
//! `ev_core::time`.

use ev_core::time::parse_instant;
use ev_core::units::{kwh, mw, unitless};
use ev_core::{CityId, CoreResult, LonLat, StationInfo, StationMarker};

use crate::model::*;
use crate::wire;

pub fn city(item: wire::CityItem) -> City {
    City {
        id: CityId::new(item.city_id),
        label: item.label,
        center: LonLat::from_lat_lon(item.center),
    }
}

/// Numeric power rating; numeric strings count, anything else is `None`.
pub fn power_rating(raw: Option<&serde_json::Value>) -> Option<f64> {
    let v = match raw? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

pub fn marker(item: wire::MarkerItem) -> StationMarker {
    let info = item.popup_info;
    StationMarker {
        position: LonLat::new(item.lon, item.lat),
        info: StationInfo {
            power_rating_kw: power_rating(info.power_rating.as_ref()),
            id: info.id,
            name: info.name,
            description: info.description,
            status: info.status,
            connector_type: info.connector_type,
            last_updated: info.last_updated,
        },
    }
}

/// Flatten a datetime-keyed marker map into one snapshot, in key order.
pub fn markers(map: wire::MarkerMap) -> Vec<StationMarker> {
    map.into_values().flatten().map(marker).collect()
}

pub fn grid(payload: wire::GridPayload) -> CoreResult<Vec<GridSample>> {
    payload
        .grid_energy
        .into_iter()
        .map(|p| {
            Ok(GridSample {
                at: parse_instant(&p.time)?,
                generation: mw(p.generation_mw),
                load: mw(p.load_mw),
            })
        })
        .collect()
}

pub fn session_counts(payload: wire::SessionCountsPayload) -> CoreResult<Vec<SessionSample>> {
    payload
        .charging_sessions
        .data
        .into_iter()
        .map(|p| {
            Ok(SessionSample {
                at: parse_instant(&p.time)?,
                sessions: p.sessioncounts,
            })
        })
        .collect()
}

pub fn energy(payload: wire::EnergyPayload) -> CoreResult<Vec<EnergySample>> {
    payload
        .energy_delivered
        .data
        .into_iter()
        .map(|p| {
            Ok(EnergySample {
                at: parse_instant(&p.time)?,
                energy: kwh(p.energy_kwh),
            })
        })
        .collect()
}

pub fn utilisation(payload: wire::UtilisationPayload) -> CoreResult<Vec<StationUtilisation>> {
    payload
        .station_utilisation
        .stations
        .into_iter()
        .map(|s| {
            let samples = s
                .data
                .into_iter()
                .map(|p| {
                    Ok(UtilisationSample {
                        at: parse_instant(&p.timestamp)?,
                        ratio: unitless(p.utilisation),
                    })
                })
                .collect::<CoreResult<Vec<_>>>()?;
            Ok(StationUtilisation {
                station_id: s.station_id,
                samples,
            })
        })
        .collect()
}

pub fn region_counts(items: Vec<wire::CountryRegionItem>) -> Vec<RegionCount> {
    items
        .into_iter()
        .map(|i| RegionCount {
            name: i.name,
            stations: i.value,
        })
        .collect()
}

/// First place carrying a polygon geometry.
pub fn boundary(places: Vec<wire::NominatimPlace>) -> Option<CityBoundary> {
    places
        .into_iter()
        .filter_map(|p| p.geojson)
        .find(|g| {
            matches!(
                g.get("type").and_then(|t| t.as_str()),
                Some("Polygon" | "MultiPolygon")
            )
        })
        .map(|geometry| CityBoundary { geometry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::units::{as_kw, as_kwh};
    use serde_json::json;

    #[test]
    fn city_center_is_reordered() {
        let c = city(wire::CityItem {
            city_id: "galway".to_string(),
            label: "Galway".to_string(),
            center: [53.27, -9.05],
        });
        assert_eq!(c.center, LonLat::new(-9.05, 53.27));
    }

    #[test]
    fn lenient_power_ratings() {
        assert_eq!(power_rating(Some(&json!(75))), Some(75.0));
        assert_eq!(power_rating(Some(&json!(" 22.5 "))), Some(22.5));
        assert_eq!(power_rating(Some(&json!("fast"))), None);
        assert_eq!(power_rating(Some(&json!(null))), None);
        assert_eq!(power_rating(None), None);
    }

    #[test]
    fn marker_map_is_flattened() {
        let map: wire::MarkerMap = serde_json::from_value(json!({
            "2025-07-01T10:00:00Z": [
                {"lat": 53.35, "lon": -6.26, "popupInfo": {"id": "a", "name": "A", "power_rating": 50}},
                {"lat": 53.36, "lon": -6.27, "popupInfo": {"id": "b", "name": "B", "power_rating": null}}
            ]
        }))
        .unwrap();
        let out = markers(map);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, LonLat::new(-6.26, 53.35));
        assert_eq!(out[0].info.power_rating_kw, Some(50.0));
        assert_eq!(out[1].info.power_rating_kw, None);
    }

    #[test]
    fn grid_series_in_kilowatts() {
        let payload: wire::GridPayload = serde_json::from_value(json!({
            "grid_energy": [{"time": "2025-07-01 10:00:00", "generation_mw": 1.5, "load_mw": 2.0}]
        }))
        .unwrap();
        let out = grid(payload).unwrap();
        assert!((as_kw(out[0].generation) - 1500.0).abs() < 1e-9);
        assert!((as_kw(out[0].load) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn bad_timestamp_is_an_input_error() {
        let payload: wire::EnergyPayload = serde_json::from_value(json!({
            "energy_delivered": {"units": {"energy": "kWh"}, "data": [{"time": "soon", "energy_kwh": 3.0}]}
        }))
        .unwrap();
        assert!(energy(payload).is_err());

        let payload: wire::EnergyPayload = serde_json::from_value(json!({
            "energy_delivered": {"data": [{"time": "2025-07-01T00:00:00Z", "energy_kwh": 3.0}]}
        }))
        .unwrap();
        assert!((as_kwh(energy(payload).unwrap()[0].energy) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn boundary_skips_point_geometries() {
        let places: Vec<wire::NominatimPlace> = serde_json::from_value(json!([
            {"display_name": "node", "geojson": {"type": "Point", "coordinates": [-8.6, 52.6]}},
            {"display_name": "Limerick", "geojson": {"type": "Polygon", "coordinates": [[[-8.7, 52.6], [-8.5, 52.6], [-8.5, 52.7], [-8.7, 52.6]]]}}
        ]))
        .unwrap();
        let b = boundary(places).unwrap();
        assert_eq!(b.geometry["type"], "Polygon");
        assert!(boundary(vec![]).is_none());
    }
}
