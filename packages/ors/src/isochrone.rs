//! `OpenRouteService` isochrone endpoint.
//!
//! `POST /v2/isochrones/{profile}` with a single location and a single
//! time range. The response is a `GeoJSON` `FeatureCollection`; the first
//! feature's outer ring is the catchment boundary.

use geo::{LineString, Polygon};

use crate::OrsError;

/// Fetches the isochrone polygon for one location and time budget.
///
/// `minutes` is converted to seconds for the ORS `range` parameter.
///
/// # Errors
///
/// Returns [`OrsError`] if the HTTP request or response parsing fails.
pub async fn fetch(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    longitude: f64,
    latitude: f64,
    minutes: u32,
    profile: &str,
) -> Result<Option<Polygon<f64>>, OrsError> {
    let url = format!("{base_url}/v2/isochrones/{profile}");
    log::debug!("Requesting {minutes} min {profile} isochrone at ({longitude:.6}, {latitude:.6})");

    let body = serde_json::json!({
        "locations": [[longitude, latitude]],
        "range": [minutes * 60],
        "range_type": "time",
    });

    let resp = client
        .post(&url)
        .header("Authorization", api_key)
        .json(&body)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(OrsError::Status(status.as_u16()));
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses the first feature's outer ring into a [`Polygon`].
fn parse_response(body: &serde_json::Value) -> Result<Option<Polygon<f64>>, OrsError> {
    let features = body
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| OrsError::Parse {
            message: "isochrone response has no features array".to_string(),
        })?;

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let ring = first["geometry"]["coordinates"][0]
        .as_array()
        .ok_or_else(|| OrsError::Parse {
            message: "isochrone feature has no outer ring".to_string(),
        })?;

    let mut coords = Vec::with_capacity(ring.len());
    for pair in ring {
        let (Some(x), Some(y)) = (
            pair.get(0).and_then(serde_json::Value::as_f64),
            pair.get(1).and_then(serde_json::Value::as_f64),
        ) else {
            return Err(OrsError::Parse {
                message: "isochrone ring holds a malformed coordinate pair".to_string(),
            });
        };
        coords.push((x, y));
    }

    // A closed ring needs at least four coordinate pairs.
    if coords.len() < 4 {
        return Err(OrsError::Parse {
            message: format!("isochrone ring has only {} coordinates", coords.len()),
        });
    }

    Ok(Some(Polygon::new(LineString::from(coords), vec![])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_outer_ring() {
        let body = serde_json::json!({
            "features": [{
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [2.30, 48.83], [2.40, 48.83], [2.40, 48.89],
                        [2.30, 48.89], [2.30, 48.83]
                    ]]
                }
            }]
        });
        let polygon = parse_response(&body).unwrap().unwrap();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!((polygon.exterior().0[0].x - 2.30).abs() < 1e-9);
    }

    #[test]
    fn empty_features_is_not_found() {
        let body = serde_json::json!({ "features": [] });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn degenerate_ring_is_a_parse_error() {
        let body = serde_json::json!({
            "features": [{
                "geometry": { "coordinates": [[[2.0, 48.0], [2.1, 48.0]]] }
            }]
        });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn missing_ring_is_a_parse_error() {
        let body = serde_json::json!({
            "features": [{ "geometry": { "coordinates": [] } }]
        });
        assert!(parse_response(&body).is_err());
    }
}
