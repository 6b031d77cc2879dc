//! `OpenRouteService` geocoding endpoint.
//!
//! Thin wrapper over `GET /geocode/search` (a Pelias deployment). Only
//! the best match is requested; the caller treats "no features" as an
//! unresolvable address.

use crate::{GeocodedPoint, OrsError};

/// Geocodes a free-form address, returning the best match.
///
/// # Errors
///
/// Returns [`OrsError`] if the HTTP request or response parsing fails.
pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    address: &str,
) -> Result<Option<GeocodedPoint>, OrsError> {
    let url = format!("{base_url}/geocode/search");
    log::debug!("Geocoding {address:?}");

    let resp = client
        .get(&url)
        .query(&[("api_key", api_key), ("text", address), ("size", "1")])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(OrsError::Status(status.as_u16()));
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a `GeoJSON` `FeatureCollection` geocoding response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedPoint>, OrsError> {
    let features = body
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| OrsError::Parse {
            message: "geocode response has no features array".to_string(),
        })?;

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let coordinates = first["geometry"]["coordinates"]
        .as_array()
        .ok_or_else(|| OrsError::Parse {
            message: "geocode feature has no coordinates".to_string(),
        })?;

    let (Some(longitude), Some(latitude)) = (
        coordinates.first().and_then(serde_json::Value::as_f64),
        coordinates.get(1).and_then(serde_json::Value::as_f64),
    ) else {
        return Err(OrsError::Parse {
            message: "geocode coordinates are not a lon/lat pair".to_string(),
        });
    };

    Ok(Some(GeocodedPoint {
        longitude,
        latitude,
        label: first["properties"]["label"].as_str().map(str::to_string),
    }))
}
