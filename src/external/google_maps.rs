use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::{DirectionsAPI, PlacesAPI},
    config::Config,
    entities::{Coordinates, Place},
    error::{malformed_response_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PlaceDetails {
    place_id: String,
    name: String,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeocodedWaypoint {
    place_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    error_message: Option<String>,
    result: Option<T>,
    geocoded_waypoints: Option<T>,
}

/// Client for the Google Maps web services, keyed by the configured API key.
#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Response<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.api_base, path);

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.api_key)])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(upstream_error(format!("http status {}", status.as_u16())));
        }

        let body = res.text().await?;
        let data: Response<T> = serde_json::from_str(&body)?;

        if data.status != "OK" {
            let detail = data.error_message.as_deref().unwrap_or_default();
            return Err(upstream_error(format!("{} {}", data.status, detail).trim_end()));
        }

        Ok(data)
    }
}

/// `optimize:true|place_id:<id>|...`
pub fn waypoints_param(place_ids: &[String]) -> String {
    std::iter::once("optimize:true".to_string())
        .chain(place_ids.iter().map(|id| format!("place_id:{}", id)))
        .collect::<Vec<_>>()
        .join("|")
}

#[async_trait]
impl DirectionsAPI for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn optimized_waypoint_order(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        place_ids: Vec<String>,
    ) -> Result<Vec<String>, Error> {
        let data: Response<Vec<GeocodedWaypoint>> = self
            .get(
                "/maps/api/directions/json",
                &[
                    ("origin", origin.into()),
                    ("destination", destination.into()),
                    ("waypoints", waypoints_param(&place_ids)),
                ],
            )
            .await?;

        let waypoints = data
            .geocoded_waypoints
            .ok_or_else(|| malformed_response_error("missing geocoded_waypoints"))?;

        tracing::debug!(count = waypoints.len(), "received geocoded waypoints");

        Ok(waypoints.into_iter().map(|w| w.place_id).collect())
    }
}

#[async_trait]
impl PlacesAPI for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_place(&self, place_id: String) -> Result<Place, Error> {
        let data: Response<PlaceDetails> = self
            .get("/maps/api/place/details/json", &[("place_id", place_id)])
            .await?;

        let details = data
            .result
            .ok_or_else(|| malformed_response_error("missing result"))?;

        Ok(Place::new(
            details.place_id,
            details.name,
            details.geometry.location,
        ))
    }
}
