use super::{helpers::reorder, Engine};

use crate::{
    entities::{Coordinates, Place},
    error::{missing_location_error, Error},
};

impl Engine {
    /// Reorders `places` into the directions service's optimal visiting order
    /// for a round trip from `origin`.
    ///
    /// Makes a single attempt. On error the caller still owns its original list.
    #[tracing::instrument(skip(self, places), fields(places = places.len()))]
    pub async fn optimize(
        &self,
        origin: Option<Coordinates>,
        places: Vec<Place>,
    ) -> Result<Vec<Place>, Error> {
        let origin = origin.ok_or_else(|| {
            tracing::debug!("optimize requested before a location fix");
            missing_location_error()
        })?;

        if places.is_empty() {
            return Ok(places);
        }

        let place_ids = places.iter().map(|p| p.place_id.clone()).collect();

        tracing::info!(%origin, "optimizing route");

        let optimized_ids = self
            .api
            .optimized_waypoint_order(origin, origin, place_ids)
            .await?;

        let reordered = reorder(places, &optimized_ids);

        tracing::info!(kept = reordered.len(), "route optimized");

        Ok(reordered)
    }
}
