use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Coordinates, Place};
use crate::error::Error;

#[async_trait]
pub trait DirectionsAPI {
    /// Asks the directions service to reorder `place_ids` for the shortest trip
    /// from `origin` to `destination`, returning ids in visiting order.
    async fn optimized_waypoint_order(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        place_ids: Vec<String>,
    ) -> Result<Vec<String>, Error>;
}

#[async_trait]
pub trait PlacesAPI {
    async fn find_place(&self, place_id: String) -> Result<Place, Error>;
}

pub trait MapLauncher {
    fn open(&self, url: &str) -> Result<(), Error>;
}

pub trait API: DirectionsAPI + PlacesAPI {}

impl<T: DirectionsAPI + PlacesAPI> API for T {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
pub type DynLauncher = Arc<dyn MapLauncher + Send + Sync>;
