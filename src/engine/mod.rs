mod helpers;
mod location_api;
mod route_api;

pub use helpers::reorder;

use crate::api::DynAPI;

/// Route ordering and place resolution on top of the map services.
#[derive(Clone)]
pub struct Engine {
    api: DynAPI,
}

impl Engine {
    pub fn new(api: DynAPI) -> Self {
        Self { api }
    }
}
