use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub coordinates: Coordinates,
}

impl Place {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            coordinates,
        }
    }
}

/// How a picked place reaches the session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaceSource {
    Place(Place),
    GooglePlaces { place_id: String },
}
