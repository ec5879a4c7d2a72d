use super::Engine;

use crate::{
    entities::{Place, PlaceSource},
    error::{invalid_input_error, Error},
};

impl Engine {
    /// Turns a picker result into a full place, looking it up by id when needed.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_place(&self, source: PlaceSource) -> Result<Place, Error> {
        let place = match source {
            PlaceSource::Place(place) => place,
            PlaceSource::GooglePlaces { place_id } => self.api.find_place(place_id).await?,
        };

        if place.place_id.trim().is_empty() {
            return Err(invalid_input_error());
        }

        Ok(place)
    }
}

#[test]
fn resolves_by_id_through_places_api() {
    use std::sync::Arc;
    use tokio_test::block_on;

    use crate::engine::stub::StubMaps;
    use crate::entities::Coordinates;

    let ferry = Place::new("ChIJ1", "Ferry Building", Coordinates::new(37.7955, -122.3937));
    let engine = Engine::new(Arc::new(StubMaps {
        places: vec![ferry.clone()],
        ..Default::default()
    }));

    let place = block_on(engine.resolve_place(PlaceSource::GooglePlaces {
        place_id: "ChIJ1".into(),
    }))
    .unwrap();
    assert_eq!(place, ferry);

    assert!(block_on(engine.resolve_place(PlaceSource::GooglePlaces {
        place_id: "unknown".into(),
    }))
    .is_err());

    let blank = Place::new(" ", "Nowhere", Coordinates::new(0.0, 0.0));
    assert!(block_on(engine.resolve_place(PlaceSource::Place(blank))).is_err());
}
