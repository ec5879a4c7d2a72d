use serde::Serialize;

use crate::entities::Place;
use crate::error::{invalid_input_error, Error};

/// Places picked during a session, in visiting order.
///
/// Duplicate place ids are accepted; see `engine::reorder` for how they
/// are matched against an optimized order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlaceSelection {
    places: Vec<Place>,
}

impl PlaceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, place: Place) {
        self.places.push(place);
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Place, Error> {
        if index >= self.places.len() {
            return Err(invalid_input_error());
        }

        Ok(self.places.remove(index))
    }

    pub fn snapshot(&self) -> Vec<Place> {
        self.places.clone()
    }

    pub fn replace(&mut self, places: Vec<Place>) {
        self.places = places;
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }
}

impl From<Vec<Place>> for PlaceSelection {
    fn from(places: Vec<Place>) -> Self {
        Self { places }
    }
}

#[test]
fn append_and_remove_keep_order() {
    use crate::entities::Coordinates;

    let mut selection = PlaceSelection::new();
    for id in ["p1", "p2", "p3"] {
        selection.append(Place::new(id, id.to_uppercase(), Coordinates::new(0.0, 0.0)));
    }

    let removed = selection.remove_at(1).unwrap();
    assert_eq!(removed.place_id, "p2");

    let ids: Vec<_> = selection.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p3"]);

    assert!(selection.remove_at(2).is_err());
    assert_eq!(selection.len(), 2);
}
