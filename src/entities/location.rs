use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixes less accurate than this (in metres) are not used as a trip origin.
pub const MAX_HORIZONTAL_ACCURACY: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(c: Coordinates) -> Self {
        c.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    /// Horizontal accuracy radius in metres.
    pub accuracy: f64,
}

impl LocationFix {
    pub fn is_accurate(&self) -> bool {
        self.accuracy >= 0.0 && self.accuracy <= MAX_HORIZONTAL_ACCURACY
    }
}

#[test]
fn coordinates_render_as_lat_lng_pair() {
    assert_eq!(Coordinates::new(0.0, 0.0).to_string(), "0,0");
    assert_eq!(String::from(Coordinates::new(48.8566, 2.3522)), "48.8566,2.3522");
    assert_eq!(Coordinates::new(-33.5, 151.25).to_string(), "-33.5,151.25");
}

#[test]
fn fix_accuracy_threshold() {
    let at = |accuracy| LocationFix {
        coordinates: Coordinates::new(1.0, 1.0),
        accuracy,
    };

    assert!(at(5.0).is_accurate());
    assert!(at(10.0).is_accurate());
    assert!(!at(10.5).is_accurate());
    assert!(!at(-1.0).is_accurate());
}
