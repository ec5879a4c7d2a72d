mod location;
mod place;
mod selection;
mod session;

pub use location::{Coordinates, LocationFix, MAX_HORIZONTAL_ACCURACY};
pub use place::{Place, PlaceSource};
pub use selection::PlaceSelection;
pub use session::Status as SessionStatus;
pub use session::{OPTIMIZE_LABEL, START_LABEL};
