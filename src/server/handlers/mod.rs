pub mod location;
pub mod places;
pub mod session;
