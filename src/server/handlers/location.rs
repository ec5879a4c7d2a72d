use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, LocationFix};
use crate::error::Error;
use crate::session::{Session, SessionView};

#[derive(Serialize, Deserialize)]
pub struct UpdateParams {
    latitude: f64,
    longitude: f64,
    accuracy: f64,
}

pub async fn update(
    Extension(session): Extension<Session>,
    Json(params): Json<UpdateParams>,
) -> Result<Json<SessionView>, Error> {
    let fix = LocationFix {
        coordinates: Coordinates::new(params.latitude, params.longitude),
        accuracy: params.accuracy,
    };

    let view = session.update_location(fix).await?;

    Ok(view.into())
}
