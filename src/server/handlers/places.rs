use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::entities::PlaceSource;
use crate::error::{busy_error, Error};
use crate::session::{Session, SessionView};

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    source: PlaceSource,
}

pub async fn create(
    Extension(session): Extension<Session>,
    Extension(engine): Extension<Engine>,
    Json(params): Json<CreateParams>,
) -> Result<Json<SessionView>, Error> {
    // no Places lookup while the session is busy
    if !session.snapshot().await?.status.is_idle() {
        return Err(busy_error());
    }

    let place = engine.resolve_place(params.source).await?;
    let view = session.pick_place(place).await?;

    Ok(view.into())
}

pub async fn remove(
    Extension(session): Extension<Session>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>, Error> {
    let view = session.remove_place(index).await?;

    Ok(view.into())
}
