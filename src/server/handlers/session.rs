use axum::extract::{Extension, Json};

use crate::error::Error;
use crate::session::{Session, SessionView};

pub async fn find(Extension(session): Extension<Session>) -> Result<Json<SessionView>, Error> {
    let view = session.snapshot().await?;

    Ok(view.into())
}

pub async fn trigger(Extension(session): Extension<Session>) -> Result<Json<SessionView>, Error> {
    let view = session.tap_trigger().await?;

    Ok(view.into())
}
