mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{delete, get, post},
    Router,
};

use crate::engine::Engine;
use crate::error::{config_error, unexpected_error, Error};
use crate::server::handlers::{location, places, session};
use crate::session::Session;

pub fn router(session: Session, engine: Engine) -> Router {
    Router::new()
        .route("/session", get(session::find))
        .route("/places", post(places::create))
        .route("/places/:index", delete(places::remove))
        .route("/location", post(location::update))
        .route("/trigger", post(session::trigger))
        .layer(Extension(session))
        .layer(Extension(engine))
}

pub async fn serve(addr: SocketAddr, session: Session, engine: Engine) -> Result<(), Error> {
    let app = router(session, engine);

    let server =
        axum::Server::try_bind(&addr).map_err(|e| config_error(format!("{}: {}", addr, e)))?;

    tracing::info!("listening on {}", addr);

    server.serve(app.into_make_service()).await.map_err(|e| {
        tracing::error!(error = %e, "server stopped");
        unexpected_error()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::engine::stub::StubMaps;
    use crate::entities::{Coordinates, Place};
    use crate::external::map_launcher::LogLauncher;

    fn spawn_app() -> (String, Arc<StubMaps>) {
        let maps = Arc::new(StubMaps {
            places: vec![Place::new(
                "ChIJ2",
                "Coit Tower",
                Coordinates::new(37.8024, -122.4058),
            )],
            order: Some(Ok(vec!["ChIJ2".into(), "ChIJ1".into()])),
            ..Default::default()
        });
        let engine = Engine::new(maps.clone());
        let session = Session::spawn(engine.clone(), Arc::new(LogLauncher));

        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(router(session, engine).into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);

        (format!("http://{}", addr), maps)
    }

    #[tokio::test]
    async fn pick_locate_and_launch() {
        let (base, _) = spawn_app();
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{}/places", base))
            .json(&json!({ "source": {
                "type": "place",
                "place_id": "ChIJ1",
                "name": "Ferry Building",
                "coordinates": { "lat": 37.7955, "lng": -122.3937 }
            }}))
            .send()
            .await
            .unwrap();
        assert!(res.status().is_success());

        let view: Value = client
            .post(format!("{}/places", base))
            .json(&json!({ "source": { "type": "google_places", "place_id": "ChIJ2" } }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["places"][1]["name"], "Coit Tower");
        assert_eq!(view["trigger_label"], "OPTIMIZE ROUTE");

        let view: Value = client
            .post(format!("{}/trigger", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["status"]["name"], "awaiting_location");

        client
            .post(format!("{}/location", base))
            .json(&json!({ "latitude": 37.79, "longitude": -122.4, "accuracy": 4.0 }))
            .send()
            .await
            .unwrap();

        let mut view = Value::Null;
        for _ in 0..200 {
            view = client
                .get(format!("{}/session", base))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if view["status"]["name"] == "idle" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(view["trigger_label"], "START ROUTE");
        assert_eq!(view["places"][0]["place_id"], "ChIJ2");

        let view: Value = client
            .post(format!("{}/trigger", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            view["launch_url"],
            "comgooglemapsurl://www.google.com/maps/dir/37.79,-122.4/37.8024,-122.4058/37.7955,-122.3937/37.79,-122.4"
        );
    }

    #[tokio::test]
    async fn bad_index_is_client_error() {
        let (base, _) = spawn_app();

        let res = reqwest::Client::new()
            .delete(format!("{}/places/3", base))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], 101);
    }

    #[tokio::test]
    async fn busy_session_skips_place_lookup() {
        let (base, maps) = spawn_app();
        let client = reqwest::Client::new();

        client
            .post(format!("{}/places", base))
            .json(&json!({ "source": { "type": "google_places", "place_id": "ChIJ2" } }))
            .send()
            .await
            .unwrap();
        client
            .post(format!("{}/trigger", base))
            .send()
            .await
            .unwrap();
        assert_eq!(maps.lookups.lock().unwrap().len(), 1);

        let res = client
            .post(format!("{}/places", base))
            .json(&json!({ "source": { "type": "google_places", "place_id": "ChIJ2" } }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], 100);
        assert_eq!(maps.lookups.lock().unwrap().len(), 1);
    }
}
