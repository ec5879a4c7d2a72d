use chrono::Utc;
use tokio::task::JoinError;

use super::{SessionTask, SessionView};

use crate::{
    entities::{LocationFix, Place, SessionStatus},
    error::{busy_error, invalid_input_error, missing_location_error, unexpected_error, Error},
    external::map_launcher::directions_url,
};

impl SessionTask {
    /// Appends a place. Only allowed while idle; clears a previous optimization.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub(super) fn on_place_picked(&mut self, place: Place) -> Result<SessionView, Error> {
        self.status.edit()?;

        self.places.append(place);
        self.optimized_at = None;

        Ok(self.view(None))
    }

    /// Removes the place at `index`. Only allowed while idle; clears a previous
    /// optimization when something was removed.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub(super) fn on_place_removed(&mut self, index: usize) -> Result<SessionView, Error> {
        if !self.status.is_idle() {
            return Err(busy_error());
        }

        let removed = self.places.remove_at(index)?;
        self.status.edit()?;
        self.optimized_at = None;

        tracing::debug!(place_id = %removed.place_id, "place removed");

        Ok(self.view(None))
    }

    /// First tap asks for a location fix, which starts the optimization.
    /// Once optimized, a tap opens the maps app instead.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub(super) fn on_trigger_tapped(&mut self) -> Result<SessionView, Error> {
        if !self.status.is_idle() {
            return Err(busy_error());
        }

        if self.places.is_empty() {
            return Err(invalid_input_error());
        }

        if self.status.is_optimized() {
            let url = self.launch_maps()?;
            return Ok(self.view(Some(url)));
        }

        self.status.await_location()?;
        tracing::info!("waiting for location fix");

        Ok(self.view(None))
    }

    /// Fixes are ignored unless the session is waiting for one and the fix is
    /// accurate enough. The accepted fix becomes the trip origin.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub(super) fn on_location_updated(&mut self, fix: LocationFix) -> Result<SessionView, Error> {
        if self.status != SessionStatus::AwaitingLocation {
            tracing::debug!("not waiting for a location, fix ignored");
            return Ok(self.view(None));
        }

        if !fix.is_accurate() {
            tracing::debug!(accuracy = fix.accuracy, "fix too coarse, still waiting");
            return Ok(self.view(None));
        }

        self.location = Some(fix.coordinates);
        self.status.start_optimizing()?;

        let engine = self.engine.clone();
        let origin = self.location;
        let places = self.places.snapshot();

        self.in_flight = Some(tokio::spawn(async move {
            engine.optimize(origin, places).await
        }));

        Ok(self.view(None))
    }

    /// Applies the result of the in-flight optimization. Failures leave the
    /// list untouched and return the trigger to its ready state.
    #[tracing::instrument(skip(self, joined), fields(session = %self.id))]
    pub(super) fn on_optimization_finished(
        &mut self,
        joined: Result<Result<Vec<Place>, Error>, JoinError>,
    ) {
        let result = joined.unwrap_or_else(|e| {
            tracing::error!(error = %e, "optimization task failed");
            Err(unexpected_error())
        });

        let optimized = match result {
            Ok(places) => {
                self.places.replace(places);
                self.optimized_at = Some(Utc::now());
                true
            }
            Err(err) => {
                tracing::error!(error = %err, kind = ?err.kind(), "route optimization failed");
                false
            }
        };

        if let Err(err) = self.status.finish(optimized) {
            tracing::warn!(error = %err, status = %self.status.name(), "unexpected optimization result");
        }
    }

    fn launch_maps(&self) -> Result<String, Error> {
        let origin = self.location.ok_or_else(missing_location_error)?;
        let url = directions_url(origin, self.places.iter());

        if let Err(err) = self.launcher.open(&url) {
            tracing::warn!(error = %err, "could not open maps");
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    use crate::{
        api::{DirectionsAPI, MapLauncher, PlacesAPI},
        engine::{stub::StubMaps, Engine},
        entities::{Coordinates, LocationFix, Place, SessionStatus, START_LABEL},
        error::{malformed_response_error, upstream_error, Error, ErrorKind},
        session::{Session, SessionView},
    };

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl MapLauncher for RecordingLauncher {
        fn open(&self, url: &str) -> Result<(), Error> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    /// Holds every directions request until a permit is released.
    struct GatedMaps {
        gate: Semaphore,
        order: Vec<String>,
    }

    #[async_trait]
    impl DirectionsAPI for GatedMaps {
        async fn optimized_waypoint_order(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
            _place_ids: Vec<String>,
        ) -> Result<Vec<String>, Error> {
            let _permit = self.gate.acquire().await.unwrap();
            Ok(self.order.clone())
        }
    }

    #[async_trait]
    impl PlacesAPI for GatedMaps {
        async fn find_place(&self, _place_id: String) -> Result<Place, Error> {
            Err(upstream_error("unused"))
        }
    }

    fn place(id: &str, name: &str, at: f64) -> Place {
        Place::new(id, name, Coordinates::new(at, at))
    }

    fn fix(accuracy: f64) -> LocationFix {
        LocationFix {
            coordinates: Coordinates::new(0.0, 0.0),
            accuracy,
        }
    }

    fn names(view: &SessionView) -> Vec<&str> {
        view.places.iter().map(|p| p.name.as_str()).collect()
    }

    async fn settle(session: &Session) -> SessionView {
        for _ in 0..200 {
            let view = session.snapshot().await.unwrap();
            if view.status.is_idle() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never returned to idle");
    }

    async fn with_three_places(session: &Session) {
        session.pick_place(place("p1", "A", 1.0)).await.unwrap();
        session.pick_place(place("p2", "B", 2.0)).await.unwrap();
        session.pick_place(place("p3", "C", 3.0)).await.unwrap();
    }

    #[tokio::test]
    async fn optimize_then_start_route() {
        let launcher = Arc::new(RecordingLauncher::default());
        let engine = Engine::new(StubMaps::ordering(&["p3", "p1", "p2"]));
        let session = Session::spawn(engine, launcher.clone());

        with_three_places(&session).await;

        let view = session.tap_trigger().await.unwrap();
        assert_eq!(view.status, SessionStatus::AwaitingLocation);
        assert!(view.loading);

        // too coarse to use
        let view = session.update_location(fix(65.0)).await.unwrap();
        assert_eq!(view.status, SessionStatus::AwaitingLocation);
        assert!(view.location.is_none());

        session.update_location(fix(5.0)).await.unwrap();

        let view = settle(&session).await;
        assert_eq!(view.status, SessionStatus::Idle { optimized: true });
        assert_eq!(view.trigger_label, START_LABEL);
        assert_eq!(names(&view), vec!["C", "A", "B"]);
        assert!(view.optimized_at.is_some());

        let view = session.tap_trigger().await.unwrap();
        let expected = "comgooglemapsurl://www.google.com/maps/dir/0,0/3,3/1,1/2,2/0,0";
        assert_eq!(view.launch_url.as_deref(), Some(expected));
        assert_eq!(*launcher.opened.lock().unwrap(), vec![expected.to_string()]);
    }

    #[tokio::test]
    async fn failed_optimization_keeps_list() {
        let engine = Engine::new(StubMaps::failing(upstream_error("ZERO_RESULTS")));
        let session = Session::spawn(engine, Arc::new(RecordingLauncher::default()));

        with_three_places(&session).await;
        session.tap_trigger().await.unwrap();
        session.update_location(fix(3.0)).await.unwrap();

        let view = settle(&session).await;
        assert_eq!(view.status, SessionStatus::Idle { optimized: false });
        assert_eq!(names(&view), vec!["A", "B", "C"]);
        assert!(view.trigger_enabled);
    }

    #[tokio::test]
    async fn malformed_response_keeps_list() {
        let engine = Engine::new(StubMaps::failing(malformed_response_error(
            "missing geocoded_waypoints",
        )));
        let session = Session::spawn(engine, Arc::new(RecordingLauncher::default()));

        with_three_places(&session).await;
        session.tap_trigger().await.unwrap();
        session.update_location(fix(3.0)).await.unwrap();

        let view = settle(&session).await;
        assert_eq!(view.status, SessionStatus::Idle { optimized: false });
        assert_eq!(names(&view), vec!["A", "B", "C"]);
        assert!(view.optimized_at.is_none());
        assert_eq!(view.trigger_label, crate::entities::OPTIMIZE_LABEL);
    }

    #[tokio::test]
    async fn edits_rejected_while_optimizing() {
        let maps = Arc::new(GatedMaps {
            gate: Semaphore::new(0),
            order: vec!["p2".into(), "p1".into()],
        });
        let session = Session::spawn(
            Engine::new(maps.clone()),
            Arc::new(RecordingLauncher::default()),
        );

        with_three_places(&session).await;
        session.tap_trigger().await.unwrap();

        let err = session.remove_place(0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);

        let view = session.update_location(fix(1.0)).await.unwrap();
        assert_eq!(view.status, SessionStatus::Optimizing);

        let err = session.pick_place(place("p4", "D", 4.0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);
        let err = session.tap_trigger().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);

        maps.gate.add_permits(1);

        // p3 was not in the response and is dropped
        let view = settle(&session).await;
        assert_eq!(names(&view), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn trigger_needs_places() {
        let session = Session::spawn(
            Engine::new(StubMaps::ordering(&[])),
            Arc::new(RecordingLauncher::default()),
        );

        let view = session.snapshot().await.unwrap();
        assert!(!view.trigger_enabled);

        let err = session.tap_trigger().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn editing_after_optimize_resets_trigger() {
        let session = Session::spawn(
            Engine::new(StubMaps::ordering(&["p2", "p1", "p3"])),
            Arc::new(RecordingLauncher::default()),
        );

        with_three_places(&session).await;
        session.tap_trigger().await.unwrap();
        session.update_location(fix(2.0)).await.unwrap();
        settle(&session).await;

        assert!(session.remove_place(7).await.is_err());
        let view = session.snapshot().await.unwrap();
        assert!(view.status.is_optimized());

        let view = session.remove_place(0).await.unwrap();
        assert_eq!(view.status, SessionStatus::Idle { optimized: false });
        assert_eq!(names(&view), vec!["A", "C"]);
        assert!(view.optimized_at.is_none());
        assert!(view.launch_url.is_none());
    }
}
