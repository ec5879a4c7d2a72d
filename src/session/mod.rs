//! The trip planning session.
//!
//! One task owns the picked places, the last location fix and the
//! [`SessionStatus`] machine. Everything else talks to it through a
//! [`Session`] handle, which posts [`Event`]s into its mailbox and waits for
//! the resulting [`SessionView`]. Events are handled one at a time, in the
//! order they arrive.

mod handlers;

use async_channel::{Receiver, Sender};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::{
    api::DynLauncher,
    engine::Engine,
    entities::{Coordinates, LocationFix, Place, PlaceSelection, SessionStatus},
    error::{session_closed_error, Error},
};

const MAILBOX_CAPACITY: usize = 32;

/// Named inputs of the session. See the `on_*` handlers for each contract.
#[derive(Debug)]
pub enum Event {
    PlacePicked(Place),
    PlaceRemoved(usize),
    TriggerTapped,
    LocationUpdated(LocationFix),
    Snapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub trigger_label: &'static str,
    pub trigger_enabled: bool,
    pub loading: bool,
    pub location: Option<Coordinates>,
    pub places: Vec<Place>,
    pub optimized_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_url: Option<String>,
}

struct Envelope {
    event: Event,
    reply: oneshot::Sender<Result<SessionView, Error>>,
}

type Optimization = JoinHandle<Result<Vec<Place>, Error>>;

#[derive(Clone)]
pub struct Session {
    mailbox: Sender<Envelope>,
}

impl Session {
    /// Starts the session task on the current tokio runtime. It stops once
    /// every handle has been dropped.
    pub fn spawn(engine: Engine, launcher: DynLauncher) -> Self {
        let (mailbox, inbox) = async_channel::bounded(MAILBOX_CAPACITY);

        let task = SessionTask {
            id: Uuid::new_v4(),
            engine,
            launcher,
            status: SessionStatus::default(),
            places: PlaceSelection::new(),
            location: None,
            optimized_at: None,
            in_flight: None,
        };

        tracing::info!(session = %task.id, "session started");
        tokio::spawn(task.run(inbox));

        Self { mailbox }
    }

    pub async fn pick_place(&self, place: Place) -> Result<SessionView, Error> {
        self.send(Event::PlacePicked(place)).await
    }

    pub async fn remove_place(&self, index: usize) -> Result<SessionView, Error> {
        self.send(Event::PlaceRemoved(index)).await
    }

    pub async fn tap_trigger(&self) -> Result<SessionView, Error> {
        self.send(Event::TriggerTapped).await
    }

    pub async fn update_location(&self, fix: LocationFix) -> Result<SessionView, Error> {
        self.send(Event::LocationUpdated(fix)).await
    }

    pub async fn snapshot(&self) -> Result<SessionView, Error> {
        self.send(Event::Snapshot).await
    }

    async fn send(&self, event: Event) -> Result<SessionView, Error> {
        let (reply, response) = oneshot::channel();

        self.mailbox
            .send(Envelope { event, reply })
            .await
            .map_err(|_| session_closed_error())?;

        response.await.map_err(|_| session_closed_error())?
    }
}

struct SessionTask {
    id: Uuid,
    engine: Engine,
    launcher: DynLauncher,
    status: SessionStatus,
    places: PlaceSelection,
    location: Option<Coordinates>,
    optimized_at: Option<DateTime<Utc>>,
    in_flight: Option<Optimization>,
}

async fn join_in_flight(
    in_flight: &mut Option<Optimization>,
) -> Result<Result<Vec<Place>, Error>, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

impl SessionTask {
    async fn run(mut self, inbox: Receiver<Envelope>) {
        loop {
            tokio::select! {
                envelope = inbox.recv() => match envelope {
                    Ok(Envelope { event, reply }) => {
                        let result = self.dispatch(event);
                        if reply.send(result).is_err() {
                            tracing::debug!("caller went away before the reply");
                        }
                    }
                    Err(_) => break,
                },
                joined = join_in_flight(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.in_flight = None;
                    self.on_optimization_finished(joined);
                }
            }
        }

        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        tracing::info!(session = %self.id, "session closed");
    }

    fn dispatch(&mut self, event: Event) -> Result<SessionView, Error> {
        match event {
            Event::PlacePicked(place) => self.on_place_picked(place),
            Event::PlaceRemoved(index) => self.on_place_removed(index),
            Event::TriggerTapped => self.on_trigger_tapped(),
            Event::LocationUpdated(fix) => self.on_location_updated(fix),
            Event::Snapshot => Ok(self.view(None)),
        }
    }

    fn view(&self, launch_url: Option<String>) -> SessionView {
        SessionView {
            id: self.id,
            status: self.status,
            trigger_label: self.status.trigger_label(),
            trigger_enabled: self.status.is_idle() && !self.places.is_empty(),
            loading: self.status.is_loading(),
            location: self.location,
            places: self.places.snapshot(),
            optimized_at: self.optimized_at,
            launch_url,
        }
    }
}
