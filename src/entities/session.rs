use serde::{Deserialize, Serialize};

use crate::error::{busy_error, Error};

pub const OPTIMIZE_LABEL: &str = "OPTIMIZE ROUTE";
pub const START_LABEL: &str = "START ROUTE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    /// `optimized` is set while the list still holds the service's order.
    Idle { optimized: bool },
    AwaitingLocation,
    Optimizing,
}

impl Default for Status {
    fn default() -> Self {
        Status::Idle { optimized: false }
    }
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle { optimized: _ } => "idle".into(),
            Self::AwaitingLocation => "awaiting_location".into(),
            Self::Optimizing => "optimizing".into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }

    pub fn is_optimized(&self) -> bool {
        matches!(self, Self::Idle { optimized: true })
    }

    /// Spinner shown in the title bar.
    pub fn is_loading(&self) -> bool {
        !self.is_idle()
    }

    pub fn trigger_label(&self) -> &'static str {
        match self.is_optimized() {
            true => START_LABEL,
            false => OPTIMIZE_LABEL,
        }
    }

    #[tracing::instrument]
    pub fn await_location(&mut self) -> Result<(), Error> {
        match self {
            Self::Idle { optimized: false } => {
                *self = Self::AwaitingLocation;
                Ok(())
            }
            _ => Err(busy_error()),
        }
    }

    #[tracing::instrument]
    pub fn start_optimizing(&mut self) -> Result<(), Error> {
        match self {
            Self::AwaitingLocation => {
                *self = Self::Optimizing;
                Ok(())
            }
            _ => Err(busy_error()),
        }
    }

    #[tracing::instrument]
    pub fn finish(&mut self, optimized: bool) -> Result<(), Error> {
        match self {
            Self::Optimizing => {
                *self = Self::Idle { optimized };
                Ok(())
            }
            _ => Err(busy_error()),
        }
    }

    /// Any edit to the list invalidates a previous optimization.
    pub fn edit(&mut self) -> Result<(), Error> {
        match self {
            Self::Idle { optimized: _ } => {
                *self = Self::Idle { optimized: false };
                Ok(())
            }
            _ => Err(busy_error()),
        }
    }
}

#[test]
fn optimize_cycle() {
    let mut status = Status::default();
    assert_eq!(status.trigger_label(), OPTIMIZE_LABEL);

    status.await_location().unwrap();
    assert!(status.is_loading());
    assert!(status.edit().is_err());

    status.start_optimizing().unwrap();
    assert!(status.await_location().is_err());

    status.finish(true).unwrap();
    assert_eq!(status, Status::Idle { optimized: true });
    assert_eq!(status.trigger_label(), START_LABEL);

    status.edit().unwrap();
    assert_eq!(status.trigger_label(), OPTIMIZE_LABEL);
}

#[test]
fn cannot_skip_location_step() {
    let mut status = Status::default();

    assert!(status.start_optimizing().is_err());
    assert!(status.finish(true).is_err());
    assert_eq!(status.name(), "idle");
}
