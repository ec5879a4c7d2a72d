use std::process::Stdio;

use tokio::process::Command;
use tokio::runtime::Handle;

use crate::{
    api::MapLauncher,
    entities::{Coordinates, Place},
    error::{upstream_error, Error},
};

pub const GOOGLE_MAPS_DIR_URL: &str = "comgooglemapsurl://www.google.com/maps/dir/";

/// Round trip starting and ending at `origin`, visiting `places` in order.
pub fn directions_url<'a>(origin: Coordinates, places: impl IntoIterator<Item = &'a Place>) -> String {
    let stops: Vec<String> = std::iter::once(origin)
        .chain(places.into_iter().map(|p| p.coordinates))
        .chain(std::iter::once(origin))
        .map(String::from)
        .collect();

    format!("{}{}", GOOGLE_MAPS_DIR_URL, stops.join("/"))
}

/// Used when no launch command is configured.
#[derive(Clone, Debug, Default)]
pub struct LogLauncher;

impl MapLauncher for LogLauncher {
    fn open(&self, url: &str) -> Result<(), Error> {
        tracing::info!(url, "map launch requested");
        Ok(())
    }
}

/// Hands the URL to an external program (`xdg-open`, `open`, ...) as its last argument.
///
/// The child is awaited on the current tokio runtime so it never lingers as a zombie.
#[derive(Clone, Debug)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;

        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl MapLauncher for CommandLauncher {
    #[tracing::instrument(skip(self))]
    fn open(&self, url: &str) -> Result<(), Error> {
        let runtime = Handle::try_current()
            .map_err(|e| upstream_error(format!("no tokio runtime: {}", e)))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| upstream_error(format!("{}: {}", self.program, e)))?;

        let program = self.program.clone();
        runtime.spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => tracing::warn!(%program, %status, "map launcher exited with failure"),
                Err(e) => tracing::warn!(%program, error = %e, "could not wait on map launcher"),
            }
        });

        Ok(())
    }
}

#[test]
fn url_is_round_trip_through_places() {
    let places = vec![
        Place::new("a", "A", Coordinates::new(1.0, 1.0)),
        Place::new("b", "B", Coordinates::new(2.0, 2.0)),
    ];

    let url = directions_url(Coordinates::new(0.0, 0.0), &places);

    assert_eq!(url, "comgooglemapsurl://www.google.com/maps/dir/0,0/1,1/2,2/0,0");
}

#[test]
fn url_without_places_is_origin_twice() {
    let url = directions_url(Coordinates::new(40.7128, -74.006), std::iter::empty());

    assert!(url.ends_with("/40.7128,-74.006/40.7128,-74.006"));
}

#[test]
fn command_line_is_split_into_program_and_args() {
    assert!(CommandLauncher::new("   ").is_none());

    let launcher = CommandLauncher::new("gio open").unwrap();
    assert_eq!(launcher.program, "gio");
    assert_eq!(launcher.args, vec!["open".to_string()]);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn launched_programs_are_reaped() {
    use std::time::Duration;

    fn zombie_children() -> usize {
        let me = std::process::id().to_string();

        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|entry| std::fs::read_to_string(entry.ok()?.path().join("stat")).ok())
            .filter(|stat| {
                // fields after "pid (comm) ": state, ppid, ...
                let rest = match stat.rfind(')') {
                    Some(i) => &stat[i + 1..],
                    None => return false,
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    let launcher = CommandLauncher::new("true").unwrap();
    for _ in 0..5 {
        launcher.open("comgooglemapsurl://www.google.com/maps/dir/0,0/0,0").unwrap();
    }

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(zombie_children(), 0);
}

#[test]
fn open_outside_runtime_is_an_error() {
    let launcher = CommandLauncher::new("true").unwrap();

    assert!(launcher.open("comgooglemapsurl://www.google.com/maps/dir/").is_err());
}
