use std::sync::Arc;

use waypoint::api::DynLauncher;
use waypoint::config::Config;
use waypoint::engine::Engine;
use waypoint::error::Error;
use waypoint::external::google_maps::GoogleMaps;
use waypoint::external::map_launcher::{CommandLauncher, LogLauncher};
use waypoint::logging::setup_tracing;
use waypoint::server::serve;
use waypoint::session::Session;

#[tokio::main]
async fn main() {
    setup_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "exiting");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let engine = Engine::new(Arc::new(GoogleMaps::new(&config)?));

    let launcher: DynLauncher = match config.launch_command.as_deref().and_then(CommandLauncher::new) {
        Some(launcher) => Arc::new(launcher),
        None => Arc::new(LogLauncher),
    };

    let session = Session::spawn(engine.clone(), launcher);

    serve(config.listen_addr, session, engine).await
}
