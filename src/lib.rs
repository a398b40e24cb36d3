use thiserror::Error;

pub mod analysis;
pub mod app;
pub mod clients;
pub mod config;
pub mod console;
pub mod logging;
pub mod model;
pub mod persisters;
pub mod renderers;

use app::MovieApp;
use clients::omdb_client::{LookupError, OmdbClient};
use config::Config;
use console::Console;
use renderers::histogram::PlottersRenderer;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("could not set up the movie lookup client: {0}")]
    Client(#[from] LookupError),

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}

pub async fn run(config: Config) -> Result<(), RunError> {
    let storage = persisters::open_storage(&config.storage_path);
    let lookup = OmdbClient::new(&config)?;
    let app = MovieApp::new(storage, lookup, PlottersRenderer::default(), &config);

    log::info!(
        "Managing movies stored in {}",
        config.storage_path.display()
    );

    app.run(&mut Console::stdio()).await?;
    Ok(())
}
