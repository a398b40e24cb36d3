#[tokio::main(flavor = "current_thread")]
async fn main() {
    filmshelf::logging::init();

    let config = filmshelf::config::Config::from_env();
    if config.api_key.is_none() {
        log::warn!("OMDB_API_KEY is not set, movies must be entered manually");
    }

    if let Err(e) = filmshelf::run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
