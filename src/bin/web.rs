//! Single binary web server for the bracket engine's REST API.
//! Run with: cargo run --bin web
//! Reads `config.toml` (or the file named by TOURNAMENT_CONFIG) when present.
//! Override with env: HOST, PORT, LOG_LEVEL, AUTO_ADVANCE.

use actix_web::{web::Data, App, HttpServer};
use tcg_bracket_web::{http, Config, TournamentService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.as_str()));

    log::info!("Using config: {:?}", config);
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let service = Data::new(TournamentService::from_config(&config));

    // Background task: drop finished tournaments nobody has looked at for a while
    let service_cleanup = service.clone();
    let retention = config.retention();
    let mut interval = tokio::time::interval(config.cleanup_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    actix_web::rt::spawn(async move {
        loop {
            interval.tick().await;
            service_cleanup.purge_finished(retention);
        }
    });

    HttpServer::new(move || App::new().app_data(service.clone()).configure(http::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
