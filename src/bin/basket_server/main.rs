use actix_web::{middleware::Logger as ActixLogger, web, App, HttpServer};
use justpaybasket::{
    config::load_env_file,
    logger::setup_logger,
    server::{configure, AppState},
    Config,
};
use log::{error, info};
use std::{
    env as stdenv,
    process::{exit, id as process_id},
};

mod cors;
use crate::cors::*;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_logger();
    load_env_file();

    info!(
        "\x1b[01;35m # THIS SCRIPT NAME\x1b[38;5;93m:\x1b[38;5;1m {}",
        stdenv::args().next().unwrap_or_default()
    );
    info!("PID: {}", process_id());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            exit(1);
        }
    };
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    let cors_origins = if check_env_cors() {
        match load_and_validate_cors_origins(CORS_FILE) {
            Ok(origins) => origins,
            Err(e) => {
                error!("Failed to load or validate all CORS origins: {}", e);
                exit(1);
            }
        }
    } else {
        vec![]
    };
    info!("Allowed cors_origins: {:?}", cors_origins);

    let target_server = config.bind_address();
    if std::net::TcpListener::bind(&target_server).is_err() {
        error!("Port {} is already in use.", config.port);
        exit(52);
    }

    info!(
        "Basket: {} {} per intent",
        state.amount, state.currency
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(ActixLogger::default())
            .wrap(build_cors(&cors_origins))
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind(&target_server)?
    .run();

    info!("Server running at http://{} ", target_server);

    let execution = server.await;
    info!("Worker stopped with PID: {}", process_id());

    if let Err(e) = execution {
        error!("Failed to start the server: {:?}", e);
        return Err(e);
    }
    Ok(())
}
