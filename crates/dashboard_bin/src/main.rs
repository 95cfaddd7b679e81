use std::process::exit;

use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};
use predictor_api::api::PredictorAPI;

use crate::config::Config;
use crate::routes::ForecastSettings;
use crate::ticker_board::{TickerBoard, spawn_ticker_poller};

mod chart_svg;
mod config;
mod routes;
mod ticker_board;
mod utils;
mod view;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let api = PredictorAPI::new(&config.backend_url);
    info!("Prediction backend: {}", api.base_url());

    let board = web::Data::new(TickerBoard::default());
    spawn_ticker_poller(board.clone(), api.clone(), config.ticker_interval);
    info!("Polling tickers every {:?}", config.ticker_interval);

    let api = web::Data::new(api);
    let settings = web::Data::new(ForecastSettings {
        horizon: config.horizon,
    });

    info!("Listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .app_data(board.clone())
            .app_data(settings.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
            .wrap(Logger::default())
    })
    .bind(config.bind.as_str())?
    .workers(config.workers)
    .run()
    .await
}
