//! Prediction service entry point: loads the fitted pipeline artifact once
//! and serves it over HTTP.

mod handlers;
mod models;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenv::dotenv;
use handlers::SharedPipeline;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Stroke risk prediction service")]
struct Args {
    /// Path to the fitted pipeline artifact
    #[arg(short, long, default_value = "model.json")]
    model: String,

    /// Address to bind the HTTP server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    dotenv().ok();

    let pipeline = SharedPipeline::load(&args.model)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let pipeline = web::Data::new(pipeline);
    info!("Pipeline artifact loaded from {}", args.model);
    info!("Server running at http://{}", args.bind);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(pipeline.clone())
            .service(web::resource("/").route(web::get().to(handlers::home)))
            .service(web::resource("/predict").route(web::post().to(handlers::predict)))
    })
    .bind(args.bind)?
    .run()
    .await
}
