//! Backend entry-point: loads settings, connects adapters and serves the
//! REST API with OpenAPI docs.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use notegen::inbound::http::health::HealthState;
use notegen::inbound::http::session_config::fingerprint::key_fingerprint;
use notegen::inbound::http::session_config::{BuildMode, session_settings_from_env};
use notegen::settings::AppSettings;
use server::{ServerConfig, ServiceOptions, connect_adapters, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let http_state = connect_adapters(&settings)
        .await?
        .into_http_state(ServiceOptions::from(&settings));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        http_state,
        ServerConfig::from_session(session, bind_addr),
    )?;
    info!(%bind_addr, "listening");
    server.await
}
