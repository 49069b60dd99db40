//! The HTTP API of the server.

pub mod config;
pub mod endpoints;

#[cfg(test)]
mod test;

use crate::config::HttpServerConfig;
use actix_web::{
    middleware::Logger,
    web::{self, JsonConfig},
    App, HttpServer,
};
use ortserver_common::db::Database;
use ortserver_module_fundamental::authorization::AuthorizationService;
use std::sync::Arc;

/// Mount everything the server offers: the API under `/api` and the server information.
pub fn configure(
    svc: &mut web::ServiceConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) {
    endpoints::configure(svc, db.clone());
    svc.service(
        web::scope("/api")
            .configure(|svc| ortserver_module_fundamental::configure(svc, db, authorization)),
    );
}

/// Serve the API until the server gets stopped.
pub async fn run(
    config: &HttpServerConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let json_limit = config.json_limit;

    log::info!("JSON limit: {json_limit} bytes");

    let mut http = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(JsonConfig::default().limit(json_limit))
            .configure(|svc| configure(svc, db.clone(), authorization.clone()))
    });

    if config.workers > 0 {
        log::info!("Using {} worker(s)", config.workers);
        http = http.workers(config.workers);
    }

    log::info!("Listening on {addr}");

    http.bind(addr)?.run().await?;

    Ok(())
}
