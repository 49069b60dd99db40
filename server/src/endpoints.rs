use actix_web::{get, web, HttpResponse};
use ortserver_common::db::Database;

pub fn configure(svc: &mut web::ServiceConfig, db: Database) {
    svc.app_data(web::Data::new(db))
        .service(info)
        .service(health);
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
struct Info<'a> {
    version: &'a str,
}

#[get("/.well-known/ortserver")]
pub async fn info() -> HttpResponse {
    HttpResponse::Ok().json(Info {
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready as long as the database can be reached.
#[get("/health/ready")]
pub async fn health(db: web::Data<Database>) -> HttpResponse {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => {
            log::warn!("Database check failed: {err}");
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}
