use crate::authorization::AuthorizationError;
use actix_web::body::BoxBody;
use actix_web::{HttpResponse, ResponseError};
use ortserver_common::db::DatabaseErrors;
use ortserver_common::error::ErrorInformation;
use ortserver_common::model::QueryError;
use ortserver_module_ingestor::graph;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Database(DbErr),
    #[error(transparent)]
    Graph(#[from] graph::error::Error),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Model(#[from] ortserver_model::Error),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("organization {0} still has products")]
    OrganizationNotEmpty(i64),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        if value.is_duplicate() {
            Self::Conflict(value.to_string())
        } else {
            Self::Database(value)
        }
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::NotFound(msg) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", msg))
            }
            Self::OrganizationNotEmpty(_) => HttpResponse::Conflict()
                .json(ErrorInformation::new("OrganizationNotEmpty", self)),
            Self::Conflict(msg) => {
                HttpResponse::Conflict().json(ErrorInformation::new("Conflict", msg))
            }
            Self::BadRequest(msg) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("Bad request", msg))
            }
            Self::Query(err) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("Query error", err))
            }
            Self::Model(err) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("Invalid value", err))
            }
            Self::Graph(graph::error::Error::NotFound(msg)) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", msg))
            }
            Self::Graph(graph::error::Error::InvalidState(msg)) => {
                HttpResponse::Conflict().json(ErrorInformation::new("InvalidState", msg))
            }
            Self::Graph(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Graph error", err)),
            Self::Database(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Database error", err)),
            Self::Authorization(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Authorization error", err)),
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("System unknown", err)),
        }
    }
}
