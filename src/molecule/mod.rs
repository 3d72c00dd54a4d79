use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use service::MoleculeService;

use crate::state::AppState;

mod handler;
pub mod markup;
pub mod model;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Service = Arc<dyn MoleculeService + Send + Sync>;

/// Molecules listed when no search is active.
pub const DEFAULT_MOLECULES: [&str; 7] = [
    "Aspirin",
    "Caffeine",
    "Glucose",
    "Ethanol",
    "Butene",
    "Morphine",
    "Penicillin",
];

/// Category shown when the AI categorization is not available.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub fn pages<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/research", get(handler::pages::research))
        .route("/molecules", get(handler::pages::molecules))
        .with_state(s)
}

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/compounds", get(handler::api::find_compound))
        .route("/molecules", get(handler::api::search))
        .route("/proxy", post(handler::api::generate))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("compound name is required")]
    MissingName,
    #[error("Compound not found")]
    NotFound,
    #[error("No data available")]
    NoData,
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    _Url(#[from] url::ParseError),
    #[error(transparent)]
    _Reqwest(#[from] reqwest::Error),
}
