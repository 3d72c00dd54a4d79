use axum::Router;
use axum::middleware::{from_fn_with_state, map_response};
use axum::routing::get;
use log::{error, info};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::markup::{Home, Wrappable, wrap_in_base};
use crate::state::AppState;

mod chat;
mod error;
mod event;
mod group;
mod integration;
mod markup;
mod message;
mod molecule;
mod schema;
mod state;
mod user;

type Result<T> = std::result::Result<T, error::Error>;

#[tokio::main]
async fn main() {
    let config = integration::Config::default();
    let app_state = AppState::init(&config).await;

    let pages = Router::new()
        .route("/", get(home))
        .merge(chat::pages(app_state.clone()))
        .merge(molecule::pages(app_state.clone()))
        .merge(user::pages(app_state.clone()));

    let api = Router::new()
        .merge(molecule::api(app_state.clone()))
        .merge(user::api(app_state.clone()));

    let app = Router::new()
        .merge(pages)
        .nest("/api", api)
        .merge(chat::endpoints(app_state.clone()))
        .route_layer(from_fn_with_state(
            app_state.user_service.clone(),
            user::middleware::current_user,
        ))
        .layer(map_response(wrap_in_base))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(config.env.allow_origin())
                .allow_methods(config.env.allow_methods())
                .allow_headers(config.env.allow_headers()),
        );

    let addr = config.env.addr();
    info!("Starting service on {addr}");

    let served = match config.env.ssl_config() {
        Some(tls) => {
            axum_server::bind_openssl(addr, tls)
                .serve(app.into_make_service())
                .await
        }
        None => axum_server::bind(addr).serve(app.into_make_service()).await,
    };

    if let Err(e) = served {
        error!("Server stopped with error: {e}");
    }
}

async fn home() -> Wrappable {
    Wrappable::new(Home)
}
