use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{MediaExtractor, MessagingTransport};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{deliver_handler, health_handler};
use crate::presentation::state::AppState;

pub fn create_router<E, M>(state: AppState<E, M>) -> Router
where
    E: MediaExtractor + ?Sized + 'static,
    M: MessagingTransport + ?Sized + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/resolve-and-deliver", get(deliver_handler::<E, M>))
        .route("/indir", get(deliver_handler::<E, M>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
