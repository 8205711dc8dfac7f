use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::ports::{MediaExtractor, MessagingTransport};
use crate::domain::{self, ChatId, DeliveryOutcome};
use crate::infrastructure::observability::{RequestId, sanitize_for_log};
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeliverParams {
    pub chat_id: Option<String>,
    #[serde(alias = "music")]
    pub query: Option<String>,
}

#[tracing::instrument(skip_all, fields(request_id = %request_id.0))]
pub async fn deliver_handler<E, M>(
    State(state): State<AppState<E, M>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<DeliverParams>, QueryRejection>,
) -> impl IntoResponse
where
    E: MediaExtractor + ?Sized + 'static,
    M: MessagingTransport + ?Sized + 'static,
{
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(error = %sanitize_for_log(&message), "Malformed delivery request");
            return bad_request(&message);
        }
    };

    let Some(chat_id) = params.chat_id.and_then(ChatId::parse) else {
        tracing::warn!("Delivery request without chat_id");
        return bad_request("chat_id is required");
    };

    let Some(query) = params.query.and_then(domain::Query::parse) else {
        tracing::warn!(chat_id = %chat_id, "Delivery request without query");
        return bad_request("query is required");
    };

    tracing::info!(
        chat_id = %chat_id,
        query = %sanitize_for_log(query.as_str()),
        direct = query.is_direct_locator(),
        "Delivery requested"
    );

    let outcome = state.orchestrator.handle(&chat_id, &query).await;

    match &outcome {
        DeliveryOutcome::Success => tracing::info!(chat_id = %chat_id, "Delivery succeeded"),
        DeliveryOutcome::Failure { message } => {
            tracing::warn!(chat_id = %chat_id, error = %sanitize_for_log(message), "Delivery failed")
        }
    }

    (StatusCode::OK, Json(outcome)).into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(DeliveryOutcome::failure(message)),
    )
        .into_response()
}
