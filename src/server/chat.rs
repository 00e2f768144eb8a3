//! Thin proxy to the Groq chat-completions API. The request body passes
//! through untouched; the API key never leaves the server.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use super::AppState;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

fn proxy_failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": { "message": message } })),
    )
        .into_response()
}

pub async fn groq_chat(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Response {
    let Some(key) = state.config.groq_api_key.clone() else {
        return proxy_failure("Server missing GROQ_API_KEY");
    };

    let upstream = match state
        .http
        .post(GROQ_CHAT_URL)
        .bearer_auth(key)
        .json(&body)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            error!(target: "fitserve", "groq proxy request failed: {e}");
            return proxy_failure("Groq proxy request failed");
        }
    };

    // Upstream errors pass through with their status and body
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    match upstream.json::<serde_json::Value>().await {
        Ok(data) => (status, Json(data)).into_response(),
        Err(e) => {
            error!(target: "fitserve", "groq proxy response decode failed: {e}");
            proxy_failure("Groq proxy request failed")
        }
    }
}
