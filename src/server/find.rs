use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use maud::html;
use serde::Deserialize;
use serde_inline_default::serde_inline_default;

use super::AppState;
use crate::{
    components::ResultLines,
    err_responses::{ErrorResponse, MapErrorResponse},
};

#[serde_inline_default]
#[derive(Deserialize)]
pub struct FindQuery {
    #[serde_inline_default(String::new())]
    pub phrase: String,
}

pub async fn find(
    headers: HeaderMap,
    Query(params): Query<FindQuery>,
    State(state): State<AppState>,
) -> Result<Response, Response> {
    let htmx = headers.contains_key("HX-Request");

    let results = state
        .backend
        .find(&params.phrase)
        .await
        .map_err_response(if htmx {
            ErrorResponse::Alert
        } else {
            ErrorResponse::InternalServerError
        })?;
    tracing::info!(phrase = %params.phrase, ?results, "Found phrase");

    if htmx {
        Ok(html! { (ResultLines(&results)) }.into_response())
    } else {
        Ok(Json(results).into_response())
    }
}
