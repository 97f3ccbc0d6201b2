use axum::response::{IntoResponse, Response};
use maud::html;
use reqwest::StatusCode;

use crate::icons;

pub enum ErrorResponse {
    InternalServerError,
    Alert,
}

pub trait MapErrorResponse<T> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, Response>;
}

impl<T, E: ToString> MapErrorResponse<T> for Result<T, E> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, Response> {
        match self {
            Ok(val) => Ok(val),
            Err(err) => Err(mapper.transform(err)),
        }
    }
}

impl ErrorResponse {
    pub fn transform<E: ToString>(&self, err: E) -> Response {
        let message = err.to_string();
        tracing::error!(%message, "Request failed");
        match self {
            Self::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            // htmx does not swap 5xx responses
            Self::Alert => {
                html! { ."alert"."alert-error" role="alert" {(icons::error()) span {(message)}} }
                    .into_response()
            }
        }
    }
}
