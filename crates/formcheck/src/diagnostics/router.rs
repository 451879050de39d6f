use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use super::form_test::{FormTestRequest, FormTestService};
use super::probes::{DataStore, MailTransport};
use crate::forms::{FormType, UnknownFormType};

pub const FORM_TEST_PATH: &str = "/api/form-test";

/// Errors that stop the form test endpoint before it can report.
#[derive(Debug, thiserror::Error)]
pub enum FormTestError {
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    UnknownFormType(#[from] UnknownFormType),
    #[error("form test aborted: {0}")]
    Aborted(String),
}

impl IntoResponse for FormTestError {
    fn into_response(self) -> Response {
        // Only an unknown form type is the caller's fault; anything else that stops
        // the run before it reports is a failed test.
        let (status, message) = match self {
            FormTestError::UnknownFormType(_) => {
                (StatusCode::BAD_REQUEST, "Invalid form test request")
            }
            FormTestError::MalformedBody(_) | FormTestError::Aborted(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Form test failed")
            }
        };

        let payload = json!({
            "success": false,
            "message": message,
            "error": self.to_string(),
            "timestamp": Utc::now(),
        });
        (status, Json(payload)).into_response()
    }
}

/// Router exposing the form test endpoint with permissive CORS.
pub fn form_test_router<D, M>(service: Arc<FormTestService<D, M>>) -> Router
where
    D: DataStore + 'static,
    M: MailTransport + 'static,
{
    Router::new()
        .route(
            FORM_TEST_PATH,
            post(form_test_handler::<D, M>)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .layer(map_response(with_cors_headers))
        .with_state(service)
}

pub(crate) async fn form_test_handler<D, M>(
    State(service): State<Arc<FormTestService<D, M>>>,
    payload: Result<Json<FormTestRequest>, JsonRejection>,
) -> Result<Response, FormTestError>
where
    D: DataStore + 'static,
    M: MailTransport + 'static,
{
    let Json(request) = payload.map_err(|rejection| {
        error!(%rejection, "form test body could not be read");
        FormTestError::MalformedBody(rejection.body_text())
    })?;
    let form_type: FormType = request.form_type.parse()?;

    // A panicking adapter must not take the connection down with it.
    let task = tokio::spawn(async move { service.run(form_type, &request.test_data).await });
    let report = task.await.map_err(|err| {
        error!(form = %form_type, %err, "form test failed");
        FormTestError::Aborted(err.to_string())
    })?;

    let body = json!({
        "success": true,
        "message": format!("{form_type} form test completed"),
        "data": report,
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn method_not_allowed() -> Response {
    let payload = json!({
        "success": false,
        "message": "Method not allowed. Use POST.",
    });
    (StatusCode::METHOD_NOT_ALLOWED, Json(payload)).into_response()
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
