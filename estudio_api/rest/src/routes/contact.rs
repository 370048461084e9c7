use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use estudio_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, ContactSubmitOutcome,
};
use estudio_models::contact::{ContactFormData, ContactFormErrors, SubmissionMetadata};

use super::internal_server_error;
use crate::{
    extractors::user_agent::UserAgent,
    middlewares::context::ClientIp,
    models::{
        contact::ApiContactRequest, ApiMessageAccepted, ApiRateLimitError, ApiSendError,
        ApiValidationError,
    },
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(
            "/api/contact",
            routing::post(submit_message).options(preflight),
        )
        .with_state(service)
}

async fn submit_message(
    service: State<Arc<impl ContactFeatureService>>,
    Extension(client_ip): Extension<ClientIp>,
    UserAgent(user_agent): UserAgent,
    Json(request): Json<ApiContactRequest>,
) -> Response {
    let locale = request.locale.unwrap_or_default();
    let form = ContactFormData::from(request);

    if let Err(errors) = form.validate() {
        return validation_error(errors);
    }

    let metadata = SubmissionMetadata {
        source: client_ip.0,
        user_agent,
        locale,
    };

    match service.submit_message(form, metadata).await {
        Ok(ContactSubmitOutcome::Sent { message_id }) => accepted(message_id.into_inner()),
        Ok(ContactSubmitOutcome::SpamBlocked) => accepted("spam-blocked".into()),
        Err(ContactSubmitError::RateLimited { retry_after }) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, retry_after.to_string())],
            Json(ApiRateLimitError {
                success: false,
                error_code: "RATE_LIMIT_EXCEEDED",
                retry_after,
            }),
        )
            .into_response(),
        Err(ContactSubmitError::Validation(errors)) => validation_error(errors),
        Err(ContactSubmitError::Send) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiSendError {
                success: false,
                error_code: "SEND_FAILED",
                error: "Could not send message",
            }),
        )
            .into_response(),
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}

/// Preflight requests must get a 200 even without a matching CORS context;
/// the CORS layer attaches the actual headers.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn accepted(message_id: String) -> Response {
    Json(ApiMessageAccepted {
        success: true,
        message_id,
    })
    .into_response()
}

fn validation_error(errors: ContactFormErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiValidationError {
            success: false,
            error_code: "VALIDATION_ERROR",
            errors: errors.0,
        }),
    )
        .into_response()
}
