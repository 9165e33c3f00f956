use crate::{
    adapters::http::envelope::ApiEnvelope,
    app_error::{AppError, ErrorCode},
};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::InvalidState(_) | AppError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound | AppError::NoBillingAccount => StatusCode::NOT_FOUND,
            AppError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            AppError::MisconfiguredPricing
            | AppError::MultipleActiveSubscriptions
            | AppError::UnknownProviderStatus(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::info!(error = ?self, "Request rejected");
        }

        error_resp(status, self.code(), self.public_message())
    }
}

pub fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    (status, Json(ApiEnvelope::<()>::error(code, message))).into_response()
}
