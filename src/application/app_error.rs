use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("User already has a subscription in progress")]
    AlreadySubscribed,

    #[error("Plan pricing is not configured")]
    MisconfiguredPricing,

    #[error("Payment provider error: {0}")]
    ProviderError(String),

    #[error("Multiple active subscriptions found for user")]
    MultipleActiveSubscriptions,

    #[error("Unknown provider subscription status: {0}")]
    UnknownProviderStatus(String),

    #[error("No billing account")]
    NoBillingAccount,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidPayload(_) => ErrorCode::InvalidPayload,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::InvalidState(_) => ErrorCode::InvalidState,
            AppError::AlreadySubscribed => ErrorCode::AlreadySubscribed,
            AppError::MisconfiguredPricing => ErrorCode::MisconfiguredPricing,
            AppError::ProviderError(_) => ErrorCode::ProviderError,
            AppError::MultipleActiveSubscriptions => ErrorCode::MultipleActiveSubscriptions,
            AppError::UnknownProviderStatus(_) => ErrorCode::UnknownProviderStatus,
            AppError::NoBillingAccount => ErrorCode::NoBillingAccount,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Message that is safe to show to the caller.
    ///
    /// Database and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidPayload(msg) | AppError::InvalidState(msg) => msg.clone(),
            AppError::Unauthorized => "Missing or invalid credentials".to_string(),
            AppError::Forbidden => "You do not have access to this resource".to_string(),
            AppError::NotFound => "Resource not found".to_string(),
            AppError::AlreadySubscribed => {
                "You already have a subscription. Manage it from the billing portal.".to_string()
            }
            AppError::MisconfiguredPricing => "Billing is temporarily unavailable".to_string(),
            AppError::ProviderError(_) => "Payment provider request failed".to_string(),
            AppError::MultipleActiveSubscriptions => {
                "Your billing records need attention. Please contact support.".to_string()
            }
            AppError::NoBillingAccount => "No billing account found".to_string(),
            AppError::UnknownProviderStatus(_) | AppError::Database(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidPayload,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    InvalidState,
    AlreadySubscribed,
    MisconfiguredPricing,
    ProviderError,
    MultipleActiveSubscriptions,
    UnknownProviderStatus,
    NoBillingAccount,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            ErrorCode::MisconfiguredPricing => "MISCONFIGURED_PRICING",
            ErrorCode::ProviderError => "PROVIDER_ERROR",
            ErrorCode::MultipleActiveSubscriptions => "MULTIPLE_ACTIVE_SUBSCRIPTIONS",
            ErrorCode::UnknownProviderStatus => "UNKNOWN_PROVIDER_STATUS",
            ErrorCode::NoBillingAccount => "NO_BILLING_ACCOUNT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
