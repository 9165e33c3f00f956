use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::app_error::AppError;

/// Recurring billing tier a user can subscribe to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, AsRefStr, Display,
    EnumString,
)]
#[sqlx(type_name = "billing_plan", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    /// Parse a plan from request input. Only the exact wire values are
    /// accepted; anything else is an invalid payload.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        raw.parse()
            .map_err(|_| AppError::InvalidPayload(format!("Unknown plan: {}", raw)))
    }
}
