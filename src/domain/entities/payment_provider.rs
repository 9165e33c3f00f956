use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Payment processor backing checkout, cancellation and the customer portal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[derive(Default)]
pub enum PaymentProvider {
    #[default]
    Stripe,
    Dummy,
}

impl PaymentProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "Stripe",
            PaymentProvider::Dummy => "Test Provider",
        }
    }
}
