pub mod checkout_session;
pub mod payment_provider;
pub mod plan;
pub mod subscription;
pub mod trial_allowance;
