pub mod cancellation;
pub mod checkout;
pub mod checkout_session;
pub mod portal;
pub mod subscription;
