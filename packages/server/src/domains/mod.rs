pub mod app;
pub mod checkout;
pub mod tax;
pub mod webhooks;
