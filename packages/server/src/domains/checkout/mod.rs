pub mod loader;
pub mod models;

pub use loader::{CheckoutInfoByCheckoutTokenLoader, CheckoutLinesInfoByCheckoutTokenLoader};
pub use models::{Checkout, CheckoutInfo, CheckoutLineInfo};
