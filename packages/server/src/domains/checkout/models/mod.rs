pub mod checkout;
pub mod checkout_info;
pub mod checkout_line;

pub use checkout::*;
pub use checkout_info::*;
pub use checkout_line::*;
