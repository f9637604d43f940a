use serde::{Deserialize, Serialize};

use crate::common::{CheckoutLineId, CheckoutToken};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub id: CheckoutLineId,
    pub checkout_token: CheckoutToken,
    pub variant_sku: String,
    pub quantity: i32,
}

/// A checkout line together with the product facts tax resolution needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineInfo {
    pub line: CheckoutLine,
    pub is_shipping_required: bool,
}

/// True if any line ships a physical product.
pub fn is_shipping_required(lines: &[CheckoutLineInfo]) -> bool {
    lines.iter().any(|info| info.is_shipping_required)
}
