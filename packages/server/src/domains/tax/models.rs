use serde::{Deserialize, Serialize};

use crate::common::ChannelId;

/// How taxes are computed for a channel or country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxCalculationStrategy {
    /// Static rates configured in the dashboard.
    FlatRates,
    /// Delegated to an external tax app over a sync webhook.
    TaxApp,
}

/// Channel-level tax settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfiguration {
    pub channel_id: ChannelId,
    pub tax_calculation_strategy: Option<TaxCalculationStrategy>,
    /// Identifier of the preferred tax app. `None` lets every subscribed tax
    /// app compete.
    pub tax_app_id: Option<String>,
    #[serde(default)]
    pub country_exceptions: Vec<TaxConfigurationPerCountry>,
}

impl TaxConfiguration {
    /// The exception configured for `country`, if any (ISO 3166-1 alpha-2,
    /// case-insensitive).
    pub fn exception_for_country(&self, country: &str) -> Option<&TaxConfigurationPerCountry> {
        self.country_exceptions
            .iter()
            .find(|exception| exception.country.eq_ignore_ascii_case(country))
    }
}

/// Per-country override of the channel tax settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfigurationPerCountry {
    pub country: String,
    pub tax_calculation_strategy: Option<TaxCalculationStrategy>,
    pub tax_app_id: Option<String>,
}
