pub mod models;
pub mod utils;

pub use models::{TaxCalculationStrategy, TaxConfiguration, TaxConfigurationPerCountry};
pub use utils::{
    get_tax_app_id, get_tax_calculation_strategy, get_tax_configuration_for_checkout,
    get_tax_country, CheckoutTaxConfigurationResolver,
};
