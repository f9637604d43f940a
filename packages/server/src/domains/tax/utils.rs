//! Tax configuration resolution for checkouts.
//!
//! A country exception, when one matches the checkout's tax country, replaces
//! the channel settings wholesale: its strategy and its tax app id win even
//! when they are unset.

use anyhow::{ensure, Result};

use super::models::{TaxCalculationStrategy, TaxConfiguration, TaxConfigurationPerCountry};
use crate::domains::checkout::models::{
    is_shipping_required, Address, Channel, CheckoutInfo, CheckoutLineInfo,
};
use crate::kernel::BaseTaxConfigurationResolver;

pub fn get_tax_calculation_strategy(
    tax_configuration: &TaxConfiguration,
    country_tax_configuration: Option<&TaxConfigurationPerCountry>,
) -> TaxCalculationStrategy {
    let strategy = match country_tax_configuration {
        Some(country) => country.tax_calculation_strategy,
        None => tax_configuration.tax_calculation_strategy,
    };
    strategy.unwrap_or(TaxCalculationStrategy::FlatRates)
}

pub fn get_tax_app_id(
    tax_configuration: &TaxConfiguration,
    country_tax_configuration: Option<&TaxConfigurationPerCountry>,
) -> Option<String> {
    let tax_app_id = match country_tax_configuration {
        Some(country) => country.tax_app_id.as_deref(),
        None => tax_configuration.tax_app_id.as_deref(),
    };
    tax_app_id.filter(|id| !id.is_empty()).map(str::to_string)
}

/// Country taxes are computed for: the shipping country when something ships,
/// otherwise the billing country, otherwise the channel default.
pub fn get_tax_country<'a>(
    channel: &'a Channel,
    shipping_required: bool,
    shipping_address: Option<&'a Address>,
    billing_address: Option<&'a Address>,
) -> &'a str {
    let address = if shipping_required {
        shipping_address
    } else {
        billing_address
    };
    address
        .map(|address| address.country.as_str())
        .filter(|country| !country.is_empty())
        .unwrap_or(channel.default_country.as_str())
}

pub fn get_tax_configuration_for_checkout(
    checkout_info: &CheckoutInfo,
    lines: &[CheckoutLineInfo],
) -> Result<(TaxConfiguration, Option<TaxConfigurationPerCountry>)> {
    let channel = &checkout_info.channel;
    let tax_configuration = &channel.tax_configuration;
    ensure!(
        tax_configuration.channel_id == channel.id,
        "channel {} carries the tax configuration of channel {} (checkout {})",
        channel.id,
        tax_configuration.channel_id,
        checkout_info.checkout.token
    );

    let country = get_tax_country(
        channel,
        is_shipping_required(lines),
        checkout_info.shipping_address(),
        checkout_info.billing_address(),
    );
    let country_tax_configuration = tax_configuration.exception_for_country(country).cloned();

    Ok((tax_configuration.clone(), country_tax_configuration))
}

/// Resolves tax settings from the channel data carried by `CheckoutInfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutTaxConfigurationResolver;

impl BaseTaxConfigurationResolver for CheckoutTaxConfigurationResolver {
    fn resolve(
        &self,
        checkout_info: &CheckoutInfo,
        lines: &[CheckoutLineInfo],
    ) -> Result<(TaxConfiguration, Option<TaxConfigurationPerCountry>)> {
        get_tax_configuration_for_checkout(checkout_info, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ChannelId, CheckoutLineId, CheckoutToken};
    use crate::domains::checkout::models::{Checkout, CheckoutLine};
    use chrono::Utc;

    fn configuration(
        strategy: Option<TaxCalculationStrategy>,
        tax_app_id: Option<&str>,
        exceptions: Vec<TaxConfigurationPerCountry>,
    ) -> TaxConfiguration {
        TaxConfiguration {
            channel_id: ChannelId::new(1),
            tax_calculation_strategy: strategy,
            tax_app_id: tax_app_id.map(str::to_string),
            country_exceptions: exceptions,
        }
    }

    fn exception(
        country: &str,
        strategy: Option<TaxCalculationStrategy>,
        tax_app_id: Option<&str>,
    ) -> TaxConfigurationPerCountry {
        TaxConfigurationPerCountry {
            country: country.to_string(),
            tax_calculation_strategy: strategy,
            tax_app_id: tax_app_id.map(str::to_string),
        }
    }

    fn checkout_info(
        tax_configuration: TaxConfiguration,
        shipping: Option<&str>,
        billing: Option<&str>,
    ) -> CheckoutInfo {
        let token = CheckoutToken::new();
        CheckoutInfo {
            checkout: Checkout {
                token,
                channel_id: ChannelId::new(1),
                currency: "USD".to_string(),
                email: None,
                shipping_address: shipping.map(Address::in_country),
                billing_address: billing.map(Address::in_country),
                price_expiration: Utc::now(),
                last_change: Utc::now(),
            },
            channel: Channel {
                id: ChannelId::new(1),
                slug: "default-channel".to_string(),
                currency_code: "USD".to_string(),
                default_country: "US".to_string(),
                tax_configuration,
            },
        }
    }

    fn line(is_shipping_required: bool) -> CheckoutLineInfo {
        CheckoutLineInfo {
            line: CheckoutLine {
                id: CheckoutLineId::new(1),
                checkout_token: CheckoutToken::new(),
                variant_sku: "SKU-1".to_string(),
                quantity: 1,
            },
            is_shipping_required,
        }
    }

    #[test]
    fn test_strategy_defaults_to_flat_rates() {
        let config = configuration(None, None, vec![]);
        assert_eq!(
            get_tax_calculation_strategy(&config, None),
            TaxCalculationStrategy::FlatRates
        );
    }

    #[test]
    fn test_country_exception_overrides_strategy_and_app() {
        let config = configuration(Some(TaxCalculationStrategy::FlatRates), Some("app.a"), vec![]);
        let country = exception("DE", Some(TaxCalculationStrategy::TaxApp), None);

        assert_eq!(
            get_tax_calculation_strategy(&config, Some(&country)),
            TaxCalculationStrategy::TaxApp
        );
        // The exception has no tax app, and that wins over the channel's.
        assert_eq!(get_tax_app_id(&config, Some(&country)), None);
        assert_eq!(get_tax_app_id(&config, None), Some("app.a".to_string()));
    }

    #[test]
    fn test_empty_tax_app_id_means_no_preference() {
        let config = configuration(Some(TaxCalculationStrategy::TaxApp), Some(""), vec![]);
        let country = exception("DE", Some(TaxCalculationStrategy::TaxApp), Some(""));

        assert_eq!(get_tax_app_id(&config, None), None);
        assert_eq!(get_tax_app_id(&config, Some(&country)), None);
    }

    #[test]
    fn test_tax_country_uses_shipping_address_when_shipping_required() {
        let info = checkout_info(configuration(None, None, vec![]), Some("DE"), Some("FR"));
        assert_eq!(
            get_tax_country(&info.channel, true, info.shipping_address(), info.billing_address()),
            "DE"
        );
        assert_eq!(
            get_tax_country(&info.channel, false, info.shipping_address(), info.billing_address()),
            "FR"
        );
    }

    #[test]
    fn test_tax_country_falls_back_to_channel_default() {
        let info = checkout_info(configuration(None, None, vec![]), None, None);
        assert_eq!(
            get_tax_country(&info.channel, true, info.shipping_address(), info.billing_address()),
            "US"
        );
    }

    #[test]
    fn test_resolver_picks_exception_for_tax_country() {
        let config = configuration(
            Some(TaxCalculationStrategy::FlatRates),
            None,
            vec![exception("de", Some(TaxCalculationStrategy::TaxApp), Some("app.de"))],
        );
        let info = checkout_info(config, Some("DE"), Some("PL"));

        let (resolved, country) = CheckoutTaxConfigurationResolver
            .resolve(&info, &[line(true)])
            .unwrap();

        assert_eq!(resolved.channel_id, ChannelId::new(1));
        assert_eq!(country.unwrap().tax_app_id.as_deref(), Some("app.de"));

        // Digital-only checkout is taxed at the billing country, which has no exception.
        let (_, country) = CheckoutTaxConfigurationResolver
            .resolve(&info, &[line(false)])
            .unwrap();
        assert!(country.is_none());
    }

    #[test]
    fn test_resolver_rejects_configuration_from_another_channel() {
        let mut config = configuration(None, None, vec![]);
        config.channel_id = ChannelId::new(2);
        let info = checkout_info(config, None, None);

        let err = CheckoutTaxConfigurationResolver.resolve(&info, &[]).unwrap_err();

        assert!(err.to_string().contains("carries the tax configuration of channel 2"));
    }
}
