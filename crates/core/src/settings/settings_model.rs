use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_CURRENCY_SCALE, DEFAULT_PERCENT_SCALE, ENV_CURRENCY,
    ENV_CURRENCY_SCALE, ENV_PERCENT_SCALE, MAX_DECIMAL_SCALE,
};
use crate::errors::{Error, Result};

/// Settings shared by the validator and the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSettings {
    /// ISO currency code all amounts are expressed in.
    pub currency: String,
    /// Decimal places allowed on money amounts.
    pub currency_scale: u32,
    /// Decimal places kept on derived percentages.
    pub percent_scale: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            currency_scale: DEFAULT_CURRENCY_SCALE,
            percent_scale: DEFAULT_PERCENT_SCALE,
        }
    }
}

impl LedgerSettings {
    /// Loads settings from the process environment, reading `.env` first if present.
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let currency = match lookup(ENV_CURRENCY) {
            Some(value) => parse_currency(&value)?,
            None => defaults.currency,
        };
        let currency_scale = match lookup(ENV_CURRENCY_SCALE) {
            Some(value) => parse_scale(ENV_CURRENCY_SCALE, &value)?,
            None => defaults.currency_scale,
        };
        let percent_scale = match lookup(ENV_PERCENT_SCALE) {
            Some(value) => parse_scale(ENV_PERCENT_SCALE, &value)?,
            None => defaults.percent_scale,
        };

        Ok(Self {
            currency,
            currency_scale,
            percent_scale,
        })
    }
}

fn parse_currency(value: &str) -> Result<String> {
    let code = value.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidConfigValue(format!(
            "{}='{}' is not a three-letter currency code",
            ENV_CURRENCY, value
        )));
    }
    Ok(code)
}

fn parse_scale(key: &str, value: &str) -> Result<u32> {
    let scale: u32 = value.trim().parse().map_err(|_| {
        Error::InvalidConfigValue(format!("{}='{}' is not a whole number", key, value))
    })?;
    if scale > MAX_DECIMAL_SCALE {
        return Err(Error::InvalidConfigValue(format!(
            "{}={} exceeds the maximum scale of {}",
            key, scale, MAX_DECIMAL_SCALE
        )));
    }
    Ok(scale)
}
