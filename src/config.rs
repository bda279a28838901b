use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::pricing::PricingPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub pricing: PricingPolicy,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = PricingPolicy::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            database: DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            },
            pricing: PricingPolicy {
                extra_adult_rate: parse_or(&lookup, "EXTRA_ADULT_RATE", defaults.extra_adult_rate)?,
                child_rate: parse_or(&lookup, "CHILD_RATE", defaults.child_rate)?,
                tax_rate: parse_or(&lookup, "TAX_RATE", defaults.tax_rate)?,
                included_adults: defaults.included_adults,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("EXTRA_ADULT_RATE", self.pricing.extra_adult_rate),
            ("CHILD_RATE", self.pricing.child_rate),
            ("TAX_RATE", self.pricing.tax_rate),
        ];
        for (name, value) in checks {
            if value < Decimal::ZERO {
                return Err(ConfigError::Invalid {
                    name,
                    value: value.to_string(),
                });
            }
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn defaults_fill_in_missing_values() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.pricing.extra_adult_rate, dec!(1000));
        assert_eq!(cfg.pricing.child_rate, dec!(500));
        assert_eq!(cfg.pricing.tax_rate, dec!(0.12));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rates_can_be_overridden() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://lodge.db"),
            ("TAX_RATE", "0.18"),
            ("CHILD_RATE", " 250 "),
        ]))
        .unwrap();
        assert_eq!(cfg.pricing.tax_rate, dec!(0.18));
        assert_eq!(cfg.pricing.child_rate, dec!(250));
    }

    #[test]
    fn garbage_values_are_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://lodge.db"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn negative_tax_is_rejected() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://lodge.db"),
            ("TAX_RATE", "-0.1"),
        ]))
        .unwrap();
        assert!(cfg.validate().is_err());
    }
}
