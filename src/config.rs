use dotenvy::dotenv;
use log::{error, info};
use std::{env as stdenv, path::Path};
use thiserror::Error;

use crate::stripe::STRIPE_API_BASE;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set in .env")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration shared by the server and the terminal client.
#[derive(Clone)]
pub struct Config {
    /// Only the server needs it; see [`Config::secret_key`].
    secret_key: Option<String>,
    pub publishable_key: String,
    pub host: String,
    pub port: u16,
    pub stripe_api_base: String,
    pub basket_amount: i64,
    pub basket_currency: String,
    pub server_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| stdenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let publishable_key = lookup("STRIPE_PUBLISHABLE_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("STRIPE_PUBLISHABLE_KEY"))?;

        let port = or_default("PORT", "8081");
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { key: "PORT", value: port.clone() })?;

        let amount = or_default("BASKET_AMOUNT", "1234");
        let basket_amount = match amount.parse::<i64>() {
            Ok(a) if a > 0 => a,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "BASKET_AMOUNT",
                    value: amount,
                })
            }
        };

        Ok(Config {
            secret_key: lookup("STRIPE_SECRET_KEY").filter(|v| !v.trim().is_empty()),
            publishable_key,
            host: or_default("HOST", "127.0.0.1"),
            port,
            stripe_api_base: or_default("STRIPE_API_BASE", STRIPE_API_BASE),
            basket_amount,
            basket_currency: or_default("BASKET_CURRENCY", "usd").to_lowercase(),
            server_url: or_default("BASKET_SERVER_URL", "http://127.0.0.1:8081"),
        })
    }

    pub fn secret_key(&self) -> Result<&str, ConfigError> {
        self.secret_key
            .as_deref()
            .ok_or(ConfigError::Missing("STRIPE_SECRET_KEY"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn load_env_file() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_path = current_dir.join(".env");

    if dotenv().is_err() {
        error!(".env file not found. Expected it at: {}", env_path.display());
    } else {
        info!(".env loading at: {}", env_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("STRIPE_PUBLISHABLE_KEY", "pk_test_1")])).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8081");
        assert_eq!(config.basket_amount, 1234);
        assert_eq!(config.basket_currency, "usd");
        assert_eq!(config.stripe_api_base, "https://api.stripe.com");
        assert_eq!(config.server_url, "http://127.0.0.1:8081");
        assert_eq!(config.secret_key(), Err(ConfigError::Missing("STRIPE_SECRET_KEY")));
    }

    #[test]
    fn publishable_key_is_required() {
        let err = Config::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "sk_test_1")])).err();
        assert_eq!(err, Some(ConfigError::Missing("STRIPE_PUBLISHABLE_KEY")));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_1"),
            ("PORT", "eighty"),
        ]))
        .err();
        assert_eq!(
            err,
            Some(ConfigError::Invalid { key: "PORT", value: "eighty".to_string() })
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_1"),
            ("BASKET_AMOUNT", "0"),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::Invalid { key: "BASKET_AMOUNT", .. })));
    }

    #[test]
    fn secret_key_is_read_when_present() {
        let config = Config::from_lookup(lookup(&[
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_1"),
            ("STRIPE_SECRET_KEY", "sk_test_1"),
            ("BASKET_CURRENCY", "EUR"),
        ]))
        .unwrap();
        assert_eq!(config.secret_key(), Ok("sk_test_1"));
        assert_eq!(config.basket_currency, "eur");
    }
}
