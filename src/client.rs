use crate::config::{Config, ConfigError};
use crate::stripe::Auth;

/// Server-side Stripe credentials.
#[derive(Clone)]
pub struct StripeClient {
    pub api_key: String,
    pub api_base: String,
}

impl StripeClient {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: config.secret_key()?.to_string(),
            api_base: config.stripe_api_base.clone(),
        })
    }
}

impl From<StripeClient> for Auth {
    fn from(client: StripeClient) -> Self {
        Auth::new(client.api_key).with_api_base(client.api_base)
    }
}
