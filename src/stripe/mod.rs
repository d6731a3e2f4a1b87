pub mod payment_intent;

pub use payment_intent::{NewPaymentIntent, PaymentIntent};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Credentials for one Stripe key. The key goes in as the basic-auth user
/// with an empty password, so the same struct serves the secret key on the
/// server and the publishable key on the client.
#[derive(Clone)]
pub struct Auth {
    pub client: String,
    pub secret: String,
    pub api_base: String,
}

impl Auth {
    pub fn new(key: impl Into<String>) -> Self {
        Auth {
            client: key.into(),
            secret: String::new(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[derive(Error, Debug)]
pub enum StripeError {
    #[error("Stripe request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Stripe API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        kind: Option<String>,
    },
}

impl StripeError {
    pub fn code(&self) -> Option<&str> {
        match self {
            StripeError::Api { code, .. } => code.as_deref(),
            StripeError::Http(_) => None,
        }
    }

    fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => StripeError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| status.to_string()),
                code: envelope.error.code,
                kind: envelope.error.kind,
            },
            Err(_) => StripeError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
                code: None,
                kind: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub(crate) async fn async_read<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StripeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await?;
    Err(StripeError::from_body(status, &body))
}

pub(crate) fn read<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, StripeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>()?);
    }
    let body = response.text()?;
    Err(StripeError::from_body(status, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_trailing_slash_is_dropped() {
        let auth = Auth::new("sk_test_1").with_api_base("http://127.0.0.1:1234/");
        assert_eq!(auth.url("/v1/payment_intents"), "http://127.0.0.1:1234/v1/payment_intents");
    }

    #[test]
    fn error_envelope_is_parsed() {
        let body = r#"{"error":{"message":"Your card was declined.","type":"card_error","code":"card_declined"}}"#;
        let err = StripeError::from_body(reqwest::StatusCode::PAYMENT_REQUIRED, body);
        assert_eq!(err.code(), Some("card_declined"));
        assert_eq!(err.to_string(), "Stripe API error (402): Your card was declined.");
    }

    #[test]
    fn non_json_error_body_falls_back_to_status_reason() {
        let err = StripeError::from_body(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.to_string(), "Stripe API error (502): Bad Gateway");
        assert_eq!(err.code(), None);
    }
}
