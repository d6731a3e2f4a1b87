use super::{async_read, read, Auth, StripeError};
use crate::types::ClientSecret;
use serde::{Deserialize, Serialize};

/// A payment intent as returned by `/v1/payment_intents`. Only the fields the
/// basket uses are kept; Stripe sends many more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<ClientSecret>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// Parameters for creating a payment intent.
#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    pub amount: i64,
    pub currency: String,
    pub automatic_payment_methods: bool,
}

impl NewPaymentIntent {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        NewPaymentIntent {
            amount,
            currency: currency.into(),
            automatic_payment_methods: true,
        }
    }

    fn to_params(&self) -> Vec<(&str, String)> {
        let mut params = vec![
            ("amount", self.amount.to_string()),
            ("currency", self.currency.clone()),
        ];
        if self.automatic_payment_methods {
            params.push(("automatic_payment_methods[enabled]", "true".to_string()));
        }
        params
    }

    pub async fn async_post(&self, creds: Auth) -> Result<PaymentIntent, StripeError> {
        let response = reqwest::Client::new()
            .post(creds.url("/v1/payment_intents"))
            .basic_auth(creds.client.as_str(), Some(creds.secret.as_str()))
            .form(&self.to_params())
            .send()
            .await?;
        async_read(response).await
    }
}

impl PaymentIntent {
    pub async fn async_get(creds: Auth, id: &str) -> Result<Self, StripeError> {
        let response = reqwest::Client::new()
            .get(creds.url(&format!("/v1/payment_intents/{}", id)))
            .basic_auth(creds.client.as_str(), Some(creds.secret.as_str()))
            .send()
            .await?;
        async_read(response).await
    }

    pub fn get(creds: Auth, id: &str) -> Result<Self, StripeError> {
        let response = reqwest::blocking::Client::new()
            .get(creds.url(&format!("/v1/payment_intents/{}", id)))
            .basic_auth(creds.client.as_str(), Some(creds.secret.as_str()))
            .send()?;
        read(response)
    }

    /// Confirms an intent from the client side: `creds` carries the
    /// publishable key and the client secret authorises this one intent.
    pub async fn async_confirm(
        creds: Auth,
        id: &str,
        secret: &ClientSecret,
        payment_method: &str,
    ) -> Result<Self, StripeError> {
        let params = [
            ("client_secret", secret.expose()),
            ("payment_method", payment_method),
        ];
        let response = reqwest::Client::new()
            .post(creds.url(&format!("/v1/payment_intents/{}/confirm", id)))
            .basic_auth(creds.client.as_str(), Some(creds.secret.as_str()))
            .form(&params)
            .send()
            .await?;
        async_read(response).await
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}
