//! Intent requester: asks the basket server for a fresh payment intent.
//!
//! One attempt per screen load. A response counts only when the status is
//! exactly 200 and the body carries `paymentIntentId` and
//! `paymentIntentSecret` as strings.

use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::types::{ClientSecret, PaymentIntentParams};

pub const PAYMENT_INTENT_PATH: &str = "/api/payment-intent";

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("Failed preparing basket ({reason})")]
    Request { status: u16, reason: String },
    #[error("Failed preparing basket (Response Shape)")]
    Shape,
    #[error("Failed preparing basket ({0})")]
    Transport(#[from] reqwest::Error),
}

fn endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PAYMENT_INTENT_PATH)
}

fn check_status(status: StatusCode) -> Result<(), IntentError> {
    if status != StatusCode::OK {
        return Err(IntentError::Request {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        });
    }
    Ok(())
}

/// Pulls the two string fields out of the response body. Anything that is
/// not JSON, or lacks either field as a string, is a shape failure.
fn parse_params(body: &[u8]) -> Result<PaymentIntentParams, IntentError> {
    let json: Value = serde_json::from_slice(body).map_err(|_| IntentError::Shape)?;
    let id = json.get("paymentIntentId").and_then(Value::as_str);
    let secret = json.get("paymentIntentSecret").and_then(Value::as_str);
    match (id, secret) {
        (Some(id), Some(secret)) => Ok(PaymentIntentParams {
            payment_intent_id: id.to_string(),
            payment_intent_secret: ClientSecret::new(secret),
        }),
        _ => Err(IntentError::Shape),
    }
}

pub async fn fetch_payment_params(base_url: &str) -> Result<PaymentIntentParams, IntentError> {
    let url = endpoint(base_url);
    debug!("POST {}", url);
    let response = reqwest::Client::new()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;
    check_status(response.status())?;
    let body = response.bytes().await?;
    parse_params(&body)
}

pub fn fetch_payment_params_blocking(base_url: &str) -> Result<PaymentIntentParams, IntentError> {
    let url = endpoint(base_url);
    debug!("POST {}", url);
    let response = reqwest::blocking::Client::new()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .send()?;
    check_status(response.status())?;
    let body = response.bytes()?;
    parse_params(&body)
}
