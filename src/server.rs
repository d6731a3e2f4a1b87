use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use crate::client::StripeClient;
use crate::config::{Config, ConfigError};
use crate::intent::PAYMENT_INTENT_PATH;
use crate::stripe::{NewPaymentIntent, PaymentIntent};
use crate::types::{OrderDetail, PaymentParams};

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub stripe: StripeClient,
    pub publishable_key: String,
    pub amount: i64,
    pub currency: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(AppState {
            stripe: StripeClient::from_config(config)?,
            publishable_key: config.publishable_key.clone(),
            amount: config.basket_amount,
            currency: config.basket_currency.clone(),
        })
    }
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

async fn post_payment_intent(state: web::Data<AppState>) -> impl Responder {
    let creds = state.stripe.clone().into();
    let intent = NewPaymentIntent::new(state.amount, state.currency.as_str());
    match intent.async_post(creds).await {
        Ok(PaymentIntent {
            id,
            client_secret: Some(secret),
            ..
        }) => {
            info!("created payment intent {}", id);
            HttpResponse::Ok().json(PaymentParams {
                publishable_key: state.publishable_key.clone(),
                payment_intent_id: id,
                payment_intent_secret: secret,
            })
        }
        Ok(intent) => {
            error!("payment intent {} came back without a client secret", intent.id);
            HttpResponse::InternalServerError().body("Error: missing client secret")
        }
        Err(e) => {
            error!("creating payment intent failed: {}", e);
            HttpResponse::InternalServerError().body(format!("Error: {}", e))
        }
    }
}

/// `pi_` followed by Stripe's id alphabet; anything else never reaches the
/// Stripe URL.
fn is_intent_id(id: &str) -> bool {
    match id.strip_prefix("pi_") {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

async fn get_order(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    if !is_intent_id(&id) {
        return HttpResponse::NotFound().body(format!("Error: no such order {:?}", id));
    }
    match PaymentIntent::async_get(state.stripe.clone().into(), &id).await {
        Ok(intent) => HttpResponse::Ok().json(OrderDetail {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        }),
        Err(e) if e.code() == Some("resource_missing") => {
            HttpResponse::NotFound().body(format!("Error: {}", e))
        }
        Err(e) => {
            error!("fetching order {} failed: {}", id, e);
            HttpResponse::InternalServerError().body(format!("Error: {}", e))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route(PAYMENT_INTENT_PATH, web::post().to(post_payment_intent))
        .route("/api/order/{id}", web::get().to(get_order));
}
