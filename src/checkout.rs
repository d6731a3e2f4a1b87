//! Basket checkout state machine.
//!
//! `Loading` on creation, then exactly one of `Ready` or `Error` after
//! [`Basket::mount`]. From `Ready`, [`Basket::submit`] hands the intent to the
//! payment sheet: success navigates to the order page, a canceled sheet goes
//! back to `Ready` with the same intent, anything else ends in `Error`.

use async_trait::async_trait;
use log::{error, info, warn};
use std::fmt;
use thiserror::Error;

use crate::intent::{fetch_payment_params, IntentError};
use crate::types::{ClientSecret, PaymentIntentParams, TEST_CARDS};

#[async_trait]
pub trait PaymentParamsSource {
    async fn fetch(&self) -> Result<PaymentIntentParams, IntentError>;
}

/// Fetches params from a running basket server.
pub struct HttpParamsSource {
    base_url: String,
}

impl HttpParamsSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentParamsSource for HttpParamsSource {
    async fn fetch(&self) -> Result<PaymentIntentParams, IntentError> {
        fetch_payment_params(&self.base_url).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetErrorCode {
    Canceled,
    Failed,
    Timeout,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SheetError {
    pub code: SheetErrorCode,
    pub message: String,
}

impl SheetError {
    pub fn canceled() -> Self {
        SheetError {
            code: SheetErrorCode::Canceled,
            message: "The payment flow has been canceled".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        SheetError {
            code: SheetErrorCode::Failed,
            message: message.into(),
        }
    }
}

/// The processor-hosted payment form. Card data is collected and confirmed
/// behind this trait; the basket only sees the outcome.
#[async_trait]
pub trait PaymentSheet {
    async fn init(&mut self, secret: &ClientSecret) -> Result<(), SheetError>;
    async fn present(&mut self, intent_id: &str, secret: &ClientSecret) -> Result<(), SheetError>;
}

pub trait Navigator {
    fn push(&mut self, route: &str);
}

pub fn order_route(intent_id: &str) -> String {
    format!("/order/{}", intent_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyBasket {
    pub id: String,
    pub secret: ClientSecret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasketState {
    Loading,
    Ready(ReadyBasket),
    /// Sheet is presented; the intent is still held for a possible cancel.
    Submitting(ReadyBasket),
    Succeeded { id: String },
    Error { error: Option<String> },
}

impl BasketState {
    pub fn is_ready(&self) -> bool {
        matches!(self, BasketState::Ready(_))
    }
}

impl fmt::Display for BasketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasketState::Loading => write!(f, "Loading..."),
            BasketState::Error { error: Some(e) } => write!(f, "Error: {}", e),
            BasketState::Error { error: None } => write!(f, "Error"),
            BasketState::Succeeded { id } => write!(f, "Redirecting to {}", order_route(id)),
            BasketState::Ready(_) | BasketState::Submitting(_) => {
                writeln!(f, "Basket")?;
                for card in TEST_CARDS.iter() {
                    writeln!(f, "{}: {}", card.label, card.number)?;
                }
                let action = if self.is_ready() { "[ Checkout ]" } else { "[ Checkout ] (disabled)" };
                write!(f, "{}", action)
            }
        }
    }
}

/// One checkout screen. Owns its session state and is discarded once the
/// user navigates away.
pub struct Basket<S, P, N> {
    source: S,
    sheet: P,
    navigator: N,
    state: BasketState,
    mounted: bool,
}

impl<S, P, N> Basket<S, P, N>
where
    S: PaymentParamsSource + Send + Sync,
    P: PaymentSheet + Send,
    N: Navigator,
{
    pub fn new(source: S, sheet: P, navigator: N) -> Self {
        Basket {
            source,
            sheet,
            navigator,
            state: BasketState::Loading,
            mounted: false,
        }
    }

    pub fn state(&self) -> &BasketState {
        &self.state
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn render(&self) -> String {
        self.state.to_string()
    }

    /// Fetches the intent and prepares the sheet. Runs once per screen.
    pub async fn mount(&mut self) -> &BasketState {
        if self.mounted {
            warn!("basket already mounted, ignoring");
            return &self.state;
        }
        self.mounted = true;

        let params = match self.source.fetch().await {
            Ok(params) => params,
            Err(e) => {
                error!("{}", e);
                self.state = BasketState::Error {
                    error: Some(e.to_string()),
                };
                return &self.state;
            }
        };

        self.state = match self.sheet.init(&params.payment_intent_secret).await {
            Ok(()) => {
                info!("basket ready for intent {}", params.payment_intent_id);
                BasketState::Ready(ReadyBasket {
                    id: params.payment_intent_id,
                    secret: params.payment_intent_secret,
                })
            }
            Err(e) => {
                error!("payment sheet init failed: {}", e);
                BasketState::Error {
                    error: Some(e.message),
                }
            }
        };
        &self.state
    }

    /// Presents the sheet for the ready intent. Ignored in any other state.
    pub async fn submit(&mut self) -> &BasketState {
        let ready = match std::mem::replace(&mut self.state, BasketState::Loading) {
            BasketState::Ready(ready) => ready,
            other => {
                warn!("checkout submitted while not ready, ignoring");
                self.state = other;
                return &self.state;
            }
        };
        self.state = BasketState::Submitting(ready.clone());

        self.state = match self.sheet.present(&ready.id, &ready.secret).await {
            Ok(()) => {
                let route = order_route(&ready.id);
                info!("payment confirmed, navigating to {}", route);
                self.navigator.push(&route);
                BasketState::Succeeded { id: ready.id }
            }
            Err(e) if e.code == SheetErrorCode::Canceled => {
                info!("payment sheet canceled for intent {}", ready.id);
                BasketState::Ready(ready)
            }
            Err(e) => {
                error!("payment failed for intent {}: {}", ready.id, e);
                BasketState::Error {
                    error: Some(e.message),
                }
            }
        };
        &self.state
    }
}
