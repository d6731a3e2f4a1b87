use serde::{Deserialize, Serialize};
use std::fmt;

/// One-time token that lets the client complete a single payment intent.
///
/// `Debug` is redacted and there is no `Display`, so the value only leaves
/// this type through [`ClientSecret::expose`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(****)")
    }
}

/// Body returned by `POST /api/payment-intent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    pub publishable_key: String,
    pub payment_intent_id: String,
    pub payment_intent_secret: ClientSecret,
}

/// The two fields the basket screen needs out of [`PaymentParams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentParams {
    pub payment_intent_id: String,
    pub payment_intent_secret: ClientSecret,
}

/// Body returned by `GET /api/order/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDetail {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCard {
    pub label: &'static str,
    pub number: &'static str,
    /// Stripe test payment method standing in for the card number.
    pub payment_method: &'static str,
}

pub const TEST_CARDS: [TestCard; 4] = [
    TestCard {
        label: "Visa",
        number: "4242 4242 4242 4242",
        payment_method: "pm_card_visa",
    },
    TestCard {
        label: "MasterCard",
        number: "5555 5555 5555 4444",
        payment_method: "pm_card_mastercard",
    },
    TestCard {
        label: "Generic Decline",
        number: "4000 0000 0000 0002",
        payment_method: "pm_card_chargeDeclined",
    },
    TestCard {
        label: "3D Secure",
        number: "4000 0027 6000 3184",
        payment_method: "pm_card_authenticationRequired",
    },
];
