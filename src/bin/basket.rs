use async_trait::async_trait;
use justpaybasket::{
    checkout::{
        Basket, BasketState, HttpParamsSource, Navigator, PaymentSheet, SheetError,
    },
    config::load_env_file,
    logger::setup_logger,
    stripe::{Auth, PaymentIntent, StripeError},
    types::{ClientSecret, OrderDetail, TEST_CARDS},
    Config,
};
use log::{error, info, warn};
use std::{io::Write, process::exit};

async fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    })
    .await
    .ok()
    .flatten()
}

/// Text stand-in for the hosted payment sheet: the user picks a Stripe test
/// card and the intent is confirmed with the publishable key.
struct TerminalSheet {
    creds: Auth,
}

#[async_trait]
impl PaymentSheet for TerminalSheet {
    async fn init(&mut self, _secret: &ClientSecret) -> Result<(), SheetError> {
        if !self.creds.client.starts_with("pk_") {
            return Err(SheetError::failed(
                "STRIPE_PUBLISHABLE_KEY does not look like a publishable key",
            ));
        }
        Ok(())
    }

    async fn present(&mut self, intent_id: &str, secret: &ClientSecret) -> Result<(), SheetError> {
        for (i, card) in TEST_CARDS.iter().enumerate() {
            println!("  {}) {} {}", i + 1, card.label, card.number);
        }
        let card = loop {
            let choice = match read_line("Pay with card [1-4], q to cancel: ").await {
                None => return Err(SheetError::canceled()),
                Some(choice) => choice,
            };
            if choice.eq_ignore_ascii_case("q") {
                return Err(SheetError::canceled());
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=TEST_CARDS.len()).contains(&n) => break TEST_CARDS[n - 1],
                _ => println!("Unknown choice: {}", choice),
            }
        };

        info!("confirming {} with {}", intent_id, card.label);
        match PaymentIntent::async_confirm(self.creds.clone(), intent_id, secret, card.payment_method)
            .await
        {
            Ok(intent) if intent.is_succeeded() => Ok(()),
            Ok(intent) if intent.status == "requires_action" => Err(SheetError::failed(
                "This payment needs 3D Secure authentication, which the terminal cannot complete",
            )),
            Ok(intent) => Err(SheetError::failed(format!("Payment {}", intent.status))),
            Err(StripeError::Api { message, .. }) => Err(SheetError::failed(message)),
            Err(e) => Err(SheetError::failed(e.to_string())),
        }
    }
}

struct TerminalNavigator {
    route: Option<String>,
}

impl Navigator for TerminalNavigator {
    fn push(&mut self, route: &str) {
        info!("navigate: {}", route);
        self.route = Some(route.to_string());
    }
}

async fn show_order(server_url: &str, route: &str) {
    let url = format!("{}/api{}", server_url.trim_end_matches('/'), route);
    let detail = match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => response.json::<OrderDetail>().await,
        Ok(response) => {
            warn!("order lookup returned {}", response.status());
            return;
        }
        Err(e) => Err(e),
    };
    match detail {
        Ok(order) => println!(
            "Order {}: {} ({} {})",
            order.id, order.status, order.amount, order.currency
        ),
        Err(e) => warn!("order lookup failed: {}", e),
    }
}

#[tokio::main]
async fn main() {
    setup_logger();
    load_env_file();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    let sheet = TerminalSheet {
        creds: Auth::new(config.publishable_key.clone()).with_api_base(config.stripe_api_base.clone()),
    };
    let mut basket = Basket::new(
        HttpParamsSource::new(config.server_url.clone()),
        sheet,
        TerminalNavigator { route: None },
    );

    println!("{}", basket.render());
    basket.mount().await;

    loop {
        println!("{}", basket.render());
        match basket.state().clone() {
            BasketState::Ready(_) => {
                match read_line("Checkout? [Y/n] ").await.as_deref() {
                    Some("") | Some("y") | Some("Y") => {
                        basket.submit().await;
                    }
                    _ => break,
                }
            }
            BasketState::Succeeded { .. } => {
                if let Some(route) = basket.navigator().route.clone() {
                    show_order(&config.server_url, &route).await;
                }
                break;
            }
            BasketState::Error { .. } => exit(1),
            BasketState::Loading | BasketState::Submitting(_) => break,
        }
    }
}
