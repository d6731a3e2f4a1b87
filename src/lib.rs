pub mod checkout;
pub mod client;
pub mod config;
pub mod intent;
pub mod logger;
pub mod server;
pub mod stripe;
pub mod types;

pub use client::StripeClient;
pub use config::{Config, ConfigError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
