pub mod basket;

pub use basket::{
    ClientSecret, OrderDetail, PaymentIntentParams, PaymentParams, TestCard, TEST_CARDS,
};
