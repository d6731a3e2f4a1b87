use justpaybasket::intent::{fetch_payment_params, fetch_payment_params_blocking, IntentError};

const VALID_BODY: &str = r#"{
    "publishableKey": "pk_test_123",
    "paymentIntentId": "pi_123",
    "paymentIntentSecret": "pi_123_secret_456"
}"#;

#[tokio::test]
async fn returns_id_and_secret_on_200() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/payment-intent")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VALID_BODY)
        .expect(1)
        .create_async()
        .await;

    let params = fetch_payment_params(&server.url()).await.unwrap();

    assert_eq!(params.payment_intent_id, "pi_123");
    assert_eq!(params.payment_intent_secret.expose(), "pi_123_secret_456");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_fails_even_with_valid_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/payment-intent")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(VALID_BODY)
        .create_async()
        .await;

    let err = fetch_payment_params(&server.url()).await.unwrap_err();

    assert!(matches!(err, IntentError::Request { status: 500, .. }));
    assert_eq!(err.to_string(), "Failed preparing basket (Internal Server Error)");
}

#[tokio::test]
async fn created_status_is_not_accepted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/payment-intent")
        .with_status(201)
        .with_body(VALID_BODY)
        .create_async()
        .await;

    let err = fetch_payment_params(&server.url()).await.unwrap_err();
    assert!(matches!(err, IntentError::Request { status: 201, .. }));
}

#[tokio::test]
async fn missing_secret_is_a_shape_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/payment-intent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"paymentIntentId":"pi_123"}"#)
        .create_async()
        .await;

    let err = fetch_payment_params(&server.url()).await.unwrap_err();
    assert!(matches!(err, IntentError::Shape));
    assert_eq!(err.to_string(), "Failed preparing basket (Response Shape)");
}

#[tokio::test]
async fn non_string_id_is_a_shape_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/payment-intent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"paymentIntentId":42,"paymentIntentSecret":"pi_123_secret_456"}"#)
        .create_async()
        .await;

    let err = fetch_payment_params(&server.url()).await.unwrap_err();
    assert!(matches!(err, IntentError::Shape));
}

#[tokio::test]
async fn non_string_secret_is_a_shape_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/payment-intent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"paymentIntentId":"pi_123","paymentIntentSecret":null}"#)
        .create_async()
        .await;

    let err = fetch_payment_params(&server.url()).await.unwrap_err();
    assert!(matches!(err, IntentError::Shape));
    assert_eq!(err.to_string(), "Failed preparing basket (Response Shape)");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on the discard port.
    let err = fetch_payment_params("http://127.0.0.1:9").await.unwrap_err();
    assert!(matches!(err, IntentError::Transport(_)));
}

#[test]
fn blocking_requester_follows_the_same_contract() {
    let mut server = mockito::Server::new();
    let ok = server
        .mock("POST", "/api/payment-intent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VALID_BODY)
        .create();

    let params = fetch_payment_params_blocking(&server.url()).unwrap();
    assert_eq!(params.payment_intent_id, "pi_123");
    ok.assert();

    let mut html_server = mockito::Server::new();
    let _html = html_server
        .mock("POST", "/api/payment-intent")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create();
    assert!(matches!(
        fetch_payment_params_blocking(&html_server.url()),
        Err(IntentError::Shape)
    ));
}
