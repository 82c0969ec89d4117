use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use investsim::api::{ApiClient, ApiConfig, LOGIN_PATH, RISK_ASSESSMENT_PATH, SIMULATE_PATH};
use investsim::core::{
    AllocationForm, ServiceError, Session, SubmitOutcome, metric, validate_login,
};

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url,
        ..ApiConfig::default()
    })
    .unwrap()
}

fn assessment_body() -> Value {
    json!({
        "Total Profit": 5000,
        "Max Drawdown (%)": 12.5,
        "Risk Score": 6,
        "Volatility Score": 3.2,
        "ROI (%)": 8.1
    })
}

#[tokio::test]
async fn risk_assessment_round_trip_stores_the_reply() {
    let seen = Arc::new(Mutex::new(None::<Value>));
    let captured = seen.clone();
    let app = Router::new().route(
        RISK_ASSESSMENT_PATH,
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = Some(body);
                Json(assessment_body())
            }
        }),
    );
    let api = client(spawn_backend(app).await);

    let mut form = AllocationForm::risk_assessment();
    form.set_investment_amount(Some(100_000.0));
    form.set_duration(10).unwrap();

    assert_eq!(
        form.submit(&api, &Session::anonymous()).await,
        SubmitOutcome::Succeeded
    );

    let metrics = form.result().unwrap();
    assert_eq!(metrics.len(), 5);
    assert_eq!(metrics.number(metric::TOTAL_PROFIT), Some(5000.0));
    assert_eq!(metrics.number(metric::MAX_DRAWDOWN_PCT), Some(12.5));
    assert_eq!(metrics.number(metric::RISK_SCORE), Some(6.0));
    assert_eq!(metrics.number(metric::VOLATILITY_SCORE), Some(3.2));
    assert_eq!(metrics.number(metric::ROI_PCT), Some(8.1));

    let sent = seen.lock().unwrap().clone().unwrap();
    assert_eq!(
        sent,
        json!({
            "investment_amount": 100000.0,
            "duration": 10,
            "risk_appetite": 50,
            "stocks": 40,
            "bonds": 30,
            "real_estate": 20,
            "commodities": 10
        })
    );
}

#[tokio::test]
async fn simulation_sends_bearer_token_and_unwraps_data() {
    let seen = Arc::new(Mutex::new(None::<(Option<String>, Value)>));
    let captured = seen.clone();
    let app = Router::new().route(
        SIMULATE_PATH,
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *captured.lock().unwrap() = Some((auth, body));
                Json(json!({
                    "data": {
                        "Total Profit": 3100.0,
                        "Yearly Portfolio Values": [10500.0, 11100.0, 11800.0]
                    }
                }))
            }
        }),
    );
    let api = client(spawn_backend(app).await);

    let mut form = AllocationForm::simulation();
    form.set_investment_amount(Some(10_000.0));
    form.set_duration(3).unwrap();
    form.set_risk_appetite(25);
    let session = Session::from_raw_token(Some("jwt-abc"));

    assert_eq!(form.submit(&api, &session).await, SubmitOutcome::Succeeded);
    assert_eq!(
        form.result().unwrap().series(metric::YEARLY_PORTFOLIO_VALUES),
        Some(&[10500.0, 11100.0, 11800.0][..])
    );

    let (auth, body) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer jwt-abc"));
    assert_eq!(body["risk_appetite"], json!(0.25));
    assert_eq!(body["market_condition"], json!("neutral"));
    assert_eq!(body["duration"], json!(3));
}

#[tokio::test]
async fn simulation_failure_keeps_previous_result_and_reports_body_text() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        SIMULATE_PATH,
        post(move || {
            let counter = counter.clone();
            async move {
                match counter.fetch_add(1, Ordering::SeqCst) {
                    0 => Json(json!({"data": {"Total Profit": 10.0}})).into_response(),
                    1 => (StatusCode::BAD_REQUEST, "Invalid allocation").into_response(),
                    _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                }
            }
        }),
    );
    let api = client(spawn_backend(app).await);
    let session = Session::from_raw_token(Some("jwt"));

    let mut form = AllocationForm::simulation();
    form.set_investment_amount(Some(1_000.0));

    assert_eq!(form.submit(&api, &session).await, SubmitOutcome::Succeeded);
    let first = form.result().cloned();

    assert_eq!(form.submit(&api, &session).await, SubmitOutcome::Failed);
    assert_eq!(form.error(), Some("Invalid allocation"));
    assert_eq!(form.result().cloned(), first);

    assert_eq!(form.submit(&api, &session).await, SubmitOutcome::Failed);
    assert_eq!(form.error(), Some("Simulation failed. Check input values."));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unauthorized_simulation_never_reaches_the_backend() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        SIMULATE_PATH,
        post(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::OK }
        }),
    );
    let api = client(spawn_backend(app).await);

    let mut form = AllocationForm::simulation();
    form.set_investment_amount(Some(1_000.0));

    assert_eq!(
        form.submit(&api, &Session::anonymous()).await,
        SubmitOutcome::Invalid
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_failure() {
    let app = Router::new().route(RISK_ASSESSMENT_PATH, post(|| async { "<html></html>" }));
    let api = client(spawn_backend(app).await);

    let mut form = AllocationForm::risk_assessment();
    form.set_investment_amount(Some(1_000.0));

    assert_eq!(
        form.submit(&api, &Session::anonymous()).await,
        SubmitOutcome::Failed
    );
    assert!(form.error().unwrap().starts_with("unexpected response body"));
    assert!(form.result().is_none());
}

#[tokio::test]
async fn unreachable_backend_is_reported_as_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(format!("http://{addr}"));

    let mut form = AllocationForm::risk_assessment();
    form.set_investment_amount(Some(1_000.0));

    assert_eq!(
        form.submit(&api, &Session::anonymous()).await,
        SubmitOutcome::Failed
    );
    assert!(form.error().unwrap().starts_with("request failed"));
    assert!(!form.is_loading());
}

#[tokio::test]
async fn login_returns_an_authenticated_session() {
    let app = Router::new().route(
        LOGIN_PATH,
        post(|Json(body): Json<Value>| async move {
            if body["email"] == "investor@example.com" && body["password"] == "hunter2" {
                Json(json!({
                    "message": "Login Success",
                    "success": true,
                    "token": "jwt-xyz",
                    "name": "Asha"
                }))
                .into_response()
            } else {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "message": "Auth failed, email or password is wrong",
                        "success": false
                    })),
                )
                    .into_response()
            }
        }),
    );
    let api = client(spawn_backend(app).await);

    let request = validate_login("investor@example.com", "hunter2").unwrap();
    let session = api.login(&request).await.unwrap();
    assert_eq!(session.token().map(|t| t.as_str()), Some("jwt-xyz"));
    assert_eq!(session.user_name(), Some("Asha"));

    let request = validate_login("investor@example.com", "wrong").unwrap();
    let err = api.login(&request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Login(_)));
    assert_eq!(
        err.to_string(),
        "Login failed: Auth failed, email or password is wrong"
    );
}

#[tokio::test]
async fn login_without_token_is_rejected() {
    let app = Router::new().route(
        LOGIN_PATH,
        post(|| async { Json(json!({"message": "ok", "success": true})) }),
    );
    let api = client(spawn_backend(app).await);

    let request = validate_login("investor@example.com", "pw").unwrap();
    let err = api.login(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed: no token in response");
}
