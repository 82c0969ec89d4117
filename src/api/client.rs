use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::wire::{LoginResponse, SimulationEnvelope, login_failure_message};
use crate::core::{
    BearerToken, ComputationService, LoginRequest, Metrics, RiskAssessmentRequest, ServiceError,
    Session, SimulationRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const LOGIN_PATH: &str = "/auth/login";
pub const RISK_ASSESSMENT_PATH: &str = "/risk-assessment/risk-assessment";
pub const SIMULATE_PATH: &str = "/simulate";

const RISK_ASSESSMENT_FAILED: &str = "Failed to fetch risk assessment.";
const SIMULATION_FAILED: &str = "Simulation failed. Check input values.";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the auth, risk-assessment and simulation endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ServiceError> {
        let body = match self.post_json(LOGIN_PATH, request, None).await {
            Ok(body) => body,
            Err(ServiceError::Status { status, message }) => {
                let reason = login_failure_message(&message)
                    .unwrap_or_else(|| format!("server responded with status {status}"));
                return Err(ServiceError::Login(reason));
            }
            Err(other) => return Err(ServiceError::Login(other.to_string())),
        };

        let response: LoginResponse = decode(&body)?;
        if response.success == Some(false) {
            let reason = response
                .message
                .unwrap_or_else(|| "server rejected the credentials".to_string());
            return Err(ServiceError::Login(reason));
        }
        let Some(token) = response.token.and_then(BearerToken::new) else {
            return Err(ServiceError::Login("no token in response".to_string()));
        };

        info!(user = response.name.as_deref().unwrap_or("-"), "logged in");
        Ok(Session::authenticated(token, response.name))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Posts `body` as JSON and returns the raw response text. Non-2xx
    /// responses become `ServiceError::Status` carrying the body text.
    async fn post_json<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<String, ServiceError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        debug!(path, "dispatching request");
        let resp = request.send().await.map_err(transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "remote service returned an error");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}

impl ComputationService for ApiClient {
    async fn assess_risk(&self, request: &RiskAssessmentRequest) -> Result<Metrics, ServiceError> {
        let body = self
            .post_json(RISK_ASSESSMENT_PATH, request, None)
            .await
            .map_err(|e| with_fallback_message(e, RISK_ASSESSMENT_FAILED))?;
        decode(&body)
    }

    async fn simulate(
        &self,
        request: &SimulationRequest,
        token: &BearerToken,
    ) -> Result<Metrics, ServiceError> {
        let body = self
            .post_json(SIMULATE_PATH, request, Some(token))
            .await
            .map_err(|e| with_fallback_message(e, SIMULATION_FAILED))?;
        let envelope: SimulationEnvelope = decode(&body)?;
        Ok(envelope.data)
    }
}

fn with_fallback_message(err: ServiceError, fallback: &str) -> ServiceError {
    match err {
        ServiceError::Status { status, message } if message.trim().is_empty() => {
            ServiceError::Status {
                status,
                message: fallback.to_string(),
            }
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))
}

fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}
