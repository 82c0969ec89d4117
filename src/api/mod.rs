mod client;
mod wire;

pub use client::{
    ApiClient, ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, LOGIN_PATH, RISK_ASSESSMENT_PATH,
    SIMULATE_PATH,
};
