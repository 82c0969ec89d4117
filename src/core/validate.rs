use std::sync::LazyLock;

use regex::Regex;

use super::error::ValidationError;
use super::form::FormState;
use super::session::{BearerToken, Session};
use super::types::{
    AssetClass, FormVariant, LoginRequest, MAX_PERCENT, RiskAssessmentRequest, SimulationRequest,
};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-zA-Z0-9_\-\.]+)@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.)|(([a-zA-Z0-9\-]+\.)+))([a-zA-Z]{2,}|[0-9]{1,3})(\]?)$",
    )
    .expect("valid email pattern")
});

/// Snapshot of a form that passed every local check and may be dispatched.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidatedInput {
    RiskAssessment(RiskAssessmentRequest),
    Simulation {
        request: SimulationRequest,
        token: BearerToken,
    },
}

pub fn validate(state: &FormState, session: &Session) -> Result<ValidatedInput, ValidationError> {
    let investment_amount = match state.investment_amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => amount,
        _ => return Err(ValidationError::InvalidInvestmentAmount),
    };

    let duration = state
        .variant
        .normalize_duration(state.duration)
        .filter(|&years| years == state.duration)
        .ok_or(ValidationError::UnsupportedDuration {
            years: state.duration,
        })?;

    let risk_appetite = state.risk_appetite.min(MAX_PERCENT);
    let allocation = &state.allocation;

    match state.variant {
        // The per-drag ceiling already keeps this total at or below 100.
        FormVariant::RiskAssessment => Ok(ValidatedInput::RiskAssessment(RiskAssessmentRequest {
            investment_amount,
            duration,
            risk_appetite,
            stocks: allocation.get(AssetClass::Stocks),
            bonds: allocation.get(AssetClass::Bonds),
            real_estate: allocation.get(AssetClass::RealEstate),
            commodities: allocation.get(AssetClass::Commodities),
        })),
        FormVariant::Simulation => {
            let total = allocation.total();
            if total != u32::from(MAX_PERCENT) {
                return Err(ValidationError::AllocationTotal { total });
            }
            let token = session
                .token()
                .cloned()
                .ok_or(ValidationError::Unauthorized)?;

            Ok(ValidatedInput::Simulation {
                request: SimulationRequest {
                    investment_amount,
                    duration,
                    risk_appetite: f64::from(risk_appetite) / 100.0,
                    market_condition: state.market_condition.unwrap_or_default(),
                    stocks: allocation.get(AssetClass::Stocks),
                    bonds: allocation.get(AssetClass::Bonds),
                    real_estate: allocation.get(AssetClass::RealEstate),
                    commodities: allocation.get(AssetClass::Commodities),
                },
                token,
            })
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}
