use thiserror::Error;
use tracing::{debug, info, warn};

use super::allocation::{AllocationChange, AllocationSet};
use super::error::{AllocationError, ServiceError, ValidationError};
use super::service::{ComputationService, dispatch};
use super::session::Session;
use super::types::{
    AssetClass, DEFAULT_INVESTMENT_DURATION, DEFAULT_RISK_APPETITE, FormVariant, MAX_PERCENT,
    MarketCondition, Metrics,
};
use super::validate::{ValidatedInput, validate};

#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub variant: FormVariant,
    pub investment_amount: Option<f64>,
    pub duration: u32,
    pub risk_appetite: u8,
    pub allocation: AllocationSet,
    pub market_condition: Option<MarketCondition>,
}

impl FormState {
    pub fn defaults(variant: FormVariant) -> Self {
        Self {
            variant,
            investment_amount: None,
            duration: DEFAULT_INVESTMENT_DURATION,
            risk_appetite: DEFAULT_RISK_APPETITE,
            allocation: AllocationSet::default(),
            market_condition: variant.default_market_condition(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    InFlight,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Ticket for a dispatched submission. Hand it back to
/// [`AllocationForm::finish_submit`] with the service outcome.
#[derive(Debug)]
pub struct PendingSubmission {
    input: ValidatedInput,
    generation: u64,
}

impl PendingSubmission {
    pub fn input(&self) -> &ValidatedInput {
        &self.input
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed,
    Invalid,
    /// Dropped because another submission was in flight.
    Ignored,
    /// The form was reset while the request was in flight.
    Stale,
}

/// One form instance: inputs, the latest result, and the submit lifecycle.
#[derive(Debug)]
pub struct AllocationForm {
    state: FormState,
    phase: SubmitPhase,
    result: Option<Metrics>,
    error: Option<String>,
    generation: u64,
}

impl AllocationForm {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            state: FormState::defaults(variant),
            phase: SubmitPhase::Idle,
            result: None,
            error: None,
            generation: 0,
        }
    }

    pub fn risk_assessment() -> Self {
        Self::new(FormVariant::RiskAssessment)
    }

    pub fn simulation() -> Self {
        Self::new(FormVariant::Simulation)
    }

    /// Seeds the whole allocation at once. The risk form keeps its ceiling;
    /// the simulation form accepts any total and checks it on submit.
    pub fn with_allocation(mut self, allocation: AllocationSet) -> Result<Self, AllocationError> {
        if self.state.variant == FormVariant::RiskAssessment {
            allocation.ensure_within_ceiling()?;
        }
        self.state.allocation = allocation;
        Ok(self)
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn variant(&self) -> FormVariant {
        self.state.variant
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// True while a submission is in flight; the submit control stays disabled.
    pub fn is_loading(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn result(&self) -> Option<&Metrics> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn touch(&mut self) {
        if matches!(self.phase, SubmitPhase::Succeeded | SubmitPhase::Failed) {
            self.phase = SubmitPhase::Idle;
        }
    }

    pub fn set_allocation(&mut self, asset: AssetClass, value: u32) -> AllocationChange {
        self.touch();
        self.state.allocation.set_allocation(asset, value)
    }

    pub fn set_investment_amount(&mut self, amount: Option<f64>) {
        self.touch();
        self.state.investment_amount = amount;
    }

    pub fn set_duration(&mut self, years: u32) -> Result<u32, ValidationError> {
        self.touch();
        let duration = self
            .state
            .variant
            .normalize_duration(years)
            .ok_or(ValidationError::UnsupportedDuration { years })?;
        self.state.duration = duration;
        Ok(duration)
    }

    pub fn set_risk_appetite(&mut self, percent: u32) -> u8 {
        self.touch();
        let clamped = percent.min(u32::from(MAX_PERCENT)) as u8;
        self.state.risk_appetite = clamped;
        clamped
    }

    /// Back to defaults. A response still in flight is discarded on arrival.
    pub fn reset(&mut self) {
        self.state = FormState::defaults(self.state.variant);
        self.phase = SubmitPhase::Idle;
        self.result = None;
        self.error = None;
        self.generation += 1;
    }

    pub fn begin_submit(&mut self, session: &Session) -> Result<PendingSubmission, SubmitRejected> {
        if self.phase == SubmitPhase::Submitting {
            debug!(form = self.variant().name(), "submit ignored, request in flight");
            return Err(SubmitRejected::InFlight);
        }

        self.error = None;
        match validate(&self.state, session) {
            Ok(input) => {
                self.phase = SubmitPhase::Submitting;
                Ok(PendingSubmission {
                    input,
                    generation: self.generation,
                })
            }
            Err(err) => {
                debug!(form = self.variant().name(), error = %err, "submit rejected locally");
                self.error = Some(err.to_string());
                self.phase = SubmitPhase::Failed;
                Err(SubmitRejected::Invalid(err))
            }
        }
    }

    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<Metrics, ServiceError>,
    ) -> SubmitOutcome {
        if pending.generation != self.generation {
            debug!(form = self.variant().name(), "discarding response for a reset form");
            return SubmitOutcome::Stale;
        }

        match outcome {
            Ok(metrics) => {
                info!(
                    form = self.variant().name(),
                    metrics = metrics.len(),
                    "submission succeeded"
                );
                self.result = Some(metrics);
                self.error = None;
                self.phase = SubmitPhase::Succeeded;
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                warn!(form = self.variant().name(), error = %err, "submission failed");
                self.error = Some(err.to_string());
                self.phase = SubmitPhase::Failed;
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit<S: ComputationService>(
        &mut self,
        service: &S,
        session: &Session,
    ) -> SubmitOutcome {
        let pending = match self.begin_submit(session) {
            Ok(pending) => pending,
            Err(SubmitRejected::InFlight) => return SubmitOutcome::Ignored,
            Err(SubmitRejected::Invalid(_)) => return SubmitOutcome::Invalid,
        };
        let outcome = dispatch(service, pending.input()).await;
        self.finish_submit(pending, outcome)
    }
}
