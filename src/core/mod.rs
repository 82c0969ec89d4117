mod allocation;
mod error;
mod form;
mod render;
mod service;
mod session;
mod types;
mod validate;

pub use allocation::{AllocationChange, AllocationSet};
pub use error::{AllocationError, ServiceError, ValidationError};
pub use form::{
    AllocationForm, FormState, PendingSubmission, SubmitOutcome, SubmitPhase, SubmitRejected,
};
pub use render::{ChartPoint, format_metric, format_metric_value, ordered_metrics, portfolio_series};
pub use service::ComputationService;
pub use session::{BearerToken, Session};
pub use types::{
    ASSESSMENT_DURATIONS, AssetClass, FormVariant, LoginRequest, MAX_PERCENT, MarketCondition,
    MetricValue, Metrics, RiskAssessmentRequest, SIMULATION_DURATION_RANGE, SimulationRequest,
    metric,
};
pub use validate::{ValidatedInput, validate, validate_login};
