use std::future::Future;

use super::error::ServiceError;
use super::session::BearerToken;
use super::types::{Metrics, RiskAssessmentRequest, SimulationRequest};
use super::validate::ValidatedInput;

/// Remote computation behind the forms. The HTTP client implements it; tests
/// substitute in-process fakes.
pub trait ComputationService {
    fn assess_risk(
        &self,
        request: &RiskAssessmentRequest,
    ) -> impl Future<Output = Result<Metrics, ServiceError>> + Send;

    fn simulate(
        &self,
        request: &SimulationRequest,
        token: &BearerToken,
    ) -> impl Future<Output = Result<Metrics, ServiceError>> + Send;
}

pub(crate) async fn dispatch<S: ComputationService>(
    service: &S,
    input: &ValidatedInput,
) -> Result<Metrics, ServiceError> {
    match input {
        ValidatedInput::RiskAssessment(request) => service.assess_risk(request).await,
        ValidatedInput::Simulation { request, token } => service.simulate(request, token).await,
    }
}
