use thiserror::Error;

use super::types::AssetClass;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("{asset} must be between 0 and 100, got {value}")]
    OutOfRange { asset: AssetClass, value: u32 },

    #[error("asset allocation cannot exceed 100%, got {total}%")]
    ExceedsCeiling { total: u32 },
}

/// Local failures detected before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid investment amount.")]
    InvalidInvestmentAmount,

    #[error("{years} years is not an available duration")]
    UnsupportedDuration { years: u32 },

    #[error("Total asset allocation must sum to 100%.")]
    AllocationTotal { total: u32 },

    #[error("Unauthorized: Please log in to access this feature.")]
    Unauthorized,

    #[error("All Fields are required")]
    MissingCredentials,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Failures reported after a request has been dispatched.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("Login failed: {0}")]
    Login(String),
}
