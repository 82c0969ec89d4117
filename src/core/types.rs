use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MAX_PERCENT: u8 = 100;

pub const DEFAULT_INVESTMENT_DURATION: u32 = 5;
pub const DEFAULT_RISK_APPETITE: u8 = 50;

/// Durations offered by the risk-assessment form.
pub const ASSESSMENT_DURATIONS: [u32; 3] = [5, 10, 20];

/// Years accepted by the simulation form; out-of-range input is clamped.
pub const SIMULATION_DURATION_RANGE: RangeInclusive<u32> = 1..=20;

pub mod metric {
    pub const TOTAL_PROFIT: &str = "Total Profit";
    pub const MAX_DRAWDOWN_PCT: &str = "Max Drawdown (%)";
    pub const RISK_SCORE: &str = "Risk Score";
    pub const VOLATILITY_SCORE: &str = "Volatility Score";
    pub const ROI_PCT: &str = "ROI (%)";
    pub const YEARLY_PORTFOLIO_VALUES: &str = "Yearly Portfolio Values";
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    RealEstate,
    Commodities,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::RealEstate,
        AssetClass::Commodities,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::RealEstate => "real_estate",
            AssetClass::Commodities => "commodities",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            AssetClass::Stocks => 0,
            AssetClass::Bonds => 1,
            AssetClass::RealEstate => 2,
            AssetClass::Commodities => 3,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stocks" => Ok(AssetClass::Stocks),
            "bonds" => Ok(AssetClass::Bonds),
            "real_estate" | "realEstate" | "real-estate" => Ok(AssetClass::RealEstate),
            "commodities" => Ok(AssetClass::Commodities),
            other => Err(format!("unknown asset class '{other}'")),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    Bull,
    Bear,
    #[default]
    Neutral,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormVariant {
    RiskAssessment,
    Simulation,
}

impl FormVariant {
    /// Maps requested years onto what the form accepts. The risk form only
    /// offers fixed horizons; the simulation form clamps into its range.
    pub fn normalize_duration(self, years: u32) -> Option<u32> {
        match self {
            FormVariant::RiskAssessment => ASSESSMENT_DURATIONS.contains(&years).then_some(years),
            FormVariant::Simulation => Some(years.clamp(
                *SIMULATION_DURATION_RANGE.start(),
                *SIMULATION_DURATION_RANGE.end(),
            )),
        }
    }

    pub fn default_market_condition(self) -> Option<MarketCondition> {
        match self {
            FormVariant::RiskAssessment => None,
            FormVariant::Simulation => Some(MarketCondition::Neutral),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormVariant::RiskAssessment => "risk-assessment",
            FormVariant::Simulation => "simulation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Series(Vec<f64>),
    Other(serde_json::Value),
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<Vec<f64>> for MetricValue {
    fn from(value: Vec<f64>) -> Self {
        MetricValue::Series(value)
    }
}

/// Named metrics returned by the remote services, kept as received.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, MetricValue>);

impl Metrics {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            MetricValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        match self.0.get(name)? {
            MetricValue::Series(values) => Some(values),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Metrics(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessmentRequest {
    pub investment_amount: f64,
    pub duration: u32,
    pub risk_appetite: u8,
    pub stocks: u8,
    pub bonds: u8,
    pub real_estate: u8,
    pub commodities: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub investment_amount: f64,
    pub duration: u32,
    /// Fraction in `[0, 1]`.
    pub risk_appetite: f64,
    pub market_condition: MarketCondition,
    pub stocks: u8,
    pub bonds: u8,
    pub real_estate: u8,
    pub commodities: u8,
}

#[derive(Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
