use serde::Serialize;

use super::types::{MetricValue, Metrics, metric};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Formats a value with Indian digit grouping and two decimals,
/// e.g. `1234567.891` becomes `12,34,567.89`.
pub fn format_metric(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    format!("{sign}{}.{frac_part}", group_indian(int_part))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Display order of the metrics the services are known to return. Anything
/// else follows, alphabetically.
const DISPLAY_ORDER: [&str; 6] = [
    metric::TOTAL_PROFIT,
    metric::MAX_DRAWDOWN_PCT,
    metric::RISK_SCORE,
    metric::VOLATILITY_SCORE,
    metric::ROI_PCT,
    metric::YEARLY_PORTFOLIO_VALUES,
];

pub fn ordered_metrics(metrics: &Metrics) -> Vec<(&str, &MetricValue)> {
    let known = DISPLAY_ORDER
        .iter()
        .filter_map(|&name| metrics.get(name).map(|value| (name, value)));
    let rest = metrics
        .iter()
        .filter(|(name, _)| !DISPLAY_ORDER.contains(name));
    known.chain(rest).collect()
}

pub fn format_metric_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(v) => format_metric(*v),
        MetricValue::Series(values) => values
            .iter()
            .map(|v| format_metric(*v))
            .collect::<Vec<_>>()
            .join(", "),
        MetricValue::Other(raw) => raw.to_string(),
    }
}

/// Points for the portfolio-value chart: the initial investment followed by
/// one point per simulated year, capped at the requested duration.
pub fn portfolio_series(investment: f64, duration_years: u32, metrics: &Metrics) -> Vec<ChartPoint> {
    let yearly = metrics
        .series(metric::YEARLY_PORTFOLIO_VALUES)
        .unwrap_or_default();

    std::iter::once(ChartPoint {
        label: "Start".to_string(),
        value: investment,
    })
    .chain(
        yearly
            .iter()
            .take(duration_years as usize)
            .enumerate()
            .map(|(i, &value)| ChartPoint {
                label: format!("Year {}", i + 1),
                value,
            }),
    )
    .collect()
}
