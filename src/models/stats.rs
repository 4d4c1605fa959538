use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NO_DATA_MESSAGE: &str = "No data after filtering.";
pub const INVALID_METRIC_MESSAGE: &str = "Invalid metric";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    Sum,
    #[default]
    Mean,
    Median,
    Min,
    Max,
}

impl Metric {
    /// Resolve a metric by its query-string name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(Metric::Sum),
            "mean" => Some(Metric::Mean),
            "median" => Some(Metric::Median),
            "min" => Some(Metric::Min),
            "max" => Some(Metric::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Sum => "sum",
            Metric::Mean => "mean",
            Metric::Median => "median",
            Metric::Min => "min",
            Metric::Max => "max",
        }
    }
}

/// Body of `/stats`. Failures are reported as data, not as HTTP errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatResponse {
    Value { metric: String, value: f64 },
    Error { error: String },
}

impl StatResponse {
    pub fn error(message: &str) -> Self {
        StatResponse::Error {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in [
            Metric::Sum,
            Metric::Mean,
            Metric::Median,
            Metric::Min,
            Metric::Max,
        ] {
            assert_eq!(Metric::from_name(metric.as_str()), Some(metric));
        }
        assert_eq!(Metric::from_name("avg"), None);
        assert_eq!(Metric::from_name("MEAN"), None);
        assert_eq!(Metric::default(), Metric::Mean);
    }

    #[test]
    fn test_stat_response_shapes() {
        let value = StatResponse::Value {
            metric: "sum".to_string(),
            value: 60.0,
        };
        assert_eq!(
            serde_json::to_value(value).unwrap(),
            json!({"metric": "sum", "value": 60.0})
        );
        assert_eq!(
            serde_json::to_value(StatResponse::error(NO_DATA_MESSAGE)).unwrap(),
            json!({"error": "No data after filtering."})
        );
    }

    #[test]
    fn test_daily_value_date_format() {
        let daily = DailyValue {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            value: 5.0,
        };
        assert_eq!(
            serde_json::to_value(daily).unwrap(),
            json!({"date": "2024-01-03", "value": 5.0})
        );
    }
}
