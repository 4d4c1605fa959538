use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

/// One row of the power-usage dataset.
///
/// Serializes back under the original CSV column names so clients see the
/// same shape they would get from the raw file. Columns the query pipeline
/// does not interpret are carried verbatim in `extra`, in CSV header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "date")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "Usage_kWh")]
    pub usage_kwh: Option<f64>,
    #[serde(rename = "Load_Type")]
    pub load_type: String,
    #[serde(rename = "Day_of_week")]
    pub day_of_week: String,
    #[serde(rename = "WeekStatus")]
    pub week_status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Calendar day bucket of this record, if the timestamp parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        let mut extra = Map::new();
        extra.insert("NSM".to_string(), json!(900));
        extra.insert("CO2(tCO2)".to_string(), json!(0.0));
        Record {
            timestamp: NaiveDate::from_ymd_opt(2018, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 15, 0)),
            usage_kwh: Some(3.17),
            load_type: "Light_Load".to_string(),
            day_of_week: "Monday".to_string(),
            week_status: "Weekday".to_string(),
            extra,
        }
    }

    #[test]
    fn test_serializes_with_original_column_names() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["date"], json!("2018-01-01T00:15:00"));
        assert_eq!(value["Usage_kWh"], json!(3.17));
        assert_eq!(value["Load_Type"], json!("Light_Load"));
        assert_eq!(value["Day_of_week"], json!("Monday"));
        assert_eq!(value["WeekStatus"], json!("Weekday"));
        assert_eq!(value["NSM"], json!(900));
        assert_eq!(value["CO2(tCO2)"], json!(0.0));
    }

    #[test]
    fn test_passthrough_columns_serialize_in_insertion_order() {
        let body = serde_json::to_string(&sample()).unwrap();

        let nsm = body.find("\"NSM\"").unwrap();
        let co2 = body.find("\"CO2(tCO2)\"").unwrap();
        assert!(nsm < co2, "passthrough columns reordered: {body}");
    }

    #[test]
    fn test_missing_timestamp_serializes_as_null() {
        let record = Record {
            timestamp: None,
            ..sample()
        };
        let value = serde_json::to_value(&record).unwrap();

        assert!(value["date"].is_null());
        assert_eq!(record.date(), None);
    }

    #[test]
    fn test_date_discards_time_of_day() {
        assert_eq!(sample().date(), NaiveDate::from_ymd_opt(2018, 1, 1));
    }
}
