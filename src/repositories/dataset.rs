use crate::error::{AppError, Result};
use crate::models::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const WEEKEND: &str = "Weekend";
pub const WEEKDAY: &str = "Weekday";

const DATE_COLUMN: &str = "date";
const USAGE_COLUMN: &str = "Usage_kWh";
const LOAD_TYPE_COLUMN: &str = "Load_Type";
const DAY_OF_WEEK_COLUMN: &str = "Day_of_week";
const WEEK_STATUS_COLUMN: &str = "WeekStatus";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a timestamp in any of the accepted layouts.
///
/// Used for both dataset rows and caller-supplied range bounds. A bare date
/// resolves to midnight; RFC 3339 input keeps its wall-clock time and drops
/// the offset.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Blank, unparseable and non-finite values (`NaN`, `inf`) are all missing.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

fn passthrough_value(s: &str) -> serde_json::Value {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return serde_json::Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return serde_json::Value::from(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Err(_) => serde_json::Value::String(trimmed.to_string()),
    }
}

/// Column positions resolved once from the header row.
struct ColumnLayout {
    date: usize,
    usage: usize,
    load_type: usize,
    day_of_week: usize,
    week_status: usize,
    passthrough: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AppError::Dataset(format!("missing column '{name}' in CSV header")))
        };

        let date = position(DATE_COLUMN)?;
        let usage = position(USAGE_COLUMN)?;
        let load_type = position(LOAD_TYPE_COLUMN)?;
        let day_of_week = position(DAY_OF_WEEK_COLUMN)?;
        let week_status = position(WEEK_STATUS_COLUMN)?;

        let known = [date, usage, load_type, day_of_week, week_status];
        let passthrough = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !known.contains(idx))
            .map(|(idx, name)| (idx, name.trim().to_string()))
            .collect();

        Ok(Self {
            date,
            usage,
            load_type,
            day_of_week,
            week_status,
            passthrough,
        })
    }

    fn to_record(&self, row: &StringRecord) -> Record {
        let field = |idx: usize| row.get(idx).unwrap_or("");

        Record {
            timestamp: parse_timestamp(field(self.date)),
            usage_kwh: parse_optional_f64(field(self.usage)),
            load_type: field(self.load_type).trim().to_string(),
            day_of_week: field(self.day_of_week).trim().to_string(),
            week_status: field(self.week_status).trim().to_string(),
            extra: self
                .passthrough
                .iter()
                .map(|(idx, name)| (name.clone(), passthrough_value(field(*idx))))
                .collect(),
        }
    }
}

/// The immutable, in-memory power-usage table.
///
/// Built once at startup. Exposes records only by shared reference, so
/// neither the rows nor their order can change after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::Dataset(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let layout = ColumnLayout::from_headers(rdr.headers()?)?;

        let records = rdr
            .records()
            .map(|row| row.map(|row| layout.to_record(&row)))
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows whose timestamp could not be parsed.
    pub fn missing_timestamps(&self) -> usize {
        self.records.iter().filter(|r| r.timestamp.is_none()).count()
    }

    /// Day-of-week distribution of rows marked as weekend.
    pub fn weekend_day_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.week_status == WEEKEND) {
            *counts.entry(record.day_of_week.clone()).or_insert(0) += 1;
        }
        counts
    }
}
