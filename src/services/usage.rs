use crate::error::Result;
use crate::models::stats::{INVALID_METRIC_MESSAGE, NO_DATA_MESSAGE};
use crate::models::{DailyValue, FilterParams, Metric, Record, StatResponse};
use crate::repositories::Dataset;
use crate::services::filter::FilterSpec;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

const STAT_DECIMALS: i32 = 3;
const DAILY_DECIMALS: i32 = 2;

#[derive(Clone)]
pub struct UsageService {
    dataset: Arc<Dataset>,
}

impl UsageService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn filtered(&self, params: &FilterParams) -> Result<Vec<&Record>> {
        let spec = FilterSpec::from_params(params)?;
        let filtered = spec.apply(self.dataset.records());
        tracing::debug!(
            total = self.dataset.len(),
            matched = filtered.len(),
            "applied filters"
        );
        Ok(filtered)
    }

    /// Earliest record of each calendar day, oldest day first.
    pub fn daily_first_records(&self, params: &FilterParams, limit: usize) -> Result<Vec<Record>> {
        let filtered = self.filtered(params)?;
        Ok(daily_first(&filtered, limit).into_iter().cloned().collect())
    }

    /// Scalar statistic over `usage_kwh`. `metric` defaults to the mean.
    pub fn stat(&self, params: &FilterParams, metric: Option<&str>) -> Result<StatResponse> {
        let filtered = self.filtered(params)?;
        if filtered.is_empty() {
            return Ok(StatResponse::error(NO_DATA_MESSAGE));
        }

        let name = metric.unwrap_or(Metric::default().as_str());
        let Some(metric) = Metric::from_name(name) else {
            tracing::debug!(metric = name, "rejected unknown metric");
            return Ok(StatResponse::error(INVALID_METRIC_MESSAGE));
        };

        let values: Vec<f64> = filtered.iter().filter_map(|r| r.usage_kwh).collect();
        Ok(match aggregate(&values, metric) {
            Some(value) => StatResponse::Value {
                metric: metric.as_str().to_string(),
                value: round_to(value, STAT_DECIMALS),
            },
            None => StatResponse::error(NO_DATA_MESSAGE),
        })
    }

    pub fn daily_mean(&self, params: &FilterParams) -> Result<Vec<DailyValue>> {
        let filtered = self.filtered(params)?;
        Ok(daily_means(&filtered))
    }
}

/// Pick the earliest record per calendar day and return them in ascending
/// timestamp order, truncated to `limit`. Rows without a timestamp have no
/// day and are skipped. On equal timestamps the first in input order wins.
pub fn daily_first<'a>(records: &[&'a Record], limit: usize) -> Vec<&'a Record> {
    let mut firsts: BTreeMap<NaiveDate, &'a Record> = BTreeMap::new();
    for &record in records {
        let Some(ts) = record.timestamp else {
            continue;
        };
        firsts
            .entry(ts.date())
            .and_modify(|current| {
                if current.timestamp.is_some_and(|cur| ts < cur) {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    // Day keys ascend, so the per-day minimum timestamps ascend too.
    firsts.into_values().take(limit).collect()
}

/// Compute `metric` over `values`. `None` when there is nothing to aggregate.
pub fn aggregate(values: &[f64], metric: Metric) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let value: f64 = match metric {
        Metric::Sum => values.iter().sum(),
        Metric::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Metric::Median => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            }
        }
        Metric::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Metric::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };

    Some(value)
}

/// Mean `usage_kwh` per calendar day. Days without any usable reading are
/// left out rather than reported as zero.
pub fn daily_means(records: &[&Record]) -> Vec<DailyValue> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        let (Some(date), Some(usage)) = (record.date(), record.usage_kwh) else {
            continue;
        };
        let bucket = buckets.entry(date).or_insert((0.0, 0));
        bucket.0 += usage;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (sum, count))| DailyValue {
            date,
            value: round_to(sum / count as f64, DAILY_DECIMALS),
        })
        .collect()
}

/// Round to `decimals` places, sending exact halves to the even neighbour.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
