pub mod query;
pub mod record;
pub mod stats;

pub use query::{FilterParams, RecordsQuery, StatsQuery, DEFAULT_LIMIT};
pub use record::Record;
pub use stats::{DailyValue, Metric, StatResponse};
