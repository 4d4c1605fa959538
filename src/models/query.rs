use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 100;

/// Raw filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub load_type: Option<String>,
    pub dow: Option<String>,
    pub weekend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for RecordsQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    pub metric: Option<String>,
}
