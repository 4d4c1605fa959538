use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};

use crate::error::Result;
use crate::models::{DailyValue, FilterParams, Record, RecordsQuery, StatResponse, StatsQuery};
use crate::services::UsageService;

pub async fn list_records(
    State(service): State<UsageService>,
    Query(filter): Query<FilterParams>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Vec<Record>>> {
    let records = service.daily_first_records(&filter, query.limit)?;
    Ok(Json(records))
}

pub async fn get_stat(
    State(service): State<UsageService>,
    Query(filter): Query<FilterParams>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatResponse>> {
    let response = service.stat(&filter, query.metric.as_deref())?;
    Ok(Json(response))
}

pub async fn get_daily_mean(
    State(service): State<UsageService>,
    Query(filter): Query<FilterParams>,
) -> Result<Json<Vec<DailyValue>>> {
    let series = service.daily_mean(&filter)?;
    Ok(Json(series))
}

pub async fn health(State(service): State<UsageService>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "records": service.dataset().len(),
        })),
    )
}
