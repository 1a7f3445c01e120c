//! Climate table endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use climate_common::DashboardError;
use csv_loader::{SeriesFilter, SeriesPoint, TableSummary};
use dashboard_core::{series_points, table_summary};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters of `/api/table/series`. Missing values select everything.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub start: Option<i32>,
    pub end: Option<i32>,
    /// Comma-separated column names
    pub columns: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub filter: SeriesFilter,
    pub points: Vec<SeriesPoint>,
}

/// Turn query parameters into a filter over a table with `summary`.
pub fn build_filter(query: &SeriesQuery, summary: &TableSummary) -> ApiResult<SeriesFilter> {
    let start = query.start.or(summary.year_min).unwrap_or(0);
    let end = query.end.or(summary.year_max).unwrap_or(-1);
    if query.start.is_some() && query.end.is_some() && start > end {
        return Err(ApiError::BadRequest(format!(
            "start year {} is after end year {}",
            start, end
        )));
    }

    let columns = match &query.columns {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect(),
        None => summary.columns.clone(),
    };

    Ok(SeriesFilter::new(start, end, columns))
}

fn table_unavailable(error: Option<&DashboardError>) -> ApiError {
    error
        .cloned()
        .unwrap_or_else(|| DashboardError::NotFound("climate table has not been loaded".to_string()))
        .into()
}

/// GET /api/table - Year range and series columns
pub async fn table_handler(Extension(state): Extension<Arc<AppState>>) -> ApiResult<Json<TableSummary>> {
    state.metrics.record_request("table");
    let session = state.session.read().await;
    let table = session
        .table()
        .ok_or_else(|| table_unavailable(session.table_error()))?;
    Ok(Json(table_summary(table)))
}

/// GET /api/table/series - Filtered `(year, value, series)` points
pub async fn series_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> ApiResult<Json<SeriesResponse>> {
    state.metrics.record_request("table_series");
    let Query(query) = query?;
    let session = state.session.read().await;
    let table = session
        .table()
        .ok_or_else(|| table_unavailable(session.table_error()))?;

    let filter = build_filter(&query, &table.summary())?;
    let points = series_points(table, &filter);
    Ok(Json(SeriesResponse { filter, points }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> TableSummary {
        TableSummary {
            key: "Year".to_string(),
            year_min: Some(1950),
            year_max: Some(2100),
            columns: vec!["Observed".to_string(), "RCP 8.5".to_string()],
            rows: 151,
            dropped_rows: 0,
        }
    }

    #[test]
    fn test_filter_defaults_to_everything() {
        let filter = build_filter(&SeriesQuery::default(), &summary()).unwrap();
        assert_eq!(filter, SeriesFilter::new(1950, 2100, summary().columns));
    }

    #[test]
    fn test_filter_from_query() {
        let query = SeriesQuery {
            start: Some(2000),
            end: None,
            columns: Some(" RCP 8.5 ,,".to_string()),
        };
        let filter = build_filter(&query, &summary()).unwrap();
        assert_eq!(filter, SeriesFilter::new(2000, 2100, vec!["RCP 8.5".to_string()]));
    }

    #[test]
    fn test_inverted_interval_is_bad_request() {
        let query = SeriesQuery {
            start: Some(2050),
            end: Some(2000),
            columns: None,
        };
        assert!(matches!(
            build_filter(&query, &summary()),
            Err(ApiError::BadRequest(_))
        ));
    }
}
