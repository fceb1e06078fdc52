use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::{
    auth::jwt::AuthUser,
    state::AppState,
    stats::{
        buckets::{self, WeekdayCount},
        repo::{self, LocationRank, Overall},
    },
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DailyAverage {
    pub day: String,
    pub average_frequency: f64,
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/weekly", get(weekly))
        .route("/stats/overview", get(overview))
        .route("/stats/locations", get(locations))
        .route("/stats/daily", get(daily))
}

/// Dense Monday..Sunday reading counts for the current UTC week.
#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<WeekdayCount>>, (StatusCode, String)> {
    let start = buckets::week_start(OffsetDateTime::now_utc().date());
    let since = start.midnight().assume_utc();
    let rows = repo::readings_per_day_since(&state.db, since)
        .await
        .map_err(internal)?;
    let per_day: Vec<_> = rows.into_iter().map(|r| (r.day, r.readings)).collect();
    Ok(Json(buckets::dense_week(start, &per_day)))
}

#[instrument(skip(state))]
pub async fn overview(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Overall>, (StatusCode, String)> {
    let overall = repo::overall(&state.db).await.map_err(internal)?;
    Ok(Json(overall))
}

#[instrument(skip(state))]
pub async fn locations(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<LocationRank>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(5).clamp(1, 50);
    let ranked = repo::top_locations(&state.db, limit)
        .await
        .map_err(internal)?;
    Ok(Json(ranked))
}

#[instrument(skip(state))]
pub async fn daily(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<DailyAverage>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(30).clamp(1, 365);
    let mut rows = repo::daily_averages(&state.db, limit)
        .await
        .map_err(internal)?;
    // Query returns newest-first so LIMIT keeps the recent days; the view
    // is chronological.
    rows.reverse();
    let days = rows
        .into_iter()
        .map(|r| DailyAverage {
            day: r.day.to_string(),
            average_frequency: r.average_frequency,
        })
        .collect();
    Ok(Json(days))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    error!(error = %e, "stats query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}
