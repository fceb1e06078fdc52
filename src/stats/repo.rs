use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, FromRow)]
pub struct DayCount {
    pub day: Date,
    pub readings: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DayAverage {
    pub day: Date,
    pub average_frequency: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocationRank {
    pub id: i64,
    pub country: String,
    pub state: String,
    pub city: String,
    pub readings: i64,
    pub average_frequency: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Overall {
    pub total_readings: i64,
    pub average_frequency: f64,
    pub total_assemblies: i64,
}

/// Reading counts per UTC calendar day, for readings at or after `since`.
/// Sparse: days without readings are absent.
pub async fn readings_per_day_since(
    db: &PgPool,
    since: OffsetDateTime,
) -> sqlx::Result<Vec<DayCount>> {
    sqlx::query_as::<_, DayCount>(
        r#"
        SELECT (register_date AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS readings
        FROM readings
        WHERE register_date >= $1
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await
}

/// Totals over the whole platform. AVG of an empty set is NULL, coalesced
/// to 0 here so the empty platform reports a zero mean.
pub async fn overall(db: &PgPool) -> sqlx::Result<Overall> {
    sqlx::query_as::<_, Overall>(
        r#"
        SELECT (SELECT COUNT(*) FROM readings) AS total_readings,
               COALESCE((SELECT AVG(frequency) FROM readings), 0) AS average_frequency,
               (SELECT COUNT(*) FROM assemblies) AS total_assemblies
        "#,
    )
    .fetch_one(db)
    .await
}

/// Locations ranked by reading count, ties broken by ascending id so the
/// ranking is stable across runs.
pub async fn top_locations(db: &PgPool, limit: i64) -> sqlx::Result<Vec<LocationRank>> {
    sqlx::query_as::<_, LocationRank>(
        r#"
        SELECT l.id, l.country, l.state, l.city,
               COUNT(r.id) AS readings,
               AVG(r.frequency) AS average_frequency
        FROM locations l
        JOIN readings r ON r.location_id = l.id
        GROUP BY l.id, l.country, l.state, l.city
        ORDER BY readings DESC, l.id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

/// Mean frequency per UTC calendar day for the most recent `limit` distinct
/// days, newest first. The handler reverses into chronological order.
pub async fn daily_averages(db: &PgPool, limit: i64) -> sqlx::Result<Vec<DayAverage>> {
    sqlx::query_as::<_, DayAverage>(
        r#"
        SELECT (register_date AT TIME ZONE 'UTC')::date AS day,
               AVG(frequency) AS average_frequency
        FROM readings
        GROUP BY day
        ORDER BY day DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
