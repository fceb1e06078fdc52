use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Where a reading was collected, not where it was uploaded from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub country: String,
    pub state: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One UV frequency register collected by an assembly. Append-only.
#[derive(Debug, Clone, FromRow)]
pub struct Reading {
    pub id: i64,
    pub assembly_id: i64,
    pub register_date: OffsetDateTime,
    pub location_id: i64,
    pub frequency: f64,
}

pub async fn locations(db: &PgPool) -> sqlx::Result<Vec<Location>> {
    sqlx::query_as::<_, Location>(
        r#"
        SELECT id, country, state, city, latitude, longitude
        FROM locations
        ORDER BY country, state, city, id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_location(db: &PgPool, id: i64) -> sqlx::Result<Option<Location>> {
    sqlx::query_as::<_, Location>(
        r#"
        SELECT id, country, state, city, latitude, longitude
        FROM locations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_location(
    db: &PgPool,
    country: &str,
    state: &str,
    city: &str,
    latitude: f64,
    longitude: f64,
) -> sqlx::Result<Location> {
    sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO locations (country, state, city, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, country, state, city, latitude, longitude
        "#,
    )
    .bind(country)
    .bind(state)
    .bind(city)
    .bind(latitude)
    .bind(longitude)
    .fetch_one(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    assembly_id: i64,
    register_date: OffsetDateTime,
    location_id: i64,
    frequency: f64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO readings (assembly_id, register_date, location_id, frequency)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(assembly_id)
    .bind(register_date)
    .bind(location_id)
    .bind(frequency)
    .fetch_one(db)
    .await
}

pub async fn list_for_assembly(
    db: &PgPool,
    assembly_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Reading>> {
    sqlx::query_as::<_, Reading>(
        r#"
        SELECT id, assembly_id, register_date, location_id, frequency
        FROM readings
        WHERE assembly_id = $1
        ORDER BY register_date DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(assembly_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}
