use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    assemblies,
    auth::jwt::AuthUser,
    error::{self, ServiceError},
    readings::{
        dto::{CreateLocationRequest, CreateReadingRequest, Pagination, ReadingResponse},
        repo::{self, Location},
    },
    state::AppState,
};

pub fn reading_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/readings", post(create_reading))
        .route("/assemblies/:id/readings", get(list_assembly_readings))
}

#[instrument(skip(state))]
pub async fn list_locations(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Location>>, (StatusCode, String)> {
    let locations = repo::locations(&state.db).await.map_err(internal)?;
    Ok(Json(locations))
}

#[instrument(skip(state, payload))]
pub async fn create_location(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), (StatusCode, String)> {
    if payload.country.trim().is_empty() || payload.city.trim().is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "country and city are required".into()));
    }
    if !(-90.0..=90.0).contains(&payload.latitude)
        || !(-180.0..=180.0).contains(&payload.longitude)
    {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "coordinates out of range".into()));
    }

    let location = repo::insert_location(
        &state.db,
        payload.country.trim(),
        payload.state.trim(),
        payload.city.trim(),
        payload.latitude,
        payload.longitude,
    )
    .await
    .map_err(internal)?;

    info!(user_id = %user_id, location_id = location.id, "location created");
    Ok((StatusCode::CREATED, Json(location)))
}

#[instrument(skip(state, payload))]
pub async fn create_reading(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateReadingRequest>,
) -> Result<(StatusCode, Json<ReadingResponse>), (StatusCode, String)> {
    if !payload.frequency.is_finite() || payload.frequency < 0.0 {
        return Err(error::http(ServiceError::validation(
            "frequency must be a non-negative number",
        )));
    }

    // Only the assembly's owner may report its collections.
    if assemblies::repo::find_owned(&state.db, user_id, payload.assembly_id)
        .await
        .map_err(|e| error::http(ServiceError::Storage(e)))?
        .is_none()
    {
        return Err(error::http(ServiceError::NotFound));
    }

    if repo::find_location(&state.db, payload.location_id)
        .await
        .map_err(|e| error::http(ServiceError::Storage(e)))?
        .is_none()
    {
        return Err(error::http(ServiceError::validation(format!(
            "unknown location {}",
            payload.location_id
        ))));
    }

    let id = repo::insert(
        &state.db,
        payload.assembly_id,
        payload.register_date,
        payload.location_id,
        payload.frequency,
    )
    .await
    .map_err(internal)?;

    info!(user_id = %user_id, reading_id = id, assembly_id = payload.assembly_id, "reading recorded");
    Ok((
        StatusCode::CREATED,
        Json(ReadingResponse {
            id,
            assembly_id: payload.assembly_id,
            location_id: payload.location_id,
            register_date: payload.register_date,
            frequency: payload.frequency,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_assembly_readings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ReadingResponse>>, (StatusCode, String)> {
    if assemblies::repo::find_owned(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err(error::http(ServiceError::NotFound));
    }

    let readings = repo::list_for_assembly(&state.db, id, p.limit.clamp(1, 100), p.offset.max(0))
        .await
        .map_err(internal)?;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    error!(error = %e, "readings query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}
