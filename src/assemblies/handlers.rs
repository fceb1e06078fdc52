use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    assemblies::{
        dto::{
            line_item_map, AssemblyDetailResponse, AssemblyListItem, CreateAssemblyRequest,
            CreatedAssemblyResponse, EditAssemblyRequest,
        },
        service,
    },
    auth::jwt::AuthUser,
    error,
    state::AppState,
};

pub fn assembly_routes() -> Router<AppState> {
    Router::new()
        .route("/assemblies", get(list_assemblies).post(create_assembly))
        .route(
            "/assemblies/:id",
            get(get_assembly).put(edit_assembly).delete(delete_assembly),
        )
}

#[instrument(skip(state))]
pub async fn list_assemblies(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<AssemblyListItem>>, (StatusCode, String)> {
    let assemblies = service::list_assemblies(&state.db, user_id)
        .await
        .map_err(error::http)?;
    Ok(Json(assemblies.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_assembly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateAssemblyRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedAssemblyResponse>), (StatusCode, String)> {
    let register_day = payload.register_day.unwrap_or_else(OffsetDateTime::now_utc);
    let line_items = line_item_map(&payload.components);

    let id = service::create_assembly(&state.db, user_id, register_day, &line_items)
        .await
        .map_err(error::http)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/api/v1/assemblies/{id}")
            .parse()
            .expect("static path is a valid header value"),
    );
    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedAssemblyResponse { id, register_day }),
    ))
}

#[instrument(skip(state))]
pub async fn get_assembly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AssemblyDetailResponse>, (StatusCode, String)> {
    let detail = service::assembly_detail(&state.db, user_id, id)
        .await
        .map_err(error::http)?;
    Ok(Json(detail.into()))
}

#[instrument(skip(state, payload))]
pub async fn edit_assembly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<EditAssemblyRequest>,
) -> Result<Json<AssemblyDetailResponse>, (StatusCode, String)> {
    let line_items = line_item_map(&payload.components);
    service::edit_assembly(&state.db, user_id, id, payload.register_day, &line_items)
        .await
        .map_err(error::http)?;

    // Echo the reconciled state back so the client sees the new totals.
    let detail = service::assembly_detail(&state.db, user_id, id)
        .await
        .map_err(error::http)?;
    Ok(Json(detail.into()))
}

#[instrument(skip(state))]
pub async fn delete_assembly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    service::delete_assembly(&state.db, user_id, id)
        .await
        .map_err(error::http)?;
    Ok(StatusCode::NO_CONTENT)
}
