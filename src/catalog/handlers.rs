use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, instrument};

use crate::{
    auth::jwt::AuthUser,
    catalog::repo::{self, Category, Component},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CategoryWithComponents {
    pub id: i64,
    pub name: String,
    pub components: Vec<Component>,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .route("/components/:id", get(get_component))
}

/// Groups the flat component list under its categories, preserving the
/// category order of `categories` and the name order of `components`.
pub(crate) fn group_by_category(
    categories: Vec<Category>,
    components: Vec<Component>,
) -> Vec<CategoryWithComponents> {
    let mut grouped: Vec<CategoryWithComponents> = categories
        .into_iter()
        .map(|c| CategoryWithComponents {
            id: c.id,
            name: c.name,
            components: Vec::new(),
        })
        .collect();
    for component in components {
        if let Some(slot) = grouped.iter_mut().find(|g| g.id == component.category_id) {
            slot.components.push(component);
        }
    }
    grouped
}

#[instrument(skip(state))]
pub async fn list_catalog(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<CategoryWithComponents>>, (StatusCode, String)> {
    let categories = repo::categories(&state.db).await.map_err(internal)?;
    let components = repo::components(&state.db).await.map_err(internal)?;
    Ok(Json(group_by_category(categories, components)))
}

#[instrument(skip(state))]
pub async fn get_component(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Component>, (StatusCode, String)> {
    let component = repo::find_component(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Component not found".to_string()))?;
    Ok(Json(component))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    error!(error = %e, "catalog query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn component(id: i64, name: &str, category_id: i64) -> Component {
        Component {
            id,
            name: name.into(),
            category_id,
            price: Decimal::new(1000, 2),
            specification: "spec".into(),
        }
    }

    #[test]
    fn grouping_keeps_category_and_component_order() {
        let categories = vec![
            Category { id: 2, name: "LED".into() },
            Category { id: 1, name: "Sensor".into() },
        ];
        let components = vec![
            component(10, "GUVA-S12D", 1),
            component(11, "KY-016", 2),
            component(12, "ML8511", 1),
        ];
        let grouped = group_by_category(categories, components);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name, "LED");
        assert_eq!(grouped[0].components.len(), 1);
        assert_eq!(grouped[1].name, "Sensor");
        let names: Vec<_> = grouped[1].components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["GUVA-S12D", "ML8511"]);
    }

    #[test]
    fn grouping_yields_empty_lists_for_bare_categories() {
        let categories = vec![Category { id: 1, name: "LCD".into() }];
        let grouped = group_by_category(categories, vec![]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].components.is_empty());
    }
}
