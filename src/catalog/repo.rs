use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

/// Immutable reference data: a component category (Sensor, LED, LCD, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Immutable reference data: a priced catalog component.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Component {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub price: Decimal,
    pub specification: String,
}

pub async fn categories(db: &PgPool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name, id")
        .fetch_all(db)
        .await
}

pub async fn components(db: &PgPool) -> sqlx::Result<Vec<Component>> {
    sqlx::query_as::<_, Component>(
        r#"
        SELECT id, name, category_id, price, specification
        FROM components
        ORDER BY name, id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_component(db: &PgPool, id: i64) -> sqlx::Result<Option<Component>> {
    sqlx::query_as::<_, Component>(
        r#"
        SELECT id, name, category_id, price, specification
        FROM components
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Every component id, ascending. Read inside the caller's transaction so
/// reconciliation sees the same catalog the writes will run against.
pub async fn component_ids(tx: &mut Transaction<'_, Postgres>) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM components ORDER BY id")
        .fetch_all(&mut **tx)
        .await
}
