use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user-owned hardware build.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assembly {
    pub id: i64,
    pub user_id: Uuid,
    pub register_day: OffsetDateTime,
}

/// One (component, quantity) row of an assembly. Rows only exist with
/// quantity > 0; "zero of something" is the absence of the row.
#[derive(Debug, Clone, FromRow)]
pub struct AssemblyLine {
    pub assembly_id: i64,
    pub component_id: i64,
    pub quantity: i32,
}

/// A line joined with its component and category, as the detail view needs it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LineDetail {
    pub component_id: i64,
    pub component_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    register_day: OffsetDateTime,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO assemblies (user_id, register_day) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(register_day)
    .fetch_one(&mut **tx)
    .await
}

/// Ownership is part of the predicate: a foreign assembly id and a missing
/// one both come back as `None`.
pub async fn find_owned(
    db: &PgPool,
    user_id: Uuid,
    assembly_id: i64,
) -> sqlx::Result<Option<Assembly>> {
    sqlx::query_as::<_, Assembly>(
        r#"
        SELECT id, user_id, register_day
        FROM assemblies
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(assembly_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Same lookup, but takes the row lock that serializes concurrent mutations
/// of one assembly for the rest of the transaction.
pub async fn lock_owned(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    assembly_id: i64,
) -> sqlx::Result<Option<Assembly>> {
    sqlx::query_as::<_, Assembly>(
        r#"
        SELECT id, user_id, register_day
        FROM assemblies
        WHERE id = $1 AND user_id = $2
        FOR UPDATE
        "#,
    )
    .bind(assembly_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Assembly>> {
    sqlx::query_as::<_, Assembly>(
        r#"
        SELECT id, user_id, register_day
        FROM assemblies
        WHERE user_id = $1
        ORDER BY register_day DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn set_register_day(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
    register_day: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE assemblies SET register_day = $2 WHERE id = $1")
        .bind(assembly_id)
        .bind(register_day)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn lines(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
) -> sqlx::Result<Vec<AssemblyLine>> {
    sqlx::query_as::<_, AssemblyLine>(
        r#"
        SELECT assembly_id, component_id, quantity
        FROM assembly_lines
        WHERE assembly_id = $1
        "#,
    )
    .bind(assembly_id)
    .fetch_all(&mut **tx)
    .await
}

/// Lines with their component and category, ordered the way the detail view
/// presents them: by category name, then component name.
pub async fn line_details(db: &PgPool, assembly_id: i64) -> sqlx::Result<Vec<LineDetail>> {
    sqlx::query_as::<_, LineDetail>(
        r#"
        SELECT al.component_id,
               co.name AS component_name,
               ca.id AS category_id,
               ca.name AS category_name,
               co.price,
               al.quantity
        FROM assembly_lines al
        JOIN components co ON co.id = al.component_id
        JOIN categories ca ON ca.id = co.category_id
        WHERE al.assembly_id = $1
        ORDER BY ca.name, co.name, co.id
        "#,
    )
    .bind(assembly_id)
    .fetch_all(db)
    .await
}

pub async fn insert_line(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
    component_id: i64,
    quantity: i32,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO assembly_lines (assembly_id, component_id, quantity) VALUES ($1, $2, $3)",
    )
    .bind(assembly_id)
    .bind(component_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_line(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
    component_id: i64,
    quantity: i32,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE assembly_lines SET quantity = $3 WHERE assembly_id = $1 AND component_id = $2",
    )
    .bind(assembly_id)
    .bind(component_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete_line(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
    component_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM assembly_lines WHERE assembly_id = $1 AND component_id = $2")
        .bind(assembly_id)
        .bind(component_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn delete_lines(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM assembly_lines WHERE assembly_id = $1")
        .bind(assembly_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn delete_readings(
    tx: &mut Transaction<'_, Postgres>,
    assembly_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM readings WHERE assembly_id = $1")
        .bind(assembly_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn delete(tx: &mut Transaction<'_, Postgres>, assembly_id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM assemblies WHERE id = $1")
        .bind(assembly_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
