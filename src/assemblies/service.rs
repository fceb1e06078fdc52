use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    assemblies::{
        reconcile::{reconcile, LineOp},
        repo::{self, Assembly, LineDetail},
    },
    catalog,
    error::ServiceError,
};

#[derive(Debug)]
pub struct AssemblyDetail {
    pub assembly: Assembly,
    pub lines: Vec<LineDetail>,
    pub total_cost: Decimal,
}

/// Σ quantity × price over the line set, in exact decimal arithmetic.
pub fn total_cost(lines: &[LineDetail]) -> Decimal {
    lines
        .iter()
        .map(|l| l.price * Decimal::from(l.quantity))
        .sum()
}

fn check_known_components(
    line_items: &HashMap<i64, i32>,
    catalog_ids: &[i64],
) -> Result<(), ServiceError> {
    let known: HashSet<i64> = catalog_ids.iter().copied().collect();
    for (&component_id, &quantity) in line_items {
        if quantity > 0 && !known.contains(&component_id) {
            return Err(ServiceError::Validation(format!(
                "unknown component {component_id}"
            )));
        }
    }
    Ok(())
}

/// Creates an assembly owned by `user_id` with one line per positive
/// quantity. All rows land in one transaction; any failure leaves nothing
/// behind.
pub async fn create_assembly(
    db: &PgPool,
    user_id: Uuid,
    register_day: OffsetDateTime,
    line_items: &HashMap<i64, i32>,
) -> Result<i64, ServiceError> {
    let mut tx = db.begin().await?;

    let catalog_ids = catalog::repo::component_ids(&mut tx).await?;
    check_known_components(line_items, &catalog_ids)?;

    let assembly_id = repo::insert(&mut tx, user_id, register_day).await?;

    // Catalog order keeps the line writes deterministic.
    for &component_id in &catalog_ids {
        match line_items.get(&component_id) {
            Some(&quantity) if quantity > 0 => {
                repo::insert_line(&mut tx, assembly_id, component_id, quantity).await?;
            }
            _ => {}
        }
    }

    tx.commit().await?;
    info!(user_id = %user_id, assembly_id, "assembly created");
    Ok(assembly_id)
}

/// The assembly with its lines joined to components and categories, plus
/// the derived total. `NotFound` whether the id is missing or foreign.
pub async fn assembly_detail(
    db: &PgPool,
    user_id: Uuid,
    assembly_id: i64,
) -> Result<AssemblyDetail, ServiceError> {
    let assembly = repo::find_owned(db, user_id, assembly_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let lines = repo::line_details(db, assembly_id).await?;
    let total = total_cost(&lines);
    Ok(AssemblyDetail {
        assembly,
        lines,
        total_cost: total,
    })
}

/// The user's assemblies, most recently registered first.
pub async fn list_assemblies(db: &PgPool, user_id: Uuid) -> Result<Vec<Assembly>, ServiceError> {
    Ok(repo::list_by_user(db, user_id).await?)
}

/// Reconciles the assembly's lines against the requested quantities for the
/// whole catalog and optionally moves `register_day`, all in one
/// transaction. Holding the assembly row lock from the first statement
/// serializes concurrent edits of the same assembly.
pub async fn edit_assembly(
    db: &PgPool,
    user_id: Uuid,
    assembly_id: i64,
    new_register_day: Option<OffsetDateTime>,
    line_items: &HashMap<i64, i32>,
) -> Result<(), ServiceError> {
    let mut tx = db.begin().await?;

    if repo::lock_owned(&mut tx, user_id, assembly_id).await?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let catalog_ids = catalog::repo::component_ids(&mut tx).await?;
    check_known_components(line_items, &catalog_ids)?;

    let existing: HashMap<i64, i32> = repo::lines(&mut tx, assembly_id)
        .await?
        .into_iter()
        .map(|l| (l.component_id, l.quantity))
        .collect();

    for op in reconcile(&catalog_ids, &existing, line_items) {
        match op {
            LineOp::Insert { component_id, quantity } => {
                repo::insert_line(&mut tx, assembly_id, component_id, quantity).await?;
            }
            LineOp::Update { component_id, quantity } => {
                repo::update_line(&mut tx, assembly_id, component_id, quantity).await?;
            }
            LineOp::Delete { component_id } => {
                repo::delete_line(&mut tx, assembly_id, component_id).await?;
            }
        }
    }

    if let Some(register_day) = new_register_day {
        repo::set_register_day(&mut tx, assembly_id, register_day).await?;
    }

    tx.commit().await?;
    info!(user_id = %user_id, assembly_id, "assembly edited");
    Ok(())
}

/// Removes the assembly and every row that hangs off it. The schema has no
/// cascading deletes, so readings and lines must go before the assembly row.
pub async fn delete_assembly(
    db: &PgPool,
    user_id: Uuid,
    assembly_id: i64,
) -> Result<(), ServiceError> {
    let mut tx = db.begin().await?;

    if repo::lock_owned(&mut tx, user_id, assembly_id).await?.is_none() {
        return Err(ServiceError::NotFound);
    }

    repo::delete_readings(&mut tx, assembly_id).await?;
    repo::delete_lines(&mut tx, assembly_id).await?;
    repo::delete(&mut tx, assembly_id).await?;

    tx.commit().await?;
    info!(user_id = %user_id, assembly_id, "assembly deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(component_id: i64, price: Decimal, quantity: i32) -> LineDetail {
        LineDetail {
            component_id,
            component_name: format!("component-{component_id}"),
            category_id: 1,
            category_name: "Sensor".into(),
            price,
            quantity,
        }
    }

    #[test]
    fn total_cost_sums_quantity_times_price() {
        // Component A at 10.00 with quantity 2 and nothing else: 20.00.
        let lines = vec![line(1, Decimal::new(1000, 2), 2)];
        assert_eq!(total_cost(&lines), Decimal::new(2000, 2));
    }

    #[test]
    fn total_cost_after_swapping_lines() {
        // A (10.00) removed, B (5.00) at quantity 3: 15.00.
        let lines = vec![line(2, Decimal::new(500, 2), 3)];
        assert_eq!(total_cost(&lines), Decimal::new(1500, 2));
    }

    #[test]
    fn total_cost_of_empty_assembly_is_zero() {
        assert_eq!(total_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_cost_keeps_cents_exact() {
        // 0.10 * 3 + 0.20 * 3 must be exactly 0.90.
        let lines = vec![
            line(1, Decimal::new(10, 2), 3),
            line(2, Decimal::new(20, 2), 3),
        ];
        assert_eq!(total_cost(&lines), Decimal::new(90, 2));
    }

    #[test]
    fn unknown_component_with_positive_quantity_fails_validation() {
        let mut items = HashMap::new();
        items.insert(99, 1);
        let err = check_known_components(&items, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn unknown_component_with_zero_quantity_is_ignored() {
        let mut items = HashMap::new();
        items.insert(99, 0);
        items.insert(1, 2);
        assert!(check_known_components(&items, &[1, 2, 3]).is_ok());
    }
}
