use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::assemblies::repo::{Assembly, LineDetail};
use crate::assemblies::service::AssemblyDetail;

/// One requested line. Quantities ≤ 0 mean "none of this component".
#[derive(Debug, Deserialize)]
pub struct LineItemInput {
    pub component_id: i64,
    pub quantity: i32,
}

/// Folds the request's line array into the `component_id → quantity` map
/// the service operates on. The last entry wins on duplicate ids.
pub(crate) fn line_item_map(items: &[LineItemInput]) -> HashMap<i64, i32> {
    items
        .iter()
        .map(|i| (i.component_id, i.quantity))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateAssemblyRequest {
    /// Defaults to "now" when absent.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub register_day: Option<OffsetDateTime>,
    #[serde(default)]
    pub components: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct EditAssemblyRequest {
    /// Absent means "keep the current register day".
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub register_day: Option<OffsetDateTime>,
    #[serde(default)]
    pub components: Vec<LineItemInput>,
}

#[derive(Debug, Serialize)]
pub struct CreatedAssemblyResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub register_day: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct AssemblyListItem {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub register_day: OffsetDateTime,
}

impl From<Assembly> for AssemblyListItem {
    fn from(a: Assembly) -> Self {
        Self {
            id: a.id,
            register_day: a.register_day,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssemblyDetailResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub register_day: OffsetDateTime,
    pub lines: Vec<LineDetail>,
    pub total_cost: Decimal,
}

impl From<AssemblyDetail> for AssemblyDetailResponse {
    fn from(d: AssemblyDetail) -> Self {
        Self {
            id: d.assembly.id,
            register_day: d.assembly.register_day,
            lines: d.lines,
            total_cost: d.total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_map_last_duplicate_wins() {
        let items = vec![
            LineItemInput { component_id: 1, quantity: 2 },
            LineItemInput { component_id: 2, quantity: 1 },
            LineItemInput { component_id: 1, quantity: 5 },
        ];
        let map = line_item_map(&items);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], 5);
        assert_eq!(map[&2], 1);
    }

    #[test]
    fn create_request_parses_with_defaults() {
        let req: CreateAssemblyRequest = serde_json::from_str("{}").unwrap();
        assert!(req.register_day.is_none());
        assert!(req.components.is_empty());
    }

    #[test]
    fn create_request_parses_components_and_rfc3339_day() {
        let req: CreateAssemblyRequest = serde_json::from_str(
            r#"{
                "register_day": "2026-08-03T12:00:00Z",
                "components": [
                    {"component_id": 3, "quantity": 2},
                    {"component_id": 7, "quantity": 0}
                ]
            }"#,
        )
        .unwrap();
        assert!(req.register_day.is_some());
        assert_eq!(req.components.len(), 2);
        assert_eq!(req.components[1].quantity, 0);
    }
}
