use std::collections::HashMap;

/// One write against the assembly_lines table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    Insert { component_id: i64, quantity: i32 },
    Update { component_id: i64, quantity: i32 },
    Delete { component_id: i64 },
}

/// Diffs the existing line set against the requested quantities for every
/// catalog component and returns the writes that realize the request.
///
/// Components absent from `requested` count as quantity 0. For each catalog
/// component exactly one of insert / update / delete / no-op applies: a line
/// that exists keeps a positive quantity via update (even when unchanged)
/// and loses a non-positive one via delete; a line that does not exist is
/// inserted for a positive quantity and otherwise left alone. Ops come out
/// in `catalog` order, so concurrent transactions touch line rows in the
/// same order.
pub fn reconcile(
    catalog: &[i64],
    existing: &HashMap<i64, i32>,
    requested: &HashMap<i64, i32>,
) -> Vec<LineOp> {
    let mut ops = Vec::new();
    for &component_id in catalog {
        let quantity = requested.get(&component_id).copied().unwrap_or(0);
        match (existing.contains_key(&component_id), quantity > 0) {
            (true, true) => ops.push(LineOp::Update { component_id, quantity }),
            (true, false) => ops.push(LineOp::Delete { component_id }),
            (false, true) => ops.push(LineOp::Insert { component_id, quantity }),
            (false, false) => {}
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(i64, i32)]) -> HashMap<i64, i32> {
        entries.iter().copied().collect()
    }

    /// Replays ops onto a line map; mirrors what the repo writes do.
    fn apply(mut lines: HashMap<i64, i32>, ops: &[LineOp]) -> HashMap<i64, i32> {
        for op in ops {
            match *op {
                LineOp::Insert { component_id, quantity }
                | LineOp::Update { component_id, quantity } => {
                    lines.insert(component_id, quantity);
                }
                LineOp::Delete { component_id } => {
                    lines.remove(&component_id);
                }
            }
        }
        lines
    }

    #[test]
    fn four_way_rule() {
        let catalog = [1, 2, 3, 4];
        let existing = map(&[(1, 2), (2, 5)]);
        let requested = map(&[(1, 3), (2, 0), (3, 1)]);
        let ops = reconcile(&catalog, &existing, &requested);
        assert_eq!(
            ops,
            vec![
                LineOp::Update { component_id: 1, quantity: 3 },
                LineOp::Delete { component_id: 2 },
                LineOp::Insert { component_id: 3, quantity: 1 },
                // component 4: absent and unrequested, no op
            ]
        );
    }

    #[test]
    fn unchanged_quantity_still_updates() {
        let ops = reconcile(&[1], &map(&[(1, 2)]), &map(&[(1, 2)]));
        assert_eq!(ops, vec![LineOp::Update { component_id: 1, quantity: 2 }]);
    }

    #[test]
    fn negative_quantity_behaves_like_zero() {
        let ops = reconcile(&[1, 2], &map(&[(1, 2)]), &map(&[(1, -3), (2, -1)]));
        assert_eq!(ops, vec![LineOp::Delete { component_id: 1 }]);
    }

    #[test]
    fn empty_request_deletes_every_line() {
        let existing = map(&[(1, 1), (3, 7)]);
        let ops = reconcile(&[1, 2, 3], &existing, &HashMap::new());
        assert_eq!(
            ops,
            vec![
                LineOp::Delete { component_id: 1 },
                LineOp::Delete { component_id: 3 },
            ]
        );
        assert!(apply(existing, &ops).is_empty());
    }

    #[test]
    fn idempotent_when_applied_twice() {
        let catalog = [1, 2, 3, 4, 5];
        let existing = map(&[(1, 2), (4, 9)]);
        let requested = map(&[(1, 3), (2, 1), (4, 0), (5, 2)]);

        let once = apply(existing.clone(), &reconcile(&catalog, &existing, &requested));
        let twice = apply(once.clone(), &reconcile(&catalog, &once, &requested));
        assert_eq!(once, twice);
        assert_eq!(once, map(&[(1, 3), (2, 1), (5, 2)]));
    }

    #[test]
    fn ops_follow_catalog_order() {
        let catalog = [5, 3, 1];
        let requested = map(&[(1, 1), (3, 1), (5, 1)]);
        let ops = reconcile(&catalog, &HashMap::new(), &requested);
        let ids: Vec<i64> = ops
            .iter()
            .map(|op| match *op {
                LineOp::Insert { component_id, .. }
                | LineOp::Update { component_id, .. }
                | LineOp::Delete { component_id } => component_id,
            })
            .collect();
        assert_eq!(ids, vec![5, 3, 1]);
    }

    #[test]
    fn every_catalog_component_gets_exactly_one_outcome() {
        let catalog = [1, 2, 3, 4];
        let existing = map(&[(2, 1), (4, 2)]);
        let requested = map(&[(1, 1), (2, 0), (3, 0), (4, 5)]);
        let ops = reconcile(&catalog, &existing, &requested);
        // 1 insert, 2 delete, 3 no-op, 4 update
        assert_eq!(ops.len(), 3);
        let final_state = apply(existing, &ops);
        assert_eq!(final_state, map(&[(1, 1), (4, 5)]));
    }
}
