//! Reachability sweep over stored references

use super::Cache;
use boxcache_core::{as_reference, EntityId, Value};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

impl Cache {
    /// Delete every non-root object no root can reach; caller holds the write lock
    pub(super) fn collect_garbage_locked(&self) -> Vec<EntityId> {
        let reachable = self.reachable_ids();
        let mut removed: Vec<EntityId> = self
            .store
            .ids()
            .into_iter()
            .filter(|id| !id.is_root() && !reachable.contains(id))
            .collect();
        removed.sort();
        for id in &removed {
            self.store.delete(id);
        }
        debug!(
            target: "boxcache::gc",
            reachable = reachable.len(),
            removed = removed.len(),
            "garbage collected"
        );
        removed
    }

    /// Breadth-first walk from both roots
    fn reachable_ids(&self) -> FxHashSet<EntityId> {
        let mut seen: FxHashSet<EntityId> = FxHashSet::default();
        let mut queue: VecDeque<EntityId> = VecDeque::new();
        for root in [EntityId::root_query(), EntityId::root_mutation()] {
            if seen.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            let Some(fields) = self.stored_fields(&current) else {
                continue;
            };
            let mut targets = Vec::new();
            for value in fields.values() {
                collect_references(value, &mut targets);
            }
            for target in targets {
                if seen.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }
        seen
    }
}

/// References anywhere inside a field value, including inline objects and lists
fn collect_references(value: &Value, out: &mut Vec<EntityId>) {
    if let Some(id) = as_reference(value) {
        out.push(id);
        return;
    }
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, out)),
        Value::Object(obj) => obj.values().for_each(|v| collect_references(v, out)),
        _ => {}
    }
}
