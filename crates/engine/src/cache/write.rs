//! Write path: result data into normalized objects
//!
//! Objects the key registry can identify are stored once under their id and
//! replaced by a reference; all others stay inline in their parent field.
//! Each field is stored under its policy's store name and combined with the
//! stored value by the policy's merge strategy.

use super::{Cache, CacheEvent};
use boxcache_core::{
    as_reference, EntityId, Field, Object, Operation, ResponsePath, SelectionSet, Value,
    Variables, TYPENAME_FIELD,
};
use boxcache_policies::{policy_typename, root_typename, KeyStrategy};
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

/// Options for a single write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Give merge strategies no stored value, so incoming data replaces it
    pub overwrite: bool,
}

impl WriteOptions {
    /// Default options: merge with stored values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the write replaces stored field values (builder pattern)
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

struct WriteContext<'a> {
    variables: &'a Variables,
    version: u64,
    overwrite: bool,
    changed: FxHashSet<EntityId>,
}

impl Cache {
    /// Normalize an operation result into the store
    ///
    /// Returns the ids of the objects that changed, sorted.
    pub fn write_query(
        &self,
        op: &Operation,
        variables: &Variables,
        data: &Value,
        options: WriteOptions,
    ) -> Vec<EntityId> {
        let root = op.root_id();
        self.write_root(
            &root,
            root_typename(op.kind()),
            op.selection(),
            variables,
            data,
            options,
        )
    }

    /// Normalize data for one object, selected by `selection`
    ///
    /// The type used for field policies is the data's `__typename`, or the
    /// one encoded in `id`.
    pub fn write_fragment(
        &self,
        id: &EntityId,
        selection: &SelectionSet,
        data: &Value,
        options: WriteOptions,
    ) -> Vec<EntityId> {
        let typename = data
            .get(TYPENAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_else(|| policy_typename(id));
        self.write_root(id, typename, selection, &Variables::new(), data, options)
    }

    fn write_root(
        &self,
        id: &EntityId,
        typename: &str,
        selection: &SelectionSet,
        variables: &Variables,
        data: &Value,
        options: WriteOptions,
    ) -> Vec<EntityId> {
        let Some(fields) = data.as_object() else {
            warn!(target: "boxcache::normalize", entity = %id, "result data is not an object, ignored");
            return Vec::new();
        };

        let event = {
            let _guard = self.write_lock.lock();
            let mut ctx = WriteContext {
                variables,
                version: self.store.next_version(),
                overwrite: options.overwrite,
                changed: FxHashSet::default(),
            };
            self.write_entity(id, typename, selection, fields, &ResponsePath::root(), &mut ctx);

            let mut changed: Vec<EntityId> = ctx.changed.into_iter().collect();
            changed.sort();
            debug!(
                target: "boxcache::normalize",
                entity = %id,
                version = ctx.version,
                changed = changed.len(),
                overwrite = ctx.overwrite,
                "result written"
            );
            CacheEvent {
                version: ctx.version,
                changed,
            }
        };

        let changed = event.changed.clone();
        self.emit(Some(event));
        changed
    }

    fn write_entity(
        &self,
        id: &EntityId,
        typename: &str,
        selection: &SelectionSet,
        data: &Object,
        path: &ResponsePath,
        ctx: &mut WriteContext<'_>,
    ) {
        let fields = self.normalize_fields(Some(id), typename, selection, data, path, ctx);
        if self.store.merge_fields(id, fields, ctx.version) {
            ctx.changed.insert(id.clone());
        }
    }

    /// Normalized fields of one object, keyed by store field name
    ///
    /// `owner` is the stored object the fields merge into; inline objects
    /// have none and are merged as a whole by their parent field.
    fn normalize_fields(
        &self,
        owner: Option<&EntityId>,
        typename: &str,
        selection: &SelectionSet,
        data: &Object,
        path: &ResponsePath,
        ctx: &mut WriteContext<'_>,
    ) -> Object {
        let mut fields = Object::new();
        for field in selection {
            let key = field.response_key();
            let Some(incoming) = data.get(key) else {
                if field.name() != TYPENAME_FIELD {
                    debug!(target: "boxcache::normalize", path = %path.field(key), "selected field missing from result");
                }
                continue;
            };

            let args = field.resolve_arguments(ctx.variables);
            let policy = self.policies.field_policy_or_default(typename, field.name());
            let store_name = policy.store_field_name(field.name(), &args);
            let value = self.normalize_value(field, incoming, &path.field(key), ctx);

            let existing = fields.get(store_name.as_str()).cloned().or_else(|| match owner {
                Some(id) if !ctx.overwrite => self.store.get_field(id, store_name.as_str()),
                _ => None,
            });
            let merged = policy.merge.merge(existing.as_ref(), value);
            trace!(target: "boxcache::normalize", typename, field = %store_name, "field normalized");
            fields.insert(store_name.as_str().to_string(), merged);
        }
        fields
    }

    fn normalize_value(
        &self,
        field: &Field,
        value: &Value,
        path: &ResponsePath,
        ctx: &mut WriteContext<'_>,
    ) -> Value {
        match (value, field.selection()) {
            (Value::Array(items), _) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.normalize_value(field, item, &path.index(i), ctx))
                    .collect(),
            ),
            (Value::Object(_), _) if as_reference(value).is_some() => value.clone(),
            (Value::Object(obj), Some(selection)) => {
                self.normalize_object(selection, obj, path, ctx)
            }
            (other, _) => other.clone(),
        }
    }

    fn normalize_object(
        &self,
        selection: &SelectionSet,
        obj: &Object,
        path: &ResponsePath,
        ctx: &mut WriteContext<'_>,
    ) -> Value {
        let typename = obj.get(TYPENAME_FIELD).and_then(Value::as_str);
        match self.policies.identify(obj) {
            Some(id) => {
                let typename = typename.unwrap_or_else(|| id.typename());
                self.write_entity(&id, typename, selection, obj, path, ctx);
                id.to_reference()
            }
            None => {
                if let Some(typename) = typename {
                    self.report_missing_key(typename, path);
                }
                Value::Object(self.normalize_fields(
                    None,
                    typename.unwrap_or_default(),
                    selection,
                    obj,
                    path,
                    ctx,
                ))
            }
        }
    }

    fn report_missing_key(&self, typename: &str, path: &ResponsePath) {
        match self.policies.keys().strategy(typename) {
            KeyStrategy::Anonymous | KeyStrategy::Default => {
                trace!(target: "boxcache::normalize", typename, path = %path, "object stored inline");
            }
            _ if self.config.warn_on_missing_key => {
                warn!(target: "boxcache::normalize", typename, path = %path, "key fields missing, object stored inline");
            }
            _ => {
                debug!(target: "boxcache::normalize", typename, path = %path, "key fields missing, object stored inline");
            }
        }
    }
}
