//! Read path: selections answered from normalized objects
//!
//! References are followed for every field with a sub-selection. A field
//! missing from its object is a miss unless its read strategy can redirect
//! to an entity that is stored. Dangling references inside lists are
//! skipped; anywhere else they are a miss.

use super::Cache;
use boxcache_core::{
    as_reference, CacheError, CacheResult, EntityId, Field, Object, Operation, ResponsePath,
    SelectionSet, Value, Variables, TYPENAME_FIELD,
};
use boxcache_policies::{policy_typename, root_typename, FieldPolicy};
use std::borrow::Cow;
use tracing::debug;

/// Object whose fields are being read
#[derive(Clone, Copy)]
struct Owner<'a> {
    /// Nearest stored object, used in errors
    id: &'a EntityId,
    /// Type used for field policies
    typename: &'a str,
    /// Inline objects have no type of their own unless stored with one
    inline: bool,
}

impl Cache {
    /// Answer an operation from the cache
    pub fn read_query(&self, op: &Operation, variables: &Variables) -> CacheResult<Value> {
        let op = if self.config.add_typename {
            Cow::Owned(op.with_typenames())
        } else {
            Cow::Borrowed(op)
        };
        let root = op.root_id();
        let fields = self.stored_fields(&root).unwrap_or_default();
        let owner = Owner {
            id: &root,
            typename: root_typename(op.kind()),
            inline: false,
        };
        self.read_fields(owner, &fields, op.selection(), &ResponsePath::root(), variables)
            .map(Value::Object)
    }

    /// Read one stored object through `selection`
    pub fn read_fragment(&self, id: &EntityId, selection: &SelectionSet) -> CacheResult<Value> {
        let fields = self
            .stored_fields(id)
            .ok_or_else(|| CacheError::EntityNotFound(id.clone()))?;
        let selection = if self.config.add_typename && !id.is_root() {
            Cow::Owned(selection.with_typenames())
        } else {
            Cow::Borrowed(selection)
        };
        let typename = fields
            .get(TYPENAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_else(|| policy_typename(id))
            .to_string();
        let owner = Owner {
            id,
            typename: &typename,
            inline: false,
        };
        self.read_fields(owner, &fields, &selection, &ResponsePath::root(), &Variables::new())
            .map(Value::Object)
    }

    fn read_fields(
        &self,
        owner: Owner<'_>,
        fields: &Object,
        selection: &SelectionSet,
        path: &ResponsePath,
        variables: &Variables,
    ) -> CacheResult<Object> {
        let mut result = Object::new();
        for field in selection {
            let key = field.response_key();
            let field_path = path.field(key);

            if field.name() == TYPENAME_FIELD {
                match fields.get(TYPENAME_FIELD) {
                    Some(typename) => {
                        result.insert(key.to_string(), typename.clone());
                    }
                    None if !owner.inline => {
                        result.insert(key.to_string(), Value::String(owner.typename.to_string()));
                    }
                    None => {}
                }
                continue;
            }

            let args = field.resolve_arguments(variables);
            let policy = self
                .policies
                .field_policy_or_default(owner.typename, field.name());
            let store_name = policy.store_field_name(field.name(), &args);

            let value = match fields.get(store_name.as_str()) {
                Some(value) => Cow::Borrowed(value),
                None => match self.redirect(policy, &args) {
                    Some(reference) => Cow::Owned(reference),
                    None => {
                        return Err(CacheError::MissingField {
                            entity: owner.id.clone(),
                            field: store_name.to_string(),
                            path: field_path,
                        })
                    }
                },
            };

            let resolved = self.resolve_value(owner, field, &value, &field_path, variables)?;
            result.insert(key.to_string(), resolved);
        }
        Ok(result)
    }

    fn resolve_value(
        &self,
        owner: Owner<'_>,
        field: &Field,
        value: &Value,
        path: &ResponsePath,
        variables: &Variables,
    ) -> CacheResult<Value> {
        let Some(selection) = field.selection() else {
            return Ok(value.clone());
        };

        match value {
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    if let Some(id) = as_reference(item) {
                        if !self.store.contains(&id) {
                            debug!(target: "boxcache::read", entity = %id, path = %path.index(i), "dangling list item skipped");
                            continue;
                        }
                    }
                    resolved.push(self.resolve_value(owner, field, item, &path.index(i), variables)?);
                }
                Ok(Value::Array(resolved))
            }
            Value::Object(obj) => match as_reference(value) {
                Some(id) => {
                    let fields = self.stored_fields(&id).ok_or_else(|| {
                        CacheError::DanglingReference {
                            entity: id.clone(),
                            path: path.clone(),
                        }
                    })?;
                    let typename = fields
                        .get(TYPENAME_FIELD)
                        .and_then(Value::as_str)
                        .unwrap_or_else(|| id.typename())
                        .to_string();
                    let entity = Owner {
                        id: &id,
                        typename: &typename,
                        inline: false,
                    };
                    self.read_fields(entity, &fields, selection, path, variables)
                        .map(Value::Object)
                }
                None => {
                    let inline = Owner {
                        id: owner.id,
                        typename: obj
                            .get(TYPENAME_FIELD)
                            .and_then(Value::as_str)
                            .unwrap_or_default(),
                        inline: true,
                    };
                    self.read_fields(inline, obj, selection, path, variables)
                        .map(Value::Object)
                }
            },
            other => Ok(other.clone()),
        }
    }

    /// Reference a redirecting field points at, if that entity is stored
    fn redirect(&self, policy: &FieldPolicy, args: &Object) -> Option<Value> {
        let (typename, key_fields) = policy.read.reference_fields(args)?;
        let id = self.policies.identify_as(&typename, &key_fields)?;
        if self.store.contains(&id) {
            debug!(target: "boxcache::read", entity = %id, "field redirected to entity");
            Some(id.to_reference())
        } else {
            None
        }
    }
}
