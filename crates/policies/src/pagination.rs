//! Paginated list merging
//!
//! A paginated field stores one object per scope, e.g.
//! `{"totalCount": 50, "pageInfo": {...}, "elements": [refs...]}`. Each
//! fetched page is folded into it with [`merge_page`]:
//!
//! 1. existing items seed an ordered, keyed list
//! 2. incoming items overwrite in place when their key was seen, otherwise
//!    they are appended in arrival order
//! 3. everything outside the item list comes from the incoming page
//!
//! The result depends on arrival order, not on which page was requested
//! first. Items without a key are kept positionally and never deduplicated.

use boxcache_core::{as_reference, Object, Value};
use rustc_hash::FxHashMap;

/// How an item in a page is identified for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemKey {
    /// The target of a normalized `{"__ref": ...}` item
    #[default]
    Reference,
    /// The reference target, or else a scalar field of an inline item
    ReferenceOrField(String),
}

impl ItemKey {
    /// Key of one item, if it has one
    pub fn of(&self, item: &Value) -> Option<String> {
        if let Some(id) = as_reference(item) {
            return Some(id.as_str().to_string());
        }
        match self {
            ItemKey::Reference => None,
            ItemKey::ReferenceOrField(field) => match item.get(field)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }
}

/// Configuration of one paginated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMerge {
    /// Field of the page object that holds the items
    pub items_field: String,
    /// How items are identified
    pub item_key: ItemKey,
}

impl PageMerge {
    /// Paginate over `items_field`, identifying items by reference
    pub fn new(items_field: impl Into<String>) -> Self {
        Self {
            items_field: items_field.into(),
            item_key: ItemKey::Reference,
        }
    }

    /// Change how items are identified
    pub fn item_key(mut self, item_key: ItemKey) -> Self {
        self.item_key = item_key;
        self
    }

    /// Fold `incoming` into `existing`; see [`merge_page`]
    pub fn merge(&self, existing: Option<&Value>, incoming: Value) -> Value {
        merge_page(existing, incoming, &self.items_field, &self.item_key)
    }
}

/// Ordered list with in-place replacement by key
struct KeyedList {
    items: Vec<Value>,
    positions: FxHashMap<String, usize>,
}

impl KeyedList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn upsert(&mut self, item: Value, key: Option<String>) {
        match key {
            Some(key) => match self.positions.get(&key) {
                Some(&pos) => self.items[pos] = item,
                None => {
                    self.positions.insert(key, self.items.len());
                    self.items.push(item);
                }
            },
            None => self.items.push(item),
        }
    }

    fn into_items(self) -> Vec<Value> {
        self.items
    }
}

/// Merge an incoming page into the stored collection for its scope
///
/// `existing` is `None` on the first fetch for a scope, or when the caller
/// asked for a full replacement. Malformed input never fails: a non-object
/// page or a non-list item field is passed through unchanged.
pub fn merge_page(
    existing: Option<&Value>,
    incoming: Value,
    items_field: &str,
    item_key: &ItemKey,
) -> Value {
    let mut page: Object = match incoming {
        Value::Object(page) => page,
        other => {
            tracing::warn!(
                target: "boxcache::merge",
                items_field,
                "incoming page is not an object, storing as-is"
            );
            return other;
        }
    };

    let stored = existing_items(existing, items_field);

    let incoming_items = match page.remove(items_field) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(
                target: "boxcache::merge",
                items_field,
                "incoming items field is not a list, storing page as-is"
            );
            page.insert(items_field.to_string(), other);
            return Value::Object(page);
        }
        None => {
            // Metadata-only page: keep what was already collected.
            if let Some(items) = stored {
                page.insert(items_field.to_string(), Value::Array(items.to_vec()));
            }
            return Value::Object(page);
        }
    };

    let stored = stored.unwrap_or(&[]);
    let mut merged = KeyedList::with_capacity(stored.len() + incoming_items.len());
    for item in stored {
        merged.upsert(item.clone(), item_key.of(item));
    }
    let before = merged.items.len();
    for item in incoming_items {
        let key = item_key.of(&item);
        merged.upsert(item, key);
    }

    tracing::trace!(
        target: "boxcache::merge",
        items_field,
        existing = stored.len(),
        appended = merged.items.len() - before,
        "merged page"
    );

    page.insert(items_field.to_string(), Value::Array(merged.into_items()));
    Value::Object(page)
}

fn existing_items<'a>(existing: Option<&'a Value>, items_field: &str) -> Option<&'a [Value]> {
    let existing = existing?;
    match existing.get(items_field) {
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) | None => {
            if !existing.is_null() {
                tracing::debug!(
                    target: "boxcache::merge",
                    items_field,
                    "stored collection has no item list, starting fresh"
                );
            }
            None
        }
    }
}
