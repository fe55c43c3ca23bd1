//! Operation documents
//!
//! Queries and mutations are described as trees of selected fields. The
//! cache needs them to know which arguments scope each field and which
//! sub-fields belong to each object; it never parses GraphQL text.
//!
//! # Example
//!
//! ```
//! use boxcache_core::document::{ArgValue, Field, Operation};
//!
//! let op = Operation::query("BoxesForBase").select(
//!     Field::new("boxes")
//!         .arg("baseId", ArgValue::var("baseId"))
//!         .arg("paginationInput", ArgValue::var("paginationInput"))
//!         .select([
//!             Field::new("totalCount"),
//!             Field::new("elements").select([Field::new("labelIdentifier")]),
//!         ]),
//! );
//! assert_eq!(op.selection().len(), 1);
//! ```

use crate::types::{EntityId, Object, Value, TYPENAME_FIELD};

/// Variables supplied with an operation
pub type Variables = Object;

/// Kind of operation, which decides the root object it writes under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read operation rooted at `ROOT_QUERY`
    Query,
    /// Write operation rooted at `ROOT_MUTATION`
    Mutation,
}

/// A named query or mutation with its root selection set
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    kind: OperationKind,
    name: String,
    selection: SelectionSet,
}

impl Operation {
    /// Create an empty query
    pub fn query(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Query,
            name: name.into(),
            selection: SelectionSet::new(),
        }
    }

    /// Create an empty mutation
    pub fn mutation(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Mutation,
            name: name.into(),
            selection: SelectionSet::new(),
        }
    }

    /// Add a root field (builder pattern)
    pub fn select(mut self, field: Field) -> Self {
        self.selection.push(field);
        self
    }

    /// Operation kind
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Operation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root selection set
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Root object this operation reads from and writes to
    pub fn root_id(&self) -> EntityId {
        match self.kind {
            OperationKind::Query => EntityId::root_query(),
            OperationKind::Mutation => EntityId::root_mutation(),
        }
    }

    /// Copy of this operation with `__typename` selected on every object
    pub fn with_typenames(&self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            selection: self.selection.with_typenames_nested(),
        }
    }

    /// Check if any selected field is client-only
    pub fn has_client_fields(&self) -> bool {
        self.selection.has_client_fields()
    }

    /// Copy of this operation with client-only fields removed (what a server would see)
    pub fn without_client_fields(&self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            selection: self.selection.without_client_fields(),
        }
    }
}

/// Value of a field argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Inline value
    Literal(Value),
    /// Reference to an operation variable
    Variable(String),
}

impl ArgValue {
    /// Reference an operation variable
    pub fn var(name: impl Into<String>) -> Self {
        ArgValue::Variable(name.into())
    }

    /// Inline a literal value
    pub fn literal(value: impl Into<Value>) -> Self {
        ArgValue::Literal(value.into())
    }

    /// Resolve against the supplied variables
    ///
    /// An unsupplied variable resolves to `None` and the argument is then
    /// treated as omitted.
    pub fn resolve(&self, variables: &Variables) -> Option<Value> {
        match self {
            ArgValue::Literal(v) => Some(v.clone()),
            ArgValue::Variable(name) => variables.get(name).cloned(),
        }
    }
}

/// Ordered list of selected fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet {
    fields: Vec<Field>,
}

impl SelectionSet {
    /// Create an empty selection set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a list of fields
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Append a field
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Selected fields in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate selected fields
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Number of selected fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if `__typename` is selected at this level
    pub fn selects_typename(&self) -> bool {
        self.fields.iter().any(|f| f.name == TYPENAME_FIELD)
    }

    /// Copy with `__typename` added to every nested object selection
    ///
    /// The root level is left alone: root objects have fixed ids.
    pub fn with_typenames_nested(&self) -> Self {
        Self {
            fields: self.fields.iter().map(Field::with_typenames).collect(),
        }
    }

    /// Copy with `__typename` added at this level and every nested level
    pub fn with_typenames(&self) -> Self {
        let mut set = self.with_typenames_nested();
        if !set.selects_typename() {
            set.fields.insert(0, Field::typename());
        }
        set
    }

    fn has_client_fields(&self) -> bool {
        self.fields.iter().any(|f| {
            f.client_only
                || f.selection
                    .as_ref()
                    .map(SelectionSet::has_client_fields)
                    .unwrap_or(false)
        })
    }

    fn without_client_fields(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|f| !f.client_only)
                .map(|f| {
                    let mut f = f.clone();
                    f.selection = f.selection.as_ref().map(SelectionSet::without_client_fields);
                    f
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A selected field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    alias: Option<String>,
    arguments: Vec<(String, ArgValue)>,
    selection: Option<SelectionSet>,
    client_only: bool,
}

impl Field {
    /// Select a field by schema name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selection: None,
            client_only: false,
        }
    }

    /// The `__typename` meta field
    pub fn typename() -> Self {
        Self::new(TYPENAME_FIELD)
    }

    /// Expose the field under another response key
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add an argument
    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Select sub-fields, making this an object (or list of objects) field
    pub fn select(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        let set = self.selection.get_or_insert_with(SelectionSet::new);
        for f in fields {
            set.push(f);
        }
        self
    }

    /// Mark the field as client-only: served from the cache, never sent to a server
    pub fn client(mut self) -> Self {
        self.client_only = true;
        self
    }

    /// Schema field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key under which the field appears in results
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Sub-selection, if this is an object field
    pub fn selection(&self) -> Option<&SelectionSet> {
        self.selection.as_ref()
    }

    /// Check if the field is client-only
    pub fn is_client_only(&self) -> bool {
        self.client_only
    }

    /// Declared arguments in order
    pub fn arguments(&self) -> &[(String, ArgValue)] {
        &self.arguments
    }

    /// Resolve all arguments against `variables`, dropping unsupplied variables
    pub fn resolve_arguments(&self, variables: &Variables) -> Object {
        let mut resolved = Object::new();
        for (name, value) in &self.arguments {
            if let Some(v) = value.resolve(variables) {
                resolved.insert(name.clone(), v);
            }
        }
        resolved
    }

    fn with_typenames(&self) -> Self {
        let mut f = self.clone();
        f.selection = f.selection.as_ref().map(SelectionSet::with_typenames);
        f
    }
}
