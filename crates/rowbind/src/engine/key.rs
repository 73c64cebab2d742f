use rowbind_core::source::find_column;
use rowbind_core::{Column, EntityType, Error, Record, Result, SchemeId, Value};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use std::any::TypeId;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Identity of a relation: parent type, child type and relation name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct KeyId {
    parent: TypeId,
    child: TypeId,
    name: String,
}

/// Key columns linking the rows of a parent plan to the rows of a child
/// plan.
///
/// Two relations with the same parent type, child type and name are the
/// same relation and share one `KeyInfo`.
#[derive(Debug)]
pub struct KeyInfo {
    pub(crate) id: KeyId,

    pub parent: &'static EntityType,

    pub child: &'static EntityType,

    pub name: String,

    /// Parent-side key columns, in declared order
    pub parent_columns: Vec<String>,

    /// Child-side key columns, pairwise with `parent_columns`
    pub child_columns: Vec<String>,

    /// Scheme the parent-side key is extracted under
    pub parent_scheme: SchemeId,

    /// Scheme the child-side key is extracted under. Never a user scheme.
    pub child_scheme: SchemeId,
}

/// A composite key value: one entry per key column, in declared order.
///
/// Keys are equal iff every column is equal pairwise. Integers compare by
/// value regardless of width, floats by bit pattern, strings ordinally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompositeKey(Box<[KeyValue]>);

impl CompositeKey {
    /// Reads the key at the given column indices, or `None` if any of them
    /// is null.
    pub(crate) fn read(record: &dyn Record, indices: &[usize]) -> Option<CompositeKey> {
        indices
            .iter()
            .map(|&index| KeyValue::from_value(record.value(index)))
            .collect::<Option<Box<[_]>>>()
            .map(CompositeKey)
    }
}

impl KeyId {
    pub(crate) fn new(parent: &EntityType, child: &EntityType, name: &str) -> KeyId {
        KeyId {
            parent: parent.type_id,
            child: child.type_id,
            name: name.to_string(),
        }
    }
}

impl KeyInfo {
    pub(crate) fn new(
        parent: &'static EntityType,
        child: &'static EntityType,
        name: &str,
        parent_columns: Vec<String>,
        child_columns: Vec<String>,
        scheme: SchemeId,
    ) -> Result<KeyInfo> {
        if parent_columns.len() != child_columns.len() {
            return Err(Error::invalid_mapping(format!(
                "relation `{name}` declares {} parent key columns but {} child key columns",
                parent_columns.len(),
                child_columns.len()
            )));
        }

        Ok(KeyInfo {
            id: KeyId::new(parent, child, name),
            parent,
            child,
            name: name.to_string(),
            parent_columns,
            child_columns,
            parent_scheme: scheme,
            child_scheme: scheme.key_sentinel(),
        })
    }

    pub fn arity(&self) -> usize {
        self.parent_columns.len()
    }

    /// Resolves the parent-side key columns against a physical shape.
    pub fn parent_indices(&self, columns: &[Column]) -> Result<Vec<usize>> {
        self.indices(&self.parent_columns, columns, "parent")
    }

    /// Resolves the child-side key columns against a physical shape.
    pub fn child_indices(&self, columns: &[Column]) -> Result<Vec<usize>> {
        self.indices(&self.child_columns, columns, "child")
    }

    fn indices(&self, names: &[String], columns: &[Column], side: &str) -> Result<Vec<usize>> {
        if names.is_empty() {
            return Err(Error::missing_key_info(&self.name, "no key columns declared"));
        }

        names
            .iter()
            .map(|name| {
                find_column(columns, name).ok_or_else(|| {
                    Error::missing_key_info(
                        &self.name,
                        format!("{side} key column `{name}` is not in the source"),
                    )
                })
            })
            .collect()
    }

    /// Reads the key at the given column indices. Returns `None` if any key
    /// column is null; such rows never link.
    pub(crate) fn extract(&self, record: &dyn Record, indices: &[usize]) -> Option<CompositeKey> {
        CompositeKey::read(record, indices)
    }
}

impl PartialEq for KeyInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KeyInfo {}

impl Hash for KeyInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Hash for CompositeKey {
    /// XOR of the per-column hashes.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.0.iter().fold(0u64, |acc, value| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            acc ^ hasher.finish()
        });

        state.write_u64(combined);
    }
}

impl CompositeKey {
    #[cfg(test)]
    pub(crate) fn from_values(values: &[Value]) -> Option<CompositeKey> {
        values
            .iter()
            .map(KeyValue::from_value)
            .collect::<Option<Box<[_]>>>()
            .map(CompositeKey)
    }
}

/// A non-null key column value, normalized for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyValue {
    Bool(bool),
    Int(i128),
    Float(u64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl KeyValue {
    fn from_value(value: &Value) -> Option<KeyValue> {
        Some(match value {
            Value::Null => return None,
            Value::Bool(v) => KeyValue::Bool(*v),
            Value::I8(v) => KeyValue::Int((*v).into()),
            Value::I16(v) => KeyValue::Int((*v).into()),
            Value::I32(v) => KeyValue::Int((*v).into()),
            Value::I64(v) => KeyValue::Int((*v).into()),
            Value::U8(v) => KeyValue::Int((*v).into()),
            Value::U16(v) => KeyValue::Int((*v).into()),
            Value::U32(v) => KeyValue::Int((*v).into()),
            Value::U64(v) => KeyValue::Int((*v).into()),
            Value::F32(v) => KeyValue::Float(f64::from(*v).to_bits()),
            Value::F64(v) => KeyValue::Float(v.to_bits()),
            Value::String(v) => KeyValue::String(v.clone()),
            Value::Bytes(v) => KeyValue::Bytes(v.clone()),
            Value::Uuid(v) => KeyValue::Uuid(*v),
            Value::DateTime(v) => KeyValue::DateTime(*v),
            Value::Date(v) => KeyValue::Date(*v),
        })
    }
}
