use std::fmt;

/// Identifies one mapping variant of a type.
///
/// The same type can be bound differently depending on context (a shallow
/// list view versus a deep detail view, say). User schemes are non-negative;
/// negative ids are reserved for synthesized key plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SchemeId(pub i32);

impl SchemeId {
    /// The scheme used when none is given.
    pub const DEFAULT: SchemeId = SchemeId(0);

    /// Scheme of the child side of a key plan whose parent side uses `self`.
    ///
    /// Never collides with a user scheme: it is the negation of a positive
    /// scheme, or `i32::MIN` for the default scheme.
    pub fn key_sentinel(self) -> SchemeId {
        match self.0 {
            0 => SchemeId(i32::MIN),
            id if id > 0 => SchemeId(-id),
            id => SchemeId(id),
        }
    }
}

impl From<i32> for SchemeId {
    fn from(value: i32) -> Self {
        SchemeId(value)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
