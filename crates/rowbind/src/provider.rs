//! Built-in mapping providers.

mod attribute;
pub use attribute::AttributeProvider;

mod composite;
pub use composite::CompositeProvider;

mod document;
pub use document::{Document, DocumentProvider};
