//! Mapping facts and the contract of the providers that produce them.

mod fact;
pub use fact::{ColumnFact, ComplexFact, MappingFact, RelationFact, TableFact};

mod provider;
pub use provider::{ExtractInfo, MappingProvider, MemberFact};

mod scheme;
pub use scheme::SchemeId;
