//! Plan resolution, key linkage and row extraction.

mod cache;
pub(crate) use cache::{Arena, PlanCache};

mod exec;
pub(crate) use exec::{Exec, IdentityCache};

mod key;
pub use key::KeyInfo;
pub(crate) use key::{CompositeKey, KeyId};

mod link;
pub(crate) use link::LinkIndex;

mod plan;
pub use plan::{MemberBinding, ParentRelation, Plan, PlanId, RelationBinding};

mod resolve;
use resolve::Resolver;

mod routine;
pub(crate) use routine::{ColumnMap, Routine, SourceKind, Step};
