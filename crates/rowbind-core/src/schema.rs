//! Static descriptions of mappable types.
//!
//! Every `#[derive(Model)]` type exposes one [`EntityType`] describing its
//! members, their value shapes and the mapping facts declared on them.

mod entity;
pub use entity::{EntityRef, EntityType, EntityTypeBuilder};

mod member;
pub use member::{Access, Member, MemberTy};
