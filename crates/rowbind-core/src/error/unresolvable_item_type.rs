use super::Error;

/// Error when the item type of a nested member cannot be inferred from its
/// declared type and the mapping fact does not name one.
#[derive(Debug)]
pub(super) struct UnresolvableItemTypeError {
    ty: Box<str>,
    member: Box<str>,
}

impl std::error::Error for UnresolvableItemTypeError {}

impl core::fmt::Display for UnresolvableItemTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot infer the item type of `{}::{}`; declare it explicitly",
            self.ty, self.member
        )
    }
}

impl Error {
    /// Creates an unresolvable item type error for `ty::member`.
    pub fn unresolvable_item_type(ty: impl Into<String>, member: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvableItemType(
            UnresolvableItemTypeError {
                ty: ty.into().into(),
                member: member.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unresolvable item type error.
    pub fn is_unresolvable_item_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnresolvableItemType(_)))
    }
}
