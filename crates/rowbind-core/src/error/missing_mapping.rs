use super::Error;
use crate::SchemeId;

/// Error when a (type, scheme) pair has no usable binding against the
/// physical columns of the source.
#[derive(Debug)]
pub(super) struct MissingMappingError {
    ty: Box<str>,
    scheme: SchemeId,
}

impl std::error::Error for MissingMappingError {}

impl core::fmt::Display for MissingMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no mapping found for `{}` with scheme {}",
            self.ty, self.scheme
        )
    }
}

impl Error {
    /// Creates a missing mapping error.
    pub fn missing_mapping(ty: impl Into<String>, scheme: SchemeId) -> Error {
        Error::from(super::ErrorKind::MissingMapping(MissingMappingError {
            ty: ty.into().into(),
            scheme,
        }))
    }

    /// Returns `true` if this error is a missing mapping error.
    pub fn is_missing_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::MissingMapping(_)))
    }
}
