use super::Error;

/// Error when a child relation has to be linked by key but the key cannot be
/// resolved: the relation declares no key columns, or a key column is absent
/// from the physical row set.
#[derive(Debug)]
pub(super) struct MissingKeyInfoError {
    relation: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for MissingKeyInfoError {}

impl core::fmt::Display for MissingKeyInfoError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing key info for relation `{}`: {}",
            self.relation, self.reason
        )
    }
}

impl Error {
    /// Creates a missing key info error.
    pub fn missing_key_info(relation: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingKeyInfo(MissingKeyInfoError {
            relation: relation.into().into(),
            reason: reason.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing key info error.
    pub fn is_missing_key_info(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::MissingKeyInfo(_)))
    }
}
