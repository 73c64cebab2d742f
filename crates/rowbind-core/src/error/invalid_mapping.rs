use super::Error;

/// Error when mapping facts contradict the type they describe.
///
/// This occurs when:
/// - A column fact targets a complex or collection member (or the reverse)
/// - Parent and child key column lists differ in length
/// - A schema document names an item type that was never registered
/// - Two registered types share a name
#[derive(Debug)]
pub(super) struct InvalidMappingError {
    message: Box<str>,
}

impl std::error::Error for InvalidMappingError {}

impl core::fmt::Display for InvalidMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMapping(InvalidMappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidMapping(_)))
    }
}
