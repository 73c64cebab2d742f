use super::Error;

/// Error when nested extraction goes deeper than the configured maximum.
#[derive(Debug)]
pub(super) struct RecursionLimitError {
    max_depth: usize,
}

impl std::error::Error for RecursionLimitError {}

impl core::fmt::Display for RecursionLimitError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "maximum nesting depth of {} exceeded", self.max_depth)
    }
}

impl Error {
    /// Creates a recursion limit error.
    pub fn recursion_limit(max_depth: usize) -> Error {
        Error::from(super::ErrorKind::RecursionLimit(RecursionLimitError {
            max_depth,
        }))
    }

    /// Returns `true` if this error is a recursion limit error.
    pub fn is_recursion_limit(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::RecursionLimit(_)))
    }
}
