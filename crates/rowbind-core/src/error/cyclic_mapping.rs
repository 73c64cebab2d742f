use super::Error;

/// Error when the nested types of a mapping form a true dependency cycle.
///
/// Shared reuse of a plan (diamonds) and a relation pointing back at its own
/// plan are not cycles. The path lists every plan on the cycle, starting and
/// ending with the plan that was reached twice.
#[derive(Debug)]
pub(super) struct CyclicMappingError {
    path: Vec<Box<str>>,
}

impl std::error::Error for CyclicMappingError {}

impl core::fmt::Display for CyclicMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("cyclic mapping: ")?;
        for (i, step) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(step)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a cyclic mapping error from the plans on the cycle.
    pub fn cyclic_mapping<I>(path: I) -> Error
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Error::from(super::ErrorKind::CyclicMapping(CyclicMappingError {
            path: path.into_iter().map(|step| step.into().into()).collect(),
        }))
    }

    /// Returns `true` if this error is a cyclic mapping error.
    pub fn is_cyclic_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::CyclicMapping(_)))
    }
}
