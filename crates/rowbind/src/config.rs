use rowbind_core::SchemeId;

use std::path::PathBuf;

/// Configuration for a [`Mapper`](crate::Mapper)
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum nesting depth of complex and child extraction
    pub max_depth: usize,

    /// Schema documents loaded when the mapper is built
    pub documents: Vec<PathBuf>,

    /// Scheme used by the scheme-less convenience methods
    pub default_scheme: SchemeId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 64,
            documents: vec![],
            default_scheme: SchemeId::DEFAULT,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Add a schema document to load at build time
    pub fn document(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.push(path.into());
        self
    }

    /// Set the scheme used when none is given
    pub fn default_scheme(mut self, scheme: impl Into<SchemeId>) -> Self {
        self.default_scheme = scheme.into();
        self
    }
}
