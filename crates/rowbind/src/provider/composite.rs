use rowbind_core::mapping::{ExtractInfo, MappingProvider};
use rowbind_core::Result;

use std::path::PathBuf;

/// Tries each provider in order and keeps the facts of the first one that
/// finds any.
#[derive(Default)]
pub struct CompositeProvider {
    providers: Vec<Box<dyn MappingProvider>>,
}

impl CompositeProvider {
    pub fn new() -> CompositeProvider {
        CompositeProvider::default()
    }

    pub fn push(&mut self, provider: impl MappingProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn push_boxed(&mut self, provider: Box<dyn MappingProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl MappingProvider for CompositeProvider {
    /// Offers the documents to every provider, so each can pick up the ones
    /// it understands.
    fn set_config(&mut self, paths: &[PathBuf]) -> bool {
        self.providers
            .iter_mut()
            .fold(false, |accepted, provider| provider.set_config(paths) || accepted)
    }

    fn extract_info(&self, info: &mut ExtractInfo) -> Result<bool> {
        for provider in &self.providers {
            info.clear();

            if provider.extract_info(info)? {
                return Ok(true);
            }
        }

        info.clear();
        Ok(false)
    }
}
