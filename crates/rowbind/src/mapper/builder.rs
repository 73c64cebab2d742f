use super::{Mapper, Shared};
use crate::engine::PlanCache;
use crate::provider::{AttributeProvider, CompositeProvider, DocumentProvider};
use crate::{Config, DefaultObjectBuilder, ObjectBuilder, TypeRegistry};

use rowbind_core::mapping::MappingProvider;
use rowbind_core::{Model, Result};

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configures and builds a [`Mapper`].
#[derive(Default)]
pub struct Builder {
    registry: TypeRegistry,

    /// Inline schema documents
    documents: Vec<String>,

    /// Custom providers, consulted before the built-in ones
    providers: Vec<Box<dyn MappingProvider>>,

    object_builder: Option<Box<dyn ObjectBuilder>>,

    config: Config,
}

impl Builder {
    /// Makes `T`, and every type it nests, known to schema documents.
    pub fn register<T: Model>(&mut self) -> &mut Self {
        self.registry.register::<T>();
        self
    }

    /// Adds an inline schema document.
    pub fn document(&mut self, json: impl Into<String>) -> &mut Self {
        self.documents.push(json.into());
        self
    }

    /// Adds a schema document file to load at build time.
    pub fn document_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.documents.push(path.into());
        self
    }

    pub fn object_builder(&mut self, builder: impl ObjectBuilder + 'static) -> &mut Self {
        self.object_builder = Some(Box::new(builder));
        self
    }

    /// Adds a provider that is asked for facts before the schema documents
    /// and the derive attributes.
    pub fn provider(&mut self, provider: impl MappingProvider + 'static) -> &mut Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Replaces the configuration. Document files added so far are kept.
    pub fn config(&mut self, config: Config) -> &mut Self {
        let documents = std::mem::take(&mut self.config.documents);
        self.config = config;
        self.config.documents.splice(0..0, documents);
        self
    }

    pub fn build(&mut self) -> Result<Mapper> {
        self.registry.check()?;

        let registry = Arc::new(std::mem::take(&mut self.registry));
        let config = std::mem::take(&mut self.config);

        let mut documents = DocumentProvider::new(registry.clone());
        for json in self.documents.drain(..) {
            documents.add_str(&json)?;
        }

        let mut provider = CompositeProvider::new();
        for custom in self.providers.drain(..) {
            provider.push_boxed(custom);
        }
        provider.push(documents);
        provider.push(AttributeProvider);

        if !config.documents.is_empty() && !provider.set_config(&config.documents) {
            log::warn!(
                "none of the {} configured schema documents could be loaded",
                config.documents.len()
            );
        }

        let builder = self
            .object_builder
            .take()
            .unwrap_or_else(|| Box::new(DefaultObjectBuilder));

        log::debug!(
            "built mapper with {} registered types and {} providers",
            registry.len(),
            provider.len()
        );

        Ok(Mapper {
            shared: Arc::new(Shared {
                cache: PlanCache::default(),
                provider: RwLock::new(provider),
                builder,
                registry,
                config,
            }),
        })
    }
}
