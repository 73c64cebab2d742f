use crate::TypeRegistry;

use rowbind_core::mapping::{
    ColumnFact, ComplexFact, ExtractInfo, MappingFact, MappingProvider, RelationFact, TableFact,
};
use rowbind_core::schema::{EntityRef, Member};
use rowbind_core::{EntityType, Error, Result, SchemeId};

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub types: Vec<TypeDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDoc {
    #[serde(rename = "type")]
    pub name: String,

    #[serde(default)]
    pub keys: Vec<KeyDoc>,

    #[serde(default)]
    pub schemes: Vec<SchemeDoc>,
}

/// Key columns of a named relation, declared on the parent type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyDoc {
    pub name: String,

    pub columns: Vec<KeyColumnDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyColumnDoc {
    pub parent: String,

    /// Defaults to `parent`
    #[serde(default)]
    pub child: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeDoc {
    pub id: i32,

    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub members: Vec<MemberDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDoc {
    pub member: String,

    #[serde(default)]
    pub column: Option<String>,

    #[serde(default)]
    pub complex: bool,

    #[serde(default)]
    pub relation: Option<String>,

    /// Name of the nested type
    #[serde(default)]
    pub item: Option<String>,

    /// Nested scheme; defaults to the enclosing scheme
    #[serde(default)]
    pub scheme: Option<i32>,
}

/// Reads facts from schema documents.
///
/// Every loaded document is merged into one tree. Later documents add
/// types and replace schemes and keys that share an id or name.
pub struct DocumentProvider {
    registry: Arc<TypeRegistry>,
    types: IndexMap<String, TypeDoc>,
}

impl DocumentProvider {
    pub fn new(registry: Arc<TypeRegistry>) -> DocumentProvider {
        DocumentProvider {
            registry,
            types: IndexMap::new(),
        }
    }

    /// Parses and merges a document.
    pub fn add_str(&mut self, json: &str) -> Result<()> {
        let document: Document = serde_json::from_str(json)
            .map_err(|err| Error::from(anyhow::Error::from(err)))
            .map_err(|err| err.context(Error::invalid_mapping("malformed schema document")))?;

        self.add_document(document);
        Ok(())
    }

    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        self.add_str(&json)
    }

    pub fn add_document(&mut self, document: Document) {
        for incoming in document.types {
            let Some(existing) = self.types.get_mut(&incoming.name) else {
                self.types.insert(incoming.name.clone(), incoming);
                continue;
            };

            for key in incoming.keys {
                match existing.keys.iter_mut().find(|k| k.name == key.name) {
                    Some(slot) => *slot = key,
                    None => existing.keys.push(key),
                }
            }

            for scheme in incoming.schemes {
                match existing.schemes.iter_mut().find(|s| s.id == scheme.id) {
                    Some(slot) => *slot = scheme,
                    None => existing.schemes.push(scheme),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn scheme(&self, ty: &str, scheme: SchemeId) -> Option<&SchemeDoc> {
        self.types
            .get(ty)?
            .schemes
            .iter()
            .find(|doc| doc.id == scheme.0)
    }

    fn key(&self, ty: &str, name: &str) -> Option<&KeyDoc> {
        self.types.get(ty)?.keys.iter().find(|key| key.name == name)
    }

    /// Looks the member up on the concrete type first, then on the type
    /// that declares it.
    fn member_doc(
        &self,
        ty: &'static EntityType,
        member: &Member,
        scheme: SchemeId,
    ) -> Option<(&MemberDoc, &'static str)> {
        let candidates = [ty.name, member.declaring_type];

        candidates.into_iter().find_map(|owner| {
            self.scheme(owner, scheme)?
                .members
                .iter()
                .find(|doc| doc.member == member.name)
                .map(|doc| (doc, owner))
        })
    }

    fn item(&self, name: Option<&str>) -> Result<Option<EntityRef>> {
        let Some(name) = name else {
            return Ok(None);
        };

        let Some(ty) = self.registry.get(name) else {
            return Err(Error::invalid_mapping(format!(
                "schema document names unknown type `{name}`"
            )));
        };

        Ok(Some(EntityRef::resolved(ty)))
    }

    fn fact(
        &self,
        owner: &str,
        member: &Member,
        doc: &MemberDoc,
        scheme: SchemeId,
    ) -> Result<MappingFact> {
        let nested_scheme = doc.scheme.map(SchemeId).unwrap_or(scheme);
        let item = self.item(doc.item.as_deref())?;

        if let Some(relation) = &doc.relation {
            if doc.complex {
                return Err(Error::invalid_mapping(format!(
                    "member `{}` cannot be both complex and a relation",
                    member.name
                )));
            }

            let (parent_keys, child_keys) = match self.key(owner, relation) {
                Some(key) => key
                    .columns
                    .iter()
                    .map(|column| {
                        let child = column.child.as_ref().unwrap_or(&column.parent);
                        (column.parent.clone(), child.clone())
                    })
                    .unzip(),
                None => (vec![], vec![]),
            };

            return Ok(MappingFact::Relation(RelationFact {
                name: relation.clone(),
                scheme,
                nested_scheme,
                item,
                parent_keys,
                child_keys,
            }));
        }

        if doc.complex {
            return Ok(MappingFact::Complex(ComplexFact {
                scheme,
                nested_scheme,
                item,
            }));
        }

        Ok(MappingFact::Column(ColumnFact {
            column: Some(doc.column.clone().unwrap_or_else(|| member.name.to_string())),
            scheme,
        }))
    }
}

impl MappingProvider for DocumentProvider {
    fn set_config(&mut self, paths: &[PathBuf]) -> bool {
        let mut accepted = false;

        for path in paths {
            match self.add_file(path) {
                Ok(()) => {
                    log::debug!("loaded schema document {}", path.display());
                    accepted = true;
                }
                Err(err) => {
                    log::warn!("skipping schema document {}: {err}", path.display());
                }
            }
        }

        accepted
    }

    fn extract_info(&self, info: &mut ExtractInfo) -> Result<bool> {
        let ty = info.ty;
        let scheme = info.scheme;

        for member in &ty.members {
            let Some((doc, owner)) = self.member_doc(ty, member, scheme) else {
                continue;
            };

            let fact = self
                .fact(owner, member, doc, scheme)
                .map_err(|err| err.context(err_in(ty, member)))?;

            info.push(member.index, fact);
        }

        if let Some(scheme_doc) = self.scheme(ty.name, scheme) {
            for doc in &scheme_doc.members {
                if ty.member_by_name(&doc.member).is_none() {
                    log::debug!(
                        "schema document maps unknown member `{}::{}`",
                        ty.name,
                        doc.member
                    );
                }
            }

            info.table = scheme_doc.table.as_ref().map(|name| TableFact {
                schemes: vec![scheme],
                name: name.clone(),
            });
        }

        Ok(!info.is_empty())
    }
}

fn err_in(ty: &EntityType, member: &Member) -> Error {
    Error::invalid_mapping(format!(
        "invalid document mapping for `{}::{}`",
        ty.name, member.name
    ))
}
