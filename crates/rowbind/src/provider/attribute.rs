use rowbind_core::mapping::{ExtractInfo, MappingProvider};
use rowbind_core::Result;

/// Reads the facts declared with `#[derive(Model)]` attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeProvider;

impl MappingProvider for AttributeProvider {
    fn extract_info(&self, info: &mut ExtractInfo) -> Result<bool> {
        let ty = info.ty;
        let scheme = info.scheme;

        for member in &ty.members {
            if let Some(fact) = member.fact(scheme) {
                info.push(member.index, fact.clone());
            }
        }

        info.table = ty
            .tables
            .iter()
            .find(|table| table.applies_to(scheme))
            .cloned();

        Ok(!info.is_empty())
    }
}
