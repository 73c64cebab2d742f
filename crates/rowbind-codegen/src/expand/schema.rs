use super::{util, Expand};
use crate::schema::{Complex, Field, FieldKind, Relation};

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_model_impl(&self) -> TokenStream {
        let rowbind = &self.rowbind;
        let model_ident = &self.model.ident;
        let model_name = util::member_name(model_ident);

        let fields = self.model.fields.iter().filter_map(|field| self.expand_field(field));

        let tables = self.model.tables.iter().map(|table| {
            let name = &table.name;
            let schemes = &table.schemes;

            quote! {
                .table(#rowbind::TableFact {
                    schemes: vec![#( #rowbind::SchemeId(#schemes) ),*],
                    name: #name.to_string(),
                })
            }
        });

        quote! {
            impl #rowbind::Model for #model_ident {
                fn entity_type() -> &'static #rowbind::EntityType {
                    static ENTITY_TYPE: std::sync::OnceLock<#rowbind::EntityType> =
                        std::sync::OnceLock::new();

                    ENTITY_TYPE.get_or_init(|| {
                        #rowbind::EntityType::builder::<#model_ident>(#model_name)
                            #( #fields )*
                            #( #tables )*
                            .build()
                    })
                }
            }
        }
    }

    fn expand_field(&self, field: &Field) -> Option<TokenStream> {
        let rowbind = &self.rowbind;
        let index = util::int(field.index);
        let name = util::member_name(&field.ident);
        let ty = &field.ty;

        let (member_ty, facts) = match &field.kind {
            FieldKind::Scalar(columns) => {
                let facts = columns.iter().map(|column| {
                    let scheme = column.scheme;
                    let column_name = match &column.name {
                        Some(lit) => quote!(Some(#lit.to_string())),
                        None => quote!(None),
                    };

                    quote! {
                        #rowbind::MappingFact::Column(#rowbind::ColumnFact {
                            column: #column_name,
                            scheme: #rowbind::SchemeId(#scheme),
                        })
                    }
                });

                (
                    quote! {
                        #rowbind::MemberTy::Scalar {
                            ty: <#ty as #rowbind::Primitive>::TYPE,
                            nullable: <#ty as #rowbind::Primitive>::NULLABLE,
                        }
                    },
                    facts.collect::<Vec<_>>(),
                )
            }
            FieldKind::Complex(facts) => (
                quote! {
                    #rowbind::MemberTy::Model {
                        target: <#ty as #rowbind::ComplexSlot>::item_type(),
                    }
                },
                facts.iter().map(|fact| self.expand_complex_fact(fact)).collect(),
            ),
            FieldKind::Collection(relations) => (
                quote! {
                    #rowbind::MemberTy::Collection {
                        item: <#ty as #rowbind::CollectionSlot>::item_type(),
                    }
                },
                relations
                    .iter()
                    .map(|relation| self.expand_relation_fact(relation))
                    .collect(),
            ),
            FieldKind::Inherit => {
                return Some(quote! {
                    .inherit(#index, #rowbind::EntityRef::of::<#ty>())
                });
            }
            FieldKind::Skip => return None,
        };

        Some(quote! {
            .field(#index, #name, #member_ty, vec![#( #facts ),*])
        })
    }

    fn expand_complex_fact(&self, fact: &Complex) -> TokenStream {
        let rowbind = &self.rowbind;
        let scheme = fact.scheme;
        let nested = fact.nested.unwrap_or(fact.scheme);
        let item = self.expand_item(fact.item.as_ref());

        quote! {
            #rowbind::MappingFact::Complex(#rowbind::ComplexFact {
                scheme: #rowbind::SchemeId(#scheme),
                nested_scheme: #rowbind::SchemeId(#nested),
                item: #item,
            })
        }
    }

    fn expand_relation_fact(&self, relation: &Relation) -> TokenStream {
        let rowbind = &self.rowbind;
        let name = &relation.name;
        let scheme = relation.scheme;
        let nested = relation.nested.unwrap_or(relation.scheme);
        let item = self.expand_item(relation.item.as_ref());
        let parent_keys = &relation.parent_keys;
        let child_keys = relation.child_keys();

        quote! {
            #rowbind::MappingFact::Relation(#rowbind::RelationFact {
                name: #name.to_string(),
                scheme: #rowbind::SchemeId(#scheme),
                nested_scheme: #rowbind::SchemeId(#nested),
                item: #item,
                parent_keys: vec![#( #parent_keys.to_string() ),*],
                child_keys: vec![#( #child_keys.to_string() ),*],
            })
        }
    }

    fn expand_item(&self, item: Option<&syn::Type>) -> TokenStream {
        let rowbind = &self.rowbind;

        match item {
            Some(ty) => quote!(Some(#rowbind::EntityRef::of::<#ty>())),
            None => quote!(None),
        }
    }
}
