use super::{util, Expand};
use crate::schema::FieldKind;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_object_impl(&self) -> TokenStream {
        let rowbind = &self.rowbind;
        let model_ident = &self.model.ident;
        let model_name = util::member_name(model_ident);

        let mut scalar_arms = vec![];
        let mut complex_arms = vec![];
        let mut collection_arms = vec![];
        let mut base_arms = vec![];

        for field in &self.model.fields {
            let index = util::int(field.index);
            let ident = &field.ident;
            let ty = &field.ty;

            match &field.kind {
                FieldKind::Scalar(_) => scalar_arms.push(quote! {
                    #index => {
                        self.#ident = <#ty as #rowbind::Primitive>::load(value)?;
                        Ok(())
                    }
                }),
                FieldKind::Complex(_) => complex_arms.push(quote! {
                    #index => <#ty as #rowbind::ComplexSlot>::get_or_insert(&mut self.#ident, item),
                }),
                FieldKind::Collection(_) => collection_arms.push(quote! {
                    #index => Ok(<#ty as #rowbind::CollectionSlot>::collection(&mut self.#ident)),
                }),
                FieldKind::Inherit => base_arms.push(quote! {
                    #index => Ok(&mut self.#ident),
                }),
                FieldKind::Skip => {}
            }
        }

        let no_field = |kind: &str| {
            let message = format!("`{model_name}` has no {kind} field #{{}}");
            quote!(Err(#rowbind::Error::invalid_argument(format!(#message, field))))
        };

        let no_scalar = no_field("scalar");
        let no_complex = no_field("complex");
        let no_collection = no_field("collection");
        let no_base = no_field("base");

        quote! {
            impl #rowbind::Object for #model_ident {
                fn object_type(&self) -> &'static #rowbind::EntityType {
                    <Self as #rowbind::Model>::entity_type()
                }

                fn set_field(&mut self, field: usize, value: #rowbind::Value) -> #rowbind::Result<()> {
                    match field {
                        #( #scalar_arms )*
                        _ => {
                            let _ = value;
                            #no_scalar
                        }
                    }
                }

                fn complex_mut(
                    &mut self,
                    field: usize,
                    item: &'static #rowbind::EntityType,
                ) -> #rowbind::Result<&mut dyn #rowbind::Object> {
                    match field {
                        #( #complex_arms )*
                        _ => {
                            let _ = item;
                            #no_complex
                        }
                    }
                }

                fn collection_mut(
                    &mut self,
                    field: usize,
                ) -> #rowbind::Result<&mut dyn #rowbind::Collection> {
                    match field {
                        #( #collection_arms )*
                        _ => #no_collection,
                    }
                }

                fn base_mut(&mut self, field: usize) -> #rowbind::Result<&mut dyn #rowbind::Object> {
                    match field {
                        #( #base_arms )*
                        _ => #no_base,
                    }
                }

                fn clone_object(&self) -> Box<dyn #rowbind::Object> {
                    Box::new(Clone::clone(self))
                }

                fn as_any(&self) -> &dyn #rowbind::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn #rowbind::Any {
                    self
                }

                fn into_any(self: Box<Self>) -> Box<dyn #rowbind::Any> {
                    self
                }
            }
        }
    }

    /// Lets other models hold this one directly as a complex member.
    pub(super) fn expand_slot_impl(&self) -> TokenStream {
        let rowbind = &self.rowbind;
        let model_ident = &self.model.ident;

        quote! {
            impl #rowbind::ComplexSlot for #model_ident {
                fn item_type() -> Option<#rowbind::EntityRef> {
                    Some(#rowbind::EntityRef::of::<Self>())
                }

                fn get_or_insert(
                    &mut self,
                    item: &'static #rowbind::EntityType,
                ) -> #rowbind::Result<&mut dyn #rowbind::Object> {
                    if !item.is::<Self>() {
                        return Err(#rowbind::Error::invalid_argument(format!(
                            "cannot store `{}` in a field of type `{}`",
                            item.name,
                            <Self as #rowbind::Model>::entity_type().name,
                        )));
                    }

                    Ok(self)
                }
            }
        }
    }
}
