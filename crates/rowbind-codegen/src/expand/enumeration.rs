use crate::schema::PrimitiveEnum;

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn expand(primitive: &PrimitiveEnum, rowbind: &TokenStream) -> TokenStream {
    let ident = &primitive.ident;
    let name = ident.to_string();
    let repr = &primitive.repr;
    let value_ty = syn::Ident::new(&repr.to_string().to_uppercase(), repr.span());
    let zero = &primitive.variants[primitive.zero].ident;

    let arms = primitive.variants.iter().map(|variant| {
        let variant_ident = &variant.ident;
        let discriminant = proc_macro2::Literal::i64_suffixed(variant.discriminant);

        quote!(#discriminant => Ok(#ident::#variant_ident),)
    });

    quote! {
        impl #rowbind::Primitive for #ident {
            const TYPE: #rowbind::Type = #rowbind::Type::#value_ty;

            fn zero() -> Self {
                #ident::#zero
            }

            fn load(value: #rowbind::Value) -> #rowbind::Result<Self> {
                if value.is_null() {
                    return Ok(Self::zero());
                }

                let discriminant = <#repr as #rowbind::Primitive>::load(value.clone())?;

                match discriminant as i64 {
                    #( #arms )*
                    _ => Err(#rowbind::Error::type_conversion(value, #name)),
                }
            }
        }

        impl From<#ident> for #rowbind::Value {
            fn from(value: #ident) -> #rowbind::Value {
                #rowbind::Value::from(value as #repr)
            }
        }
    }
}
