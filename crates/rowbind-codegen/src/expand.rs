mod enumeration;
mod object;
mod schema;
mod util;

use crate::schema::{Model, PrimitiveEnum};

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The model being expanded
    model: &'a Model,

    /// Path prefix for rowbind types
    rowbind: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> TokenStream {
        let model_impl = self.expand_model_impl();
        let object_impl = self.expand_object_impl();
        let slot_impl = self.expand_slot_impl();

        wrap_in_const(quote! {
            #model_impl
            #object_impl
            #slot_impl
        })
    }
}

pub(super) fn model(model: &Model) -> TokenStream {
    Expand {
        model,
        rowbind: quote!(_rowbind::codegen_support),
    }
    .expand()
}

pub(super) fn primitive_enum(primitive: &PrimitiveEnum) -> TokenStream {
    wrap_in_const(enumeration::expand(
        primitive,
        &quote!(_rowbind::codegen_support),
    ))
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use rowbind as _rowbind;
            #code
        };
    }
}
