mod expand;
mod schema;

use proc_macro2::TokenStream;

pub fn generate_model(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemStruct = syn::parse2(input)?;
    let model = schema::Model::from_ast(&item)?;

    Ok(expand::model(&model))
}

pub fn generate_enum(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemEnum = syn::parse2(input)?;
    let primitive = schema::PrimitiveEnum::from_ast(&item)?;

    Ok(expand::primitive_enum(&primitive))
}
