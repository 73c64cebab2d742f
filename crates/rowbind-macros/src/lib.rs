extern crate proc_macro;

use proc_macro::TokenStream;

#[proc_macro_derive(
    Model,
    attributes(column, complex, nested, relation, collection, inherit, skip, table)
)]
pub fn derive_model(input: TokenStream) -> TokenStream {
    match rowbind_codegen::generate_model(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(Enum)]
pub fn derive_enum(input: TokenStream) -> TokenStream {
    match rowbind_codegen::generate_enum(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
