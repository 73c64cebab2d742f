use proc_macro2::TokenStream;
use quote::ToTokens;

pub(crate) fn int(v: usize) -> TokenStream {
    proc_macro2::Literal::usize_unsuffixed(v).into_token_stream()
}

/// The member name for a field, without any raw identifier prefix.
pub(crate) fn member_name(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}
