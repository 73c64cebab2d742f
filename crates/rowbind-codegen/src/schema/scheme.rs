/// Parses the right-hand side of `scheme = N` / `nested = N`.
pub(crate) fn parse_scheme(input: syn::parse::ParseStream) -> syn::Result<i32> {
    let _eq_token: syn::Token![=] = input.parse()?;

    let negative = input.peek(syn::Token![-]);
    if negative {
        let _minus: syn::Token![-] = input.parse()?;
    }

    let lit: syn::LitInt = input.parse()?;
    let value: i32 = lit.base10_parse()?;

    if negative {
        return Err(syn::Error::new_spanned(
            lit,
            "negative scheme ids are reserved",
        ));
    }

    Ok(value)
}

pub(crate) mod kw {
    syn::custom_keyword!(scheme);
    syn::custom_keyword!(schemes);
    syn::custom_keyword!(nested);
    syn::custom_keyword!(item);
    syn::custom_keyword!(parent_key);
    syn::custom_keyword!(child_key);
}
