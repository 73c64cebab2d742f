use super::scheme::kw;

/// `#[table("Name")]` or `#[table("Name", schemes = [0, 1])]`
#[derive(Debug)]
pub(crate) struct Table {
    pub(crate) name: syn::LitStr,

    /// Schemes the table applies to; every scheme when empty
    pub(crate) schemes: Vec<i32>,
}

impl Table {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Table> {
        attr.parse_args()
    }
}

impl syn::parse::Parse for Table {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let name: syn::LitStr = input.parse()?;
        let mut schemes = vec![];

        if input.peek(syn::Token![,]) {
            let _comma_token: syn::Token![,] = input.parse()?;
        }

        if !input.is_empty() {
            let _kw: kw::schemes = input.parse()?;
            let _eq_token: syn::Token![=] = input.parse()?;

            let content;
            syn::bracketed!(content in input);
            for lit in content.parse_terminated(<syn::LitInt as syn::parse::Parse>::parse, syn::Token![,])? {
                schemes.push(lit.base10_parse()?);
            }
        }

        Ok(Table { name, schemes })
    }
}
