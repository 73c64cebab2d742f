use super::parse_scheme;
use super::scheme::kw;

#[derive(Debug)]
pub(crate) struct Column {
    /// Source column name; the member name when unset
    pub(crate) name: Option<syn::LitStr>,

    pub(crate) scheme: i32,
}

impl Column {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Column> {
        if let syn::Meta::Path(_) = &attr.meta {
            return Ok(Column {
                name: None,
                scheme: 0,
            });
        }

        attr.parse_args()
    }
}

impl syn::parse::Parse for Column {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = Self {
            name: None,
            scheme: 0,
        };
        let mut seen_scheme = false;

        // Allowed syntax:
        //
        // #[column("name")]
        // #[column(scheme = 1)]
        // #[column("name", scheme = 1)]
        while !input.is_empty() {
            let lookahead = input.lookahead1();

            if lookahead.peek(syn::LitStr) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column name"));
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::scheme) {
                if seen_scheme {
                    return Err(syn::Error::new(input.span(), "duplicate scheme"));
                }
                let _kw: kw::scheme = input.parse()?;
                result.scheme = parse_scheme(input)?;
                seen_scheme = true;
            } else {
                return Err(lookahead.error());
            }

            if input.is_empty() {
                break;
            }
            let _comma_token: syn::Token![,] = input.parse()?;
        }

        Ok(result)
    }
}
