use super::parse_scheme;
use super::scheme::kw;

#[derive(Debug)]
pub(crate) struct Complex {
    pub(crate) scheme: i32,

    /// Scheme the nested object is extracted with. Defaults to `scheme`.
    pub(crate) nested: Option<i32>,

    /// Explicit nested type
    pub(crate) item: Option<syn::Type>,
}

impl Complex {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Complex> {
        if let syn::Meta::Path(_) = &attr.meta {
            return Ok(Complex {
                scheme: 0,
                nested: None,
                item: None,
            });
        }

        attr.parse_args()
    }
}

impl syn::parse::Parse for Complex {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = Self {
            scheme: 0,
            nested: None,
            item: None,
        };
        let mut seen_scheme = false;

        while !input.is_empty() {
            let lookahead = input.lookahead1();

            if lookahead.peek(kw::scheme) {
                if seen_scheme {
                    return Err(syn::Error::new(input.span(), "duplicate scheme"));
                }
                let _kw: kw::scheme = input.parse()?;
                result.scheme = parse_scheme(input)?;
                seen_scheme = true;
            } else if lookahead.peek(kw::nested) {
                if result.nested.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate nested scheme"));
                }
                let _kw: kw::nested = input.parse()?;
                result.nested = Some(parse_scheme(input)?);
            } else if lookahead.peek(kw::item) {
                if result.item.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate item type"));
                }
                let _kw: kw::item = input.parse()?;
                let _eq_token: syn::Token![=] = input.parse()?;
                result.item = Some(input.parse()?);
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
