use super::parse_scheme;
use super::scheme::kw;

#[derive(Debug)]
pub(crate) struct Relation {
    /// Relation name used for navigation and key lookup
    pub(crate) name: syn::LitStr,

    pub(crate) scheme: i32,

    pub(crate) nested: Option<i32>,

    pub(crate) item: Option<syn::Type>,

    pub(crate) parent_keys: Vec<syn::LitStr>,

    /// Child key columns. Defaults to `parent_keys`.
    pub(crate) child_keys: Option<Vec<syn::LitStr>>,
}

impl Relation {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Relation> {
        let relation: Relation = attr.parse_args()?;

        if let Some(child_keys) = &relation.child_keys {
            if child_keys.len() != relation.parent_keys.len() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "`parent_key` and `child_key` must list the same number of columns",
                ));
            }
        }

        Ok(relation)
    }

    pub(crate) fn child_keys(&self) -> &[syn::LitStr] {
        self.child_keys.as_deref().unwrap_or(&self.parent_keys)
    }
}

impl syn::parse::Parse for Relation {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        // The relation name always comes first
        let name: syn::LitStr = input.parse()?;

        let mut result = Self {
            name,
            scheme: 0,
            nested: None,
            item: None,
            parent_keys: vec![],
            child_keys: None,
        };
        let mut seen_scheme = false;

        while !input.is_empty() {
            let _comma_token: syn::Token![,] = input.parse()?;
            if input.is_empty() {
                break;
            }

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
            } else if lookahead.peek(kw::parent_key) {
                if !result.parent_keys.is_empty() {
                    return Err(syn::Error::new(input.span(), "duplicate parent_key"));
                }
                let _kw: kw::parent_key = input.parse()?;
                result.parent_keys = parse_keys(input)?;
            } else if lookahead.peek(kw::child_key) {
                if result.child_keys.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate child_key"));
                }
                let _kw: kw::child_key = input.parse()?;
                result.child_keys = Some(parse_keys(input)?);
            } else {
                return Err(lookahead.error());
            }
        }

        Ok(result)
    }
}

/// Parses `= "Col"` or `= ["A", "B"]`.
fn parse_keys(input: syn::parse::ParseStream) -> syn::Result<Vec<syn::LitStr>> {
    let _eq_token: syn::Token![=] = input.parse()?;

    if input.peek(syn::token::Bracket) {
        let content;
        syn::bracketed!(content in input);
        let keys = content.parse_terminated(<syn::LitStr as syn::parse::Parse>::parse, syn::Token![,])?;

        if keys.is_empty() {
            return Err(syn::Error::new(content.span(), "expected at least one key column"));
        }

        Ok(keys.into_iter().collect())
    } else {
        Ok(vec![input.parse()?])
    }
}
