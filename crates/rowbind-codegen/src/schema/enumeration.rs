use super::ErrorSet;

/// A fieldless enum stored as its integer discriminant.
#[derive(Debug)]
pub(crate) struct PrimitiveEnum {
    pub(crate) ident: syn::Ident,

    /// Integer type from `#[repr(..)]`, `i32` when absent
    pub(crate) repr: syn::Ident,

    pub(crate) variants: Vec<EnumVariant>,

    /// Index of the variant whose discriminant is zero
    pub(crate) zero: usize,
}

#[derive(Debug)]
pub(crate) struct EnumVariant {
    pub(crate) ident: syn::Ident,

    pub(crate) discriminant: i64,
}

const REPRS: &[&str] = &["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"];

impl PrimitiveEnum {
    pub(crate) fn from_ast(ast: &syn::ItemEnum) -> syn::Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "enum generics are not supported",
            ));
        }

        let mut errs = ErrorSet::new();
        let mut repr = syn::Ident::new("i32", proc_macro2::Span::call_site());

        for attr in &ast.attrs {
            if !attr.path().is_ident("repr") {
                continue;
            }

            let result = attr.parse_nested_meta(|meta| {
                if let Some(ident) = meta.path.get_ident() {
                    if REPRS.contains(&ident.to_string().as_str()) {
                        repr = ident.clone();
                    }
                }
                Ok(())
            });

            if let Err(err) = result {
                errs.push(err);
            }
        }

        let mut variants = vec![];
        let mut next = 0i64;

        for variant in &ast.variants {
            if !matches!(variant.fields, syn::Fields::Unit) {
                errs.push(syn::Error::new_spanned(
                    variant,
                    "enum variants must not carry fields",
                ));
                continue;
            }

            let discriminant = match &variant.discriminant {
                Some((_, expr)) => match parse_discriminant(expr) {
                    Ok(value) => value,
                    Err(err) => {
                        errs.push(err);
                        continue;
                    }
                },
                None => next,
            };

            next = discriminant.wrapping_add(1);
            variants.push(EnumVariant {
                ident: variant.ident.clone(),
                discriminant,
            });
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        let Some(zero) = variants.iter().position(|v| v.discriminant == 0) else {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "enum needs a variant with discriminant 0 to use as its null value",
            ));
        };

        Ok(Self {
            ident: ast.ident.clone(),
            repr,
            variants,
            zero,
        })
    }
}

fn parse_discriminant(expr: &syn::Expr) -> syn::Result<i64> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(lit),
            ..
        }) => lit.base10_parse(),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => parse_discriminant(expr).map(|value| -value),
        syn::Expr::Group(group) => parse_discriminant(&group.expr),
        _ => Err(syn::Error::new_spanned(
            expr,
            "enum discriminants must be integer literals",
        )),
    }
}
