use super::{Column, Complex, ErrorSet, Relation};

#[derive(Debug)]
pub(crate) struct Field {
    /// Index of the field in the containing struct
    pub(crate) index: usize,

    pub(crate) ident: syn::Ident,

    pub(crate) ty: syn::Type,

    pub(crate) kind: FieldKind,
}

#[derive(Debug)]
pub(crate) enum FieldKind {
    /// A `Primitive` field, optionally bound to columns per scheme
    Scalar(Vec<Column>),

    /// A nested single object. `#[nested]` yields no facts.
    Complex(Vec<Complex>),

    /// A nested collection. `#[collection]` yields no relations.
    Collection(Vec<Relation>),

    /// A base model whose members are flattened into this one
    Inherit,

    /// Not a member
    Skip,
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            FieldKind::Scalar(_) => "column",
            FieldKind::Complex(_) => "complex",
            FieldKind::Collection(_) => "relation",
            FieldKind::Inherit => "inherit",
            FieldKind::Skip => "skip",
        }
    }
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field, model_ident: &syn::Ident, index: usize) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "model fields must be named"));
        };

        let mut errs = ErrorSet::new();
        let mut kind: Option<FieldKind> = None;

        for attr in &field.attrs {
            let path = attr.path();

            let attr_kind = if path.is_ident("column") {
                match Column::from_ast(attr) {
                    Ok(column) => FieldKind::Scalar(vec![column]),
                    Err(err) => {
                        errs.push(err);
                        continue;
                    }
                }
            } else if path.is_ident("complex") {
                match Complex::from_ast(attr) {
                    Ok(complex) => FieldKind::Complex(vec![complex]),
                    Err(err) => {
                        errs.push(err);
                        continue;
                    }
                }
            } else if path.is_ident("nested") {
                FieldKind::Complex(vec![])
            } else if path.is_ident("relation") {
                match Relation::from_ast(attr) {
                    Ok(relation) => FieldKind::Collection(vec![relation]),
                    Err(err) => {
                        errs.push(err);
                        continue;
                    }
                }
            } else if path.is_ident("collection") {
                FieldKind::Collection(vec![])
            } else if path.is_ident("inherit") {
                FieldKind::Inherit
            } else if path.is_ident("skip") {
                FieldKind::Skip
            } else {
                continue;
            };

            match (&mut kind, attr_kind) {
                (None, attr_kind) => kind = Some(attr_kind),
                (Some(FieldKind::Scalar(columns)), FieldKind::Scalar(more)) => columns.extend(more),
                (Some(FieldKind::Complex(facts)), FieldKind::Complex(more)) => facts.extend(more),
                (Some(FieldKind::Collection(relations)), FieldKind::Collection(more)) => {
                    relations.extend(more)
                }
                (Some(existing), attr_kind) => {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        format!(
                            "#[{}] cannot be combined with #[{}] on the same field",
                            attr_kind.name(),
                            existing.name()
                        ),
                    ));
                }
            }
        }

        let kind = kind.unwrap_or(FieldKind::Scalar(vec![]));

        if let Err(err) = check_schemes(&kind) {
            errs.push(err);
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        let mut ty = field.ty.clone();
        rewrite_self(&mut ty, model_ident);

        Ok(Self {
            index,
            ident: ident.clone(),
            ty,
            kind,
        })
    }

    pub(crate) fn is_member(&self) -> bool {
        !matches!(self.kind, FieldKind::Skip | FieldKind::Inherit)
    }
}

/// At most one fact per member and scheme.
fn check_schemes(kind: &FieldKind) -> syn::Result<()> {
    let mut seen = vec![];
    let mut errs = ErrorSet::new();

    let mut check = |scheme: i32, span: &dyn quote::ToTokens| {
        if seen.contains(&scheme) {
            errs.push(syn::Error::new_spanned(
                span,
                format!("duplicate mapping for scheme {scheme}"),
            ));
        } else {
            seen.push(scheme);
        }
    };

    match kind {
        FieldKind::Scalar(columns) => {
            for column in columns {
                match &column.name {
                    Some(name) => check(column.scheme, name),
                    None => check(column.scheme, &quote::quote!(column)),
                }
            }
        }
        FieldKind::Complex(facts) => {
            for fact in facts {
                check(fact.scheme, &quote::quote!(complex));
            }
        }
        FieldKind::Collection(relations) => {
            for relation in relations {
                check(relation.scheme, &relation.name);
            }
        }
        FieldKind::Inherit | FieldKind::Skip => {}
    }

    match errs.collect() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn rewrite_self(ty: &mut syn::Type, model: &syn::Ident) {
    use syn::visit_mut::VisitMut;

    struct RewriteSelf<'a>(&'a syn::Ident);

    impl VisitMut for RewriteSelf<'_> {
        fn visit_path_mut(&mut self, path: &mut syn::Path) {
            syn::visit_mut::visit_path_mut(self, path);

            if path.is_ident("Self") {
                path.segments[0].ident = self.0.clone();
            }
        }
    }

    RewriteSelf(model).visit_type_mut(ty);
}
