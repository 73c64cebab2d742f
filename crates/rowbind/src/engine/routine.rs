use super::{KeyInfo, Plan, PlanId};

use rowbind_core::schema::Member;
use rowbind_core::source::find_column;
use rowbind_core::{Column, EntityType, Type};

use std::sync::Arc;

/// The kind of source a routine reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SourceKind {
    /// Random-access rows that can navigate relations
    RowSet,

    /// Forward-only records without relation navigation
    Cursor,
}

/// A plan compiled into a flat list of steps for one source kind.
#[derive(Debug, Clone)]
pub(crate) struct Routine {
    pub(crate) steps: Vec<Step>,

    /// Number of `Step::Scalar` entries, which come first
    pub(crate) scalars: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Scalar {
        member: &'static Member,
        column: String,
        ty: Type,
    },
    Complex {
        member: &'static Member,
        plan: PlanId,
        item: &'static EntityType,
    },
    Children {
        member: &'static Member,
        relation: String,
        plan: PlanId,
        key: Option<Arc<KeyInfo>>,
    },
}

/// Where each scalar step reads from in one physical column shape.
#[derive(Debug)]
pub(crate) struct ColumnMap {
    /// One entry per scalar step; `None` when the column is absent
    slots: Vec<Option<Slot>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub(crate) column: usize,
    pub(crate) coercion: Coercion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coercion {
    /// The column's declared type is the member's type
    Direct,

    /// The value must be converted to the member's type first
    Convert(Type),
}

impl Routine {
    pub(crate) fn compile(plan: &Plan, kind: SourceKind) -> Routine {
        let ty = plan.ty;
        let mut steps = vec![];

        for binding in &plan.members {
            let member = &ty.members[binding.member];

            // The resolver only binds columns to scalar members
            let Some(scalar_ty) = member.ty.scalar_ty() else {
                continue;
            };

            steps.push(Step::Scalar {
                member,
                column: binding.column.clone(),
                ty: scalar_ty,
            });
        }

        let scalars = steps.len();

        for binding in &plan.complex {
            steps.push(Step::Complex {
                member: &ty.members[binding.member],
                plan: binding.plan,
                item: binding.item,
            });
        }

        // Cursors cannot navigate to related rows
        if kind == SourceKind::RowSet {
            for binding in &plan.children {
                steps.push(Step::Children {
                    member: &ty.members[binding.member],
                    relation: binding.name.clone().unwrap_or_default(),
                    plan: binding.plan,
                    key: binding.key.clone(),
                });
            }
        }

        log::debug!(
            "compiled {kind:?} routine for {plan}: {} steps",
            steps.len()
        );

        Routine { steps, scalars }
    }

    /// Returns `true` if the routine has nested steps that run regardless of
    /// the column shape.
    pub(crate) fn has_nested(&self) -> bool {
        self.steps.len() > self.scalars
    }
}

impl ColumnMap {
    pub(crate) fn build(routine: &Routine, columns: &[Column]) -> ColumnMap {
        let slots = routine.steps[..routine.scalars]
            .iter()
            .map(|step| {
                let Step::Scalar { column, ty, member } = step else {
                    return None;
                };

                let Some(index) = find_column(columns, column) else {
                    log::trace!("column `{column}` for `{}` is not in the source", member.name);
                    return None;
                };

                let coercion = if columns[index].ty == Some(*ty) {
                    Coercion::Direct
                } else {
                    Coercion::Convert(*ty)
                };

                Some(Slot {
                    column: index,
                    coercion,
                })
            })
            .collect();

        ColumnMap { slots }
    }

    pub(crate) fn slot(&self, step: usize) -> Option<Slot> {
        self.slots.get(step).copied().flatten()
    }

    /// Returns `true` if at least one scalar binding found its column.
    pub(crate) fn has_columns(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }
}
