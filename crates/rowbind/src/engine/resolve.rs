use super::{Arena, KeyId, KeyInfo, MemberBinding, ParentRelation, Plan, PlanId, RelationBinding};

use rowbind_core::mapping::{ExtractInfo, MappingFact, MappingProvider, MemberFact, RelationFact};
use rowbind_core::schema::{EntityRef, Member, MemberTy};
use rowbind_core::{EntityType, Error, Result, SchemeId};

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds the plans of one tree against a base arena.
///
/// New plans are staged with ids following the base arena's and only become
/// visible when the finished arena is committed.
pub(super) struct Resolver<'a> {
    provider: &'a dyn MappingProvider,
    base: &'a Arena,

    /// New plans; `staged[i]` has id `base.len() + i`
    staged: Vec<Plan>,

    /// Ids of the staged plans
    index: HashMap<(TypeId, SchemeId), PlanId>,

    /// Key infos created during this resolution
    keys: HashMap<KeyId, Arc<KeyInfo>>,

    /// Copies of base plans that gained parent relations
    updated: HashMap<PlanId, Plan>,

    /// Plans whose facts are being resolved, outermost first
    in_progress: Vec<PlanId>,

    max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Root,
    Complex,
    Child,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(provider: &'a dyn MappingProvider, base: &'a Arena, max_depth: usize) -> Self {
        Resolver {
            provider,
            base,
            staged: vec![],
            index: HashMap::new(),
            keys: HashMap::new(),
            updated: HashMap::new(),
            in_progress: vec![],
            max_depth,
        }
    }

    pub(super) fn resolve_root(&mut self, ty: &'static EntityType, scheme: SchemeId) -> Result<PlanId> {
        let id = self.resolve(ty, scheme, Edge::Root)?;
        self.link_parents();
        Ok(id)
    }

    /// Publishes the staged plans on top of the base arena.
    pub(super) fn commit(self) -> Arena {
        let mut arena = self.base.clone();

        for (id, plan) in self.updated {
            arena.plans[id.0] = Arc::new(plan);
        }

        arena.plans.extend(self.staged.into_iter().map(Arc::new));
        arena.index.extend(self.index);
        arena.keys.extend(self.keys);
        arena
    }

    fn resolve(&mut self, ty: &'static EntityType, scheme: SchemeId, edge: Edge) -> Result<PlanId> {
        if let Some(id) = self.base.lookup(ty, scheme) {
            return Ok(id);
        }

        if let Some(&id) = self.index.get(&(ty.type_id, scheme)) {
            if let Some(pos) = self.in_progress.iter().position(|p| *p == id) {
                // A relation pointing back at its own plan is fine; the
                // recursion is driven by row data. Anything else never ends.
                let self_reference = edge == Edge::Child && pos + 1 == self.in_progress.len();

                if !self_reference {
                    return Err(self.cycle_error(pos, id));
                }
            }

            return Ok(id);
        }

        if self.in_progress.len() >= self.max_depth {
            return Err(Error::recursion_limit(self.max_depth));
        }

        let id = PlanId(self.base.len() + self.staged.len());
        self.staged.push(Plan::new(id, ty, scheme));
        self.index.insert((ty.type_id, scheme), id);

        self.in_progress.push(id);
        let result = self.build(id, ty, scheme);
        self.in_progress.pop();

        let plan = result?;
        log::debug!(
            "resolved plan {plan}: {} columns, {} complex, {} children",
            plan.members.len(),
            plan.complex.len(),
            plan.children.len()
        );

        *self.staged_mut(id) = plan;
        Ok(id)
    }

    fn build(&mut self, id: PlanId, ty: &'static EntityType, scheme: SchemeId) -> Result<Plan> {
        let mut info = ExtractInfo::new(ty, scheme);

        if !self.provider.extract_info(&mut info)? {
            log::debug!("no mapping facts for {}#{scheme}", ty.name);
        }

        let mut plan = Plan::new(id, ty, scheme);
        plan.table = info.table;

        let mut facts = info.facts;
        facts.sort_by_key(|fact| fact.member);

        for MemberFact { member: index, fact } in facts {
            let Some(member) = ty.member(index) else {
                return Err(Error::invalid_mapping(format!(
                    "`{}` has no member #{index}",
                    ty.name
                )));
            };

            match fact {
                MappingFact::Column(fact) => {
                    if !member.ty.is_scalar() {
                        return Err(mismatch(ty, member, "a column"));
                    }

                    plan.members.push(MemberBinding {
                        column: fact.column.unwrap_or_else(|| member.name.to_string()),
                        member: index,
                    });
                }
                MappingFact::Complex(fact) => {
                    let MemberTy::Model { target } = &member.ty else {
                        return Err(mismatch(ty, member, "a complex object"));
                    };

                    let item = item_type(ty, member, fact.item, *target)?;
                    let nested = self.resolve(item, fact.nested_scheme, Edge::Complex)?;

                    plan.complex.push(RelationBinding {
                        name: None,
                        member: index,
                        plan: nested,
                        item,
                        key: None,
                    });
                }
                MappingFact::Relation(fact) => {
                    let MemberTy::Collection { item: declared } = &member.ty else {
                        return Err(mismatch(ty, member, "a relation"));
                    };

                    let item = item_type(ty, member, fact.item, *declared)?;
                    let key = self.key_info(ty, item, &fact)?;
                    let nested = self.resolve(item, fact.nested_scheme, Edge::Child)?;

                    if let Some(key) = &key {
                        if !plan.primary_keys.contains(key) {
                            plan.primary_keys.push(key.clone());
                        }
                    }

                    plan.children.push(RelationBinding {
                        name: Some(fact.name),
                        member: index,
                        plan: nested,
                        item,
                        key,
                    });
                }
            }
        }

        Ok(plan)
    }

    /// Returns the shared key info of a relation, creating it on first use.
    fn key_info(
        &mut self,
        parent: &'static EntityType,
        child: &'static EntityType,
        fact: &RelationFact,
    ) -> Result<Option<Arc<KeyInfo>>> {
        if fact.parent_keys.is_empty() && fact.child_keys.is_empty() {
            return Ok(None);
        }

        let id = KeyId::new(parent, child, &fact.name);

        if let Some(existing) = self.base.keys.get(&id).or_else(|| self.keys.get(&id)) {
            return Ok(Some(existing.clone()));
        }

        let key = Arc::new(KeyInfo::new(
            parent,
            child,
            &fact.name,
            fact.parent_keys.clone(),
            fact.child_keys.clone(),
            fact.scheme,
        )?);

        self.keys.insert(id, key.clone());
        Ok(Some(key))
    }

    /// Records every child edge of the new plans on the plan it targets.
    fn link_parents(&mut self) {
        let edges: Vec<(PlanId, ParentRelation)> = self
            .staged
            .iter()
            .flat_map(|plan| {
                plan.children.iter().map(|child| {
                    (
                        child.plan,
                        ParentRelation {
                            parent: plan.id,
                            member: child.member,
                            name: child.name.clone().unwrap_or_default(),
                            key: child.key.clone(),
                        },
                    )
                })
            })
            .collect();

        for (target, relation) in edges {
            if target.0 >= self.base.len() {
                self.staged_mut(target).add_parent_relation(relation);
            } else {
                let base = self.base;
                self.updated
                    .entry(target)
                    .or_insert_with(|| Plan::clone(base.plan(target)))
                    .add_parent_relation(relation);
            }
        }
    }

    fn staged_mut(&mut self, id: PlanId) -> &mut Plan {
        &mut self.staged[id.0 - self.base.len()]
    }

    fn cycle_error(&self, pos: usize, id: PlanId) -> Error {
        let describe = |id: PlanId| {
            let plan = &self.staged[id.0 - self.base.len()];
            format!("{}#{}", plan.ty.name, plan.scheme)
        };

        Error::cyclic_mapping(
            self.in_progress[pos..]
                .iter()
                .copied()
                .chain([id])
                .map(describe),
        )
    }
}

/// Picks the nested type of a member: the declared one, or the one named by
/// the fact when the member does not declare it.
fn item_type(
    ty: &EntityType,
    member: &Member,
    explicit: Option<EntityRef>,
    declared: Option<EntityRef>,
) -> Result<&'static EntityType> {
    match (explicit, declared) {
        (Some(explicit), Some(declared)) if explicit != declared => {
            Err(Error::invalid_mapping(format!(
                "`{}::{}` holds `{}` but is mapped to `{}`",
                ty.name,
                member.name,
                declared.get().name,
                explicit.get().name
            )))
        }
        (Some(item), _) | (None, Some(item)) => Ok(item.get()),
        (None, None) => Err(Error::unresolvable_item_type(ty.name, member.name)),
    }
}

fn mismatch(ty: &EntityType, member: &Member, kind: &str) -> Error {
    Error::invalid_mapping(format!(
        "`{}::{}` cannot be mapped to {kind}",
        ty.name, member.name
    ))
}
