//! Entities: records identified by id rather than by value.

use std::collections::HashMap;

/// Something with a stable identity.
///
/// Products and orders are entities; baskets, money and aggregated buckets are
/// values.
pub trait Entity {
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Position of each entity in `entities`, keyed by its id.
///
/// Ids are expected to be unique; on a duplicate the later position wins.
pub fn index_by_id<E: Entity>(entities: &[E]) -> HashMap<E::Id, usize> {
    entities
        .iter()
        .enumerate()
        .map(|(position, entity)| (entity.id().clone(), position))
        .collect()
}
