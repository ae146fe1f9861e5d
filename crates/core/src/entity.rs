//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Human-readable name shown wherever the entity is referenced.
    fn display_name(&self) -> &str;
}

/// First entity in `entities` whose display name matches `name` exactly.
///
/// Names are not unique; the lowest id wins regardless of slice order.
pub fn first_named<'a, E: Entity>(entities: &'a [E], name: &str) -> Option<&'a E> {
    entities
        .iter()
        .filter(|e| e.display_name() == name)
        .min_by_key(|e| e.id())
}
