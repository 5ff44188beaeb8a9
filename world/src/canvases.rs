//! Canvas registry that deduplicates tile bindings across placements.

use std::collections::{BTreeMap, HashMap};

use mural_core::{CanvasId, TileBinding};

/// Registry mapping each canvas identifier to the tile binding it renders.
///
/// The registry upholds one invariant: no two identifiers carry equal
/// bindings. [`CanvasRegistry::find_or_reserve`] is the only mutation used
/// during placement and always looks for an existing binding before
/// consulting the host allocator. Identifiers are never reclaimed within a
/// session.
#[derive(Debug)]
pub struct CanvasRegistry {
    entries: BTreeMap<CanvasId, TileBinding>,
    by_binding: HashMap<TileBinding, CanvasId>,
}

impl CanvasRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_binding: HashMap::new(),
        }
    }

    /// Returns the canvas already carrying `binding`, or reserves a fresh
    /// identifier from the host allocator and records the pair.
    ///
    /// Identical (image, offset) bindings therefore share one canvas
    /// identifier no matter where or when they are placed. `None` means the
    /// allocator refused to hand out another identifier; in that case
    /// nothing is recorded.
    pub fn find_or_reserve<A>(&mut self, binding: TileBinding, allocate: A) -> Option<CanvasId>
    where
        A: FnOnce() -> Option<CanvasId>,
    {
        if let Some(id) = self.by_binding.get(&binding) {
            return Some(*id);
        }

        let id = allocate()?;
        let _ = self.by_binding.insert(binding.clone(), id);
        let _ = self.entries.insert(id, binding);
        Some(id)
    }

    /// Inserts a pair restored from persisted state, bypassing the dedup
    /// lookup.
    ///
    /// The persisted document is assumed to already satisfy the registry
    /// invariant, so no scan is performed.
    pub fn restore(&mut self, id: CanvasId, binding: TileBinding) {
        let _ = self.by_binding.insert(binding.clone(), id);
        let _ = self.entries.insert(id, binding);
    }

    /// Returns the binding carried by the provided canvas, if any.
    #[must_use]
    pub fn binding(&self, id: CanvasId) -> Option<&TileBinding> {
        self.entries.get(&id)
    }

    /// Returns the canvas carrying a binding equal to the argument, if any.
    #[must_use]
    pub fn canvas_for(&self, binding: &TileBinding) -> Option<CanvasId> {
        self.by_binding.get(binding).copied()
    }

    /// Highest identifier currently registered, if any.
    #[must_use]
    pub fn highest_id(&self) -> Option<CanvasId> {
        self.entries.last_key_value().map(|(id, _)| *id)
    }

    /// Iterates over all registered pairs in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (CanvasId, &TileBinding)> {
        self.entries.iter().map(|(id, binding)| (*id, binding))
    }

    /// Number of registered canvases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the registry holds no canvases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_allocator<'a>(
        next: &'a mut u16,
        calls: &'a mut u32,
    ) -> impl FnOnce() -> Option<CanvasId> + 'a {
        move || {
            *calls += 1;
            let id = CanvasId::new(*next);
            *next += 1;
            Some(id)
        }
    }

    #[test]
    fn equal_bindings_share_one_canvas() {
        let mut registry = CanvasRegistry::new();
        let mut next = 0;
        let mut calls = 0;

        let first = registry
            .find_or_reserve(
                TileBinding::new("wall.png", 0, 0),
                counting_allocator(&mut next, &mut calls),
            )
            .expect("allocation succeeds");
        let second = registry
            .find_or_reserve(
                TileBinding::new("wall.png", 0, 0),
                counting_allocator(&mut next, &mut calls),
            )
            .expect("dedup hit needs no allocation");

        assert_eq!(first, second);
        assert_eq!(calls, 1, "allocator must be consulted exactly once");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_bindings_receive_distinct_canvases() {
        let mut registry = CanvasRegistry::new();
        let mut next = 0;
        let mut calls = 0;

        let bindings = [
            TileBinding::new("wall.png", 0, 0),
            TileBinding::new("wall.png", 128, 0),
            TileBinding::new("floor.png", 0, 0),
        ];
        let mut ids = Vec::new();
        for binding in bindings {
            ids.push(
                registry
                    .find_or_reserve(binding, counting_allocator(&mut next, &mut calls))
                    .expect("allocation succeeds"),
            );
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3, "each distinct binding needs its own canvas");
        assert_eq!(calls, 3);
    }

    #[test]
    fn registry_never_holds_duplicate_bindings() {
        let mut registry = CanvasRegistry::new();
        let mut next = 0;
        let mut calls = 0;

        for _ in 0..3 {
            for offset in [0u32, 128, 256] {
                let _ = registry.find_or_reserve(
                    TileBinding::new("wall.png", offset, 0),
                    counting_allocator(&mut next, &mut calls),
                );
            }
        }

        let mut seen = Vec::new();
        for (_, binding) in registry.iter() {
            assert!(
                !seen.contains(&binding),
                "two canvases must never carry equal bindings",
            );
            seen.push(binding);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn allocator_refusal_reserves_nothing() {
        let mut registry = CanvasRegistry::new();

        let outcome = registry.find_or_reserve(TileBinding::new("wall.png", 0, 0), || None);

        assert_eq!(outcome, None);
        assert!(registry.is_empty());
        assert_eq!(registry.canvas_for(&TileBinding::new("wall.png", 0, 0)), None);
    }

    #[test]
    fn restore_bypasses_allocation_and_feeds_dedup() {
        let mut registry = CanvasRegistry::new();
        let binding = TileBinding::new("wall.png", 128, 128);

        registry.restore(CanvasId::new(9), binding.clone());

        assert_eq!(registry.binding(CanvasId::new(9)), Some(&binding));
        assert_eq!(registry.canvas_for(&binding), Some(CanvasId::new(9)));
        let reused = registry.find_or_reserve(binding, || panic!("must not allocate"));
        assert_eq!(reused, Some(CanvasId::new(9)));
    }

    #[test]
    fn highest_id_tracks_the_largest_restored_identifier() {
        let mut registry = CanvasRegistry::new();
        assert_eq!(registry.highest_id(), None);

        registry.restore(CanvasId::new(12), TileBinding::new("a.png", 0, 0));
        registry.restore(CanvasId::new(3), TileBinding::new("b.png", 0, 0));

        assert_eq!(registry.highest_id(), Some(CanvasId::new(12)));
    }
}
