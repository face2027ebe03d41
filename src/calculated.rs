//! `CalculatedData`: the mutable intermediate result Stage-1 jobs populate
//! and Stage-2 jobs consume (spec.md §3.5, §5).
//!
//! One cell per copper layer, each written exactly once by its producer job;
//! readers only ever run after Stage-1 has fully drained, so the mutex here
//! is for defensiveness rather than real contention (spec.md §5).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::kernel::IntPaths;
use crate::layer::Layer;

#[derive(Debug, Default)]
pub struct CalculatedData {
    copper_paths_per_layer: Mutex<HashMap<Layer, IntPaths>>,
}

impl CalculatedData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage-1 writes its layer's polygon set. Called at most once per layer.
    pub fn set_copper_paths(&self, layer: Layer, paths: IntPaths) {
        self.copper_paths_per_layer
            .lock()
            .expect("calculated-data mutex poisoned")
            .insert(layer, paths);
    }

    /// Stage-2 reads a single layer's polygon set, if Stage-1 has produced one.
    #[must_use]
    pub fn copper_paths(&self, layer: Layer) -> Option<IntPaths> {
        self.copper_paths_per_layer
            .lock()
            .expect("calculated-data mutex poisoned")
            .get(&layer)
            .cloned()
    }

    /// Union of every copper layer's polygon set — "copper anywhere" — used
    /// by the copper↔hole check (spec.md §4.5.3).
    #[must_use]
    pub fn copper_everywhere(&self) -> IntPaths {
        let guard = self.copper_paths_per_layer.lock().expect("calculated-data mutex poisoned");
        let all: Vec<IntPaths> = guard.values().cloned().collect();
        drop(guard);
        all.into_iter().fold(Vec::new(), |acc, paths| crate::kernel::unite_with(&acc, &paths))
    }

    /// Intersection of every copper layer's polygon set — the through-hole
    /// copper area used by the annular-ring check (spec.md §4.5.8).
    #[must_use]
    pub fn copper_on_every_layer(&self) -> IntPaths {
        let guard = self.copper_paths_per_layer.lock().expect("calculated-data mutex poisoned");
        let mut sets: Vec<IntPaths> = guard.values().cloned().collect();
        drop(guard);
        if sets.is_empty() {
            return Vec::new();
        }
        let first = sets.remove(0);
        sets.into_iter().fold(first, |acc, paths| crate::kernel::intersect(&acc, &paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_read_round_trips() {
        let calc = CalculatedData::new();
        let layer = Layer::top_copper(2);
        calc.set_copper_paths(layer, vec![vec![(0, 0), (10, 0), (10, 10), (0, 10)]]);
        assert!(calc.copper_paths(layer).is_some());
        assert!(calc.copper_paths(Layer::bot_copper(2)).is_none());
    }

    #[test]
    fn copper_everywhere_unions_all_layers() {
        let calc = CalculatedData::new();
        calc.set_copper_paths(Layer::top_copper(2), vec![vec![(0, 0), (10, 0), (10, 10), (0, 10)]]);
        calc.set_copper_paths(Layer::bot_copper(2), vec![vec![(5, 5), (15, 5), (15, 15), (5, 15)]]);
        let everywhere = calc.copper_everywhere();
        assert!(!everywhere.is_empty());
    }
}
