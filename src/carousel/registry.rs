//! Discovery and binding of carousel roots.
//!
//! The registry owns the set of row ids that already have a live
//! controller. Scanning is a set difference: rows already bound are left
//! untouched, so a re-scan after a deck reload can never double-bind a
//! row. Rows that disappear from the deck are released so the app can drop
//! their controllers.

use std::collections::HashSet;

use crate::deck::Deck;

use super::controller::{CarouselController, CarouselOptions};

/// Tracks which carousel roots are already controlled.
#[derive(Debug, Default)]
pub struct CarouselRegistry {
    bound: HashSet<String>,
}

impl CarouselRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a row id already has a controller.
    pub fn is_bound(&self, id: &str) -> bool {
        self.bound.contains(id)
    }

    /// Number of bound roots.
    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    /// Scan a deck and construct controllers for rows not yet bound.
    ///
    /// Safe to call repeatedly: scanning the same deck twice returns
    /// nothing the second time. `geometry_for` supplies the construction
    /// options (slide width, gap, control presence) per row, since layout
    /// depends on the terminal and per-row overrides.
    pub fn scan(
        &mut self,
        deck: &Deck,
        mut geometry_for: impl FnMut(&crate::deck::Row) -> CarouselOptions,
    ) -> Vec<(String, CarouselController)> {
        let mut discovered = Vec::new();
        for row in &deck.rows {
            if self.bound.contains(&row.id) {
                continue;
            }
            let controller = CarouselController::new(row.slides.len(), geometry_for(row));
            self.bound.insert(row.id.clone());
            discovered.push((row.id.clone(), controller));
        }
        if !discovered.is_empty() {
            crate::perf::log_event(
                "registry.scan",
                format!("discovered={} bound={}", discovered.len(), self.bound.len()),
            );
        }
        discovered
    }

    /// Release a single id so a later scan can rebind it. Returns false
    /// when the id was not bound.
    pub fn release(&mut self, id: &str) -> bool {
        self.bound.remove(id)
    }

    /// Release ids no longer present in the deck; returns the released
    /// ids so the caller can drop their controllers.
    pub fn release_missing(&mut self, deck: &Deck) -> Vec<String> {
        let live: HashSet<&str> = deck.rows.iter().map(|row| row.id.as_str()).collect();
        let released: Vec<String> = self
            .bound
            .iter()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &released {
            self.bound.remove(id);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::parse_deck;

    fn deck(ids: &[&str]) -> Deck {
        let rows = ids
            .iter()
            .map(|id| format!(r#"{{ "id": "{id}", "slides": [ {{}}, {{}} ] }}"#))
            .collect::<Vec<_>>()
            .join(",");
        parse_deck(&format!(r#"{{ "rows": [ {rows} ] }}"#)).unwrap()
    }

    fn options(_row: &crate::deck::Row) -> CarouselOptions {
        CarouselOptions::default()
    }

    #[test]
    fn test_scan_binds_each_row_once() {
        let mut registry = CarouselRegistry::new();
        let deck = deck(&["a", "b"]);

        let first = registry.scan(&deck, options);
        assert_eq!(first.len(), 2);
        assert!(registry.is_bound("a"));
        assert!(registry.is_bound("b"));

        // Re-scanning the same deck must not double-bind.
        let second = registry.scan(&deck, options);
        assert!(second.is_empty());
        assert_eq!(registry.bound_count(), 2);
    }

    #[test]
    fn test_rescan_discovers_only_new_rows() {
        let mut registry = CarouselRegistry::new();
        registry.scan(&deck(&["a", "b"]), options);

        let discovered = registry.scan(&deck(&["a", "b", "c"]), options);
        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].0, "c");
    }

    #[test]
    fn test_release_missing_unbinds_removed_rows() {
        let mut registry = CarouselRegistry::new();
        registry.scan(&deck(&["a", "b", "c"]), options);

        let released = registry.release_missing(&deck(&["a", "c"]));
        assert_eq!(released, vec!["b".to_string()]);
        assert!(!registry.is_bound("b"));

        // A released row rediscovered later binds again.
        let rebound = registry.scan(&deck(&["a", "b", "c"]), options);
        assert_eq!(rebound.len(), 1);
        assert_eq!(rebound[0].0, "b");
    }

    #[test]
    fn test_release_single_id_allows_rebind() {
        let mut registry = CarouselRegistry::new();
        let deck = deck(&["a", "b"]);
        registry.scan(&deck, options);

        assert!(registry.release("a"));
        assert!(!registry.release("a"));

        let rebound = registry.scan(&deck, options);
        assert_eq!(rebound.len(), 1);
        assert_eq!(rebound[0].0, "a");
    }

    #[test]
    fn test_controllers_independent_per_row() {
        let mut registry = CarouselRegistry::new();
        let mut rows = registry.scan(&deck(&["a", "b"]), options);
        rows[0].1.next(0);
        assert_eq!(rows[0].1.current_index(), 1);
        assert_eq!(rows[1].1.current_index(), 0);
    }
}
