//! Properties of the taxonomy resolver over the built-in catalog.

use std::collections::HashSet;

use newsroom_bot::models::{Catalog, Forest, ForestKind};
use newsroom_bot::services::resolve;
use proptest::prelude::*;
use proptest::sample::subsequence;

const KINDS: [ForestKind; 3] = [ForestKind::Publication, ForestKind::Industry, ForestKind::Country];

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn ids_of(forest: &Forest) -> Vec<String> {
    forest.nodes().iter().map(|n| n.id.clone()).collect()
}

/// A forest kind plus an arbitrary selection of its ids, in arbitrary order.
fn selection() -> impl Strategy<Value = (ForestKind, Vec<String>)> {
    (0..KINDS.len()).prop_flat_map(|k| {
        let kind = KINDS[k];
        let ids = ids_of(catalog().forest(kind));
        let len = ids.len();
        (Just(kind), subsequence(ids, 0..=len).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn resolved_sets_are_ancestor_complete((kind, selected) in selection()) {
        let catalog = catalog();
        let forest = catalog.forest(kind);
        let resolved = resolve(&selected, forest);
        let set: HashSet<&str> = resolved.ids.iter().map(String::as_str).collect();

        for id in &resolved.ids {
            for ancestor in forest.ancestors(id).unwrap() {
                prop_assert!(set.contains(ancestor), "{} lacks ancestor {}", id, ancestor);
            }
        }
        for id in &selected {
            prop_assert!(set.contains(id.as_str()));
        }
        prop_assert!(resolved.unknown.is_empty());
    }

    #[test]
    fn resolved_sets_have_no_duplicates((kind, selected) in selection()) {
        let catalog = catalog();
        let resolved = resolve(&selected, catalog.forest(kind));
        let set: HashSet<&String> = resolved.ids.iter().collect();
        prop_assert_eq!(set.len(), resolved.ids.len());
    }

    #[test]
    fn resolving_twice_changes_nothing((kind, selected) in selection()) {
        let catalog = catalog();
        let forest = catalog.forest(kind);
        let once = resolve(&selected, forest);
        let twice = resolve(&once.ids, forest);
        prop_assert_eq!(once.ids, twice.ids);
    }

    #[test]
    fn unknown_ids_resolve_to_nothing(id in "[a-z0-9-]{1,40}") {
        let catalog = catalog();
        for kind in KINDS {
            let forest = catalog.forest(kind);
            prop_assume!(!forest.contains(&id));
            let resolved = resolve(&[id.clone()], forest);
            prop_assert!(resolved.ids.is_empty());
            prop_assert_eq!(resolved.unknown, vec![id.clone()]);
        }
    }
}

#[test]
fn test_not_a_real_id() {
    let catalog = catalog();
    let resolved = resolve(&["not-a-real-id".to_string()], catalog.forest(ForestKind::Country));
    assert!(resolved.ids.is_empty());
}
