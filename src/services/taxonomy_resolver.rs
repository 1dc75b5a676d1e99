//! Taxonomy resolver - capability layer
//!
//! Expands selected category ids so that every selection carries its whole
//! ancestor chain. The form only files an article under a leaf when the
//! parents are ticked too.

use std::collections::HashSet;

use crate::models::{Catalog, Forest, ForestKind, MetadataRecord};

/// Outcome of resolving one selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Input ids with their ancestors, each chain root first, no duplicates
    pub ids: Vec<String>,
    /// Input ids the catalog does not know; dropped from `ids`
    pub unknown: Vec<String>,
}

/// Resolve `selected` against `forest`.
///
/// Output order: for each input id in turn, its chain from root to the id
/// itself, skipping anything already emitted. Resolving the output again
/// yields the same list.
pub fn resolve(selected: &[String], forest: &Forest) -> Resolution {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolution = Resolution::default();

    for id in selected {
        let Some(ancestors) = forest.ancestors(id) else {
            if !resolution.unknown.contains(id) {
                resolution.unknown.push(id.clone());
            }
            continue;
        };
        for step in ancestors.into_iter().chain(std::iter::once(id.as_str())) {
            if seen.insert(step) {
                resolution.ids.push(step.to_string());
            }
        }
    }

    resolution
}

/// Resolve every selection set of `metadata` in place.
///
/// Returns one warning line per unknown id.
pub fn resolve_record(metadata: &mut MetadataRecord, catalog: &Catalog) -> Vec<String> {
    let mut warnings = Vec::new();
    for kind in [ForestKind::Publication, ForestKind::Industry, ForestKind::Country] {
        let resolution = resolve(metadata.selections(kind), catalog.forest(kind));
        for id in &resolution.unknown {
            warnings.push(format!("unknown {} id '{}' dropped", kind, id));
        }
        *metadata.selections_mut(kind) = resolution.ids;
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogNode;

    fn node(id: &str, parent: Option<&str>) -> CatalogNode {
        CatalogNode {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
        }
    }

    fn world() -> Forest {
        Forest::new(
            ForestKind::Country,
            vec![
                node("africa", None),
                node("east-africa", Some("africa")),
                node("kenya", Some("east-africa")),
                node("uganda", Some("east-africa")),
                node("europe", None),
            ],
        )
        .unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leaf_expands_root_first() {
        let r = resolve(&ids(&["kenya"]), &world());
        assert_eq!(r.ids, ids(&["africa", "east-africa", "kenya"]));
        assert!(r.unknown.is_empty());
    }

    #[test]
    fn test_shared_ancestors_not_repeated() {
        let r = resolve(&ids(&["kenya", "uganda", "africa"]), &world());
        assert_eq!(r.ids, ids(&["africa", "east-africa", "kenya", "uganda"]));
    }

    #[test]
    fn test_unknown_ids_dropped_and_reported() {
        let r = resolve(&ids(&["atlantis", "europe", "atlantis"]), &world());
        assert_eq!(r.ids, ids(&["europe"]));
        assert_eq!(r.unknown, ids(&["atlantis"]));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve(&[], &world()), Resolution::default());
    }

    #[test]
    fn test_resolve_record_on_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let kenya =
            "edit-field-country-und-0-720-720-children-721-721-children-727-727".to_string();
        let mut metadata = MetadataRecord {
            country_selections: vec![kenya.clone()],
            industry_selections: vec!["no-such-industry".to_string()],
            ..Default::default()
        };

        let warnings = resolve_record(&mut metadata, &catalog);

        assert_eq!(
            metadata.country_selections,
            vec![
                "edit-field-country-und-0-720-720".to_string(),
                "edit-field-country-und-0-720-720-children-721-721".to_string(),
                kenya,
            ]
        );
        assert!(metadata.industry_selections.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no-such-industry"));
    }
}
