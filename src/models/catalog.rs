//! Category catalog: three independent forests of checkbox categories plus the
//! option lists of the regional dropdowns.
//!
//! The catalog is read once at startup, validated, and shared read-only by every
//! run. It is the only source of valid checkbox identifiers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::form::DropdownField;

/// Catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

/// A single category node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Checkbox element id
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default, rename = "parent", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForestKind {
    Publication,
    Industry,
    Country,
}

impl ForestKind {
    pub fn name(self) -> &'static str {
        match self {
            ForestKind::Publication => "publication",
            ForestKind::Industry => "industry",
            ForestKind::Country => "country",
        }
    }
}

impl fmt::Display for ForestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One classification tree (strictly, a forest: several roots are allowed).
#[derive(Debug, Clone)]
pub struct Forest {
    nodes: Vec<CatalogNode>,
    index: HashMap<String, usize>,
}

impl Forest {
    /// Build a forest, checking that ids are unique, every parent exists in the
    /// same forest and no parent chain loops.
    pub fn new(kind: ForestKind, nodes: Vec<CatalogNode>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId {
                    forest: kind.name(),
                    id: node.id.clone(),
                });
            }
        }

        for node in &nodes {
            if let Some(parent) = &node.parent_id {
                if !index.contains_key(parent) {
                    return Err(CatalogError::MissingParent {
                        forest: kind.name(),
                        id: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let forest = Self { nodes, index };
        for node in &forest.nodes {
            // a chain longer than the forest itself must revisit a node
            let mut steps = 0;
            let mut current = node.parent_id.as_deref();
            while let Some(id) = current {
                steps += 1;
                if steps > forest.nodes.len() {
                    return Err(CatalogError::Cycle {
                        forest: kind.name(),
                        id: node.id.clone(),
                    });
                }
                current = forest.get(id).and_then(|n| n.parent_id.as_deref());
            }
        }

        Ok(forest)
    }

    pub fn nodes(&self) -> &[CatalogNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&CatalogNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ancestors of `id`, root first, excluding `id` itself.
    ///
    /// Returns `None` when `id` is not in the forest.
    pub fn ancestors(&self, id: &str) -> Option<Vec<&str>> {
        let node = self.get(id)?;
        let mut chain = Vec::new();
        let mut current = node.parent_id.as_deref();
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get(parent).and_then(|n| n.parent_id.as_deref());
        }
        chain.reverse();
        Some(chain)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    version: String,
    #[serde(default)]
    publication: Vec<CatalogNode>,
    #[serde(default)]
    industry: Vec<CatalogNode>,
    #[serde(default)]
    country: Vec<CatalogNode>,
    #[serde(default)]
    dropdowns: BTreeMap<String, Vec<String>>,
}

/// The process-wide category catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    publications: Forest,
    industries: Forest,
    countries: Forest,
    dropdowns: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(content)?;

        for field in DropdownField::REGIONAL {
            let key = field.catalog_key().unwrap_or_default();
            let empty = doc.dropdowns.get(key).map_or(true, |opts| opts.is_empty());
            if empty {
                return Err(CatalogError::EmptyDropdown(key.to_string()));
            }
        }

        Ok(Self {
            version: doc.version,
            publications: Forest::new(ForestKind::Publication, doc.publication)?,
            industries: Forest::new(ForestKind::Industry, doc.industry)?,
            countries: Forest::new(ForestKind::Country, doc.country)?,
            dropdowns: doc.dropdowns,
        })
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Load from `path` when given, the embedded catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                Self::from_toml_str(&content)
            }
            None => Self::builtin(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn forest(&self, kind: ForestKind) -> &Forest {
        match kind {
            ForestKind::Publication => &self.publications,
            ForestKind::Industry => &self.industries,
            ForestKind::Country => &self.countries,
        }
    }

    /// Closed option list of a regional dropdown. Empty for the two fixed
    /// enumerations, which are not catalog data.
    pub fn regional_options(&self, field: DropdownField) -> &[String] {
        field
            .catalog_key()
            .and_then(|key| self.dropdowns.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> CatalogNode {
        CatalogNode {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.forest(ForestKind::Publication).nodes().is_empty());
        assert!(!catalog.forest(ForestKind::Industry).nodes().is_empty());
        assert!(!catalog.forest(ForestKind::Country).nodes().is_empty());
        for field in DropdownField::REGIONAL {
            assert!(!catalog.regional_options(field).is_empty());
        }
    }

    #[test]
    fn test_builtin_country_ancestors() {
        let catalog = Catalog::builtin().unwrap();
        let countries = catalog.forest(ForestKind::Country);
        let kenya = "edit-field-country-und-0-720-720-children-721-721-children-727-727";
        assert_eq!(
            countries.ancestors(kenya).unwrap(),
            vec![
                "edit-field-country-und-0-720-720",
                "edit-field-country-und-0-720-720-children-721-721",
            ]
        );
    }

    #[test]
    fn test_ancestors_of_unknown_and_root() {
        let forest = Forest::new(
            ForestKind::Country,
            vec![node("a", None), node("b", Some("a")), node("c", Some("b"))],
        )
        .unwrap();
        assert!(forest.ancestors("zzz").is_none());
        assert!(forest.ancestors("a").unwrap().is_empty());
        assert_eq!(forest.ancestors("c").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_parent_rejected() {
        let err = Forest::new(ForestKind::Industry, vec![node("b", Some("a"))]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingParent { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err =
            Forest::new(ForestKind::Industry, vec![node("a", None), node("a", None)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = Forest::new(
            ForestKind::Publication,
            vec![node("a", Some("b")), node("b", Some("a"))],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Cycle { .. }));
    }

    #[test]
    fn test_missing_dropdown_rejected() {
        let err = Catalog::from_toml_str("version = \"1\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyDropdown(_)));
    }
}
