pub mod article;
pub mod catalog;
pub mod form;
pub mod metadata;

pub use article::{ArticleRecord, GeneratedArticle};
pub use catalog::{Catalog, CatalogNode, Forest, ForestKind};
pub use form::{DropdownField, TextField};
pub use metadata::{DailySubject, KeyPoint, MetadataRecord};
