use serde_json::{Map, Value as JsonValue};

use crate::models::catalog::ForestKind;
use crate::models::form::{DropdownField, TextField};
use crate::models::metadata::MetadataRecord;

/// Article written by the first model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    pub title: String,
    pub body: String,
}

impl GeneratedArticle {
    /// Read `title` and `body` from the model's object.
    ///
    /// Both must be non-empty strings; anything else counts as a failed
    /// generation.
    pub fn from_json(obj: &Map<String, JsonValue>) -> Option<Self> {
        let field = |key: &str| {
            obj.get(key)
                .and_then(JsonValue::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            title: field("title")?,
            body: field("body")?,
        })
    }
}

/// A generated article merged with its metadata, ready for the form driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub body: String,
    pub metadata: MetadataRecord,
}

impl ArticleRecord {
    pub fn new(article: GeneratedArticle, metadata: MetadataRecord) -> Self {
        Self {
            title: article.title,
            body: article.body,
            metadata,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title => &self.title,
            TextField::WeeklyTitle => &self.metadata.weekly_title,
            TextField::WebsiteCallout => &self.metadata.website_callout,
            TextField::SocialMediaCallout => &self.metadata.social_media_callout,
            TextField::SeoTitle => &self.metadata.seo_title,
            TextField::SeoDescription => &self.metadata.seo_description,
            TextField::SeoKeywords => &self.metadata.seo_keywords,
        }
    }

    pub fn selections(&self, kind: ForestKind) -> &[String] {
        self.metadata.selections(kind)
    }

    pub fn dropdown(&self, field: DropdownField) -> Option<&str> {
        self.metadata.dropdown(field)
    }
}
