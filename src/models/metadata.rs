//! CMS metadata produced by the second model call.
//!
//! The model's JSON is untrusted: every field is looked up, type-checked and
//! coerced here before it becomes part of an article record.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::models::catalog::{Catalog, ForestKind};
use crate::models::form::{is_none_sentinel, DropdownField, NONE_SENTINEL};

/// Daily subject dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailySubject {
    MacroeconomicNews,
    BankingAndFinance,
    CompaniesAndIndustries,
    Political,
}

impl DailySubject {
    pub const ALL: [DailySubject; 4] = [
        DailySubject::MacroeconomicNews,
        DailySubject::BankingAndFinance,
        DailySubject::CompaniesAndIndustries,
        DailySubject::Political,
    ];

    /// Visible option text in the form
    pub fn text(self) -> &'static str {
        match self {
            DailySubject::MacroeconomicNews => "Macroeconomic News",
            DailySubject::BankingAndFinance => "Banking And Finance",
            DailySubject::CompaniesAndIndustries => "Companies and Industries",
            DailySubject::Political => "Political",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.text().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for DailySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Key point dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPoint {
    Yes,
    No,
}

impl KeyPoint {
    pub const ALL: [KeyPoint; 2] = [KeyPoint::Yes, KeyPoint::No];

    pub fn text(self) -> &'static str {
        match self {
            KeyPoint::Yes => "Yes",
            KeyPoint::No => "No",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.text().eq_ignore_ascii_case(value.trim()))
    }
}

/// Validated metadata for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub weekly_title: String,
    pub website_callout: String,
    pub social_media_callout: String,
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: String,
    /// Canonical option text, or the "- None -" sentinel, per dropdown.
    pub dropdowns: BTreeMap<DropdownField, String>,
    pub publication_selections: Vec<String>,
    pub industry_selections: Vec<String>,
    pub country_selections: Vec<String>,
}

/// Keys of the free-text metadata fields, in prompt order.
pub const FREE_TEXT_KEYS: [&str; 6] = [
    "weekly_title_value",
    "website_callout_value",
    "social_media_callout_value",
    "seo_title_value",
    "seo_description_value",
    "seo_keywords_value",
];

/// Selection-set key asked for in the prompt, plus the older id-suffixed alias.
pub fn selection_keys(kind: ForestKind) -> (&'static str, &'static str) {
    match kind {
        ForestKind::Publication => ("publication_selections", "publication_id_selections"),
        ForestKind::Industry => ("industry_selections", "industry_id_selections"),
        ForestKind::Country => ("country_selections", "country_id_selections"),
    }
}

impl MetadataRecord {
    /// Coerce the model's metadata object into a typed record.
    ///
    /// Never fails: missing or mistyped fields become empty values and are
    /// reported in the returned warnings. Taxonomy ids are kept as returned;
    /// checking them against the catalog is the resolver's job.
    pub fn from_json(obj: &Map<String, JsonValue>, catalog: &Catalog) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut text = |key: &str| -> String {
            match obj.get(key) {
                Some(value) => coerce_text(value).unwrap_or_else(|| {
                    warnings.push(format!("'{}' is not text, left empty", key));
                    String::new()
                }),
                None => {
                    warnings.push(format!("'{}' missing from metadata", key));
                    String::new()
                }
            }
        };

        let mut record = MetadataRecord {
            weekly_title: text(FREE_TEXT_KEYS[0]),
            website_callout: text(FREE_TEXT_KEYS[1]),
            social_media_callout: text(FREE_TEXT_KEYS[2]),
            seo_title: text(FREE_TEXT_KEYS[3]),
            seo_description: text(FREE_TEXT_KEYS[4]),
            seo_keywords: text(FREE_TEXT_KEYS[5]),
            ..Default::default()
        };

        for field in DropdownField::ALL {
            let Some(raw) = obj.get(field.key()) else {
                continue;
            };
            let Some(raw) = raw.as_str() else {
                if !raw.is_null() {
                    warnings.push(format!("'{}' is not a string, ignored", field.key()));
                }
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            if is_none_sentinel(raw) {
                record.dropdowns.insert(field, NONE_SENTINEL.to_string());
                continue;
            }
            match canonical_option(field, raw, catalog) {
                Some(option) => {
                    record.dropdowns.insert(field, option);
                }
                None => warnings.push(format!(
                    "'{}' is not an option of {}, ignored",
                    raw,
                    field.label()
                )),
            }
        }

        for kind in [ForestKind::Publication, ForestKind::Industry, ForestKind::Country] {
            let (key, alias) = selection_keys(kind);
            let ids = match obj.get(key).or_else(|| obj.get(alias)) {
                Some(value) => coerce_id_list(value).unwrap_or_else(|| {
                    warnings.push(format!("'{}' is not a list of ids, ignored", key));
                    Vec::new()
                }),
                None => Vec::new(),
            };
            *record.selections_mut(kind) = ids;
        }

        (record, warnings)
    }

    pub fn selections(&self, kind: ForestKind) -> &[String] {
        match kind {
            ForestKind::Publication => &self.publication_selections,
            ForestKind::Industry => &self.industry_selections,
            ForestKind::Country => &self.country_selections,
        }
    }

    pub fn selections_mut(&mut self, kind: ForestKind) -> &mut Vec<String> {
        match kind {
            ForestKind::Publication => &mut self.publication_selections,
            ForestKind::Industry => &mut self.industry_selections,
            ForestKind::Country => &mut self.country_selections,
        }
    }

    pub fn dropdown(&self, field: DropdownField) -> Option<&str> {
        self.dropdowns.get(&field).map(String::as_str)
    }
}

/// Match `raw` against the closed option list of `field`, ignoring case and
/// surrounding whitespace. Returns the option's canonical text.
fn canonical_option(field: DropdownField, raw: &str, catalog: &Catalog) -> Option<String> {
    match field {
        DropdownField::DailySubject => DailySubject::parse(raw).map(|s| s.text().to_string()),
        DropdownField::KeyPoint => KeyPoint::parse(raw).map(|k| k.text().to_string()),
        _ => catalog
            .regional_options(field)
            .iter()
            .find(|opt| opt.eq_ignore_ascii_case(raw.trim()))
            .cloned(),
    }
}

fn coerce_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => Some(String::new()),
        // keyword lists regularly come back as arrays
        JsonValue::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        JsonValue::Object(_) => None,
    }
}

fn coerce_id_list(value: &JsonValue) -> Option<Vec<String>> {
    match value {
        JsonValue::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        JsonValue::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        JsonValue::Null => Some(Vec::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn as_map(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_full_metadata_coerced() {
        let obj = as_map(json!({
            "weekly_title_value": "Weekly",
            "website_callout_value": "Callout",
            "social_media_callout_value": "Social",
            "seo_title_value": "SEO",
            "seo_description_value": "Description",
            "seo_keywords_value": ["oil", "Kenya", ""],
            "daily_subject_value": "companies AND industries",
            "key_point_value": "yes",
            "africa_daily_section_value": "energy",
            "asia_today_section_value": "- none -",
            "publication_selections": ["edit-field-publication-und-0-2973-2973"],
            "industry_id_selections": "a, b ,,c",
            "country_selections": ["x", 5, "  "]
        }));

        let (record, warnings) = MetadataRecord::from_json(&obj, &catalog());
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(record.seo_keywords, "oil, Kenya");
        assert_eq!(
            record.dropdown(DropdownField::DailySubject),
            Some("Companies and Industries")
        );
        assert_eq!(record.dropdown(DropdownField::KeyPoint), Some("Yes"));
        assert_eq!(
            record.dropdown(DropdownField::AfricaDailySection),
            Some("Energy")
        );
        assert_eq!(
            record.dropdown(DropdownField::AsiaTodaySection),
            Some(NONE_SENTINEL)
        );
        assert_eq!(record.dropdown(DropdownField::LatamTodaySection), None);
        assert_eq!(record.industry_selections, vec!["a", "b", "c"]);
        assert_eq!(record.country_selections, vec!["x"]);
    }

    #[test]
    fn test_replaced_regional_options_are_honoured() {
        let obj = as_map(json!({ "africa_daily_section_value": "pan-african briefing" }));

        let (record, warnings) = MetadataRecord::from_json(&obj, &catalog());
        assert_eq!(record.dropdown(DropdownField::AfricaDailySection), None);
        assert!(warnings.iter().any(|w| w.contains("pan-african briefing")));

        let builtin = include_str!("../../assets/catalog.toml");
        let start = builtin.find("africa_daily_section = [").unwrap();
        let end = start + builtin[start..].find('\n').unwrap();
        let deployed = format!(
            "{}africa_daily_section = [\"Pan-African Briefing\"]{}",
            &builtin[..start],
            &builtin[end..]
        );
        let catalog = Catalog::from_toml_str(&deployed).unwrap();

        let (record, _) = MetadataRecord::from_json(&obj, &catalog);
        assert_eq!(
            record.dropdown(DropdownField::AfricaDailySection),
            Some("Pan-African Briefing")
        );
    }

    #[test]
    fn test_untrusted_values_become_warnings() {
        let obj = as_map(json!({
            "weekly_title_value": {"nested": true},
            "daily_subject_value": "Sports",
            "key_point_value": 1,
            "publication_selections": {"id": "x"}
        }));

        let (record, warnings) = MetadataRecord::from_json(&obj, &catalog());
        assert_eq!(record.weekly_title, "");
        assert_eq!(record.dropdown(DropdownField::DailySubject), None);
        assert_eq!(record.dropdown(DropdownField::KeyPoint), None);
        assert!(record.publication_selections.is_empty());
        assert!(warnings.iter().any(|w| w.contains("Sports")));
        assert!(warnings.iter().any(|w| w.contains("publication_selections")));
        // five free-text keys are simply missing
        assert_eq!(
            warnings.iter().filter(|w| w.contains("missing")).count(),
            5
        );
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(DailySubject::parse(" political "), Some(DailySubject::Political));
        assert_eq!(DailySubject::parse("Politics"), None);
        assert_eq!(KeyPoint::parse("NO"), Some(KeyPoint::No));
    }
}
