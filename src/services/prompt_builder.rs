//! Prompt construction for the two generation steps.

use crate::models::metadata::{selection_keys, FREE_TEXT_KEYS};
use crate::models::{Catalog, DailySubject, DropdownField, ForestKind, KeyPoint};
use crate::utils::text::take_chars;

/// Source text beyond this many characters is not sent to the model.
pub const SOURCE_CHAR_LIMIT: usize = 8000;

/// Article-writing prompt for one slot.
pub fn article_prompt(instruction: &str, source_text: &str) -> String {
    format!(
        "You are an expert journalist. Respond with a JSON object with two keys: \"title\" and \"body\". \
         Based on the web content below, {}.\n\nWeb Content:\n---\n{}\n---",
        instruction.trim(),
        take_chars(source_text, SOURCE_CHAR_LIMIT)
    )
}

/// Metadata prompt: embeds every catalog id and every closed option list.
pub fn metadata_prompt(catalog: &Catalog, title: &str, body: &str) -> String {
    let selection_key = |kind| selection_keys(kind).0;
    let keys: Vec<String> = FREE_TEXT_KEYS
        .iter()
        .copied()
        .chain(DropdownField::ALL.iter().map(|f| f.key()))
        .chain(
            [ForestKind::Publication, ForestKind::Industry, ForestKind::Country]
                .into_iter()
                .map(selection_key),
        )
        .map(|k| format!("\"{}\"", k))
        .collect();

    let mut dropdown_rules = vec![
        format!(
            "- {}: Choose ONE from {}",
            DropdownField::DailySubject.key(),
            option_list(DailySubject::ALL.iter().map(|s| s.text()))
        ),
        format!(
            "- {}: Choose ONE from {}",
            DropdownField::KeyPoint.key(),
            option_list(KeyPoint::ALL.iter().map(|k| k.text()))
        ),
    ];
    dropdown_rules.extend(DropdownField::REGIONAL.into_iter().map(|field| {
        format!(
            "- {}: Choose ONE from {}, or \"- None -\" if the article does not belong in that section.",
            field.key(),
            option_list(catalog.regional_options(field).iter().map(String::as_str))
        )
    }));

    format!(
        r#"You are an expert sub-editor. Your response must be ONLY a valid JSON object.
Based on the article, fill in the metadata using these keys: {keys}.

RULES FOR CHECKBOX SELECTIONS (ID-BASED):
- "{publication_key}", "{industry_key}" and "{country_key}" must each be an ARRAY of STRINGS, where each string is the ID of a checkbox to be selected.
- Choose at least one publication ID.
- For industries, choose ONLY the IDs of the most specific sub-sections.
- For countries, choose the IDs for the specific country and its parent regions.

AVAILABLE PUBLICATION IDs:
{publications}

AVAILABLE INDUSTRY IDs (Choose only specific sub-sections):
{industries}

AVAILABLE COUNTRY IDs:
{countries}

RULES FOR DROPDOWN SELECTIONS:
{dropdown_rules}

ARTICLE FOR ANALYSIS:
Article Title: "{title}"
Article Body: "{body}""#,
        keys = keys.join(", "),
        publication_key = selection_key(ForestKind::Publication),
        industry_key = selection_key(ForestKind::Industry),
        country_key = selection_key(ForestKind::Country),
        publications = id_listing(catalog, ForestKind::Publication),
        industries = id_listing(catalog, ForestKind::Industry),
        countries = id_listing(catalog, ForestKind::Country),
        dropdown_rules = dropdown_rules.join("\n"),
    )
}

/// `{ "Name": "id", ... }` in catalog order.
fn id_listing(catalog: &Catalog, kind: ForestKind) -> String {
    let pairs: Vec<String> = catalog
        .forest(kind)
        .nodes()
        .iter()
        .map(|node| format!("    \"{}\": \"{}\"", node.display_name, node.id))
        .collect();
    format!("{{\n{}\n}}", pairs.join(",\n"))
}

fn option_list<'a>(options: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = options.map(|o| format!("\"{}\"", o)).collect();
    format!("[{}]", quoted.join(", "))
}
