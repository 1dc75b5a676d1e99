//! Field layout of the CMS article form.
//!
//! Element ids are those rendered by the Drupal node form the bot drives.

/// Login form
pub const LOGIN_USERNAME_ID: &str = "edit-name";
pub const LOGIN_PASSWORD_ID: &str = "edit-pass";
pub const LOGIN_SUBMIT_ID: &str = "edit-submit";

/// CKEditor instance holding the article body
pub const BODY_EDITOR_INSTANCE: &str = "edit-body-und-0-value";

/// CSS selector of the toggles of collapsed term-reference-tree groups.
pub const COLLAPSED_GROUP_TOGGLE_SELECTOR: &str =
    "div.term-reference-tree-collapsed div.term-reference-tree-button";

/// Dropdown value meaning "leave this field unset".
pub const NONE_SENTINEL: &str = "- None -";

/// Whether a dropdown value is the "- None -" sentinel (any case, any spacing).
pub fn is_none_sentinel(value: &str) -> bool {
    let squashed: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    squashed == "-none-"
}

/// Scalar text inputs of the article form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    WeeklyTitle,
    WebsiteCallout,
    SocialMediaCallout,
    SeoTitle,
    SeoDescription,
    SeoKeywords,
}

impl TextField {
    pub const ALL: [TextField; 7] = [
        TextField::Title,
        TextField::WeeklyTitle,
        TextField::WebsiteCallout,
        TextField::SocialMediaCallout,
        TextField::SeoTitle,
        TextField::SeoDescription,
        TextField::SeoKeywords,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            TextField::Title => "edit-title",
            TextField::WeeklyTitle => "edit-field-weekly-title-und-0-value",
            TextField::WebsiteCallout => "edit-field-website-callout-und-0-value",
            TextField::SocialMediaCallout => "edit-field-social-media-callout-und-0-value",
            TextField::SeoTitle => "edit-metatags-und-title-value",
            TextField::SeoDescription => "edit-metatags-und-description-value",
            TextField::SeoKeywords => "edit-metatags-und-keywords-value",
        }
    }

    /// Flat record key
    pub fn key(self) -> &'static str {
        match self {
            TextField::Title => "title_value",
            TextField::WeeklyTitle => "weekly_title_value",
            TextField::WebsiteCallout => "website_callout_value",
            TextField::SocialMediaCallout => "social_media_callout_value",
            TextField::SeoTitle => "seo_title_value",
            TextField::SeoDescription => "seo_description_value",
            TextField::SeoKeywords => "seo_keywords_value",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextField::Title => "Title",
            TextField::WeeklyTitle => "Weekly Title",
            TextField::WebsiteCallout => "Website Callout",
            TextField::SocialMediaCallout => "Social Media Callout",
            TextField::SeoTitle => "SEO Title",
            TextField::SeoDescription => "SEO Description",
            TextField::SeoKeywords => "SEO Keywords",
        }
    }
}

/// Single-choice select elements of the article form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropdownField {
    DailySubject,
    KeyPoint,
    AfricaDailySection,
    CeeNewsWatchSection,
    NAfricaTodaySection,
    MiddleEastTodaySection,
    AsiaTodaySection,
    LatamTodaySection,
}

impl DropdownField {
    pub const ALL: [DropdownField; 8] = [
        DropdownField::DailySubject,
        DropdownField::KeyPoint,
        DropdownField::AfricaDailySection,
        DropdownField::CeeNewsWatchSection,
        DropdownField::NAfricaTodaySection,
        DropdownField::MiddleEastTodaySection,
        DropdownField::AsiaTodaySection,
        DropdownField::LatamTodaySection,
    ];

    /// The six regional section dropdowns, whose options come from the catalog.
    pub const REGIONAL: [DropdownField; 6] = [
        DropdownField::AfricaDailySection,
        DropdownField::CeeNewsWatchSection,
        DropdownField::NAfricaTodaySection,
        DropdownField::MiddleEastTodaySection,
        DropdownField::AsiaTodaySection,
        DropdownField::LatamTodaySection,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            DropdownField::DailySubject => "edit-field-subject-und",
            DropdownField::KeyPoint => "edit-field-key-und",
            DropdownField::AfricaDailySection => "edit-field-africa-daily-section-und",
            DropdownField::CeeNewsWatchSection => "edit-field-cee-middle-east-africa-tod-und",
            DropdownField::NAfricaTodaySection => "edit-field-middle-east-n-africa-today-und",
            DropdownField::MiddleEastTodaySection => "edit-field-middle-east-today-section-und",
            DropdownField::AsiaTodaySection => "edit-field-asia-today-sections-und",
            DropdownField::LatamTodaySection => "edit-field-latam-today-und",
        }
    }

    /// Key of the value in the model's metadata object
    pub fn key(self) -> &'static str {
        match self {
            DropdownField::DailySubject => "daily_subject_value",
            DropdownField::KeyPoint => "key_point_value",
            DropdownField::AfricaDailySection => "africa_daily_section_value",
            DropdownField::CeeNewsWatchSection => "cee_news_watch_section_value",
            DropdownField::NAfricaTodaySection => "n_africa_today_section_value",
            DropdownField::MiddleEastTodaySection => "middle_east_today_section_value",
            DropdownField::AsiaTodaySection => "asia_today_section_value",
            DropdownField::LatamTodaySection => "latam_today_section_value",
        }
    }

    /// Key of the option list in the catalog document (regional fields only).
    pub fn catalog_key(self) -> Option<&'static str> {
        match self {
            DropdownField::DailySubject | DropdownField::KeyPoint => None,
            DropdownField::AfricaDailySection => Some("africa_daily_section"),
            DropdownField::CeeNewsWatchSection => Some("cee_news_watch_section"),
            DropdownField::NAfricaTodaySection => Some("n_africa_today_section"),
            DropdownField::MiddleEastTodaySection => Some("middle_east_today_section"),
            DropdownField::AsiaTodaySection => Some("asia_today_section"),
            DropdownField::LatamTodaySection => Some("latam_today_section"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DropdownField::DailySubject => "Daily Subject",
            DropdownField::KeyPoint => "Key Point",
            DropdownField::AfricaDailySection => "Africa Daily Section",
            DropdownField::CeeNewsWatchSection => "CEE News Watch Section",
            DropdownField::NAfricaTodaySection => "N.Africa Today Section",
            DropdownField::MiddleEastTodaySection => "Middle East Today Section",
            DropdownField::AsiaTodaySection => "Asia Today Section",
            DropdownField::LatamTodaySection => "LatAm Today Section",
        }
    }
}
