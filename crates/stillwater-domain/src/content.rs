//! Content library kinds.

use serde::{Deserialize, Serialize};

/// The concrete variants of content sharing the content-item shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Affirmation,
    WeeklyAffirmation,
    Quote,
    Media,
    Resource,
    Lecture,
}

/// Text fields searched by the free-text `search` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Title,
    Body,
    Author,
}

/// Fixed sort order of a content list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSort {
    /// `created_at` descending.
    Newest,
    /// `order_index` ascending, then `created_at` ascending.
    Ordered,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        Self::Affirmation,
        Self::WeeklyAffirmation,
        Self::Quote,
        Self::Media,
        Self::Resource,
        Self::Lecture,
    ];

    /// Stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Affirmation => "affirmation",
            Self::WeeklyAffirmation => "weekly_affirmation",
            Self::Quote => "quote",
            Self::Media => "media",
            Self::Resource => "resource",
            Self::Lecture => "lecture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// URL path segment, e.g. `/api/admin/content/weekly-affirmations`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Affirmation => "affirmations",
            Self::WeeklyAffirmation => "weekly-affirmations",
            Self::Quote => "quotes",
            Self::Media => "media",
            Self::Resource => "resources",
            Self::Lecture => "lectures",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn search_fields(self) -> &'static [ContentField] {
        match self {
            Self::Affirmation | Self::WeeklyAffirmation | Self::Quote => {
                &[ContentField::Body, ContentField::Author]
            }
            Self::Media | Self::Resource | Self::Lecture => {
                &[ContentField::Title, ContentField::Body]
            }
        }
    }

    pub fn sort(self) -> ContentSort {
        match self {
            Self::Affirmation | Self::WeeklyAffirmation | Self::Quote => ContentSort::Newest,
            Self::Media | Self::Resource | Self::Lecture => ContentSort::Ordered,
        }
    }
}
