use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rating shown when the backend has no usable rating for an item.
pub const DEFAULT_RATING: f64 = 4.8;
/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;
/// Card summaries are cut to this many characters.
pub const SUMMARY_MAX_CHARS: usize = 140;

const COURSE_PLACEHOLDER: &str = "https://via.placeholder.com/800x450?text=Course";
const MENTOR_PLACEHOLDER: &str = "https://via.placeholder.com/800x450?text=Mentor";
const STOCK_SUMMARY: &str =
    "Learn with a practical, industry-focused curriculum designed to accelerate your growth.";

/// Which remote collection a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Courses,
    Mentors,
}

impl CollectionKind {
    /// Path segment under `/api/v1/`.
    pub fn path(self) -> &'static str {
        match self {
            CollectionKind::Courses => "courses",
            CollectionKind::Mentors => "mentors",
        }
    }

    /// Plural noun used in user-facing text ("Failed to load courses").
    pub fn noun(self) -> &'static str {
        self.path()
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Query parameters for a collection fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub limit: Option<usize>,
    pub filters: BTreeMap<String, String>,
}

impl FetchParams {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Flattens limit + filters into URL query pairs. `limit` always comes first.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 1);
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// Variant-specific attributes of a catalog item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDetails {
    Course {
        level: Option<String>,
        duration_weeks: Option<f64>,
        languages: Option<String>,
    },
    Mentor {
        role: Option<String>,
        company: Option<String>,
        featured: bool,
    },
}

/// A course or mentor, normalized from whatever the backend sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Category for courses, company or expertise for mentors.
    pub tag: Option<String>,
    /// Always within `[0, MAX_RATING]`.
    pub rating: f64,
    pub order: i64,
    pub active: bool,
    pub link: Option<String>,
    pub details: ItemDetails,
}

impl CatalogItem {
    pub fn kind(&self) -> CollectionKind {
        match self.details {
            ItemDetails::Course { .. } => CollectionKind::Courses,
            ItemDetails::Mentor { .. } => CollectionKind::Mentors,
        }
    }

    /// Image URL, or a placeholder when the item has none.
    pub fn media_url(&self) -> &str {
        match self.image.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => match self.kind() {
                CollectionKind::Courses => COURSE_PLACEHOLDER,
                CollectionKind::Mentors => MENTOR_PLACEHOLDER,
            },
        }
    }

    /// Subject line prefilled when the user asks about this item.
    pub fn default_subject(&self) -> String {
        format!("Query about {}", self.title)
    }

    /// Short card text: short description, else long description, cut at a
    /// word boundary to [`SUMMARY_MAX_CHARS`].
    pub fn summary(&self) -> String {
        let source = self
            .short_description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
            .trim();

        if source.is_empty() {
            return STOCK_SUMMARY.to_string();
        }
        if source.chars().count() <= SUMMARY_MAX_CHARS {
            return source.to_string();
        }

        let first = textwrap::wrap(source, SUMMARY_MAX_CHARS)
            .into_iter()
            .next()
            .map(|line| line.into_owned())
            .unwrap_or_default();
        format!("{}…", first.trim_end())
    }

    /// One-line metadata row shown under the title.
    pub fn meta_line(&self) -> String {
        match &self.details {
            ItemDetails::Course {
                level,
                duration_weeks,
                languages,
            } => {
                let duration = match duration_weeks {
                    Some(weeks) if weeks.is_finite() && *weeks > 0.0 => format!("{weeks} weeks"),
                    _ => "Flexible".to_string(),
                };
                format!(
                    "{} · {} · {} · {}",
                    self.tag.as_deref().unwrap_or("General"),
                    languages.as_deref().unwrap_or("English"),
                    duration,
                    level.as_deref().unwrap_or("All Levels"),
                )
            }
            ItemDetails::Mentor { role, company, .. } => match (role, company) {
                (Some(role), Some(company)) => format!("{role} | {company}"),
                (Some(only), None) | (None, Some(only)) => only.clone(),
                (None, None) => "Mentor".to_string(),
            },
        }
    }
}

/// Collapses the backend's rating candidates into one value: the first
/// positive, finite candidate wins (clamped to the scale), otherwise
/// [`DEFAULT_RATING`].
pub fn normalize_rating(candidates: &[Option<f64>]) -> f64 {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|r| r.is_finite() && *r > 0.0)
        .map(|r| r.min(MAX_RATING))
        .unwrap_or(DEFAULT_RATING)
}

// ============================================================================
// Wire Types
// ============================================================================

/// Collection responses arrive either as a bare array or wrapped in `data`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Payload<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T> Payload<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            Payload::Bare(records) | Payload::Envelope { data: records } => records,
        }
    }
}

/// Course as served by `GET /api/v1/courses`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub duration: Option<serde_json::Value>,
    pub languages: Option<String>,
    pub page_link: Option<String>,
    pub order: Option<i64>,
    pub active: Option<bool>,
    pub ratings_average: Option<f64>,
    pub rating: Option<f64>,
    pub average_rating: Option<f64>,
}

impl From<CourseRecord> for CatalogItem {
    fn from(record: CourseRecord) -> Self {
        let rating = normalize_rating(&[
            record.ratings_average,
            record.rating,
            record.average_rating,
        ]);
        CatalogItem {
            id: record.id,
            title: non_empty(record.title).unwrap_or_else(|| "Untitled Course".to_string()),
            short_description: non_empty(record.short_description),
            description: non_empty(record.description),
            image: non_empty(record.image),
            tag: non_empty(record.category),
            rating,
            order: record.order.unwrap_or(0),
            active: record.active.unwrap_or(true),
            link: non_empty(record.page_link),
            details: ItemDetails::Course {
                level: non_empty(record.level),
                // Only numeric durations are weeks; free-text durations are ignored.
                duration_weeks: record.duration.as_ref().and_then(serde_json::Value::as_f64),
                languages: non_empty(record.languages),
            },
        }
    }
}

/// Mentor as served by `GET /api/v1/mentors`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub order: Option<i64>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub rating: Option<f64>,
}

impl From<MentorRecord> for CatalogItem {
    fn from(record: MentorRecord) -> Self {
        let company = non_empty(record.company);
        CatalogItem {
            id: record.id,
            title: non_empty(record.name).unwrap_or_else(|| "Mentor".to_string()),
            short_description: None,
            description: non_empty(record.bio),
            image: non_empty(record.image),
            tag: company.clone(),
            rating: normalize_rating(&[record.rating]),
            order: record.order.unwrap_or(0),
            active: record.active.unwrap_or(true),
            link: None,
            details: ItemDetails::Mentor {
                role: non_empty(record.title),
                company,
                featured: record.featured.unwrap_or(false),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Body of `POST /api/v1/queries`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InquiryPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Linked catalog item id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

/// Error body the backend returns on non-2xx responses.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub message: Option<String>,
}
