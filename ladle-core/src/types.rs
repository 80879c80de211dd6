use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recipe normalized out of schema.org JSON-LD.
///
/// Every polymorphic shape of the source node has been resolved: list fields
/// are always lists, scalar fields are always plain strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub author: Option<String>,
    pub date_published: Option<NaiveDate>,
    pub source_url: Option<String>,
    /// Human-readable, e.g. "1 hour 30 minutes"
    pub cook_time: Option<String>,
    pub prep_time: Option<String>,
    pub total_time: Option<String>,
    pub image_url: Option<String>,
    pub keywords: Vec<String>,
    pub ingredients: Vec<String>,
    /// Flattened steps, section headings dropped
    pub instructions: Vec<String>,
    /// Absent when the source has no category at all (unlike `keywords`)
    pub category: Option<Vec<String>>,
    pub cuisine: Option<Vec<String>>,
    pub rating: Option<f64>,
    #[serde(rename = "yield")]
    pub recipe_yield: Option<String>,
    pub video_thumbnail: Option<String>,
    pub video_title: Option<String>,
    pub video_url: Option<String>,
}

/// Video fields pulled from a schema.org `VideoObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInfo {
    pub thumbnail: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Page-level values read from the HTML head, used when the JSON-LD node
/// leaves a field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// `<link rel="canonical" href="...">`
    pub canonical_url: Option<String>,
    /// `<meta property="og:url" content="...">`
    pub og_url: Option<String>,
    /// `<meta property="og:image" content="...">`
    pub og_image: Option<String>,
}
