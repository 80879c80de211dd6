//! Mapping a schema.org `Recipe` JSON-LD node onto [`Recipe`].
//!
//! Each field has its own small normalizer over `serde_json::Value` that
//! checks the shapes schema.org allows, in order, and falls back to an
//! absent or empty value. Only a missing `name` fails the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use url::Url;

use crate::duration::duration_to_text;
use crate::error::ExtractError;
use crate::types::{Recipe, VideoInfo};

/// `@type` values accepted as a Recipe.
const RECIPE_TYPES: &[&str] = &[
    "Recipe",
    "http://schema.org/Recipe",
    "https://schema.org/Recipe",
];

/// `@type` values whose `itemListElement` holds steps rather than notes
/// attached to a step.
const SECTION_TYPES: &[&str] = &["HowToSection", "ItemList"];

/// Naive date-time layouts seen in `datePublished` besides RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse raw JSON-LD text and normalize the Recipe node inside it.
pub fn normalize(raw: &str) -> Result<Recipe, ExtractError> {
    normalize_with(raw, true)
}

/// Like [`normalize`], with control over the sanitizing pass.
pub fn normalize_with(raw: &str, sanitize: bool) -> Result<Recipe, ExtractError> {
    let json = decode(raw, sanitize)?;
    let node = find_recipe_node(&json).ok_or(ExtractError::NotARecipe)?;
    normalize_node(node)
}

/// Decode JSON-LD text, dropping a leading BOM.
fn decode(raw: &str, sanitize: bool) -> Result<Value, ExtractError> {
    let raw = raw.trim_start_matches('\u{feff}');
    let result = if sanitize {
        serde_json::from_str(&sanitize_json(raw))
    } else {
        serde_json::from_str(raw)
    };
    result.map_err(|e| ExtractError::MalformedJson(e.to_string()))
}

/// Escape literal control characters inside JSON strings. Some publishers
/// emit raw newlines and tabs in their JSON-LD. Valid JSON passes through
/// unchanged.
pub(crate) fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            result.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                result.push(c);
            }
            '"' => {
                in_string = false;
                result.push(c);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            // Remaining C0 controls are never valid unescaped
            c if c < ' ' => {}
            _ => result.push(c),
        }
    }

    result
}

/// Select the Recipe node: an element of a `@graph` array (or of a
/// top-level array), else the value itself. Looks one level deep only.
pub fn find_recipe_node(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                if let Some(node) = graph.iter().find(|item| is_recipe(item)) {
                    return Some(node);
                }
            }
            is_recipe(json).then_some(json)
        }
        Value::Array(items) => items.iter().find(|item| is_recipe(item)),
        _ => None,
    }
}

/// True for a node typed as a schema.org Recipe, with or without the
/// vocabulary prefix.
fn is_recipe(node: &Value) -> bool {
    has_type(node, RECIPE_TYPES)
}

/// True if `@type` (a string or an array of strings) names any of `types`.
fn has_type(node: &Value, types: &[&str]) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => types.contains(&s.as_str()),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .any(|t| types.contains(&t)),
        _ => false,
    }
}

/// Build the record from an already-selected Recipe node.
pub fn normalize_node(node: &Value) -> Result<Recipe, ExtractError> {
    let name = node
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ExtractError::MissingName)?
        .to_string();

    let video = video(node.get("video"));

    Ok(Recipe {
        name,
        author: node.get("author").and_then(author_name),
        date_published: date_published(node.get("datePublished")),
        source_url: source_url(node),
        cook_time: duration(node, "cookTime"),
        prep_time: duration(node, "prepTime"),
        total_time: duration(node, "totalTime"),
        image_url: node.get("image").and_then(image_url),
        keywords: keywords(node.get("keywords")),
        ingredients: ingredients(node),
        instructions: instructions(node.get("recipeInstructions")),
        category: string_list(node.get("recipeCategory")),
        cuisine: string_list(node.get("recipeCuisine")),
        rating: rating(node.get("aggregateRating")),
        recipe_yield: recipe_yield(node.get("recipeYield")),
        video_thumbnail: video.thumbnail,
        video_title: video.title,
        video_url: video.url,
    })
}

/// Trimmed copy of `s`, or None if nothing is left.
fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A string, or the first string of an array.
fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}

/// Keep `candidate` only if it parses as an absolute URL.
fn absolute_url(candidate: String) -> Option<String> {
    match Url::parse(&candidate) {
        Ok(_) => Some(candidate),
        Err(e) => {
            tracing::debug!(url = %candidate, error = %e, "ignoring non-absolute URL");
            None
        }
    }
}

/// A name string, a Person/Organization `name`, or the first of an array
/// that resolves.
fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).and_then(non_empty),
        Value::Array(items) => items.iter().find_map(author_name),
        _ => None,
    }
}

/// A URL string, an ImageObject's `url`/`contentUrl`, or the first of an
/// array that resolves.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => ["url", "contentUrl"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(first_string)),
        Value::Array(items) => items.iter().find_map(image_url),
        _ => None,
    }
}

/// Read an ISO-8601 duration field as display text.
fn duration(node: &Value, field: &'static str) -> Option<String> {
    let raw = node.get(field)?.as_str()?;
    let text = duration_to_text(raw);
    if text.is_none() {
        tracing::debug!(field, value = raw, "dropping empty or malformed duration");
    }
    text
}

fn split_keywords(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn keywords(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => split_keywords(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_keywords)
            .collect(),
        _ => Vec::new(),
    }
}

/// `recipeIngredient`, or the older `ingredients` property.
fn ingredients(node: &Value) -> Vec<String> {
    let raw = node
        .get("recipeIngredient")
        .or_else(|| node.get("ingredients"));

    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(non_empty)
            .collect(),
        Some(other) => {
            tracing::debug!(field = "recipeIngredient", value = %other, "ingredients not an array");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// `recipeInstructions` after shape resolution. Sections may hold steps or
/// further sections; headings are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InstructionNode {
    Step(String),
    Section(Vec<InstructionNode>),
}

impl InstructionNode {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => non_empty(s).map(Self::Step),
            Value::Array(items) => Some(Self::Section(
                items.iter().filter_map(Self::from_value).collect(),
            )),
            Value::Object(obj) => {
                let is_section = has_type(value, SECTION_TYPES);
                let text = obj.get("text").and_then(Value::as_str).and_then(non_empty);

                // A HowToStep's own text wins over directions or tips nested in it
                if !is_section {
                    if let Some(text) = text {
                        return Some(Self::Step(text));
                    }
                }

                if let Some(children) = obj.get("itemListElement") {
                    return Self::from_value(children).map(|node| match node {
                        Self::Step(text) => Self::Section(vec![Self::Step(text)]),
                        section => section,
                    });
                }

                // Section headings are not instructions
                if is_section {
                    return None;
                }
                obj.get("name")
                    .and_then(Value::as_str)
                    .and_then(non_empty)
                    .map(Self::Step)
            }
            _ => None,
        }
    }

    fn flatten_into(self, out: &mut Vec<String>) {
        match self {
            Self::Step(text) => out.push(text),
            Self::Section(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

fn instructions(value: Option<&Value>) -> Vec<String> {
    let mut steps = Vec::new();
    if let Some(root) = value.and_then(InstructionNode::from_value) {
        root.flatten_into(&mut steps);
    }
    steps
}

/// Category/cuisine: arrays pass through, a scalar becomes a one-element
/// list, and absence stays absent.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(non_empty)
                .collect(),
        ),
        Value::String(s) => non_empty(s).map(|s| vec![s]),
        _ => None,
    }
}

fn rating(value: Option<&Value>) -> Option<f64> {
    let raw = value?.get("ratingValue")?;
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite());

    if parsed.is_none() {
        tracing::debug!(field = "ratingValue", value = %raw, "non-numeric rating");
    }
    parsed
}

fn video(value: Option<&Value>) -> VideoInfo {
    let video = match value {
        Some(Value::Array(items)) => items.first(),
        other => other,
    };
    let Some(video) = video.filter(|v| v.is_object()) else {
        return VideoInfo::default();
    };

    VideoInfo {
        thumbnail: video.get("thumbnailUrl").and_then(first_string),
        title: video.get("name").and_then(first_string),
        url: video
            .get("contentUrl")
            .and_then(first_string)
            .or_else(|| video.get("embedUrl").and_then(first_string)),
    }
}

/// Strings are kept, numbers rendered, arrays yield their first usable entry.
fn recipe_yield(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(|item| recipe_yield(Some(item))),
        _ => None,
    }
}

fn date_published(value: Option<&Value>) -> Option<NaiveDate> {
    let raw = value?.as_str()?.trim();
    let date = parse_date(raw);
    if date.is_none() {
        tracing::debug!(field = "datePublished", value = raw, "unparseable date");
    }
    date
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.date_naive());
        }
    }
    leading_date(raw)
}

/// The `YYYY-MM-DD` prefix of a date-time whose time part is in a layout
/// not listed above. The date is taken as written, not shifted by offset.
fn leading_date(raw: &str) -> Option<NaiveDate> {
    let (date, rest) = (raw.get(..10)?, raw.get(10..)?);
    if !(rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// `url`, else `mainEntityOfPage` (a URL string or a WebPage with `@id`).
fn source_url(node: &Value) -> Option<String> {
    let from_url = node
        .get("url")
        .and_then(first_string)
        .and_then(absolute_url);

    from_url.or_else(|| {
        let page = node.get("mainEntityOfPage")?;
        let candidate = match page {
            Value::String(s) => non_empty(s),
            Value::Object(obj) => ["@id", "url"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str).and_then(non_empty)),
            _ => None,
        }?;
        absolute_url(candidate)
    })
}
