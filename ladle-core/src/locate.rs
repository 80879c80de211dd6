//! Finding JSON-LD payloads and page-level metadata in an HTML document.

use scraper::{Html, Selector};

use crate::error::ExtractError;
use crate::types::PageMeta;

const JSONLD_MIME: &str = "application/ld+json";

/// The parts of an HTML page the extractor cares about, gathered in one
/// parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDocument {
    /// Raw text of every JSON-LD script, in document order
    pub scripts: Vec<String>,
    pub meta: PageMeta,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self {
            scripts: jsonld_scripts(&document),
            meta: page_meta(&document),
        }
    }

    /// Raw text of the first JSON-LD script.
    pub fn first_script(&self) -> Result<&str, ExtractError> {
        self.scripts
            .first()
            .map(String::as_str)
            .ok_or(ExtractError::NotFound)
    }
}

/// Return the raw text of the first `<script type="application/ld+json">`.
pub fn locate(html: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    jsonld_scripts(&document)
        .into_iter()
        .next()
        .ok_or(ExtractError::NotFound)
}

/// Collect the text of every JSON-LD script. html5ever lowercases tag names,
/// so only the `type` value needs case folding.
fn jsonld_scripts(document: &Html) -> Vec<String> {
    let selector = Selector::parse("script[type]").expect("Invalid selector");

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(JSONLD_MIME))
        })
        .map(|el| el.text().collect::<String>())
        .collect()
}

fn page_meta(document: &Html) -> PageMeta {
    PageMeta {
        canonical_url: canonical_link(document),
        og_url: og_property(document, "og:url"),
        og_image: og_property(document, "og:image"),
    }
}

/// `<link rel="canonical">`. The `rel` attribute is a token list, so
/// `rel="canonical alternate"` counts too.
fn canonical_link(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel][href]").ok()?;
    document
        .select(&selector)
        .find(|el| {
            el.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

fn og_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse("meta[property][content]").ok()?;
    document
        .select(&selector)
        .find(|el| {
            el.value()
                .attr("property")
                .is_some_and(|p| p.trim().eq_ignore_ascii_case(property))
        })
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}
