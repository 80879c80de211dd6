use url::Url;

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::locate::PageDocument;
use crate::normalize::normalize_with;
use crate::types::{PageMeta, Recipe};

/// Extract a recipe from HTML containing JSON-LD structured data, using the
/// default configuration.
pub fn extract_recipe(html: &str) -> Result<Recipe, ExtractError> {
    extract_recipe_with(html, &ExtractConfig::default())
}

/// Extract a recipe from HTML.
///
/// Reads the first JSON-LD script, or every script in order when
/// `scan_all_scripts` is set, then fills `source_url` and `image_url` from
/// the page head if the structured data has neither.
pub fn extract_recipe_with(html: &str, config: &ExtractConfig) -> Result<Recipe, ExtractError> {
    let page = PageDocument::parse(html);

    let recipe = if config.scan_all_scripts {
        first_recipe(&page.scripts, config.sanitize_json)?
    } else {
        normalize_with(page.first_script()?, config.sanitize_json)?
    };

    if config.page_fallbacks {
        Ok(with_page_fallbacks(recipe, &page.meta))
    } else {
        Ok(recipe)
    }
}

/// Try each script until one yields a recipe. On total failure, report the
/// error that got furthest (a nameless Recipe beats a non-Recipe, which beats
/// unparseable JSON).
fn first_recipe(scripts: &[String], sanitize: bool) -> Result<Recipe, ExtractError> {
    let mut best_error: Option<ExtractError> = None;

    for (index, script) in scripts.iter().enumerate() {
        match normalize_with(script, sanitize) {
            Ok(recipe) => return Ok(recipe),
            Err(e) => {
                tracing::debug!(index, error = %e, "skipping JSON-LD script");
                let replace = best_error
                    .as_ref()
                    .map_or(true, |best| progress(&e) > progress(best));
                if replace {
                    best_error = Some(e);
                }
            }
        }
    }

    Err(best_error.unwrap_or(ExtractError::NotFound))
}

fn progress(error: &ExtractError) -> u8 {
    match error {
        ExtractError::NotFound => 0,
        ExtractError::MalformedJson(_) => 1,
        ExtractError::NotARecipe => 2,
        ExtractError::MissingName => 3,
    }
}

fn with_page_fallbacks(recipe: Recipe, meta: &PageMeta) -> Recipe {
    let source_url = recipe.source_url.clone().or_else(|| {
        [&meta.canonical_url, &meta.og_url]
            .into_iter()
            .flatten()
            .find(|candidate| Url::parse(candidate).is_ok())
            .cloned()
    });

    let image_url = recipe
        .image_url
        .clone()
        .or_else(|| meta.og_image.clone())
        .map(|image| resolve_against(image, source_url.as_deref()));

    Recipe {
        source_url,
        image_url,
        ..recipe
    }
}

/// Resolve a relative URL against `base`. Absolute URLs, and anything that
/// can't be resolved, are returned as given.
fn resolve_against(candidate: String, base: Option<&str>) -> String {
    if Url::parse(&candidate).is_ok() {
        return candidate;
    }
    let Some(base) = base.and_then(|b| Url::parse(b).ok()) else {
        return candidate;
    };
    match base.join(&candidate) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            tracing::debug!(url = %candidate, error = %e, "could not resolve relative URL");
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_recipe() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Test Recipe",
                    "recipeYield": "4 servings",
                    "recipeIngredient": ["1 cup flour"],
                    "recipeInstructions": "Mix and bake."
                }
                </script>
            </head>
            <body></body>
            </html>
        "#;

        let result = extract_recipe(html).unwrap();
        assert_eq!(result.name, "Test Recipe");
        assert_eq!(result.recipe_yield.as_deref(), Some("4 servings"));
        assert_eq!(result.ingredients, vec!["1 cup flour"]);
        assert_eq!(result.instructions, vec!["Mix and bake."]);
    }

    #[test]
    fn test_extract_without_jsonld() {
        let html = r#"
            <html><body>
                <div itemscope itemtype="https://schema.org/Recipe">
                    <h1 itemprop="name">Microdata Only</h1>
                </div>
            </body></html>
        "#;
        assert_eq!(extract_recipe(html), Err(ExtractError::NotFound));
    }

    #[test]
    fn test_first_script_only_by_default() {
        let html = r#"
            <html><head>
                <script type="application/ld+json">{"@type": "Organization"}</script>
                <script type="application/ld+json">{"@type": "Recipe", "name": "Later"}</script>
            </head></html>
        "#;

        assert_eq!(extract_recipe(html), Err(ExtractError::NotARecipe));

        let config = ExtractConfig {
            scan_all_scripts: true,
            ..ExtractConfig::default()
        };
        assert_eq!(extract_recipe_with(html, &config).unwrap().name, "Later");
    }

    #[test]
    fn test_scan_all_reports_furthest_error() {
        let html = r#"
            <html><head>
                <script type="application/ld+json">{not json</script>
                <script type="application/ld+json">{"@type": "Recipe"}</script>
                <script type="application/ld+json">{"@type": "WebSite"}</script>
            </head></html>
        "#;
        let config = ExtractConfig {
            scan_all_scripts: true,
            ..ExtractConfig::default()
        };
        assert_eq!(
            extract_recipe_with(html, &config),
            Err(ExtractError::MissingName)
        );
    }

    #[test]
    fn test_page_fallbacks_fill_url_and_image() {
        let html = r#"
            <html><head>
                <link rel="canonical" href="https://example.com/recipes/pie/">
                <meta property="og:image" content="/images/pie.jpg">
                <script type="application/ld+json">{"@type": "Recipe", "name": "Pie"}</script>
            </head></html>
        "#;

        let recipe = extract_recipe(html).unwrap();
        assert_eq!(
            recipe.source_url.as_deref(),
            Some("https://example.com/recipes/pie/")
        );
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://example.com/images/pie.jpg")
        );

        let config = ExtractConfig {
            page_fallbacks: false,
            ..ExtractConfig::default()
        };
        let recipe = extract_recipe_with(html, &config).unwrap();
        assert_eq!(recipe.source_url, None);
        assert_eq!(recipe.image_url, None);
    }

    #[test]
    fn test_structured_data_wins_over_page_meta() {
        let html = r#"
            <html><head>
                <link rel="canonical" href="https://example.com/canonical">
                <meta property="og:url" content="https://example.com/og">
                <meta property="og:image" content="https://example.com/og.jpg">
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Pie",
                    "url": "https://example.com/jsonld",
                    "image": "https://example.com/jsonld.jpg"
                }
                </script>
            </head></html>
        "#;

        let recipe = extract_recipe(html).unwrap();
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/jsonld"));
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://example.com/jsonld.jpg")
        );
    }

    #[test]
    fn test_og_url_used_when_canonical_missing() {
        let meta = PageMeta {
            canonical_url: Some("not a url".to_string()),
            og_url: Some("https://example.com/og".to_string()),
            og_image: None,
        };
        let recipe = normalize_with(r#"{"@type": "Recipe", "name": "Pie"}"#, true).unwrap();
        let recipe = with_page_fallbacks(recipe, &meta);
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/og"));
    }

    #[test]
    fn test_relative_image_left_alone_without_base() {
        assert_eq!(resolve_against("/a.jpg".to_string(), None), "/a.jpg");
        assert_eq!(
            resolve_against("a.jpg".to_string(), Some("https://x.test/dir/page")),
            "https://x.test/dir/a.jpg"
        );
        assert_eq!(
            resolve_against("https://cdn.test/a.jpg".to_string(), Some("https://x.test/")),
            "https://cdn.test/a.jpg"
        );
    }
}
