//! Recipe links on a recipe site's search or featured page.

use crate::extractors::ladder::selector;
use crate::text::element_text;
use scraper::Html;
use url::Url;

const RECIPE_LINK_SELECTOR: &str = "a[href*='/recipe/']";
const TITLE_SELECTOR: &str = "h4, h3, h2, [class*='title'], [class*='Title']";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink {
    pub title: String,
    pub url: String,
}

/// Collect titled recipe links, unique by URL.
///
/// Only the first `limit` recipe anchors on the page are considered; an
/// anchor without a title element is dropped rather than replaced.
pub fn parse_recipe_links(html: &str, base_url: &str, limit: usize) -> Vec<RecipeLink> {
    let document = Html::parse_document(html);
    let (Some(links), Some(titles)) = (selector(RECIPE_LINK_SELECTOR), selector(TITLE_SELECTOR))
    else {
        return Vec::new();
    };
    let base = Url::parse(base_url).ok();

    let mut found: Vec<RecipeLink> = Vec::new();
    for link in document.select(&links).take(limit) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            match base.as_ref().and_then(|base| base.join(href).ok()) {
                Some(url) => url.into(),
                None => continue,
            }
        };
        let Some(title) = link.select(&titles).next().map(element_text) else {
            continue;
        };
        if title.is_empty() || found.iter().any(|recipe| recipe.url == url) {
            continue;
        }
        found.push(RecipeLink { title, url });
    }
    found
}
