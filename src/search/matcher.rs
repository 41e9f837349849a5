//! Picks a product for an ingredient out of a retailer's search results.
//!
//! Selection is satisficing: the first card whose name shares a significant
//! word with the query wins, even if a later card would match better.

use super::query::SearchTerm;
use crate::config::RetailerConfig;
use crate::extractors::ladder::{selector, SelectorLadder};
use crate::model::ProductCandidate;
use crate::text::element_text;
use log::debug;
use rand::Rng;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

const CARD_SELECTOR: &str =
    "[data-testid='product-tile'], .product-tile, .product-card, [class*='ProductCard']";
const NAME_SELECTOR: &str = "h2, h3, [class*='ProductName'], [class*='product-name']";
const PRICE_SELECTOR: &str = "[class*='price'], .price, [data-testid='price']";

const DETAIL_IMAGE_SELECTORS: &[&str] = &[
    "img[data-testid='product-image']",
    "img[class*='ProductImage']",
    "[class*='ImageGallery'] img",
    "main img",
    "img",
];

const DETAIL_PRICE_SELECTORS: &[&str] = &[
    "[class*='price']",
    ".price",
    "[data-testid='price']",
    "[class*='Price']",
];

static PRICE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.]").expect("Invalid price digits regex"));
static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(\.\d+)?|\.\d+)").expect("Invalid price number regex"));

/// One product card as scraped from the results page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawListing {
    pub name: String,
    pub price_text: String,
    pub image: Option<String>,
    pub href: Option<String>,
}

/// Parse a displayed price such as `"$4.99/lb"`. Only positive values count.
pub fn parse_price(text: &str) -> Option<f64> {
    let digits = PRICE_DIGITS.replace_all(text, "");
    let number = PRICE_NUMBER.find(&digits)?;
    number
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|price| *price > 0.0)
}

/// A stand-in price between 3.99 and 12.99 for listings that show none.
pub fn placeholder_price() -> f64 {
    rand::thread_rng().gen_range(0..10) as f64 + 3.99
}

fn first_text(card: ElementRef, raw: &str) -> Option<String> {
    let selector = selector(raw)?;
    card.select(&selector).next().map(element_text)
}

fn first_attr(card: ElementRef, raw: &str, attr: &str) -> Option<String> {
    let selector = selector(raw)?;
    card.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub struct ProductMatcher {
    config: RetailerConfig,
}

impl ProductMatcher {
    pub fn new(config: RetailerConfig) -> Self {
        Self { config }
    }

    /// Scan product cards in document order, keeping at most
    /// `max_candidates` of them.
    pub fn parse_listings(&self, html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);
        let Some(cards) = selector(CARD_SELECTOR) else {
            return Vec::new();
        };

        document
            .select(&cards)
            .take(self.config.max_candidates)
            .map(|card| RawListing {
                name: first_text(card, NAME_SELECTOR).unwrap_or_default(),
                price_text: first_text(card, PRICE_SELECTOR).unwrap_or_default(),
                image: first_attr(card, "img", "src"),
                href: first_attr(card, "a", "href"),
            })
            .collect()
    }

    /// First listing whose name contains a significant word of `term`.
    pub fn select_candidate(
        &self,
        listings: &[RawListing],
        term: &SearchTerm,
        search_url: &str,
    ) -> Option<ProductCandidate> {
        let listing = listings
            .iter()
            .filter(|listing| !listing.name.is_empty())
            .find(|listing| term.matches(&listing.name))?;
        debug!("Matched listing {:?} for {:?}", listing.name, term.query());

        let url = listing
            .href
            .as_deref()
            .and_then(|href| self.absolute(href))
            .unwrap_or_else(|| search_url.to_string());
        let image = listing
            .image
            .as_deref()
            .filter(|src| !src.is_empty())
            .and_then(|src| self.absolute(src))
            .unwrap_or_else(|| self.config.placeholder_image.clone());

        Some(ProductCandidate {
            name: listing.name.clone(),
            price: parse_price(&listing.price_text).unwrap_or_else(placeholder_price),
            image,
            url,
        })
    }

    /// Parse a results page and select a candidate from it.
    pub fn match_page(
        &self,
        html: &str,
        term: &SearchTerm,
        search_url: &str,
    ) -> Option<ProductCandidate> {
        let listings = self.parse_listings(html);
        debug!("Scanning {} product cards", listings.len());
        self.select_candidate(&listings, term, search_url)
    }

    /// True when `url` points at a product detail page rather than a
    /// search listing.
    pub fn is_detail_page(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|url| url.path().starts_with(&self.config.product_path))
            .unwrap_or(false)
    }

    /// Replace the candidate's image and price with the ones found on its
    /// detail page. Values the page does not offer are kept.
    ///
    /// Returns true when the page supplied an image.
    pub fn enrich(&self, candidate: &mut ProductCandidate, detail_html: &str) -> bool {
        let document = Html::parse_document(detail_html);

        let images = SelectorLadder::new(DETAIL_IMAGE_SELECTORS);
        let image = images.first_element(&document, |img| {
            let value = img.value();
            value
                .attr("src")
                .filter(|src| !src.is_empty())
                .or_else(|| value.attr("data-src"))
                .filter(|src| !src.is_empty() && !src.contains("icon"))
                .map(str::to_string)
        });
        let found_image = image.is_some();
        if let Some(image) = image {
            debug!("Found image from detail page: {}", image);
            candidate.image = Url::parse(&candidate.url)
                .and_then(|base| base.join(&image))
                .map(String::from)
                .unwrap_or(image);
        }

        let prices = SelectorLadder::new(DETAIL_PRICE_SELECTORS);
        if let Some(price) = prices.first_element(&document, |el| parse_price(&element_text(el))) {
            debug!("Found price from detail page: ${}", price);
            candidate.price = price;
        }
        found_image
    }

    fn absolute(&self, href: &str) -> Option<String> {
        let base = Url::parse(&self.config.base_url).ok()?;
        base.join(href).ok().map(String::from)
    }
}
