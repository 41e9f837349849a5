//! Ordered fallback ladders.
//!
//! Sites disagree on markup conventions, so several extractors try a fixed
//! list of strategies from most to least specific and keep the first one
//! that produces something. Results are never merged across rungs.

use crate::text::element_text;
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

/// Return the first `Some` produced by `strategies`, trying them in order.
pub fn first_success<T, I, F>(strategies: I) -> Option<T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Option<T>,
{
    strategies.into_iter().find_map(|strategy| strategy())
}

/// Parse a list of CSS selectors, skipping (and logging) invalid ones.
pub fn parse_selectors(selectors: &[&str]) -> Vec<(String, Selector)> {
    selectors
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some((raw.to_string(), selector)),
            Err(e) => {
                warn!("Skipping invalid selector {raw:?}: {e}");
                None
            }
        })
        .collect()
}

/// Parse a single selector known at compile time.
pub fn selector(raw: &str) -> Option<Selector> {
    parse_selectors(&[raw]).pop().map(|(_, selector)| selector)
}

/// Something CSS selectors can be run against.
pub trait Selectable<'a> {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;
}

impl<'a> Selectable<'a> for &'a Html {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

impl<'a> Selectable<'a> for ElementRef<'a> {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

/// An ordered list of selectors with first-match-wins semantics.
pub struct SelectorLadder {
    rungs: Vec<(String, Selector)>,
}

impl SelectorLadder {
    pub fn new(selectors: &[&str]) -> Self {
        Self {
            rungs: parse_selectors(selectors),
        }
    }

    /// All elements matched by the first selector that matches at least one.
    pub fn first_match<'a, R: Selectable<'a>>(&self, root: R) -> Vec<ElementRef<'a>> {
        first_success(self.rungs.iter().map(|(raw, selector)| {
            let root = &root;
            move || {
                let elements = root.select_all(selector);
                if elements.is_empty() {
                    None
                } else {
                    debug!("Selector {raw:?} matched {} elements", elements.len());
                    Some(elements)
                }
            }
        }))
        .unwrap_or_default()
    }

    /// Trimmed text of every element matched by the winning selector.
    pub fn first_match_texts<'a, R: Selectable<'a>>(&self, root: R) -> Vec<String> {
        self.first_match(root)
            .into_iter()
            .map(element_text)
            .collect()
    }

    /// Walk the rungs, look at the first element each selector matches and
    /// return the first value `accept` produces from one of them.
    pub fn first_element<'a, R, T, F>(&self, root: R, accept: F) -> Option<T>
    where
        R: Selectable<'a>,
        F: Fn(ElementRef<'a>) -> Option<T>,
    {
        first_success(self.rungs.iter().map(|(raw, selector)| {
            let root = &root;
            let accept = &accept;
            move || {
                let element = root.select_all(selector).into_iter().next()?;
                let value = accept(element)?;
                debug!("Selector {raw:?} accepted");
                Some(value)
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_success_stops_at_first_some() {
        let tried = std::cell::Cell::new(0);
        let strategies: Vec<Box<dyn FnOnce() -> Option<i32> + '_>> = vec![
            Box::new(|| {
                tried.set(tried.get() + 1);
                None
            }),
            Box::new(|| {
                tried.set(tried.get() + 1);
                Some(2)
            }),
            Box::new(|| {
                tried.set(tried.get() + 1);
                Some(3)
            }),
        ];

        assert_eq!(first_success(strategies), Some(2));
        assert_eq!(tried.get(), 2);
    }

    #[test]
    fn test_first_success_empty() {
        let strategies: Vec<fn() -> Option<u8>> = Vec::new();
        assert_eq!(first_success(strategies), None);
    }

    #[test]
    fn test_ladder_prefers_earlier_rung_without_merging() {
        let html = Html::parse_document(
            r#"<ul class="a"><li>one</li></ul><ul class="b"><li>two</li><li>three</li></ul>"#,
        );
        let ladder = SelectorLadder::new(&[".missing li", ".a li", ".b li"]);
        assert_eq!(ladder.first_match_texts(&html), vec!["one"]);
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let html = Html::parse_document(r#"<p class="x">hello</p>"#);
        let ladder = SelectorLadder::new(&["[[[", ".x"]);
        assert_eq!(ladder.first_match_texts(&html), vec!["hello"]);
    }

    #[test]
    fn test_first_element_moves_on_when_rejected() {
        let html = Html::parse_document(
            r#"<img class="a" src="/icon.png"><img class="b" src="/photo.jpg">"#,
        );
        let ladder = SelectorLadder::new(&["img.a", "img.b"]);
        let src = ladder.first_element(&html, |el| {
            el.value()
                .attr("src")
                .filter(|src| !src.contains("icon"))
                .map(str::to_string)
        });
        assert_eq!(src.as_deref(), Some("/photo.jpg"));
    }
}
