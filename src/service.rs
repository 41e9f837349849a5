use crate::assembler::assemble;
use crate::builder::BasketServiceBuilder;
use crate::cache::ImageResolutionCache;
use crate::config::BasketConfig;
use crate::error::ScrapeError;
use crate::extractors::JsonLdExtractor;
use crate::fetchers::{DocumentFetcher, DocumentRenderer};
use crate::listing::{parse_recipe_links, RecipeLink};
use crate::model::{IngredientMatch, ProductCandidate, RecipeRecord, RecipeSummary};
use crate::search::{ProductMatcher, SearchTerm};
use futures::future::join_all;
use log::{debug, info, warn};
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// Price given to products generated for ingredients with no match.
pub const PLACEHOLDER_PRICE: f64 = 4.99;

/// Entry point for recipe extraction and product search.
///
/// Owns the image cache for its whole lifetime; clone the `Arc` returned
/// by [`BasketService::image_cache`] to share it elsewhere.
pub struct BasketService {
    pub(crate) config: BasketConfig,
    pub(crate) fetcher: Arc<dyn DocumentFetcher>,
    pub(crate) renderer: Option<Arc<dyn DocumentRenderer>>,
    pub(crate) image_cache: Arc<ImageResolutionCache>,
    pub(crate) matcher: ProductMatcher,
}

impl BasketService {
    pub fn builder() -> BasketServiceBuilder {
        BasketServiceBuilder::default()
    }

    /// Service with the given configuration and the default HTTP fetcher.
    pub fn new(config: BasketConfig) -> Result<Self, ScrapeError> {
        Self::builder().config(config).build()
    }

    /// Service configured from `basket.toml` and `RECIPE_BASKET__*`
    /// environment variables.
    pub fn from_env() -> Result<Self, ScrapeError> {
        Self::new(BasketConfig::load()?)
    }

    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    pub fn image_cache(&self) -> Arc<ImageResolutionCache> {
        Arc::clone(&self.image_cache)
    }

    /// Fetch a page and extract a cleaned recipe from it.
    pub async fn extract_recipe(&self, url: &str) -> Result<RecipeRecord, ScrapeError> {
        info!("Scraping recipe: {}", url);
        let html = self.fetcher.fetch(url).await?;
        let recipe = assemble(&Html::parse_document(&html))?;
        info!(
            "Found: {}, {} ingredients, {} instructions",
            recipe.name,
            recipe.ingredients.len(),
            recipe.instructions.len()
        );
        Ok(recipe)
    }

    /// Search the retailer for one ingredient line. Returns zero or one
    /// products.
    ///
    /// A product whose detail-page image is already cached is not fetched
    /// again; it keeps its listing price.
    pub async fn find_products(&self, line: &str) -> Result<Vec<ProductCandidate>, ScrapeError> {
        let term = SearchTerm::new(line);
        let query = term.query();
        let search_url = self.retailer_search_url(&query)?;
        info!("Cleaned {:?} to {:?}, searching {}", line, query, search_url);

        let html = self
            .load_search_page(&search_url)
            .await
            .map_err(|e| ScrapeError::SearchError(format!("{search_url}: {e}")))?;

        let Some(mut candidate) = self.matcher.match_page(&html, &term, &search_url) else {
            info!("Found 0 products for {:?}", query);
            return Ok(Vec::new());
        };

        if self.matcher.is_detail_page(&candidate.url) {
            if let Some(image) = self.image_cache.get(&candidate.url) {
                debug!("Image cache hit for {}", candidate.url);
                candidate.image = image;
            } else {
                match self.fetcher.fetch(&candidate.url).await {
                    Ok(detail) => {
                        if self.matcher.enrich(&mut candidate, &detail) {
                            self.image_cache
                                .put(candidate.url.clone(), candidate.image.clone());
                        }
                    }
                    Err(e) => debug!("Error fetching product details: {}", e),
                }
            }
        }

        info!("Found 1 product for {:?}: {}", query, candidate.name);
        Ok(vec![candidate])
    }

    /// Search every line concurrently. A line whose search fails or finds
    /// nothing gets a generated placeholder product.
    pub async fn find_products_batch<S: AsRef<str>>(&self, lines: &[S]) -> Vec<IngredientMatch> {
        let searches = lines.iter().map(|line| async move {
            let line = line.as_ref();
            match self.find_products(line).await {
                Ok(mut products) if !products.is_empty() => IngredientMatch {
                    ingredient: line.to_string(),
                    product: products.remove(0),
                    placeholder: false,
                },
                Ok(_) => self.placeholder_match(line),
                Err(e) => {
                    warn!("Search for {:?} failed, using placeholder: {}", line, e);
                    self.placeholder_match(line)
                }
            }
        });
        join_all(searches).await
    }

    /// Image for a recipe page, from the cache when already resolved.
    pub async fn resolve_image(&self, page_url: &str) -> Result<String, ScrapeError> {
        if let Some(image) = self.image_cache.get(page_url) {
            debug!("Image cache hit for {}", page_url);
            return Ok(image);
        }

        let html = self
            .fetcher
            .fetch(page_url)
            .await
            .map_err(|e| ScrapeError::ImageLookupError(format!("{page_url}: {e}")))?;
        let image = JsonLdExtractor
            .find_image(&Html::parse_document(&html))
            .ok_or_else(|| {
                ScrapeError::ImageLookupError(format!("{page_url}: no recipe image declared"))
            })?;
        let image = Url::parse(page_url)
            .and_then(|base| base.join(&image))
            .map(String::from)
            .unwrap_or(image);

        self.image_cache.put(page_url, image.clone());
        Ok(image)
    }

    /// Search the recipe site and resolve an image for every hit.
    pub async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, ScrapeError> {
        let site = &self.config.recipe_site;
        let mut url = Url::parse(&site.base_url)?.join(&site.search_path)?;
        url.query_pairs_mut().append_pair(&site.query_param, query);
        info!("Searching recipes: {}", url);
        self.list_recipes(url.as_str()).await
    }

    /// Recipes from the site's featured page.
    pub async fn featured_recipes(&self) -> Result<Vec<RecipeSummary>, ScrapeError> {
        let site = &self.config.recipe_site;
        let url = Url::parse(&site.base_url)?.join(&site.featured_path)?;
        info!("Fetching featured recipes from {}", url);
        self.list_recipes(url.as_str()).await
    }

    async fn list_recipes(&self, listing_url: &str) -> Result<Vec<RecipeSummary>, ScrapeError> {
        let site = &self.config.recipe_site;
        let html = self.fetcher.fetch(listing_url).await?;
        let links = parse_recipe_links(&html, &site.base_url, site.max_results);

        let recipes = join_all(links.into_iter().map(|link| self.summarize(link))).await;
        info!("Found {} recipes", recipes.len());
        Ok(recipes)
    }

    async fn summarize(&self, link: RecipeLink) -> RecipeSummary {
        let image = match self.resolve_image(&link.url).await {
            Ok(image) => image,
            Err(e) => {
                warn!("Error fetching image for {}: {}", link.title, e);
                self.config.recipe_site.placeholder_image.clone()
            }
        };
        RecipeSummary {
            title: link.title,
            url: link.url,
            image,
        }
    }

    fn retailer_search_url(&self, query: &str) -> Result<String, ScrapeError> {
        let retailer = &self.config.retailer;
        let mut url = Url::parse(&retailer.base_url)?.join(&retailer.search_path)?;
        url.query_pairs_mut().append_pair(&retailer.query_param, query);
        Ok(url.into())
    }

    async fn load_search_page(&self, url: &str) -> Result<String, ScrapeError> {
        match &self.renderer {
            Some(renderer) => renderer.render(url).await,
            None => self.fetcher.fetch(url).await,
        }
    }

    fn placeholder_match(&self, line: &str) -> IngredientMatch {
        let query = SearchTerm::new(line).query();
        IngredientMatch {
            ingredient: line.to_string(),
            product: ProductCandidate {
                name: line.to_string(),
                price: PLACEHOLDER_PRICE,
                image: self.config.retailer.placeholder_image.clone(),
                url: self
                    .retailer_search_url(&query)
                    .unwrap_or_else(|_| self.config.retailer.base_url.clone()),
            },
            placeholder: true,
        }
    }
}
