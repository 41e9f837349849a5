use crate::error::ScrapeError;
use crate::extractors::{Extractor, FieldsPresent, HtmlClassExtractor, JsonLdExtractor};
use crate::model::RecipeRecord;
use crate::text::{clean_ingredients, clean_instructions};
use log::debug;
use scraper::Html;

/// Build a cleaned recipe from a parsed page.
///
/// Structured data is read first; markup selectors fill whatever it left
/// empty. Markup never supplies an image, so a page without structured
/// data yields a record with `image: None`.
///
/// Fails with [`ScrapeError::ExtractionError`] when no ingredient survives
/// cleaning.
pub fn assemble(document: &Html) -> Result<RecipeRecord, ScrapeError> {
    let extractors: Vec<Box<dyn Extractor>> = vec![
        Box::new(JsonLdExtractor),
        Box::new(HtmlClassExtractor::new()),
    ];

    let mut recipe = RecipeRecord::default();
    for extractor in extractors {
        let have = FieldsPresent::of(&recipe);
        if have.all() {
            break;
        }
        debug!("Running {} extractor, have {:?}", extractor.name(), have);
        recipe.merge_missing(extractor.extract(document, have));
    }

    recipe.ingredients = clean_ingredients(recipe.ingredients);
    recipe.instructions = clean_instructions(recipe.instructions);

    if recipe.ingredients.is_empty() {
        return Err(ScrapeError::ExtractionError(
            "no ingredient list found".to_string(),
        ));
    }
    Ok(recipe)
}
