use super::ladder::{selector, SelectorLadder};
use super::{Extractor, FieldsPresent};
use crate::model::RecipeRecord;
use crate::text::element_text;
use log::debug;
use scraper::Html;

/// Ingredient markup, most specific convention first
const INGREDIENT_SELECTORS: &[&str] = &[
    "[itemprop='recipeIngredient']",
    ".recipe-ingredient",
    ".ingredient",
    ".recipe-ingredients li",
    ".ingredients li",
    "[class*='ingredient'] li",
];

/// Instruction markup, most specific convention first
const INSTRUCTION_SELECTORS: &[&str] = &[
    "[itemprop='recipeInstructions'] li",
    ".recipe-instructions li",
    ".instructions li",
    ".recipe-steps li",
    "[class*='instruction'] li",
    "[class*='step'] li",
];

/// Falls back to plain markup conventions when structured data is missing
/// or incomplete.
pub struct HtmlClassExtractor {
    ingredients: SelectorLadder,
    instructions: SelectorLadder,
}

impl Default for HtmlClassExtractor {
    fn default() -> Self {
        Self {
            ingredients: SelectorLadder::new(INGREDIENT_SELECTORS),
            instructions: SelectorLadder::new(INSTRUCTION_SELECTORS),
        }
    }
}

impl HtmlClassExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn heading(&self, document: &Html) -> String {
        selector("h1")
            .and_then(|h1| document.select(&h1).next().map(element_text))
            .unwrap_or_default()
    }
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn extract(&self, document: &Html, have: FieldsPresent) -> RecipeRecord {
        debug!("Attempting to extract recipe using HTML class selectors");

        let mut recipe = RecipeRecord::default();
        if !have.name {
            recipe.name = self.heading(document);
        }
        if !have.ingredients {
            recipe.ingredients = self.ingredients.first_match_texts(document);
            debug!("Ingredients count: {}", recipe.ingredients.len());
        }
        if !have.instructions {
            recipe.instructions = self.instructions.first_match_texts(document);
            debug!("Instructions count: {}", recipe.instructions.len());
        }
        recipe
    }
}
