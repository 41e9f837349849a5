use crate::model::RecipeRecord;
use scraper::Html;

mod html_class;
mod json_ld;
pub mod ladder;

pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;

/// Which recipe fields have already been found by an earlier extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldsPresent {
    pub name: bool,
    pub ingredients: bool,
    pub instructions: bool,
}

impl FieldsPresent {
    pub fn of(recipe: &RecipeRecord) -> Self {
        Self {
            name: !recipe.name.is_empty(),
            ingredients: !recipe.ingredients.is_empty(),
            instructions: !recipe.instructions.is_empty(),
        }
    }

    pub fn all(&self) -> bool {
        self.name && self.ingredients && self.instructions
    }
}

pub trait Extractor {
    fn name(&self) -> &'static str;

    /// Extract whatever the document offers. Fields marked present in
    /// `have` may be skipped; the result is always a (possibly empty)
    /// partial record.
    fn extract(&self, document: &Html, have: FieldsPresent) -> RecipeRecord;
}
