use serde::Serialize;

/// A recipe pulled out of a web page.
///
/// All fields can be empty while extraction is still in progress; a record
/// returned by the assembler always has at least one ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub name: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl RecipeRecord {
    /// Fill every empty field of `self` from `other`.
    pub fn merge_missing(&mut self, other: RecipeRecord) {
        if self.name.is_empty() {
            self.name = other.name;
        }
        if self.image.is_none() {
            self.image = other.image;
        }
        if self.ingredients.is_empty() {
            self.ingredients = other.ingredients;
        }
        if self.instructions.is_empty() {
            self.instructions = other.instructions;
        }
    }
}

/// A single grocery product picked from a retailer listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCandidate {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub url: String,
}

/// One hit from a recipe site search or featured listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub title: String,
    pub url: String,
    pub image: String,
}

/// Product chosen for one ingredient line of a batch search.
///
/// `placeholder` is set when the search failed or nothing matched and the
/// product was generated from the ingredient line itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub ingredient: String,
    pub product: ProductCandidate,
    pub placeholder: bool,
}
