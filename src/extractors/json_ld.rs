use super::ladder::selector;
use super::{Extractor, FieldsPresent};
use crate::error::ScrapeError;
use crate::model::RecipeRecord;
use html_escape::decode_html_entities;
use log::debug;
use regex::Regex;
use scraper::Html;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::convert::TryFrom;
use std::sync::LazyLock;

const JSON_LD_SELECTOR: &str = "script[type='application/ld+json']";

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("Invalid trailing comma regex"));

/// Reads schema.org Recipe records out of embedded JSON-LD blocks.
pub struct JsonLdExtractor;

#[derive(Debug, Deserialize)]
struct StructuredRecord {
    #[serde(rename = "@type", default)]
    type_tag: Option<TypeTag>,
    #[serde(default)]
    name: Option<TextField>,
    #[serde(default)]
    image: Option<ImageField>,
    #[serde(rename = "recipeIngredient", default)]
    recipe_ingredient: Option<IngredientField>,
    #[serde(rename = "recipeInstructions", default)]
    recipe_instructions: Option<InstructionField>,
    #[serde(rename = "@graph", default)]
    graph: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeTag {
    One(String),
    Many(Vec<Value>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextField {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageField {
    Url(String),
    List(Vec<ImageField>),
    Object(ImageObject),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientLine {
    Text(String),
    Object(IngredientObject),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientField {
    Lines(Vec<IngredientLine>),
    Single(String),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct StepObject {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepEntry {
    Text(String),
    // covers {"text": ...} as well as {"@type": "HowToStep", "text": ...}
    Step(StepObject),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionField {
    Text(String),
    Steps(Vec<StepEntry>),
    Other(IgnoredAny),
}

impl TryFrom<&Value> for StructuredRecord {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl TypeTag {
    fn is_recipe(&self) -> bool {
        let matches = |tag: &str| tag.eq_ignore_ascii_case("recipe");
        match self {
            TypeTag::One(tag) => matches(tag),
            TypeTag::Many(tags) => tags.iter().filter_map(Value::as_str).any(matches),
            TypeTag::Other(_) => false,
        }
    }
}

impl TextField {
    fn into_text(self) -> Option<String> {
        match self {
            TextField::Text(text) => non_empty(decode_html_symbols(&text)),
            TextField::Other(_) => None,
        }
    }
}

impl ImageField {
    /// A list yields its first element, a string is used as is and an
    /// object yields its `url`.
    fn into_url(self) -> Option<String> {
        match self {
            ImageField::Url(url) => non_empty(decode_html_symbols(&url)),
            ImageField::List(images) => images.into_iter().next().and_then(ImageField::into_url),
            ImageField::Object(image) => image
                .url
                .and_then(|url| non_empty(decode_html_symbols(&url))),
            ImageField::Other(_) => None,
        }
    }
}

impl IngredientLine {
    fn into_text(self) -> Option<String> {
        match self {
            IngredientLine::Text(line) => non_empty(decode_html_symbols(&line)),
            IngredientLine::Object(ingredient) => {
                let amount = ingredient.amount.as_deref().unwrap_or("").trim();
                let name = decode_html_symbols(&ingredient.name);
                if amount.is_empty() {
                    non_empty(name)
                } else {
                    non_empty(format!("{amount} {name}"))
                }
            }
            IngredientLine::Other(_) => None,
        }
    }
}

impl IngredientField {
    fn into_lines(self) -> Vec<String> {
        match self {
            IngredientField::Lines(lines) => lines
                .into_iter()
                .filter_map(IngredientLine::into_text)
                .collect(),
            IngredientField::Single(line) => non_empty(decode_html_symbols(&line))
                .into_iter()
                .collect(),
            IngredientField::Other(_) => Vec::new(),
        }
    }
}

impl StepEntry {
    fn into_text(self) -> Option<String> {
        match self {
            StepEntry::Text(text) => non_empty(decode_html_symbols(&text)),
            StepEntry::Step(step) => step.text.and_then(|text| non_empty(decode_html_symbols(&text))),
            StepEntry::Other(_) => None,
        }
    }
}

impl InstructionField {
    fn into_steps(self) -> Vec<String> {
        match self {
            InstructionField::Text(text) => non_empty(decode_html_symbols(&text))
                .into_iter()
                .collect(),
            InstructionField::Steps(steps) => {
                steps.into_iter().filter_map(StepEntry::into_text).collect()
            }
            InstructionField::Other(_) => Vec::new(),
        }
    }
}

impl StructuredRecord {
    fn is_recipe(&self) -> bool {
        self.type_tag.as_ref().is_some_and(TypeTag::is_recipe)
    }

    /// First Recipe-tagged record inside an `@graph` container.
    fn graph_recipe(&self) -> Option<StructuredRecord> {
        let graph = self.graph.as_ref()?.as_array()?;
        graph.iter().find_map(|item| match StructuredRecord::try_from(item) {
            Ok(record) if record.is_recipe() => Some(record),
            Ok(_) => None,
            Err(e) => {
                debug!("JsonLdExtractor: skipping @graph entry: {}", e);
                None
            }
        })
    }

    /// Copy every field this record carries into `recipe`.
    fn capture_into(self, recipe: &mut RecipeRecord) {
        if let Some(name) = self.name.and_then(TextField::into_text) {
            recipe.name = name;
        }
        if let Some(image) = self.image.and_then(ImageField::into_url) {
            recipe.image = Some(image);
        }
        if let Some(ingredients) = self.recipe_ingredient {
            recipe.ingredients = ingredients.into_lines();
        }
        if let Some(instructions) = self.recipe_instructions {
            recipe.instructions = instructions.into_steps();
        }
    }
}

fn sanitize_json(json_str: &str) -> String {
    let cleaned = json_str
        .trim()
        .replace("<!--", "")
        .replace("-->", "");
    TRAILING_COMMA.replace_all(&cleaned, "$1").into_owned()
}

/// Parse one script block into its list of top-level records.
fn parse_block(raw: &str) -> Result<Vec<Value>, ScrapeError> {
    let value: Value = serde_json::from_str(&sanitize_json(raw))
        .map_err(|e| ScrapeError::ParseError(e.to_string()))?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

impl JsonLdExtractor {
    /// Recipe-tagged records in document order.
    ///
    /// A record yields itself when tagged Recipe, then the first Recipe in
    /// its `@graph` if it has one. Malformed blocks are skipped.
    fn recipe_records(&self, document: &Html) -> Vec<StructuredRecord> {
        let Some(selector) = selector(JSON_LD_SELECTOR) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for (index, script) in document.select(&selector).enumerate() {
            let items = match parse_block(&script.inner_html()) {
                Ok(items) => items,
                Err(e) => {
                    debug!("JsonLdExtractor: skipping block {}: {}", index, e);
                    continue;
                }
            };

            for item in &items {
                let record = match StructuredRecord::try_from(item) {
                    Ok(record) => record,
                    Err(e) => {
                        debug!("JsonLdExtractor: skipping record in block {}: {}", index, e);
                        continue;
                    }
                };
                let graph_recipe = record.graph_recipe();
                if record.is_recipe() {
                    found.push(record);
                }
                if let Some(recipe) = graph_recipe {
                    debug!("JsonLdExtractor: found Recipe in @graph of block {}", index);
                    found.push(recipe);
                }
            }
        }
        found
    }

    /// Image of the first Recipe record that declares one.
    pub fn find_image(&self, document: &Html) -> Option<String> {
        self.recipe_records(document)
            .into_iter()
            .find_map(|record| record.image.and_then(ImageField::into_url))
    }
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    /// Later Recipe records overwrite the fields they carry; scanning stops
    /// at the first record that leaves a non-empty ingredient list.
    fn extract(&self, document: &Html, _have: FieldsPresent) -> RecipeRecord {
        let mut recipe = RecipeRecord::default();
        for record in self.recipe_records(document) {
            record.capture_into(&mut recipe);
            if !recipe.ingredients.is_empty() {
                break;
            }
        }
        debug!(
            "JsonLdExtractor: name {:?}, {} ingredients, {} instructions",
            recipe.name,
            recipe.ingredients.len(),
            recipe.instructions.len()
        );
        recipe
    }
}
