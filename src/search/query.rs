//! Ingredient line to retailer search query.

use regex::Regex;
use std::sync::LazyLock;

/// Query used when every word of a line is filtered out.
pub const FALLBACK_QUERY: &str = "ingredient";

/// Units, quantity words and descriptors that never help a product search.
const STOPWORDS: &[&str] = &[
    // volume
    "cup", "cups", "tablespoon", "tablespoons", "tbsp", "tbs", "teaspoon", "teaspoons", "tsp",
    "pint", "pints", "quart", "quarts", "gallon", "gallons", "liter", "liters", "litre",
    "litres", "milliliter", "milliliters", "ml", "pinch", "pinches", "dash", "dashes",
    // weight
    "pound", "pounds", "lb", "lbs", "ounce", "ounces", "oz", "gram", "grams", "g", "kg",
    "kilogram", "kilograms",
    // count
    "piece", "pieces", "clove", "cloves", "can", "cans", "package", "packages", "pkg",
    "bunch", "bunches", "slice", "slices", "stick", "sticks", "sprig", "sprigs", "handful",
    // function words
    "of", "to", "for", "and", "the", "into", "plus", "about", "each", "more", "taste",
    // descriptors
    "topping", "optional", "fresh", "freshly", "chopped", "minced", "diced", "sliced",
    "grated", "shredded", "crushed", "peeled", "divided", "softened", "melted", "finely",
    "roughly", "thinly", "coarsely", "large", "small", "medium", "packed", "heaping",
    "level", "room", "temperature", "cut", "inch", "inches",
];

static LEADING_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\d½¼¾⅓⅔⅛./\-\s]+").expect("Invalid leading quantity regex")
});
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*/\s*\d+").expect("Invalid fraction regex"));
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("Invalid parenthetical regex"));
static ASTERISKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+").expect("Invalid asterisk regex"));
static CLOSING_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[)\]}]").expect("Invalid bracket regex"));
static AFTER_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s),.*$").expect("Invalid comma regex"));

/// The significant words of one ingredient line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub raw: String,
    pub words: Vec<String>,
}

impl SearchTerm {
    pub fn new(line: &str) -> Self {
        Self {
            raw: line.to_string(),
            words: significant_words(line),
        }
    }

    /// The words joined into a query, or [`FALLBACK_QUERY`] when none
    /// survived.
    pub fn query(&self) -> String {
        if self.words.is_empty() {
            FALLBACK_QUERY.to_string()
        } else {
            self.words.join(" ")
        }
    }

    /// True if `name` contains at least one significant word.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.words
            .iter()
            .filter(|word| word.chars().count() > 2)
            .any(|word| name.contains(word.as_str()))
    }
}

/// Apply the line-level removals in order. Each step assumes the earlier
/// ones already ran.
fn strip_noise(line: &str) -> String {
    let line = line.to_lowercase();
    let line = LEADING_QUANTITY.replace(&line, "");
    let line = FRACTION.replace_all(&line, "");
    let line = PARENTHETICAL.replace_all(&line, "");
    let line = ASTERISKS.replace_all(&line, "");
    let line = CLOSING_BRACKETS.replace_all(&line, "");
    AFTER_COMMA.replace(&line, "").into_owned()
}

fn is_significant(word: &str) -> bool {
    let letters: String = word.chars().filter(char::is_ascii_lowercase).collect();
    letters.chars().count() > 2
        && !word.chars().all(|c| c.is_ascii_digit())
        && !STOPWORDS.contains(&letters.as_str())
}

fn significant_words(line: &str) -> Vec<String> {
    strip_noise(line)
        .split_whitespace()
        .filter(|word| is_significant(word))
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic())
                .to_string()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Turn an ingredient line into a retailer search query. Never empty.
pub fn build_query(line: &str) -> String {
    SearchTerm::new(line).query()
}
