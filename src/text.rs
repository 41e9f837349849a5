//! Cleanup of free-text ingredient and instruction lines.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Ingredient lists are cut down to this many entries after cleaning.
pub const MAX_INGREDIENTS: usize = 12;

const MIN_INGREDIENT_LEN: usize = 2;
const MIN_INSTRUCTION_LEN: usize = 5;

/// Leading quantities, list bullets and step numbers
static LEADING_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-•]+").expect("Invalid leading noise regex"));

fn strip_leading_noise(line: &str) -> String {
    LEADING_NOISE.replace(line.trim(), "").trim().to_string()
}

/// Strip the leading run of digits, whitespace, hyphens and bullets.
pub fn clean_ingredient(line: &str) -> String {
    strip_leading_noise(line)
}

/// Strip step numbering and bullets from an instruction line.
pub fn clean_instruction(line: &str) -> String {
    strip_leading_noise(line)
}

fn clean_lines<F>(lines: Vec<String>, min_len: usize, clean: F) -> impl Iterator<Item = String>
where
    F: Fn(&str) -> String,
{
    lines
        .into_iter()
        .filter(move |line| line.trim().chars().count() > min_len)
        .map(move |line| clean(&line))
        // a line made only of noise must not survive as a short fragment
        .filter(move |line| line.chars().count() > min_len)
}

/// Clean an ingredient list and cap it at [`MAX_INGREDIENTS`] entries.
pub fn clean_ingredients(lines: Vec<String>) -> Vec<String> {
    clean_lines(lines, MIN_INGREDIENT_LEN, clean_ingredient)
        .take(MAX_INGREDIENTS)
        .collect()
}

/// Clean an instruction list. No cap is applied.
pub fn clean_instructions(lines: Vec<String>) -> Vec<String> {
    clean_lines(lines, MIN_INSTRUCTION_LEN, clean_instruction).collect()
}

/// Text content of an element with runs of whitespace collapsed.
pub fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
