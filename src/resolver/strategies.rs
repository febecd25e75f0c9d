//! Match strategies

use crate::catalog::{Recipe, RecipeKey};

use super::RecipeMatch;

/// A recipe of the kind being resolved.
pub type Candidate<'c> = (RecipeKey, &'c Recipe);

/// Picks a candidate for normalized free text, or declines.
pub type MatchStrategy = for<'c> fn(&str, &[Candidate<'c>]) -> Option<Candidate<'c>>;

/// Strategies in the order they are tried.
pub static STRATEGIES: [(RecipeMatch, MatchStrategy); 3] = [
    (RecipeMatch::Substring, substring),
    (RecipeMatch::FirstWord, first_word),
    (RecipeMatch::FirstOfKind, first_of_kind),
];

/// Words describing the component rather than the flavor.
const SUFFIX_WORDS: [&str; 4] = ["batter", "filling", "frosting", "buttercream"];

/// Lowercases a name and drops component words, e.g. "Vanilla Buttercream" becomes "vanilla".
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .filter(|word| !SUFFIX_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn substring<'c>(text: &str, candidates: &[Candidate<'c>]) -> Option<Candidate<'c>> {
    if text.is_empty() {
        return None;
    }

    candidates.iter().copied().find(|(_, recipe)| {
        let name = normalize_name(&recipe.name);

        !name.is_empty() && (name.contains(text) || text.contains(name.as_str()))
    })
}

fn first_word<'c>(text: &str, candidates: &[Candidate<'c>]) -> Option<Candidate<'c>> {
    let wanted = text.split_whitespace().next()?;

    candidates.iter().copied().find(|(_, recipe)| {
        normalize_name(&recipe.name).split_whitespace().next() == Some(wanted)
    })
}

fn first_of_kind<'c>(_text: &str, candidates: &[Candidate<'c>]) -> Option<Candidate<'c>> {
    candidates.first().copied()
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use crate::catalog::RecipeKind;

    use super::*;

    #[test]
    fn normalize_strips_component_words() {
        assert_eq!(normalize_name("Vanilla Buttercream"), "vanilla");
        assert_eq!(normalize_name("  Lemon   Curd FILLING "), "lemon curd");
        assert_eq!(normalize_name("Batter"), "");
    }

    #[test]
    fn empty_text_only_matches_first_of_kind() {
        let mut recipes: SlotMap<RecipeKey, Recipe> = SlotMap::with_key();
        let key = recipes.insert(Recipe::new("Vanilla Batter", RecipeKind::Batter));
        let candidates: Vec<Candidate<'_>> = recipes.iter().collect();

        assert!(substring("", &candidates).is_none());
        assert!(first_word("", &candidates).is_none());
        assert_eq!(first_of_kind("", &candidates).map(|(k, _)| k), Some(key));
    }

    #[test]
    fn recipe_named_only_by_component_word_never_substring_matches() {
        let mut recipes: SlotMap<RecipeKey, Recipe> = SlotMap::with_key();
        recipes.insert(Recipe::new("Buttercream", RecipeKind::Frosting));
        let candidates: Vec<Candidate<'_>> = recipes.iter().collect();

        assert!(substring("chocolate", &candidates).is_none());
    }
}
