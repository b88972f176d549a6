//! Recipe compatibility filter.
//!
//! A recipe is compatible with a selection of children when, for every child,
//! none of the child's allergies appear in the recipe's allergen list and the
//! child's age (current year minus birth year) lies within the recipe's
//! `[min_age, max_age]` bounds, each bound applying only when present.
//! Allergen matching is exact string membership.

use chrono::NaiveDate;

use super::age::age_in_calendar_years;
use super::models::child::Child;
use super::models::recipe::Recipe;

pub fn is_compatible_with_child(recipe: &Recipe, child: &Child, today: NaiveDate) -> bool {
    if child
        .allergies
        .iter()
        .any(|allergy| recipe.allergens.contains(allergy))
    {
        return false;
    }

    let age = age_in_calendar_years(child.birth_date, today);
    if let Some(min_age) = recipe.min_age {
        if age < min_age as i32 {
            return false;
        }
    }
    if let Some(max_age) = recipe.max_age {
        if age > max_age as i32 {
            return false;
        }
    }
    true
}

/// True when the recipe suits every selected child (vacuously true for none)
pub fn is_compatible(recipe: &Recipe, children: &[Child], today: NaiveDate) -> bool {
    children
        .iter()
        .all(|child| is_compatible_with_child(recipe, child, today))
}

/// Keep only the recipes compatible with all selected children
pub fn filter_compatible(recipes: Vec<Recipe>, children: &[Child], today: NaiveDate) -> Vec<Recipe> {
    recipes
        .into_iter()
        .filter(|recipe| is_compatible(recipe, children, today))
        .collect()
}
