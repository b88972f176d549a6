//! Shopping list aggregation.
//!
//! Needed quantities are summed per lower-cased item name across every planned
//! meal, on-hand quantities are subtracted (floored at zero) and only strictly
//! positive remainders are kept. Units are not converted: lines sharing a name
//! are summed numerically and the first unit seen is reported.

use std::collections::{BTreeMap, HashMap};

use shared::{Ingredient, ShoppingListItem};

use super::models::meal_plan::MealPlan;
use super::models::pantry::AvailableIngredient;
use super::models::recipe::Recipe;

struct Needed {
    quantity: f64,
    unit: String,
}

/// Aggregate a flat list of needed ingredient lines against on-hand inventory
pub fn aggregate_ingredients<'a, I>(needed: I, on_hand: &[AvailableIngredient]) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    let mut totals: BTreeMap<String, Needed> = BTreeMap::new();
    for ingredient in needed {
        let key = ingredient.item.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        totals
            .entry(key)
            .and_modify(|n| n.quantity += ingredient.quantity)
            .or_insert_with(|| Needed {
                quantity: ingredient.quantity,
                unit: ingredient.unit.trim().to_string(),
            });
    }

    let mut available: HashMap<String, f64> = HashMap::new();
    for item in on_hand {
        *available.entry(item.match_key()).or_insert(0.0) += item.quantity;
    }

    totals
        .into_iter()
        .filter_map(|(item, needed)| {
            let have = available.get(&item).copied().unwrap_or(0.0);
            let remaining = (needed.quantity - have).max(0.0);
            (remaining > 0.0).then(|| ShoppingListItem {
                item,
                quantity: remaining,
                unit: needed.unit,
                checked: false,
            })
        })
        .collect()
}

/// Aggregate the ingredients of every planned meal.
/// Plans pointing at recipes that no longer exist contribute nothing.
pub fn aggregate_meal_plans(
    plans: &[MealPlan],
    recipes: &HashMap<String, Recipe>,
    on_hand: &[AvailableIngredient],
) -> Vec<ShoppingListItem> {
    let needed = plans
        .iter()
        .filter_map(|plan| recipes.get(&plan.recipe_id))
        .flat_map(|recipe| recipe.ingredients.iter());
    aggregate_ingredients(needed, on_hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use shared::{Difficulty, MealType, NutritionalInfo};

    fn ingredient(item: &str, quantity: f64, unit: &str) -> Ingredient {
        Ingredient {
            item: item.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    fn pantry(name: &str, quantity: f64, unit: &str) -> AvailableIngredient {
        AvailableIngredient {
            id: AvailableIngredient::generate_id(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_subtracts_on_hand() {
        let needed = vec![ingredient("tomato", 3.0, "pcs")];
        let items = aggregate_ingredients(&needed, &[pantry("tomato", 2.0, "pcs")]);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item, "tomato");
        assert_eq!(items[0].quantity, 1.0);
        assert_eq!(items[0].unit, "pcs");
        assert!(!items[0].checked);
    }

    #[test]
    fn test_omits_items_fully_on_hand() {
        let needed = vec![ingredient("tomato", 3.0, "pcs")];
        assert!(aggregate_ingredients(&needed, &[pantry("tomato", 3.0, "pcs")]).is_empty());
        assert!(aggregate_ingredients(&needed, &[pantry("Tomato", 5.0, "pcs")]).is_empty());
    }

    #[test]
    fn test_groups_case_insensitively_and_ignores_units() {
        let needed = vec![
            ingredient("Milk", 2.0, "cups"),
            ingredient(" milk ", 500.0, "ml"),
            ingredient("eggs", 2.0, ""),
        ];
        let items = aggregate_ingredients(&needed, &[]);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item, "eggs");
        assert_eq!(items[1].item, "milk");
        assert_eq!(items[1].quantity, 502.0);
        assert_eq!(items[1].unit, "cups");
    }

    #[test]
    fn test_zero_quantity_lines_are_dropped() {
        let needed = vec![ingredient("salt", 0.0, "pinch"), ingredient("", 2.0, "pcs")];
        assert!(aggregate_ingredients(&needed, &[]).is_empty());
    }

    #[test]
    fn test_aggregate_meal_plans_skips_missing_recipes() {
        let recipe = Recipe {
            id: "recipe_a".to_string(),
            title: "Tomato Soup".to_string(),
            description: String::new(),
            ingredients: vec![ingredient("tomato", 3.0, "pcs"), ingredient("onion", 1.0, "pcs")],
            instructions: Vec::new(),
            nutritional_info: NutritionalInfo::default(),
            meal_type: MealType::Lunch,
            difficulty: Difficulty::Easy,
            prep_time_minutes: Some(20),
            health_benefits: Vec::new(),
            allergens: Vec::new(),
            min_age: None,
            max_age: None,
            image_url: None,
            created_at: Utc::now(),
        };
        let recipes: HashMap<String, Recipe> = [(recipe.id.clone(), recipe)].into_iter().collect();

        let plan = |recipe_id: &str, child_id: &str| MealPlan {
            id: MealPlan::generate_id(),
            profile_id: "family".to_string(),
            child_id: child_id.to_string(),
            recipe_id: recipe_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            meal_time: MealType::Lunch,
        };
        let plans = vec![plan("recipe_a", "child_1"), plan("recipe_a", "child_2"), plan("gone", "child_1")];

        let items = aggregate_meal_plans(&plans, &recipes, &[pantry("onion", 1.0, "pcs")]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item, "onion");
        assert_eq!(items[0].quantity, 1.0);
        assert_eq!(items[1].item, "tomato");
        assert_eq!(items[1].quantity, 6.0);
    }
}
