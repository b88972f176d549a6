//! Prompt text sent to the AI functions.

use chrono::NaiveDate;
use shared::{Difficulty, MealType};
use std::fmt::Write;

use crate::domain::age::calculate_age;
use crate::domain::models::child::Child;
use crate::domain::models::leftover::Leftover;
use crate::domain::models::recipe::Recipe;

pub struct RecipePromptInput<'a> {
    pub children: &'a [Child],
    pub meal_type: MealType,
    pub difficulty: Option<Difficulty>,
    pub count: u8,
    pub leftovers: &'a [Leftover],
    pub notes: Option<&'a str>,
    pub today: NaiveDate,
}

pub fn recipe_prompt(input: &RecipePromptInput<'_>) -> String {
    let mut prompt = format!(
        "Create {} {} recipe(s) suitable for all of these children:\n",
        input.count, input.meal_type
    );

    for child in input.children {
        let age = calculate_age(child.birth_date, input.today)
            .map(|age| format!("{} years {} months", age.years, age.months))
            .unwrap_or_else(|_| "unknown age".to_string());
        let _ = writeln!(
            prompt,
            "- {}, {}; allergies: {}; likes: {}",
            child.name,
            age,
            list_or_none(&child.allergies),
            list_or_none(&child.preferences),
        );
    }

    prompt.push_str("Never use an ingredient any child is allergic to. ");
    prompt.push_str("List every allergen a recipe contains in its allergens field, ");
    prompt.push_str("and set min_age/max_age in whole years when a recipe is unsuitable for some ages.\n");

    if let Some(difficulty) = input.difficulty {
        let _ = writeln!(prompt, "Difficulty: {}.", difficulty);
    }

    if !input.leftovers.is_empty() {
        prompt.push_str("Prefer using these leftovers:\n");
        for leftover in input.leftovers {
            let _ = writeln!(prompt, "- {}", describe_leftover(leftover));
        }
    }

    if let Some(notes) = input.notes.map(str::trim).filter(|n| !n.is_empty()) {
        let _ = writeln!(prompt, "Additional notes: {}", notes);
    }

    prompt
}

pub fn leftover_analysis_prompt(leftovers: &[Leftover], today: NaiveDate) -> String {
    let mut prompt = format!(
        "Today is {}. These leftovers are in the kitchen:\n",
        today.format("%Y-%m-%d")
    );
    for leftover in leftovers {
        let _ = writeln!(prompt, "- {}", describe_leftover(leftover));
    }
    prompt.push_str(
        "Suggest meals for young children that use them up, starting with whatever expires first.",
    );
    prompt
}

pub fn recipe_image_prompt(recipe: &Recipe) -> String {
    format!(
        "A bright, appetizing photo of {} served for children. {}",
        recipe.title, recipe.description
    )
    .trim()
    .to_string()
}

fn describe_leftover(leftover: &Leftover) -> String {
    let quantity = if leftover.unit.is_empty() {
        format!("{}", leftover.quantity)
    } else {
        format!("{} {}", leftover.quantity, leftover.unit)
    };
    format!(
        "{}: {} (expires {})",
        leftover.ingredient_name,
        quantity,
        leftover.expiry_date.format("%Y-%m-%d")
    )
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::sample_child;
    use chrono::Utc;

    #[test]
    fn test_recipe_prompt_mentions_children_and_leftovers() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let children = vec![sample_child("Alice", NaiveDate::from_ymd_opt(2020, 1, 20).unwrap(), &["peanuts"])];
        let leftovers = vec![Leftover {
            id: Leftover::generate_id(),
            ingredient_name: "rice".to_string(),
            quantity: 2.0,
            unit: "cups".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            photos: Vec::new(),
            created_at: Utc::now(),
        }];

        let prompt = recipe_prompt(&RecipePromptInput {
            children: &children,
            meal_type: MealType::Dinner,
            difficulty: Some(Difficulty::Easy),
            count: 2,
            leftovers: &leftovers,
            notes: Some("  no mushrooms "),
            today,
        });

        assert!(prompt.starts_with("Create 2 dinner recipe(s)"));
        assert!(prompt.contains("Alice, 5 years 1 months; allergies: peanuts; likes: none"));
        assert!(prompt.contains("rice: 2 cups (expires 2025-03-12)"));
        assert!(prompt.contains("Difficulty: easy."));
        assert!(prompt.contains("Additional notes: no mushrooms"));
    }
}
