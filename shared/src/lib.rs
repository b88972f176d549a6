use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of meal a recipe is meant for, also used as the planning slot of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Unknown meal type: {}", other)),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How demanding a recipe is to prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child's age broken into calendar components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// Child profile as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    pub allergies: Vec<String>,
    pub preferences: Vec<String>,
    /// Age computed at read time
    pub age: Age,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub birth_date: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub preferences: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: ChildProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<ChildProfile>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, alias = "name", alias = "ingredient_name", deserialize_with = "null_as_default")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
}

/// Accepts a number, a numeric string, or anything else (read as 0).
///
/// Generated recipes routinely carry quantities like `"2"` or `"to taste"`.
/// Non-finite values (`"NaN"`, `"inf"`) also read as 0.
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(quantity.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Reads an explicit `null` as the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalInfo {
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub carbs_g: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub fat_g: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub fiber_g: f64,
}

impl NutritionalInfo {
    pub fn add(&mut self, other: &NutritionalInfo) {
        self.calories += other.calories;
        self.protein_g += other.protein_g;
        self.carbs_g += other.carbs_g;
        self.fat_g += other.fat_g;
        self.fiber_g += other.fiber_g;
    }

    pub fn divided_by(&self, divisor: f64) -> NutritionalInfo {
        if divisor <= 0.0 {
            return NutritionalInfo::default();
        }
        NutritionalInfo {
            calories: self.calories / divisor,
            protein_g: self.protein_g / divisor,
            carbs_g: self.carbs_g / divisor,
            fat_g: self.fat_g / divisor,
            fiber_g: self.fiber_g / divisor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub nutritional_info: NutritionalInfo,
    pub meal_type: MealType,
    pub difficulty: Difficulty,
    pub prep_time_minutes: Option<u32>,
    pub health_benefits: Vec<String>,
    pub allergens: Vec<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub image_url: Option<String>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecipesRequest {
    pub child_ids: Vec<String>,
    pub meal_type: MealType,
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_recipe_count")]
    pub count: u8,
    #[serde(default)]
    pub use_leftovers: bool,
    pub notes: Option<String>,
}

fn default_recipe_count() -> u8 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<Recipe>,
    pub skipped_duplicates: usize,
    pub skipped_incompatible: usize,
}

/// Assignment of one recipe to one child on one date/meal-time slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: String,
    pub profile_id: String,
    pub child_id: String,
    pub recipe_id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub meal_time: MealType,
    /// Joined in for display; absent when the recipe was deleted
    pub recipe_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignMealRequest {
    pub child_id: String,
    pub recipe_id: String,
    pub date: String,
    pub meal_time: MealType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanResponse {
    pub meal_plan: MealPlan,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlanDay {
    pub date: String,
    pub meals: Vec<MealPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlanResponse {
    pub week_start: String,
    pub days: Vec<WeekPlanDay>,
}

/// Pantry item tracked for reuse in recipe generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leftover {
    pub id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    /// YYYY-MM-DD
    pub expiry_date: String,
    /// Storage URLs
    pub photos: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLeftoverRequest {
    pub ingredient_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateLeftoverRequest {
    pub ingredient_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftoverResponse {
    pub leftover: Leftover,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftoverListResponse {
    pub leftovers: Vec<Leftover>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzeLeftoversRequest {
    pub leftover_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeLeftoversResponse {
    pub analysis: String,
}

/// On-hand inventory subtracted from the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableIngredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertPantryItemRequest {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryResponse {
    pub items: Vec<AvailableIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub profile_id: String,
    pub items: Vec<ShoppingListItem>,
    /// RFC 3339, absent when no list was generated yet
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateShoppingListRequest {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateShoppingItemRequest {
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildMealCount {
    pub child_id: String,
    pub child_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTimeCount {
    pub meal_time: MealType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeUsage {
    pub recipe_id: String,
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub start_date: String,
    pub end_date: String,
    pub total_meals: usize,
    pub meals_per_child: Vec<ChildMealCount>,
    pub meals_per_meal_time: Vec<MealTimeCount>,
    pub top_recipes: Vec<RecipeUsage>,
    pub nutrition_totals: NutritionalInfo,
    pub daily_average: NutritionalInfo,
    pub leftovers_expiring_soon: usize,
    pub leftovers_expired: usize,
}
