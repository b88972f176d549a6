use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::MealType;
use uuid::Uuid;

/// One recipe assigned to one child in one date/meal-time slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: String,
    pub profile_id: String,
    pub child_id: String,
    pub recipe_id: String,
    pub date: NaiveDate,
    pub meal_time: MealType,
}

impl MealPlan {
    pub fn generate_id() -> String {
        format!("plan_{}", Uuid::new_v4().simple())
    }

    /// True when both plans occupy the same (profile, date, meal time, child) slot
    pub fn same_slot(&self, other: &MealPlan) -> bool {
        self.profile_id == other.profile_id
            && self.date == other.date
            && self.meal_time == other.meal_time
            && self.child_id == other.child_id
    }
}
