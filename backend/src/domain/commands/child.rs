use crate::domain::models::child::Child;

#[derive(Debug, Clone)]
pub struct CreateChildCommand {
    pub profile_id: String,
    pub name: String,
    pub birth_date: String,
    pub allergies: Vec<String>,
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateChildResult {
    pub child: Child,
}

#[derive(Debug, Clone)]
pub struct GetChildCommand {
    pub profile_id: String,
    pub child_id: String,
}

#[derive(Debug, Clone)]
pub struct GetChildResult {
    pub child: Child,
}

#[derive(Debug, Clone)]
pub struct ListChildrenResult {
    pub children: Vec<Child>,
}

/// Fields left as `None` keep their stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateChildCommand {
    pub profile_id: String,
    pub child_id: String,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub preferences: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct UpdateChildResult {
    pub child: Child,
}

#[derive(Debug, Clone)]
pub struct DeleteChildCommand {
    pub profile_id: String,
    pub child_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteChildResult {
    pub success_message: String,
    pub removed_meal_plans: u32,
}
