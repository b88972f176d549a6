use crate::domain::models::leftover::Leftover;

#[derive(Debug, Clone)]
pub struct CreateLeftoverCommand {
    pub profile_id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLeftoverCommand {
    pub profile_id: String,
    pub leftover_id: String,
    pub ingredient_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeftoverResult {
    pub leftover: Leftover,
}

#[derive(Debug, Clone)]
pub struct AddPhotoCommand {
    pub profile_id: String,
    pub leftover_id: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AnalyzeLeftoversCommand {
    pub profile_id: String,
    /// `None` analyzes every leftover of the profile
    pub leftover_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct AnalyzeLeftoversResult {
    pub analysis: String,
}
