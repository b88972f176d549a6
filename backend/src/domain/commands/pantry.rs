#[derive(Debug, Clone)]
pub struct UpsertPantryItemCommand {
    pub profile_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}
