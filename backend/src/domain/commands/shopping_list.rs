#[derive(Debug, Clone)]
pub struct GenerateShoppingListCommand {
    pub profile_id: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone)]
pub struct SetItemCheckedCommand {
    pub profile_id: String,
    pub index: usize,
    pub checked: bool,
}
