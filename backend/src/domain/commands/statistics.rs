#[derive(Debug, Clone)]
pub struct GetStatisticsCommand {
    pub profile_id: String,
    pub start_date: String,
    pub end_date: String,
}
