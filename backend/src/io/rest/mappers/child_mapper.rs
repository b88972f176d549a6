use chrono::NaiveDate;
use shared::{Age, ChildListResponse, ChildProfile, ChildResponse};

use crate::domain::age::calculate_age;
use crate::domain::models::child::Child as DomainChild;

/// Mapper from domain children to the shared child DTOs.
/// The age is computed at mapping time; it is never stored.
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(domain: DomainChild, today: NaiveDate) -> ChildProfile {
        let age = calculate_age(domain.birth_date, today).unwrap_or(Age {
            years: 0,
            months: 0,
            days: 0,
        });
        ChildProfile {
            id: domain.id,
            name: domain.name,
            birth_date: domain.birth_date.format("%Y-%m-%d").to_string(),
            allergies: domain.allergies,
            preferences: domain.preferences,
            age,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_child_list_dto(domain_children: Vec<DomainChild>, today: NaiveDate) -> ChildListResponse {
        ChildListResponse {
            children: domain_children
                .into_iter()
                .map(|c| Self::to_dto(c, today))
                .collect(),
        }
    }

    pub fn to_child_response_dto(domain: DomainChild, today: NaiveDate, message: &str) -> ChildResponse {
        ChildResponse {
            child: Self::to_dto(domain, today),
            success_message: message.to_string(),
        }
    }
}
