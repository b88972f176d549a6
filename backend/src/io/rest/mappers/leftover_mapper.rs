use shared::{Leftover as SharedLeftover, LeftoverListResponse, LeftoverResponse};

use crate::domain::models::leftover::Leftover as DomainLeftover;

/// Stored photo paths become public URLs through `photo_url`
pub struct LeftoverMapper;

impl LeftoverMapper {
    pub fn to_dto<F>(domain: DomainLeftover, photo_url: F) -> SharedLeftover
    where
        F: Fn(&str) -> String,
    {
        SharedLeftover {
            id: domain.id,
            ingredient_name: domain.ingredient_name,
            quantity: domain.quantity,
            unit: domain.unit,
            expiry_date: domain.expiry_date.format("%Y-%m-%d").to_string(),
            photos: domain.photos.iter().map(|p| photo_url(p)).collect(),
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_leftover_list_dto<F>(leftovers: Vec<DomainLeftover>, photo_url: F) -> LeftoverListResponse
    where
        F: Fn(&str) -> String,
    {
        LeftoverListResponse {
            leftovers: leftovers
                .into_iter()
                .map(|l| Self::to_dto(l, &photo_url))
                .collect(),
        }
    }

    pub fn to_leftover_response_dto<F>(domain: DomainLeftover, photo_url: F, message: &str) -> LeftoverResponse
    where
        F: Fn(&str) -> String,
    {
        LeftoverResponse {
            leftover: Self::to_dto(domain, photo_url),
            success_message: message.to_string(),
        }
    }
}
