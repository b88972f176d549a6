use shared::{AvailableIngredient as SharedIngredient, PantryResponse, ShoppingList as SharedShoppingList};

use crate::domain::models::pantry::AvailableIngredient as DomainIngredient;
use crate::domain::models::shopping_list::ShoppingList as DomainShoppingList;

/// Mapper for the shopping list and the pantry it is derived against
pub struct ShoppingMapper;

impl ShoppingMapper {
    pub fn to_shopping_list_dto(domain: DomainShoppingList) -> SharedShoppingList {
        SharedShoppingList {
            profile_id: domain.profile_id,
            items: domain.items,
            updated_at: domain.updated_at.map(|t| t.to_rfc3339()),
        }
    }

    pub fn to_pantry_item_dto(domain: DomainIngredient) -> SharedIngredient {
        SharedIngredient {
            id: domain.id,
            name: domain.name,
            quantity: domain.quantity,
            unit: domain.unit,
        }
    }

    pub fn to_pantry_dto(items: Vec<DomainIngredient>) -> PantryResponse {
        PantryResponse {
            items: items.into_iter().map(Self::to_pantry_item_dto).collect(),
        }
    }
}
