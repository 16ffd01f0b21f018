//! Request DTOs for catalog endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{OptionInput, PetType, ServiceKind, SizeKey, WeightRange};

/// Request to create a service
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub provider_id: Uuid,
    pub kind: ServiceKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

/// Request to update a service
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub kind: ServiceKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

/// Request to add a pricing option to a service
#[derive(Debug, Deserialize)]
pub struct AddOptionRequest {
    pub pet_type: PetType,
    pub size_key: SizeKey,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub weight_min: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub weight_max: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl AddOptionRequest {
    /// Shape-check the request into a rules-level candidate
    pub fn into_input(self) -> Result<OptionInput, AppError> {
        let weight_range = match (self.weight_min, self.weight_max) {
            (Some(min), Some(max)) => Some(WeightRange::new(min, max)),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "weight_min and weight_max must be provided together".to_string(),
                ))
            }
        };
        Ok(OptionInput {
            pet_type: self.pet_type,
            size_key: self.size_key,
            weight_range,
            price: self.price,
        })
    }
}

/// Query parameters for price resolution
#[derive(Debug, Deserialize)]
pub struct ResolvePriceQuery {
    pub pet_type: PetType,
    pub size_key: SizeKey,
}

/// Query parameters for the size-hinting endpoint
#[derive(Debug, Deserialize)]
pub struct SizeHintQuery {
    pub pet_type: PetType,
}

/// One service inside a catalog submission
#[derive(Debug, Deserialize)]
pub struct SubmitServiceRequest {
    pub kind: ServiceKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    pub options: Vec<AddOptionRequest>,
}

/// Request to submit a provider's assembled catalog in one shot
#[derive(Debug, Deserialize)]
pub struct SubmitCatalogRequest {
    pub provider_id: Uuid,
    pub services: Vec<SubmitServiceRequest>,
}
