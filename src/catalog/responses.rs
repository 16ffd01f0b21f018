//! Response DTOs for catalog endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::models::{PetType, PricingOption, Service, ServiceKind, SizeKey};
use super::services::CatalogEntry;

/// Service for JSON responses
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub kind: ServiceKind,
    pub name: String,
    pub description: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            provider_id: service.provider_id,
            kind: service.kind,
            name: service.name,
            description: service.description,
            notes: service.notes,
            created_at: service.created_at,
        }
    }
}

/// Pricing option for JSON responses
#[derive(Debug, Serialize)]
pub struct PricingOptionResponse {
    pub id: Uuid,
    pub service_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub weight_min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub weight_max: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl From<PricingOption> for PricingOptionResponse {
    fn from(option: PricingOption) -> Self {
        Self {
            id: option.id,
            service_id: option.service_id,
            pet_type: option.pet_type,
            size_key: option.size_key,
            weight_min: option.weight_range.map(|r| r.min),
            weight_max: option.weight_range.map(|r| r.max),
            price: option.price,
        }
    }
}

/// A service with its options
#[derive(Debug, Serialize)]
pub struct CatalogEntryResponse {
    pub service: ServiceResponse,
    pub options: Vec<PricingOptionResponse>,
}

impl From<CatalogEntry> for CatalogEntryResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            service: entry.service.into(),
            options: entry.options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A provider's full catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub provider_id: Uuid,
    pub services: Vec<CatalogEntryResponse>,
}

/// Resolved price for a pet-type/size request
#[derive(Debug, Serialize)]
pub struct PriceResolutionResponse {
    pub service_id: Uuid,
    pub pricing_option_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Sizes still available for a pet type on a service
#[derive(Debug, Serialize)]
pub struct SizeHintResponse {
    pub service_id: Uuid,
    pub pet_type: PetType,
    pub sizes: Vec<SizeKey>,
}

/// Result of a catalog submission
#[derive(Debug, Serialize)]
pub struct SubmitCatalogResponse {
    pub provider_id: Uuid,
    pub service_ids: Vec<Uuid>,
}
