//! Catalog models: services and their pricing options.
//!
//! Database rows use sqlx's FromRow derive; enum-valued columns are stored as
//! text and parsed into typed enums at the model boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Pet type a pricing option applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    Dog,
    Cat,
    DogAndCat,
}

impl PetType {
    pub fn as_str(self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
            PetType::DogAndCat => "dog_and_cat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dog" => Some(PetType::Dog),
            "cat" => Some(PetType::Cat),
            "dog_and_cat" => Some(PetType::DogAndCat),
            _ => None,
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size bracket for a pricing option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeKey {
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
    CatStandard,
    All,
}

impl SizeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeKey::ExtraSmall => "extra_small",
            SizeKey::Small => "small",
            SizeKey::Medium => "medium",
            SizeKey::Large => "large",
            SizeKey::ExtraLarge => "extra_large",
            SizeKey::CatStandard => "cat_standard",
            SizeKey::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "extra_small" => Some(SizeKey::ExtraSmall),
            "small" => Some(SizeKey::Small),
            "medium" => Some(SizeKey::Medium),
            "large" => Some(SizeKey::Large),
            "extra_large" => Some(SizeKey::ExtraLarge),
            "cat_standard" => Some(SizeKey::CatStandard),
            "all" => Some(SizeKey::All),
            _ => None,
        }
    }

    /// Weighted sizes carry a mandatory weight range; `cat_standard` and
    /// `all` never do.
    pub fn requires_weight_range(self) -> bool {
        !matches!(self, SizeKey::CatStandard | SizeKey::All)
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive weight range in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    #[serde(with = "rust_decimal::serde::str")]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max: Decimal,
}

impl WeightRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Closed-interval overlap test
    pub fn overlaps(&self, other: &WeightRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl fmt::Display for WeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} kg", self.min, self.max)
    }
}

/// Whether a service is a bundled package or an individual treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Package,
    Individual,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Package => "package",
            ServiceKind::Individual => "individual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "package" => Some(ServiceKind::Package),
            "individual" => Some(ServiceKind::Individual),
            _ => None,
        }
    }
}

/// A provider-defined grooming offering
#[derive(Debug, Clone)]
pub struct Service {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub kind: ServiceKind,
    pub name: String,
    pub description: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A priced pet-type/size combination belonging to one service
#[derive(Debug, Clone, PartialEq)]
pub struct PricingOption {
    pub id: Uuid,
    pub service_id: Uuid,
    pub pet_type: PetType,
    pub size_key: SizeKey,
    pub weight_range: Option<WeightRange>,
    pub price: Decimal,
}

/// Candidate pricing option before it has an identity
#[derive(Debug, Clone, PartialEq)]
pub struct OptionInput {
    pub pet_type: PetType,
    pub size_key: SizeKey,
    pub weight_range: Option<WeightRange>,
    pub price: Decimal,
}

impl OptionInput {
    /// Materialize the candidate as a row belonging to `service_id`
    pub fn into_option(self, service_id: Uuid) -> PricingOption {
        PricingOption {
            id: Uuid::new_v4(),
            service_id,
            pet_type: self.pet_type,
            size_key: self.size_key,
            weight_range: self.weight_range,
            price: self.price,
        }
    }
}

/// Service row from database
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl ServiceRow {
    pub fn parse(self) -> Option<Service> {
        Some(Service {
            id: self.id,
            provider_id: self.provider_id,
            kind: ServiceKind::parse(&self.kind)?,
            name: self.name,
            description: self.description,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

/// Pricing option row from database
#[derive(Debug, Clone, FromRow)]
pub struct PricingOptionRow {
    pub id: Uuid,
    pub service_id: Uuid,
    pub pet_type: String,
    pub size_key: String,
    pub weight_min: Option<Decimal>,
    pub weight_max: Option<Decimal>,
    pub price: Decimal,
}

impl PricingOptionRow {
    pub fn parse(self) -> Option<PricingOption> {
        let weight_range = match (self.weight_min, self.weight_max) {
            (Some(min), Some(max)) => Some(WeightRange::new(min, max)),
            (None, None) => None,
            _ => return None,
        };
        Some(PricingOption {
            id: self.id,
            service_id: self.service_id,
            pet_type: PetType::parse(&self.pet_type)?,
            size_key: SizeKey::parse(&self.size_key)?,
            weight_range,
            price: self.price,
        })
    }
}
