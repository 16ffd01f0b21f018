//! Pricing catalog for provider service setup.
//!
//! Providers assemble services and priced pet-type/size options here; the
//! listing and booking flows resolve concrete prices against the result.

pub mod draft;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod rules;
pub mod services;

// Re-export commonly used items
pub use draft::{CatalogDraft, CatalogSubmission, DraftError};
pub use models::{OptionInput, PetType, PricingOption, Service, ServiceKind, SizeKey, WeightRange};
pub use routes::router;
pub use rules::{allowed_sizes, resolve_price, validate_option, PricingConflict, ResolveError};
