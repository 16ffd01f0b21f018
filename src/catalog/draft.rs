//! In-progress catalog submission.
//!
//! A provider assembles several services and their pricing options before
//! anything is persisted. The draft runs the same validation as the live
//! catalog on every added option, so a submission can only ever contain rows
//! the validator accepts. Persisting the submission is the service layer's
//! job; persisting the draft itself (e.g. between sessions) is the caller's.

use uuid::Uuid;

use super::models::{OptionInput, PricingOption, ServiceKind};
use super::rules::{validate_option, PricingConflict};

/// One service being assembled inside a draft
#[derive(Debug, Clone)]
pub struct DraftService {
    pub id: Uuid,
    pub kind: ServiceKind,
    pub name: String,
    pub description: String,
    pub notes: String,
    pub options: Vec<PricingOption>,
}

/// A provider's in-progress multi-service catalog submission
#[derive(Debug, Clone)]
pub struct CatalogDraft {
    provider_id: Uuid,
    services: Vec<DraftService>,
}

/// Why a draft cannot be submitted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("draft has no service at index {0}")]
    NoSuchService(usize),

    #[error("service {name} has no pricing options")]
    EmptyService { name: String },

    #[error("draft has no services")]
    Empty,

    #[error(transparent)]
    Pricing(#[from] PricingConflict),
}

impl CatalogDraft {
    pub fn new(provider_id: Uuid) -> Self {
        Self {
            provider_id,
            services: Vec::new(),
        }
    }

    pub fn provider_id(&self) -> Uuid {
        self.provider_id
    }

    pub fn services(&self) -> &[DraftService] {
        &self.services
    }

    /// Add a service shell to the draft, returning its index
    pub fn add_service(
        &mut self,
        kind: ServiceKind,
        name: String,
        description: String,
        notes: String,
    ) -> usize {
        self.services.push(DraftService {
            id: Uuid::new_v4(),
            kind,
            name,
            description,
            notes,
            options: Vec::new(),
        });
        self.services.len() - 1
    }

    /// Validate and attach a pricing option to a draft service.
    ///
    /// On rejection the draft is left unchanged.
    pub fn add_option(&mut self, service_index: usize, input: OptionInput) -> Result<(), DraftError> {
        let service = self
            .services
            .get_mut(service_index)
            .ok_or(DraftError::NoSuchService(service_index))?;
        validate_option(&service.options, &input)?;
        let service_id = service.id;
        service.options.push(input.into_option(service_id));
        Ok(())
    }

    /// Seal the draft for persistence.
    ///
    /// Every service must carry at least one option; an empty draft or an
    /// optionless service cannot be submitted.
    pub fn submit(self) -> Result<CatalogSubmission, DraftError> {
        if self.services.is_empty() {
            return Err(DraftError::Empty);
        }
        for service in &self.services {
            if service.options.is_empty() {
                return Err(DraftError::EmptyService {
                    name: service.name.clone(),
                });
            }
        }
        Ok(CatalogSubmission {
            provider_id: self.provider_id,
            services: self.services,
        })
    }
}

/// A validated draft ready to persist
#[derive(Debug, Clone)]
pub struct CatalogSubmission {
    pub provider_id: Uuid,
    pub services: Vec<DraftService>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{PetType, SizeKey, WeightRange};
    use rust_decimal_macros::dec;

    fn weighted_dog(min: rust_decimal::Decimal, max: rust_decimal::Decimal) -> OptionInput {
        OptionInput {
            pet_type: PetType::Dog,
            size_key: SizeKey::Medium,
            weight_range: Some(WeightRange::new(min, max)),
            price: dec!(500),
        }
    }

    #[test]
    fn test_draft_accepts_valid_option() {
        let mut draft = CatalogDraft::new(Uuid::new_v4());
        let idx = draft.add_service(
            ServiceKind::Package,
            "Full Groom".to_string(),
            String::new(),
            String::new(),
        );
        assert_eq!(draft.add_option(idx, weighted_dog(dec!(5), dec!(10))), Ok(()));
        assert_eq!(draft.services()[idx].options.len(), 1);
    }

    #[test]
    fn test_draft_rejection_leaves_draft_unchanged() {
        let mut draft = CatalogDraft::new(Uuid::new_v4());
        let idx = draft.add_service(
            ServiceKind::Package,
            "Full Groom".to_string(),
            String::new(),
            String::new(),
        );
        draft.add_option(idx, weighted_dog(dec!(5), dec!(10))).unwrap();

        let dup = draft.add_option(idx, weighted_dog(dec!(11), dec!(15)));
        assert!(matches!(
            dup,
            Err(DraftError::Pricing(PricingConflict::DuplicateCombination { .. }))
        ));
        assert_eq!(draft.services()[idx].options.len(), 1);
    }

    #[test]
    fn test_draft_options_are_scoped_per_service() {
        let mut draft = CatalogDraft::new(Uuid::new_v4());
        let first = draft.add_service(
            ServiceKind::Package,
            "Full Groom".to_string(),
            String::new(),
            String::new(),
        );
        let second = draft.add_service(
            ServiceKind::Individual,
            "Nail Trim".to_string(),
            String::new(),
            String::new(),
        );
        draft.add_option(first, weighted_dog(dec!(5), dec!(10))).unwrap();
        // Same combination on another service is fine.
        assert_eq!(draft.add_option(second, weighted_dog(dec!(5), dec!(10))), Ok(()));
    }

    #[test]
    fn test_submit_requires_options() {
        let mut draft = CatalogDraft::new(Uuid::new_v4());
        draft.add_service(
            ServiceKind::Package,
            "Full Groom".to_string(),
            String::new(),
            String::new(),
        );
        assert!(matches!(
            draft.submit(),
            Err(DraftError::EmptyService { .. })
        ));
    }

    #[test]
    fn test_submit_empty_draft_rejected() {
        let draft = CatalogDraft::new(Uuid::new_v4());
        assert_eq!(draft.submit().unwrap_err(), DraftError::Empty);
    }

    #[test]
    fn test_submit_yields_provider_scoped_rows() {
        let provider_id = Uuid::new_v4();
        let mut draft = CatalogDraft::new(provider_id);
        let idx = draft.add_service(
            ServiceKind::Package,
            "Full Groom".to_string(),
            String::new(),
            String::new(),
        );
        draft.add_option(idx, weighted_dog(dec!(5), dec!(10))).unwrap();

        let submission = draft.submit().unwrap();
        assert_eq!(submission.provider_id, provider_id);
        assert_eq!(submission.services.len(), 1);
        let service = &submission.services[0];
        assert_eq!(service.options[0].service_id, service.id);
    }
}
