//! Catalog invariant rules: option validation and price resolution.
//!
//! Pure functions with no database access. Every rule about which pet-type /
//! size combinations may coexist lives here; the HTTP layer may additionally
//! hide already-used choices for usability, but this module is the single
//! source of truth and runs on every write regardless of what the UI offered.

use rust_decimal::Decimal;

use super::models::{OptionInput, PetType, PricingOption, SizeKey, WeightRange};

/// Sizes a pet type may be priced under.
///
/// `DogAndCat` is the general bucket: one `all` row covers both species.
/// Cats are priced either under the flat `cat_standard` size or under
/// weighted sizes, never both (enforced by [`validate_option`]).
pub fn allowed_sizes(pet_type: PetType) -> &'static [SizeKey] {
    match pet_type {
        PetType::Dog => &[
            SizeKey::ExtraSmall,
            SizeKey::Small,
            SizeKey::Medium,
            SizeKey::Large,
            SizeKey::ExtraLarge,
        ],
        PetType::Cat => &[
            SizeKey::CatStandard,
            SizeKey::ExtraSmall,
            SizeKey::Small,
            SizeKey::Medium,
            SizeKey::Large,
            SizeKey::ExtraLarge,
        ],
        PetType::DogAndCat => &[SizeKey::All],
    }
}

/// A catalog invariant violation.
///
/// Each variant names the exact rule that failed and carries enough payload
/// for the caller to render an actionable message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingConflict {
    #[error("size {size_key} is not offered for {pet_type} pricing")]
    SizeNotAllowed { pet_type: PetType, size_key: SizeKey },

    #[error("a {pet_type}/{size_key} option already exists for this service")]
    DuplicateCombination { pet_type: PetType, size_key: SizeKey },

    #[error("an all-sizes option cannot coexist with dog- or cat-specific options")]
    GeneralBucketConflict,

    #[error("standard cat pricing cannot coexist with weighted cat sizes")]
    CatSizingConflict,

    #[error("{size_key} options require a weight range")]
    WeightRangeRequired { size_key: SizeKey },

    #[error("{size_key} options do not take a weight range")]
    WeightRangeForbidden { size_key: SizeKey },

    #[error("weight range {range} must start at 1 kg or more and end above its start")]
    MalformedWeightRange { range: WeightRange },

    #[error("weight range {candidate} overlaps existing range {existing}")]
    OverlappingWeightRange {
        candidate: WeightRange,
        existing: WeightRange,
    },

    #[error("catalog has multiple options matching {pet_type}/{size_key}")]
    AmbiguousResolution { pet_type: PetType, size_key: SizeKey },
}

impl PricingConflict {
    /// Stable rule name for error responses
    pub fn kind(&self) -> &'static str {
        match self {
            PricingConflict::SizeNotAllowed { .. } => "size_not_allowed",
            PricingConflict::DuplicateCombination { .. } => "duplicate_combination",
            PricingConflict::GeneralBucketConflict => "general_bucket_conflict",
            PricingConflict::CatSizingConflict => "cat_sizing_conflict",
            PricingConflict::WeightRangeRequired { .. } => "weight_range_required",
            PricingConflict::WeightRangeForbidden { .. } => "weight_range_forbidden",
            PricingConflict::MalformedWeightRange { .. } => "malformed_weight_range",
            PricingConflict::OverlappingWeightRange { .. } => "overlapping_weight_range",
            PricingConflict::AmbiguousResolution { .. } => "ambiguous_resolution",
        }
    }
}

/// Exclusivity checks shared by the validator and the size-hinting endpoint.
///
/// Covers everything about a `(pet_type, size_key)` choice that does not
/// depend on the candidate's weight range.
pub fn exclusivity_conflict(
    existing: &[PricingOption],
    pet_type: PetType,
    size_key: SizeKey,
) -> Option<PricingConflict> {
    if !allowed_sizes(pet_type).contains(&size_key) {
        return Some(PricingConflict::SizeNotAllowed { pet_type, size_key });
    }

    if existing
        .iter()
        .any(|o| o.pet_type == pet_type && o.size_key == size_key)
    {
        return Some(PricingConflict::DuplicateCombination { pet_type, size_key });
    }

    // One `all` row covers both species, so it excludes every
    // dog- or cat-specific row for the service and vice versa.
    let has_general = existing.iter().any(|o| o.size_key == SizeKey::All);
    let has_specific = existing.iter().any(|o| o.pet_type != PetType::DogAndCat);
    if pet_type == PetType::DogAndCat && has_specific {
        return Some(PricingConflict::GeneralBucketConflict);
    }
    if pet_type != PetType::DogAndCat && has_general {
        return Some(PricingConflict::GeneralBucketConflict);
    }

    if pet_type == PetType::Cat {
        let has_cat_standard = existing
            .iter()
            .any(|o| o.pet_type == PetType::Cat && o.size_key == SizeKey::CatStandard);
        let has_weighted_cat = existing
            .iter()
            .any(|o| o.pet_type == PetType::Cat && o.weight_range.is_some());
        if size_key == SizeKey::CatStandard && has_weighted_cat {
            return Some(PricingConflict::CatSizingConflict);
        }
        if size_key != SizeKey::CatStandard && has_cat_standard {
            return Some(PricingConflict::CatSizingConflict);
        }
    }

    None
}

/// Validate a candidate option against a service's existing options.
///
/// Checks run in a fixed order and the first violated rule wins:
/// size allowed, duplicate combination, general-bucket exclusivity,
/// cat-sizing exclusivity, weight-range presence, range well-formedness
/// (`min >= 1`, `min < max`), then closed-interval overlap against
/// same-bucket siblings (dog ranges against dog ranges, weighted-cat
/// ranges against weighted-cat ranges).
///
/// Pure validation; persisting the option on `Ok` is the caller's job.
pub fn validate_option(
    existing: &[PricingOption],
    candidate: &OptionInput,
) -> Result<(), PricingConflict> {
    if let Some(conflict) = exclusivity_conflict(existing, candidate.pet_type, candidate.size_key) {
        return Err(conflict);
    }

    let range = match (
        candidate.size_key.requires_weight_range(),
        candidate.weight_range,
    ) {
        (true, None) => {
            return Err(PricingConflict::WeightRangeRequired {
                size_key: candidate.size_key,
            })
        }
        (false, Some(_)) => {
            return Err(PricingConflict::WeightRangeForbidden {
                size_key: candidate.size_key,
            })
        }
        (false, None) => return Ok(()),
        (true, Some(range)) => range,
    };

    if range.min < Decimal::ONE || range.min >= range.max {
        return Err(PricingConflict::MalformedWeightRange { range });
    }

    for sibling in existing.iter().filter(|o| o.pet_type == candidate.pet_type) {
        if let Some(existing_range) = sibling.weight_range {
            if range.overlaps(&existing_range) {
                return Err(PricingConflict::OverlappingWeightRange {
                    candidate: range,
                    existing: existing_range,
                });
            }
        }
    }

    Ok(())
}

/// Sizes the validator would still accept for this pet type.
///
/// Used to populate the provider-side size dropdown so the UI can only ever
/// offer choices [`validate_option`] would also accept.
pub fn remaining_sizes(existing: &[PricingOption], pet_type: PetType) -> Vec<SizeKey> {
    allowed_sizes(pet_type)
        .iter()
        .copied()
        .filter(|size| exclusivity_conflict(existing, pet_type, *size).is_none())
        .collect()
}

/// Price resolution failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("no price is set for {pet_type}/{size_key}")]
    NotFound { pet_type: PetType, size_key: SizeKey },

    #[error(transparent)]
    Conflict(PricingConflict),
}

/// Find the single option covering a pet-type/size request.
///
/// Matches the size key exactly; the pet type must equal the requested type
/// or be the `DogAndCat` general bucket. With write-time invariants intact at
/// most one option can match. Two or more matches mean the catalog was
/// mutated out of band; that surfaces as a conflict rather than an arbitrary
/// pick.
pub fn resolve_option<'a>(
    options: &'a [PricingOption],
    pet_type: PetType,
    size_key: SizeKey,
) -> Result<&'a PricingOption, ResolveError> {
    let mut matches = options.iter().filter(|o| {
        o.size_key == size_key && (o.pet_type == pet_type || o.pet_type == PetType::DogAndCat)
    });

    let first = matches
        .next()
        .ok_or(ResolveError::NotFound { pet_type, size_key })?;
    if matches.next().is_some() {
        return Err(ResolveError::Conflict(PricingConflict::AmbiguousResolution {
            pet_type,
            size_key,
        }));
    }
    Ok(first)
}

/// Resolve the concrete price for a pet-type/size request
pub fn resolve_price(
    options: &[PricingOption],
    pet_type: PetType,
    size_key: SizeKey,
) -> Result<Decimal, ResolveError> {
    resolve_option(options, pet_type, size_key).map(|o| o.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn option(
        pet_type: PetType,
        size_key: SizeKey,
        range: Option<(Decimal, Decimal)>,
        price: Decimal,
    ) -> PricingOption {
        PricingOption {
            id: Uuid::new_v4(),
            service_id: Uuid::nil(),
            pet_type,
            size_key,
            weight_range: range.map(|(min, max)| WeightRange::new(min, max)),
            price,
        }
    }

    fn input(
        pet_type: PetType,
        size_key: SizeKey,
        range: Option<(Decimal, Decimal)>,
        price: Decimal,
    ) -> OptionInput {
        OptionInput {
            pet_type,
            size_key,
            weight_range: range.map(|(min, max)| WeightRange::new(min, max)),
            price,
        }
    }

    // ==================== allowed_sizes tests ====================

    #[test]
    fn test_allowed_sizes_general_bucket_is_all_only() {
        assert_eq!(allowed_sizes(PetType::DogAndCat), &[SizeKey::All]);
    }

    #[test]
    fn test_allowed_sizes_dog_has_no_cat_standard() {
        assert!(!allowed_sizes(PetType::Dog).contains(&SizeKey::CatStandard));
        assert!(!allowed_sizes(PetType::Dog).contains(&SizeKey::All));
    }

    #[test]
    fn test_allowed_sizes_cat_offers_standard_and_weighted() {
        let sizes = allowed_sizes(PetType::Cat);
        assert!(sizes.contains(&SizeKey::CatStandard));
        assert!(sizes.contains(&SizeKey::Medium));
        assert!(!sizes.contains(&SizeKey::All));
    }

    // ==================== validate_option tests ====================

    #[test]
    fn test_validate_accepts_first_weighted_option() {
        let candidate = input(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(10))), dec!(500));
        assert_eq!(validate_option(&[], &candidate), Ok(()));
    }

    #[test]
    fn test_validate_rejects_size_not_allowed() {
        let candidate = input(PetType::Dog, SizeKey::All, None, dec!(500));
        assert_eq!(
            validate_option(&[], &candidate),
            Err(PricingConflict::SizeNotAllowed {
                pet_type: PetType::Dog,
                size_key: SizeKey::All,
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_combination() {
        let existing = vec![option(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(10))), dec!(500))];
        let candidate = input(PetType::Dog, SizeKey::Medium, Some((dec!(11), dec!(15))), dec!(600));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::DuplicateCombination {
                pet_type: PetType::Dog,
                size_key: SizeKey::Medium,
            })
        );
    }

    #[test]
    fn test_validate_general_bucket_excludes_specific() {
        let existing = vec![option(PetType::DogAndCat, SizeKey::All, None, dec!(400))];
        let candidate = input(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::GeneralBucketConflict)
        );
    }

    #[test]
    fn test_validate_specific_excludes_general_bucket() {
        let existing = vec![option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300))];
        let candidate = input(PetType::DogAndCat, SizeKey::All, None, dec!(400));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::GeneralBucketConflict)
        );
    }

    #[test]
    fn test_validate_cat_standard_excludes_weighted_cat() {
        let existing = vec![option(PetType::Cat, SizeKey::Small, Some((dec!(1), dec!(4))), dec!(350))];
        let candidate = input(PetType::Cat, SizeKey::CatStandard, None, dec!(300));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::CatSizingConflict)
        );
    }

    #[test]
    fn test_validate_weighted_cat_excludes_cat_standard() {
        let existing = vec![option(PetType::Cat, SizeKey::CatStandard, None, dec!(300))];
        let candidate = input(PetType::Cat, SizeKey::Small, Some((dec!(1), dec!(4))), dec!(350));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::CatSizingConflict)
        );
    }

    #[test]
    fn test_validate_cat_standard_does_not_block_dog_options() {
        let existing = vec![option(PetType::Cat, SizeKey::CatStandard, None, dec!(300))];
        let candidate = input(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(350));
        assert_eq!(validate_option(&existing, &candidate), Ok(()));
    }

    #[test]
    fn test_validate_weight_range_required() {
        let candidate = input(PetType::Dog, SizeKey::Medium, None, dec!(500));
        assert_eq!(
            validate_option(&[], &candidate),
            Err(PricingConflict::WeightRangeRequired {
                size_key: SizeKey::Medium,
            })
        );
    }

    #[test]
    fn test_validate_weight_range_forbidden_for_cat_standard() {
        let candidate = input(PetType::Cat, SizeKey::CatStandard, Some((dec!(1), dec!(5))), dec!(300));
        assert_eq!(
            validate_option(&[], &candidate),
            Err(PricingConflict::WeightRangeForbidden {
                size_key: SizeKey::CatStandard,
            })
        );
    }

    #[test]
    fn test_validate_rejects_min_below_one() {
        let candidate = input(PetType::Dog, SizeKey::ExtraSmall, Some((dec!(0.5), dec!(3))), dec!(250));
        assert!(matches!(
            validate_option(&[], &candidate),
            Err(PricingConflict::MalformedWeightRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let candidate = input(PetType::Dog, SizeKey::Large, Some((dec!(20), dec!(10))), dec!(700));
        assert!(matches!(
            validate_option(&[], &candidate),
            Err(PricingConflict::MalformedWeightRange { .. })
        ));
        let degenerate = input(PetType::Dog, SizeKey::Large, Some((dec!(10), dec!(10))), dec!(700));
        assert!(matches!(
            validate_option(&[], &degenerate),
            Err(PricingConflict::MalformedWeightRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overlapping_dog_ranges() {
        let existing = vec![option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300))];
        let candidate = input(PetType::Dog, SizeKey::Medium, Some((dec!(4), dec!(8))), dec!(500));
        assert_eq!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::OverlappingWeightRange {
                candidate: WeightRange::new(dec!(4), dec!(8)),
                existing: WeightRange::new(dec!(1), dec!(5)),
            })
        );
    }

    #[test]
    fn test_validate_rejects_touching_endpoints() {
        // Closed intervals: 1-5 and 5-8 share the 5 kg point.
        let existing = vec![option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300))];
        let candidate = input(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(8))), dec!(500));
        assert!(matches!(
            validate_option(&existing, &candidate),
            Err(PricingConflict::OverlappingWeightRange { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_disjoint_ranges() {
        let existing = vec![option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300))];
        let candidate = input(PetType::Dog, SizeKey::Medium, Some((dec!(6), dec!(10))), dec!(500));
        assert_eq!(validate_option(&existing, &candidate), Ok(()));
    }

    #[test]
    fn test_validate_dog_and_cat_buckets_do_not_cross() {
        // A cat range may coincide with a dog range; buckets are per species.
        let existing = vec![option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300))];
        let candidate = input(PetType::Cat, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(350));
        assert_eq!(validate_option(&existing, &candidate), Ok(()));
    }

    // ==================== remaining_sizes tests ====================

    #[test]
    fn test_remaining_sizes_drops_used_combination() {
        let existing = vec![option(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(10))), dec!(500))];
        let sizes = remaining_sizes(&existing, PetType::Dog);
        assert!(!sizes.contains(&SizeKey::Medium));
        assert!(sizes.contains(&SizeKey::Small));
    }

    #[test]
    fn test_remaining_sizes_empty_once_general_bucket_present() {
        let existing = vec![option(PetType::DogAndCat, SizeKey::All, None, dec!(400))];
        assert!(remaining_sizes(&existing, PetType::Dog).is_empty());
        assert!(remaining_sizes(&existing, PetType::Cat).is_empty());
    }

    #[test]
    fn test_remaining_sizes_cat_standard_blocks_weighted() {
        let existing = vec![option(PetType::Cat, SizeKey::CatStandard, None, dec!(300))];
        assert!(remaining_sizes(&existing, PetType::Cat).is_empty());
    }

    // ==================== resolve_price tests ====================

    #[test]
    fn test_resolve_exact_match() {
        let options = vec![option(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(10))), dec!(500))];
        assert_eq!(
            resolve_price(&options, PetType::Dog, SizeKey::Medium),
            Ok(dec!(500))
        );
    }

    #[test]
    fn test_resolve_not_found_for_other_species() {
        let options = vec![option(PetType::Dog, SizeKey::Medium, Some((dec!(5), dec!(10))), dec!(500))];
        assert_eq!(
            resolve_price(&options, PetType::Cat, SizeKey::Medium),
            Err(ResolveError::NotFound {
                pet_type: PetType::Cat,
                size_key: SizeKey::Medium,
            })
        );
    }

    #[test]
    fn test_resolve_general_bucket_covers_both_species() {
        let options = vec![option(PetType::DogAndCat, SizeKey::All, None, dec!(400))];
        assert_eq!(resolve_price(&options, PetType::Dog, SizeKey::All), Ok(dec!(400)));
        assert_eq!(resolve_price(&options, PetType::Cat, SizeKey::All), Ok(dec!(400)));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let options = vec![
            option(PetType::Dog, SizeKey::Small, Some((dec!(1), dec!(5))), dec!(300)),
            option(PetType::Dog, SizeKey::Medium, Some((dec!(6), dec!(10))), dec!(500)),
        ];
        for _ in 0..3 {
            assert_eq!(
                resolve_price(&options, PetType::Dog, SizeKey::Medium),
                Ok(dec!(500))
            );
        }
    }

    #[test]
    fn test_resolve_ambiguous_catalog_is_a_conflict() {
        // Two matching rows can only exist if the catalog was mutated out of
        // band; resolution must refuse rather than pick one.
        let options = vec![
            option(PetType::Dog, SizeKey::All, None, dec!(400)),
            option(PetType::DogAndCat, SizeKey::All, None, dec!(450)),
        ];
        assert_eq!(
            resolve_price(&options, PetType::Dog, SizeKey::All),
            Err(ResolveError::Conflict(PricingConflict::AmbiguousResolution {
                pet_type: PetType::Dog,
                size_key: SizeKey::All,
            }))
        );
    }
}
