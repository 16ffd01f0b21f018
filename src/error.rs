//! Error handling for the application.
//!
//! Every rejection carries a specific kind so the calling UI can render the
//! precise reason; nothing surfaces as a generic failure. Store errors pass
//! through unmodified except for slot-uniqueness violations, which the
//! booking service layer translates to the slot-taken rejection.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::availability::engine::SlotCheck;
use crate::booking::lifecycle::InvalidTransition;
use crate::catalog::draft::DraftError;
use crate::catalog::rules::{PricingConflict, ResolveError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Pricing(#[from] PricingConflict),

    #[error("Record not found")]
    NotFound,

    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    #[error("{0}")]
    Slot(SlotCheck),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { .. } => AppError::NotFound,
            ResolveError::Conflict(conflict) => AppError::Pricing(conflict),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Pricing(conflict) => AppError::Pricing(conflict),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn error_type(&self) -> String {
        match self {
            AppError::Validation(_) => "validation_error".to_string(),
            AppError::Pricing(conflict) => conflict.kind().to_string(),
            AppError::NotFound => "not_found".to_string(),
            AppError::Transition(_) => "invalid_transition".to_string(),
            AppError::Slot(verdict) => verdict.kind().to_string(),
            AppError::Database(_) => "store_error".to_string(),
            AppError::Internal(_) => "internal_error".to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Slot(SlotCheck::OutsideHours(windows)) => {
                let windows: Vec<serde_json::Value> = windows
                    .iter()
                    .map(|w| {
                        serde_json::json!({
                            "start": w.start.format("%H:%M").to_string(),
                            "end": w.end.format("%H:%M").to_string(),
                        })
                    })
                    .collect();
                Some(serde_json::json!({ "windows": windows }))
            }
            AppError::Pricing(PricingConflict::OverlappingWeightRange { candidate, existing }) => {
                Some(serde_json::json!({
                    "candidate": candidate,
                    "existing": existing,
                }))
            }
            AppError::Transition(t) => Some(serde_json::json!({
                "from": t.from.as_str(),
                "actor": t.actor.to_string(),
                "event": t.event,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Pricing(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Transition(_) => StatusCode::CONFLICT,
            AppError::Slot(_) => StatusCode::CONFLICT,
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error_type: self.error_type(),
            message: match &self {
                // Store internals stay out of client responses.
                AppError::Database(_) => "store error".to_string(),
                AppError::Internal(_) => "internal error".to_string(),
                other => other.to_string(),
            },
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{PetType, SizeKey};

    #[test]
    fn test_error_types_are_specific() {
        let dup = AppError::Pricing(PricingConflict::DuplicateCombination {
            pet_type: PetType::Dog,
            size_key: SizeKey::Medium,
        });
        assert_eq!(dup.error_type(), "duplicate_combination");

        let taken = AppError::Slot(SlotCheck::SlotTaken);
        assert_eq!(taken.error_type(), "slot_taken");

        assert_eq!(AppError::NotFound.error_type(), "not_found");
    }

    #[test]
    fn test_resolve_error_conversion() {
        let err: AppError = ResolveError::NotFound {
            pet_type: PetType::Cat,
            size_key: SizeKey::Medium,
        }
        .into();
        assert!(matches!(err, AppError::NotFound));
    }
}
