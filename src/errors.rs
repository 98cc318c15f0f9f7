use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid invoice fields: {0}")]
    Validation(ValidationErrors),

    /// A mutation failed in the store; the message is safe to show.
    #[error("{0}")]
    MutationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One entry of the `fields` list in a 400 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Flattens validator output into a stable, field-sorted list.
pub fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldIssue {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Validation(v) => AppError::Validation(v),
            DomainError::InvoiceCreation
            | DomainError::InvoiceUpdate
            | DomainError::InvoiceDeletion => AppError::MutationFailed(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Validation(v) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid invoice fields",
                "fields": field_issues(v)
            })),
            AppError::MutationFailed(msg) => {
                HttpResponse::InternalServerError().json(serde_json::json!({ "error": msg }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}
