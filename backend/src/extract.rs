//! Request extractors that reject with [`AppError`]
//!
//! Drop-in replacements for `axum::extract::Path` and `axum::Form`, so a
//! malformed id or an unreadable form body gets the same JSON error shape as
//! every other failure.

use axum::extract::{
    rejection::{FormRejection, PathRejection},
    FromRequest, FromRequestParts,
};

use crate::error::AppError;

/// Path parameters; an unparseable id cannot name an existing record
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// URL-encoded form body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => {
                AppError::NotFound("Resource".to_string())
            }
            other => AppError::Internal(other.body_text()),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation {
            field: "form".to_string(),
            message: rejection.body_text(),
            message_ja: "フォームの内容を読み取れません。".to_string(),
        }
    }
}
