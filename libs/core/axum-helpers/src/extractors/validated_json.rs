//! JSON body extractor with `validator` checks.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the request body and runs [`Validate`] on it.
///
/// - Malformed JSON or wrongly typed fields: 400 `INVALID_JSON`
/// - Constraint violations: 400 `VALIDATION_ERROR` with per-field details
///
/// The `Content-Type` header is not enforced and an empty body is read as
/// `{}`, so a bodiless POST reports the missing fields instead of a parse error.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateProduct {
///     #[validate(required)]
///     name: Option<String>,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateProduct>) -> StatusCode {
///     StatusCode::CREATED
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let data = parse_body::<T>(&bytes)?;
        data.validate()?;

        Ok(ValidatedJson(data))
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    serde_json::from_slice(body).map_err(|e| AppError::InvalidJson(format!("Invalid JSON body: {}", e)))
}
