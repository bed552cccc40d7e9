//! JSON body extractor with the application's error shape.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON extractor whose rejections render as `AppError::BadRequest`.
///
/// The body is decoded as JSON whatever the `Content-Type` header says;
/// only an unreadable or undecodable body is rejected. Semantic validation
/// is left to the service layer.
///
/// # Example
///
/// ```rust,ignore
/// use user_microservice::api::extractors::JsonBody;
/// use user_microservice::domain::CreateUser;
///
/// async fn create_user(JsonBody(payload): JsonBody<CreateUser>) {
///     // payload parsed, not yet validated
/// }
/// ```
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Unreadable request body: {}", e.body_text());
            AppError::bad_request("Invalid request body")
        })?;

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|e| {
            tracing::debug!("Rejected request body: {}", e.body_text());
            AppError::bad_request("Invalid request body")
        })?;

        Ok(JsonBody(value))
    }
}
