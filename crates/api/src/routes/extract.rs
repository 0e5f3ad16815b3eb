//! Request extractors that reject with [`AppError`].
//!
//! Axum's own rejections are plain text; these wrap them so every client
//! error leaves the service as the same JSON body.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use storehouse_core::{Validate, decode};

use crate::error::AppError;

/// A document identifier taken from the `{id}` path segment.
///
/// Decoding happens during extraction, so a malformed id is rejected before
/// the handler runs and before any store access.
#[derive(Debug, Clone, Copy)]
pub struct DocumentId(pub ObjectId);

impl<S> FromRequestParts<S> for DocumentId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(decode(&raw)?))
    }
}

/// A JSON body that has passed [`Validate`].
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string parameters, rejected as a JSON client error.
#[derive(Debug)]
pub struct FilterQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for FilterQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
