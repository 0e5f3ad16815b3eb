//! CRUD handlers shared by the four collections.
//!
//! Each collection implements [`Resource`] to name its payload types, its
//! list filter and the references its writes carry. The handlers here are
//! instantiated once per collection in [`super::router`].

use axum::{Json, extract::State, http::StatusCode};
use bson::{Bson, Document};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storehouse_core::{Entity, Validate, encode};

use super::extract::{DocumentId, FilterQuery, ValidJson};
use crate::db::RepositoryError;
use crate::error::AppError;
use crate::services::References;
use crate::state::AppState;

/// A collection exposed over HTTP.
pub trait Resource: Entity + Serialize {
    /// Create payload.
    type New: DeserializeOwned + Serialize + Validate + Send + 'static;
    /// Merge-patch payload.
    type Patch: DeserializeOwned + Serialize + Validate + Send + 'static;
    /// Query string accepted by the list route.
    type Filter: DeserializeOwned + Send + 'static;

    /// References to link before a write.
    const REFERENCES: References = References::None;

    /// Equality filter for a list query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIdentifier` if an id-valued filter is malformed.
    fn filter_document(filter: Self::Filter) -> Result<Document, AppError>;

    /// Fill in server-side defaults on a create payload.
    fn prepare(_payload: &mut Self::New) {}
}

/// Body returned by create.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Body returned by update and delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct Confirmation {
    pub status: String,
}

impl Confirmation {
    fn new(status: &str) -> Json<Self> {
        Json(Self {
            status: status.to_string(),
        })
    }
}

/// Add `field = value` to a filter when the value is present.
pub(crate) fn put_filter<V: Into<Bson>>(filter: &mut Document, field: &str, value: Option<V>) {
    if let Some(value) = value {
        filter.insert(field, value);
    }
}

fn to_document<T: Serialize>(payload: &T) -> Result<Document, AppError> {
    Ok(bson::to_document(payload).map_err(RepositoryError::from)?)
}

/// `POST /{collection}`
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    ValidJson(mut payload): ValidJson<R::New>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    R::prepare(&mut payload);
    let mut doc = to_document(&payload)?;
    state.linker().link(R::REFERENCES, &mut doc).await?;

    let id = state.gateway::<R>().create(doc).await?;
    tracing::info!(collection = R::COLLECTION, id = %id, "Created document");
    Ok((StatusCode::CREATED, Json(Created { id: encode(&id) })))
}

/// `GET /{collection}/{id}`
pub async fn get<R: Resource>(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<Json<R>, AppError> {
    Ok(Json(state.gateway::<R>().fetch(id).await?))
}

/// `GET /{collection}?field=value`
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery<R::Filter>,
) -> Result<Json<Vec<R>>, AppError> {
    let filter = R::filter_document(filter)?;
    Ok(Json(state.gateway::<R>().fetch_all(filter).await?))
}

/// `PATCH /{collection}/{id}` (also mounted as `PUT`)
///
/// Only the fields present in the payload change.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
    ValidJson(patch): ValidJson<R::Patch>,
) -> Result<Json<Confirmation>, AppError> {
    let mut set = to_document(&patch)?;
    state.linker().link(R::REFERENCES, &mut set).await?;

    state.gateway::<R>().update_by_id(id, set).await?;
    tracing::info!(collection = R::COLLECTION, id = %id, "Updated document");
    Ok(Confirmation::new("updated"))
}

/// `DELETE /{collection}/{id}`
///
/// Documents referencing the deleted one are left in place.
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<Json<Confirmation>, AppError> {
    state.gateway::<R>().delete_by_id(id).await?;
    tracing::info!(collection = R::COLLECTION, id = %id, "Deleted document");
    Ok(Confirmation::new("deleted"))
}
