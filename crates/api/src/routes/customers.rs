//! Customer routes, including the composite customer views.

use axum::{Json, extract::State};
use bson::Document;
use serde::Deserialize;
use storehouse_core::CustomerStatus;
use storehouse_core::models::{Customer, CustomerPatch, NewCustomer};

use super::extract::DocumentId;
use super::resource::{Resource, put_filter};
use crate::error::AppError;
use crate::services::CustomerBundle;
use crate::state::AppState;

/// Query parameters accepted by `GET /customers`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerFilter {
    pub status: Option<CustomerStatus>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Resource for Customer {
    type New = NewCustomer;
    type Patch = CustomerPatch;
    type Filter = CustomerFilter;

    fn filter_document(filter: CustomerFilter) -> Result<Document, AppError> {
        let mut doc = Document::new();
        put_filter(&mut doc, "status", filter.status.map(|s| s.as_str()));
        put_filter(&mut doc, "email", filter.email);
        put_filter(&mut doc, "firstName", filter.first_name);
        put_filter(&mut doc, "lastName", filter.last_name);
        Ok(doc)
    }
}

/// `GET /customers/{id}/bundle` (also `/full`)
pub async fn bundle(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<Json<CustomerBundle>, AppError> {
    Ok(Json(state.composer().customer_bundle(id).await?))
}

/// `GET /customers/{id}/details`
pub async fn details(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<Json<CustomerBundle>, AppError> {
    Ok(Json(state.composer().customer_details(id).await?))
}
