//! Catalog endpoints.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use refbook_core::CatalogId;

use crate::error::AppError;
use crate::json::{
    CheckElementResponse, ElementListResponse, OverviewResponse, RefbookListResponse,
};
use crate::params::{self, CheckElementQuery, ElementListQuery, RefbookListQuery};
use crate::AppState;

/// Catalog routes. Each path is also served with a trailing slash.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/refbooks", get(list_refbooks))
        .route("/refbooks/", get(list_refbooks))
        .route("/refbooks/overview", get(overview))
        .route("/refbooks/overview/", get(overview))
        .route("/refbooks/:id/elements", get(list_elements))
        .route("/refbooks/:id/elements/", get(list_elements))
        .route("/refbooks/:id/check_element", get(check_element))
        .route("/refbooks/:id/check_element/", get(check_element))
}

/// Only all-digit ids address a catalog; anything else matches no resource.
fn catalog_id(raw: &str) -> Result<CatalogId, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(format!("no catalog route for id {raw:?}")));
    }
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("catalog id {raw} is out of range")))
}

/// List catalogs, optionally only those with a version effective by `date`.
async fn list_refbooks(
    State(state): State<AppState>,
    query: Result<Query<RefbookListQuery>, QueryRejection>,
) -> Result<Json<RefbookListResponse>, AppError> {
    let params = params::extract(query)?.validate()?;
    let catalogs = state
        .execute_read(move |services| services.catalogs.list_catalogs(params.date))
        .await?;

    Ok(Json(RefbookListResponse {
        refbooks: catalogs.into_iter().map(Into::into).collect(),
    }))
}

/// List catalogs with the version current on `date` (default today).
async fn overview(
    State(state): State<AppState>,
    query: Result<Query<RefbookListQuery>, QueryRejection>,
) -> Result<Json<OverviewResponse>, AppError> {
    let params = params::extract(query)?.validate()?;
    let overview = state
        .execute_read(move |services| services.catalogs.overview(params.date))
        .await?;

    Ok(Json(OverviewResponse {
        refbooks: overview.into_iter().map(Into::into).collect(),
    }))
}

/// List entries of a catalog version, the current one unless `version` is given.
async fn list_elements(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ElementListQuery>, QueryRejection>,
) -> Result<Json<ElementListResponse>, AppError> {
    let id = catalog_id(&id)?;
    let params = params::extract(query)?.validate()?;
    let entries = state
        .execute_read(move |services| {
            services.entries.list_entries(id, params.version.as_deref())
        })
        .await?;

    Ok(Json(ElementListResponse {
        elements: entries.into_iter().map(Into::into).collect(),
    }))
}

/// Check whether a code/value pair exists in a catalog version.
async fn check_element(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<CheckElementQuery>, QueryRejection>,
) -> Result<Json<CheckElementResponse>, AppError> {
    let id = catalog_id(&id)?;
    let params = params::extract(query)?.validate()?;
    let exists = state
        .execute_read(move |services| {
            services.entries.exists_entry(
                id,
                &params.code,
                &params.value,
                params.version.as_deref(),
            )
        })
        .await?;

    Ok(Json(CheckElementResponse { exists }))
}
