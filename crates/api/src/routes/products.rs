//! Product catalog management and search endpoints.
//!
//! Mutations are admin-only; reads are open to any caller, anonymous
//! included, since the catalog is browsable before placing an order.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use catalog::{CatalogStore, NewProduct, Product, ProductFilter};
use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use orders::{OrderError, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::identity;
use crate::routes::orders::{AppState, PageResponse, page_response};

// -- Request types --

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub quantity: u32,
}

impl ProductRequest {
    fn validate(&self) -> Result<NewProduct, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Product name is required".to_string()));
        }
        if self.price_cents <= 0 {
            return Err(ApiError::BadRequest(
                "Product price must be greater than 0".to_string(),
            ));
        }
        Ok(NewProduct::new(
            self.name.clone(),
            self.description.clone(),
            Money::from_cents(self.price_cents),
            self.quantity,
        ))
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub name: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub available: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl SearchParams {
    fn to_filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::new();
        if let Some(ref name) = self.name {
            filter = filter.name_contains(name.clone());
        }
        if let Some(min) = self.min_price_cents {
            filter = filter.min_price(Money::from_cents(min));
        }
        if let Some(max) = self.max_price_cents {
            filter = filter.max_price(Money::from_cents(max));
        }
        if let Some(available) = self.available {
            filter = filter.available(available);
        }
        filter
    }

    fn to_page(&self) -> common::PageRequest {
        let defaults = common::PageRequest::default();
        common::PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.size.unwrap_or(defaults.size),
        )
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price_cents: product.price.cents(),
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

fn require_admin(headers: &HeaderMap) -> Result<(), ApiError> {
    let identity = identity::from_headers(headers)?;
    match identity {
        None => Err(ApiError::Order(OrderError::NotAuthenticated)),
        Some(identity) if !identity.is_admin() => Err(ApiError::Order(OrderError::Forbidden)),
        Some(_) => Ok(()),
    }
}

// -- Handlers --

/// POST /products — add a product to the catalog. Admin only.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> Result<(axum::http::StatusCode, Json<ProductResponse>), ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    require_admin(&headers)?;
    let product = state.catalog.insert(req.validate()?).await?;
    Ok((axum::http::StatusCode::CREATED, Json(product.into())))
}

/// GET /products/:id — fetch a product by id.
#[tracing::instrument(skip(state))]
pub async fn get<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let product = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(product.into()))
}

/// GET /products — search the catalog with optional filters, paged.
#[tracing::instrument(skip(state))]
pub async fn search<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PageResponse<ProductResponse>>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let page = state
        .catalog
        .search(params.to_filter(), params.to_page())
        .await?;
    Ok(Json(page_response(page)))
}

/// PUT /products/:id — replace a product's fields. Admin only.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    require_admin(&headers)?;
    let product = state
        .catalog
        .update(id, req.validate()?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(product.into()))
}

/// DELETE /products/:id — soft-delete a product. Admin only.
#[tracing::instrument(skip(state, headers))]
pub async fn delete<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
) -> Result<axum::http::StatusCode, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    require_admin(&headers)?;
    if !state.catalog.soft_delete(id).await? {
        return Err(ApiError::NotFound(format!("Product {id} not found")));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
