//! Order placement and retrieval endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use catalog::CatalogStore;
use chrono::{DateTime, Utc};
use common::{OrderId, PageRequest, ProductId};
use orders::{LineRequest, Order, OrderService, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::identity;

/// Shared application state accessible from all handlers.
pub struct AppState<C: CatalogStore, O: OrderStore> {
    pub catalog: C,
    pub order_service: OrderService<C, O>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub lines: Vec<LineRequestBody>,
}

#[derive(Deserialize)]
pub struct LineRequestBody {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Pagination query parameters shared by the listing endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.size.unwrap_or(defaults.size),
        )
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: common::UserId,
    pub lines: Vec<OrderLineResponse>,
    pub subtotal_cents: i64,
    pub total_discount_cents: i64,
    pub order_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let subtotal_cents = order.subtotal().cents();
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            lines: order
                .lines
                .into_iter()
                .map(|line| OrderLineResponse {
                    product_id: line.product_id,
                    product_name: line.product_name,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    discount_cents: line.discount.cents(),
                    line_total_cents: line.line_total.cents(),
                })
                .collect(),
            subtotal_cents,
            total_discount_cents: order.total_discount.cents(),
            order_total_cents: order.order_total.cents(),
            created_at: order.created_at,
        }
    }
}

pub(crate) fn page_response<T, U: From<T>>(page: common::Page<T>) -> PageResponse<U> {
    PageResponse {
        items: page.items.into_iter().map(U::from).collect(),
        page: page.page,
        size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

// -- Handlers --

/// POST /orders — place an order for the authenticated user.
#[tracing::instrument(skip(state, headers, req))]
pub async fn place<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let requester = identity::from_headers(&headers)?;
    let lines: Vec<LineRequest> = req
        .lines
        .iter()
        .map(|l| LineRequest::new(l.product_id, l.quantity))
        .collect();

    let order = state
        .order_service
        .place_order(requester.as_ref(), lines)
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — fetch one of the requester's orders.
#[tracing::instrument(skip(state, headers))]
pub async fn get<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let requester = identity::from_headers(&headers)?;
    let order = state.order_service.get_order(requester.as_ref(), id).await?;
    Ok(Json(order.into()))
}

/// GET /orders — list the requester's own orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<OrderResponse>>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let requester = identity::from_headers(&headers)?;
    let page = state
        .order_service
        .list_orders(requester.as_ref(), params.to_request())
        .await?;
    Ok(Json(page_response(page)))
}

/// GET /admin/orders — list every user's orders. Admin only.
#[tracing::instrument(skip(state, headers))]
pub async fn list_all<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<OrderResponse>>, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let requester = identity::from_headers(&headers)?;
    let page = state
        .order_service
        .list_all_orders(requester.as_ref(), params.to_request())
        .await?;
    Ok(Json(page_response(page)))
}

/// DELETE /orders/:id — soft-delete one of the requester's orders.
#[tracing::instrument(skip(state, headers))]
pub async fn delete<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(id): Path<OrderId>,
) -> Result<axum::http::StatusCode, ApiError>
where
    C: CatalogStore + Clone + 'static,
    O: OrderStore + 'static,
{
    let requester = identity::from_headers(&headers)?;
    state
        .order_service
        .delete_order(requester.as_ref(), id)
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
