use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::application::order_service::{OrderService, Saved};
use crate::domain::order::{
    ItemInput, NewOrder, OrderChanges, OrderItemView, OrderStatus, OrderSummary, OrderView,
};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;

use super::payload::{double_option, parse_pickup_time, parse_price, parse_quantity, LooseNumber};

pub type Service = OrderService<DieselOrderRepository>;

const MISSING_FIELDS: &str = "Missing required fields";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Present for items that already exist; absent, `null` or `0` for new ones.
    #[serde(default)]
    pub id: Option<i32>,
    pub product: Option<String>,
    /// Integer, as a JSON number or numeric string.
    pub quantity: LooseNumber,
    /// Decimal, as a JSON number or numeric string, e.g. "9.99".
    pub price: LooseNumber,
}

impl OrderItemRequest {
    fn into_input(self) -> Result<ItemInput, AppError> {
        let product = self
            .product
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Item product is required".to_string()))?;

        let id = match self.id {
            None | Some(0) => None,
            Some(id) if id > 0 => Some(id),
            Some(id) => return Err(AppError::BadRequest(format!("Invalid item id {id}"))),
        };

        Ok(ItemInput {
            id,
            product,
            quantity: parse_quantity(&self.quantity)?,
            price: parse_price(&self.price)?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pickup: Option<bool>,
    pub side_note: Option<String>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM`.
    pub pickup_time: Option<String>,
    pub items: Option<Vec<OrderItemRequest>>,
}

impl CreateOrderRequest {
    fn into_domain(self) -> Result<(NewOrder, Vec<ItemInput>), AppError> {
        let (customer, phone, items) = required_fields(self.customer, self.phone, self.items)?;

        let order = NewOrder {
            customer,
            phone,
            address: self.address,
            pickup: self.pickup.unwrap_or(false),
            pickup_time: parse_pickup_time(self.pickup_time.as_deref())?,
            side_note: self.side_note,
        };
        Ok((order, items))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub customer: Option<String>,
    pub phone: Option<String>,
    /// Absent leaves the address unchanged, `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    pub pickup: Option<bool>,
    /// One of `pending`, `completed`, `cancelled`. Absent leaves it unchanged.
    pub status: Option<String>,
    /// Absent leaves the note unchanged, `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub side_note: Option<Option<String>>,
    /// Absent or blank clears the pickup time.
    pub pickup_time: Option<String>,
    pub items: Option<Vec<OrderItemRequest>>,
}

impl UpdateOrderRequest {
    fn into_domain(self) -> Result<(OrderChanges, Vec<ItemInput>), AppError> {
        let (customer, phone, items) = required_fields(self.customer, self.phone, self.items)?;

        let status = self
            .status
            .map(|s| s.parse::<OrderStatus>())
            .transpose()?;

        let changes = OrderChanges {
            customer,
            phone,
            address: self.address,
            pickup: self.pickup,
            status,
            side_note: self.side_note,
            pickup_time: Some(parse_pickup_time(self.pickup_time.as_deref())?),
        };
        Ok((changes, items))
    }
}

fn required_fields(
    customer: Option<String>,
    phone: Option<String>,
    items: Option<Vec<OrderItemRequest>>,
) -> Result<(String, String, Vec<ItemInput>), AppError> {
    let non_blank = |s: &String| !s.trim().is_empty();
    let (Some(customer), Some(phone), Some(items)) = (
        customer.filter(non_blank),
        phone.filter(non_blank),
        items,
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let items = items
        .into_iter()
        .map(OrderItemRequest::into_input)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((customer, phone, items))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRequest {
    #[serde(default)]
    pub is_highlighted: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: i32,
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    pub price: String,
    /// Always `quantity * price`.
    pub total: String,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(i: OrderItemView) -> Self {
        Self {
            id: i.id,
            order_id: i.order_id,
            product: i.product,
            quantity: i.quantity,
            price: i.price.to_string(),
            total: i.total.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub customer: String,
    pub phone: String,
    pub address: Option<String>,
    pub pickup: bool,
    pub pickup_time: Option<String>,
    pub status: String,
    pub side_note: Option<String>,
    pub is_highlighted: bool,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    /// Sum of the item totals.
    pub total: String,
    /// Set when the phone number does not look like `06` + 8 digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        let total = o.total().to_string();
        Self {
            id: o.id,
            customer: o.customer,
            phone: o.phone,
            address: o.address,
            pickup: o.pickup,
            pickup_time: o.pickup_time.map(|t| t.to_rfc3339()),
            status: o.status.to_string(),
            side_note: o.side_note,
            is_highlighted: o.is_highlighted,
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            total,
            warning: None,
        }
    }
}

impl From<Saved> for OrderResponse {
    fn from(saved: Saved) -> Self {
        Self {
            warning: saved.warning.map(str::to_string),
            ..Self::from(saved.order)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub total_orders: usize,
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub highlighted: usize,
    pub grand_total: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(s: OrderSummary) -> Self {
        Self {
            total_orders: s.total_orders,
            pending: s.pending,
            completed: s.completed,
            cancelled: s.cancelled,
            highlighted: s.highlighted,
            grand_total: s.grand_total.to_string(),
        }
    }
}

fn parse_order_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Invalid order id".to_string()))
}

fn blocking_error(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Returns every order with its items, most recently created first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = Vec<OrderResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(service: web::Data<Service>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list_orders())
        .await
        .map_err(blocking_error)??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/summary
#[utoipa::path(
    get,
    path = "/orders/summary",
    responses(
        (status = 200, description = "Order counts and grand total", body = OrderSummaryResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn order_summary(service: web::Data<Service>) -> Result<HttpResponse, AppError> {
    let summary = web::block(move || service.summary())
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(OrderSummaryResponse::from(summary)))
}

/// POST /orders
///
/// Creates an order with its items in a single transaction. Item totals are
/// computed here. A malformed phone number does not block the write; the
/// response carries a `warning` instead.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing required fields or malformed values"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<Service>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let (order, items) = body.into_inner().into_domain()?;

    let saved = web::block(move || service.create_order(order, items))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Created().json(OrderResponse::from(saved)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, description = "Invalid order id"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<Service>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_order_id(&path)?;

    let order = web::block(move || service.get_order(id))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}
///
/// Replaces the header fields and reconciles the item list: submitted items
/// with an id are updated, items without one are inserted, and stored items
/// missing from the list are deleted.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Missing required fields or malformed values"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<Service>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_order_id(&path)?;
    let (changes, items) = body.into_inner().into_domain()?;

    let saved = web::block(move || service.update_order(id, changes, items))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(saved)))
}

/// PUT /orders/{id}/highlight
#[utoipa::path(
    put,
    path = "/orders/{id}/highlight",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    request_body = HighlightRequest,
    responses(
        (status = 200, description = "Highlight flag stored", body = OrderResponse),
        (status = 400, description = "Invalid order id"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn set_highlight(
    service: web::Data<Service>,
    path: web::Path<String>,
    body: web::Json<HighlightRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_order_id(&path)?;
    let highlighted = body.into_inner().is_highlighted;

    let order = web::block(move || service.set_highlight(id, highlighted))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order and its items deleted"),
        (status = 400, description = "Invalid order id"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<Service>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_order_id(&path)?;

    web::block(move || service.delete_order(id))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// DELETE /orders/{id}/items
///
/// Removes every item of the order, then the order itself.
#[utoipa::path(
    delete,
    path = "/orders/{id}/items",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order and its items deleted"),
        (status = 400, description = "Invalid order id"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order_items(
    service: web::Data<Service>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_order_id(&path)?;

    web::block(move || service.delete_order(id))
        .await
        .map_err(blocking_error)??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Order deleted successfully" })))
}
