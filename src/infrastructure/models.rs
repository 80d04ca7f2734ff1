use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderChanges, OrderItemView, OrderStatus, OrderView};
use crate::domain::reconcile::{ItemInsert, ItemUpdate};
use crate::schema::{order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer: String,
    pub phone: String,
    pub address: Option<String>,
    pub pickup: bool,
    pub pickup_time: Option<DateTime<Utc>>,
    pub status: String,
    pub side_note: Option<String>,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_view(self, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
        let status = self.status.parse::<OrderStatus>().map_err(|_| {
            DomainError::Internal(format!(
                "order {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;

        Ok(OrderView {
            id: self.id,
            customer: self.customer,
            phone: self.phone,
            address: self.address,
            pickup: self.pickup,
            pickup_time: self.pickup_time,
            status,
            side_note: self.side_note,
            is_highlighted: self.is_highlighted,
            created_at: self.created_at,
            items: items.into_iter().map(OrderItemView::from).collect(),
        })
    }
}

/// `is_highlighted` and `created_at` come from column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer: String,
    pub phone: String,
    pub address: Option<String>,
    pub pickup: bool,
    pub pickup_time: Option<DateTime<Utc>>,
    pub status: String,
    pub side_note: Option<String>,
}

impl From<NewOrder> for NewOrderRow {
    fn from(o: NewOrder) -> Self {
        Self {
            customer: o.customer,
            phone: o.phone,
            address: o.address,
            pickup: o.pickup,
            pickup_time: o.pickup_time,
            status: OrderStatus::Pending.as_str().to_string(),
            side_note: o.side_note,
        }
    }
}

/// `None` fields are skipped by Diesel; `Some(None)` writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangesetRow {
    pub customer: String,
    pub phone: String,
    pub address: Option<Option<String>>,
    pub pickup: Option<bool>,
    pub status: Option<String>,
    pub side_note: Option<Option<String>>,
    pub pickup_time: Option<Option<DateTime<Utc>>>,
}

impl From<OrderChanges> for OrderChangesetRow {
    fn from(c: OrderChanges) -> Self {
        Self {
            customer: c.customer,
            phone: c.phone,
            address: c.address,
            pickup: c.pickup,
            status: c.status.map(|s| s.as_str().to_string()),
            side_note: c.side_note,
            pickup_time: c.pickup_time,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

impl From<OrderItemRow> for OrderItemView {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            product: r.product,
            quantity: r.quantity,
            price: r.price,
            total: r.total,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

impl NewOrderItemRow {
    pub fn new(order_id: i32, item: ItemInsert) -> Self {
        Self {
            order_id,
            product: item.product,
            quantity: item.quantity,
            price: item.price,
            total: item.total,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_items)]
pub struct OrderItemChangeset {
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

impl From<ItemUpdate> for OrderItemChangeset {
    fn from(u: ItemUpdate) -> Self {
        Self {
            product: u.product,
            quantity: u.quantity,
            price: u.price,
            total: u.total,
        }
    }
}
