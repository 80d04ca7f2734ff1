use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown order status '{s}'")))
    }
}

/// Header fields of an order being created.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: String,
    pub phone: String,
    pub address: Option<String>,
    pub pickup: bool,
    pub pickup_time: Option<DateTime<Utc>>,
    pub side_note: Option<String>,
}

/// Header fields of an update.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub customer: String,
    pub phone: String,
    pub address: Option<Option<String>>,
    pub pickup: Option<bool>,
    pub status: Option<OrderStatus>,
    pub side_note: Option<Option<String>>,
    pub pickup_time: Option<Option<DateTime<Utc>>>,
}

/// A submitted line item. `id` is set for items that already exist.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub id: Option<i32>,
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl ItemInput {
    pub fn total(&self) -> BigDecimal {
        line_total(self.quantity, &self.price)
    }
}

pub fn line_total(quantity: i32, price: &BigDecimal) -> BigDecimal {
    BigDecimal::from(quantity) * price
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemView {
    pub id: i32,
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub customer: String,
    pub phone: String,
    pub address: Option<String>,
    pub pickup: bool,
    pub pickup_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub side_note: Option<String>,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Sum of the item totals. Not stored.
    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::from(0), |acc, item| acc + &item.total)
    }
}

/// Counters shown above the order list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub highlighted: usize,
    pub grand_total: BigDecimal,
}

impl OrderSummary {
    pub fn from_orders(orders: &[OrderView]) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Self {
            total_orders: orders.len(),
            pending: count(OrderStatus::Pending),
            completed: count(OrderStatus::Completed),
            cancelled: count(OrderStatus::Cancelled),
            highlighted: orders.iter().filter(|o| o.is_highlighted).count(),
            grand_total: orders
                .iter()
                .fold(BigDecimal::from(0), |acc, o| acc + o.total()),
        }
    }
}
