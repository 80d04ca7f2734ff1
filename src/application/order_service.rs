use crate::domain::errors::DomainError;
use crate::domain::order::{ItemInput, NewOrder, OrderChanges, OrderSummary, OrderView};
use crate::domain::phone::validate_phone;
use crate::domain::ports::OrderRepository;

/// Result of a write, with the advisory phone warning if any.
#[derive(Debug, Clone)]
pub struct Saved {
    pub order: OrderView,
    pub warning: Option<&'static str>,
}

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(
        &self,
        order: NewOrder,
        items: Vec<ItemInput>,
    ) -> Result<Saved, DomainError> {
        let warning = validate_phone(&order.phone);
        if warning.is_some() {
            log::warn!(
                "Creating order for {:?} with unexpected phone {:?}",
                order.customer,
                order.phone
            );
        }

        let order = self.repo.create(order, items)?;
        log::info!("Created order {} with {} item(s)", order.id, order.items.len());

        Ok(Saved { order, warning })
    }

    pub fn get_order(&self, id: i32) -> Result<OrderView, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list()
    }

    pub fn update_order(
        &self,
        id: i32,
        changes: OrderChanges,
        items: Vec<ItemInput>,
    ) -> Result<Saved, DomainError> {
        let warning = validate_phone(&changes.phone);
        if warning.is_some() {
            log::warn!("Updating order {} with unexpected phone {:?}", id, changes.phone);
        }

        let order = self.repo.update(id, changes, items)?;
        log::info!("Updated order {} ({} item(s))", order.id, order.items.len());

        Ok(Saved { order, warning })
    }

    pub fn set_highlight(&self, id: i32, highlighted: bool) -> Result<OrderView, DomainError> {
        let order = self.repo.set_highlight(id, highlighted)?;
        log::info!("Order {} highlighted={}", id, highlighted);
        Ok(order)
    }

    pub fn delete_order(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        log::info!("Deleted order {}", id);
        Ok(())
    }

    pub fn summary(&self) -> Result<OrderSummary, DomainError> {
        Ok(OrderSummary::from_orders(&self.repo.list()?))
    }
}
