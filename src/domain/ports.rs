use super::errors::DomainError;
use super::order::{ItemInput, NewOrder, OrderChanges, OrderView};

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder, items: Vec<ItemInput>) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self) -> Result<Vec<OrderView>, DomainError>;
    fn update(
        &self,
        id: i32,
        changes: OrderChanges,
        items: Vec<ItemInput>,
    ) -> Result<OrderView, DomainError>;
    fn set_highlight(&self, id: i32, highlighted: bool) -> Result<OrderView, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
}
