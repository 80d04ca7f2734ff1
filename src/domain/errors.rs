use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// No order with the requested id.
    #[error("Order not found")]
    NotFound,
    /// The request is well-formed JSON but cannot be applied, e.g. an item id
    /// that belongs to another order.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Storage or pool failure; the message is passed to the client as
    /// diagnostics.
    #[error("Internal error: {0}")]
    Internal(String),
}
