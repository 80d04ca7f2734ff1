pub mod errors;
pub mod order;
pub mod phone;
pub mod ports;
pub mod reconcile;
