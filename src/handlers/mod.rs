pub mod orders;
pub mod payload;
