//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod order_id;
pub mod pricing;
pub mod settings;
pub mod types;
