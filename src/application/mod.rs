//! Application services layer.

pub mod auth;
pub mod catalog;
pub mod counters;
pub mod dashboard;
pub mod error;
pub mod images;
pub mod notifications;
pub mod notify;
pub mod orders;
pub mod pagination;
pub mod repos;
pub mod reviews;
pub mod seed;
pub mod settings;
pub mod sliders;

#[cfg(test)]
pub(crate) mod testing;
