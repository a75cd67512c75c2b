//! Single-vendor storefront backend: catalogue, orders, reviews, slides and a
//! small admin surface over a JSON API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
