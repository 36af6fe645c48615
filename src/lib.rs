//! Marketplace price comparator
//!
//! Fetches per-store quotes for a product, derives the profit margin between
//! the cheapest and priciest store, and keeps a rolling search history.

pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;
