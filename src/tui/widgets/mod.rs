//! TUI widgets

pub mod help;
pub mod history_bar;
pub mod quotes;
pub mod search_bar;
pub mod spinner;
