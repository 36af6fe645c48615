//! Type definitions for pricecmp

mod error;
mod quote;
mod session;

pub use error::*;
pub use quote::*;
pub use session::*;
