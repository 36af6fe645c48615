//! Services for price comparison, aggregation and search history

pub mod aggregator;
pub mod compare_client;
pub mod history;
pub mod price_parser;
pub mod session;

pub use aggregator::ComparisonAggregator;
pub use compare_client::{HttpPriceFetcher, PriceFetcher};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, SearchHistoryLog};
pub use price_parser::parse_price;
pub use session::{ComparisonSession, SearchOutcome, SearchTicket};
