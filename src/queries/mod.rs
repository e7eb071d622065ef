//! Query modules for the dashboard.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes a total fetcher
//! returning [`Fetched<T>`](crate::error::Fetched) alongside a `try_` variant
//! returning `Result<T>`.

pub mod history;
pub mod markets;

pub use history::HistoryQuery;
pub use markets::MarketQuery;
