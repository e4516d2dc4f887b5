mod feed_error;
mod fetcher;
pub mod models;

pub use feed_error::{FetchError, LoadError};
pub use fetcher::{load_raw_feed, StockFetcher};
