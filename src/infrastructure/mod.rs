pub mod cache;
pub mod http;
pub mod services;

pub use cache::{CacheOptions, CacheSnapshot, Fetcher, QueryCache, Subscription};
pub use http::{HttpFetcher, MessariEndpoints};
