//! Proxy fetching, filtering, verification and export

pub mod client;
pub mod export;
pub mod filter;
pub mod models;
pub mod prober;

pub use client::{ClientConfig, ListingApi, ListingEntry, ProxyClient, ProxySource};
pub use export::write_csv;
pub use filter::ProxyFilter;
pub use models::{ProxyRecord, ProxyType};
pub use prober::{HttpProber, Prober};
