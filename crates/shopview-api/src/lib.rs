// shopview-api: Async Rust client for JSON product catalogue endpoints

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ProductsClient;
pub use error::Error;
pub use models::{Number, RawProduct, RawProductId, RawRating};
pub use transport::TransportConfig;
