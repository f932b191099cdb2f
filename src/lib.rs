pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::SearchArgs;

pub use adapters::{SupplierA, SupplierB, SupplierC, SupplierD};
pub use config::AggregatorConfig;
pub use core::engine::AggregationEngine;
pub use domain::model::{HotelOffer, SearchQuery, SearchResponse, SortBy};
pub use domain::ports::{HotelSearch, SupplierAdapter, SupplierRequest};
pub use utils::error::{AggregatorError, Result};
