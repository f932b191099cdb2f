pub mod engine;

pub use crate::domain::model::{HotelOffer, SearchQuery, SortBy};
pub use crate::domain::ports::{HotelSearch, SupplierAdapter, SupplierRequest};
pub use crate::utils::error::Result;
pub use engine::AggregationEngine;
