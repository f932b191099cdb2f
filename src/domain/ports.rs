use crate::domain::model::{HotelOffer, SearchQuery};
use async_trait::async_trait;
use std::time::Duration;

/// Outgoing call description for one supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

/// Translates between the canonical query/offer shapes and one supplier's wire format.
pub trait SupplierAdapter: Send + Sync {
    /// Identifier stamped on every offer as `source`.
    fn name(&self) -> &str;

    fn build_request(&self, query: &SearchQuery) -> SupplierRequest;

    /// Maps a decoded response body to offers. An unrecognized shape yields
    /// an empty list, never an error.
    fn parse_response(&self, body: &serde_json::Value) -> Vec<HotelOffer>;
}

#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Vec<HotelOffer>;
}
