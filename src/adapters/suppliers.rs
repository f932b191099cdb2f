use crate::domain::model::{HotelOffer, SearchQuery};
use crate::domain::ports::{SupplierAdapter, SupplierRequest};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL and per-call timeout shared by every JSON supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierEndpoint {
    base_url: String,
    timeout: Duration,
}

impl SupplierEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn search_request(&self, query: &SearchQuery) -> SupplierRequest {
        let mut params = vec![
            ("location".to_string(), query.location.clone()),
            (
                "check_in".to_string(),
                query.check_in.format("%Y-%m-%d").to_string(),
            ),
            (
                "check_out".to_string(),
                query.check_out.format("%Y-%m-%d").to_string(),
            ),
        ];

        if let Some(guests) = query.guests {
            params.push(("guests".to_string(), guests.to_string()));
        }
        if let Some(min_price) = query.min_price {
            params.push(("min_price".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = query.max_price {
            params.push(("max_price".to_string(), max_price.to_string()));
        }

        SupplierRequest {
            endpoint: format!("{}/search", self.base_url),
            params,
            timeout: self.timeout,
        }
    }
}

fn number_field(entry: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match entry.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn text_field(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn offer_from_entry(source: &str, entry: &Map<String, Value>) -> HotelOffer {
    let price_per_night = number_field(entry, "price_per_night")
        .filter(|p| *p >= 0.0)
        .unwrap_or(0.0);

    let available_rooms = number_field(entry, "available_rooms")
        .filter(|r| *r >= 0.0)
        .map(|r| r.min(u32::MAX as f64) as u32)
        .unwrap_or(0);

    HotelOffer {
        name: text_field(entry, "name"),
        location: text_field(entry, "location"),
        price_per_night,
        available_rooms,
        rating: number_field(entry, "rating"),
        source: source.to_string(),
    }
}

/// Maps every object under `body[field]` to an offer tagged with `source`.
pub fn map_collection(source: &str, body: &Value, field: &str) -> Vec<HotelOffer> {
    let Some(items) = body.get(field).and_then(Value::as_array) else {
        tracing::warn!(
            supplier = source,
            field,
            "Unrecognized supplier response shape, no '{}' array",
            field
        );
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(entry) => Some(offer_from_entry(source, entry)),
            other => {
                tracing::debug!(supplier = source, "Skipping non-object entry: {}", other);
                None
            }
        })
        .collect()
}

/// Supplier A nests offers under `hotels`.
#[derive(Debug, Clone)]
pub struct SupplierA {
    endpoint: SupplierEndpoint,
}

impl SupplierA {
    pub const NAME: &'static str = "supplier_a";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8001";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            endpoint: SupplierEndpoint::new(base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.timeout = timeout;
        self
    }
}

impl SupplierAdapter for SupplierA {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_request(&self, query: &SearchQuery) -> SupplierRequest {
        self.endpoint.search_request(query)
    }

    fn parse_response(&self, body: &Value) -> Vec<HotelOffer> {
        map_collection(Self::NAME, body, "hotels")
    }
}

/// Supplier B nests offers under `results`.
#[derive(Debug, Clone)]
pub struct SupplierB {
    endpoint: SupplierEndpoint,
}

impl SupplierB {
    pub const NAME: &'static str = "supplier_b";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8002";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            endpoint: SupplierEndpoint::new(base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.timeout = timeout;
        self
    }
}

impl SupplierAdapter for SupplierB {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_request(&self, query: &SearchQuery) -> SupplierRequest {
        self.endpoint.search_request(query)
    }

    fn parse_response(&self, body: &Value) -> Vec<HotelOffer> {
        map_collection(Self::NAME, body, "results")
    }
}

/// Supplier C nests offers under `data`.
#[derive(Debug, Clone)]
pub struct SupplierC {
    endpoint: SupplierEndpoint,
}

impl SupplierC {
    pub const NAME: &'static str = "supplier_c";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8003";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            endpoint: SupplierEndpoint::new(base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.timeout = timeout;
        self
    }
}

impl SupplierAdapter for SupplierC {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_request(&self, query: &SearchQuery) -> SupplierRequest {
        self.endpoint.search_request(query)
    }

    fn parse_response(&self, body: &Value) -> Vec<HotelOffer> {
        map_collection(Self::NAME, body, "data")
    }
}

/// Supplier D nests offers under `items`.
#[derive(Debug, Clone)]
pub struct SupplierD {
    endpoint: SupplierEndpoint,
}

impl SupplierD {
    pub const NAME: &'static str = "supplier_d";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8004";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            endpoint: SupplierEndpoint::new(base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.timeout = timeout;
        self
    }
}

impl SupplierAdapter for SupplierD {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_request(&self, query: &SearchQuery) -> SupplierRequest {
        self.endpoint.search_request(query)
    }

    fn parse_response(&self, body: &Value) -> Vec<HotelOffer> {
        map_collection(Self::NAME, body, "items")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn query() -> SearchQuery {
        SearchQuery::new(
            "New York",
            NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2030, 5, 4).unwrap(),
        )
    }

    fn param<'a>(request: &'a SupplierRequest, key: &str) -> Option<&'a str> {
        request
            .params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_build_request_required_params_only() {
        let adapter = SupplierA::new("http://localhost:8001/");
        let request = adapter.build_request(&query());

        assert_eq!(request.endpoint, "http://localhost:8001/search");
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert_eq!(param(&request, "location"), Some("New York"));
        assert_eq!(param(&request, "check_in"), Some("2030-05-01"));
        assert_eq!(param(&request, "check_out"), Some("2030-05-04"));
        assert_eq!(param(&request, "guests"), None);
        assert_eq!(param(&request, "min_price"), None);
        assert_eq!(param(&request, "max_price"), None);
    }

    #[test]
    fn test_build_request_optional_params_and_timeout() {
        let adapter = SupplierB::new("http://b.example").with_timeout(Duration::from_secs(3));
        let q = query().with_guests(2).with_min_price(100.0).with_max_price(250.5);

        let request = adapter.build_request(&q);

        assert_eq!(request.timeout, Duration::from_secs(3));
        assert_eq!(param(&request, "guests"), Some("2"));
        assert_eq!(param(&request, "min_price"), Some("100"));
        assert_eq!(param(&request, "max_price"), Some("250.5"));
        // same query, same request
        assert_eq!(request, adapter.build_request(&q));
    }

    #[test]
    fn test_each_supplier_reads_its_own_container() {
        let entry = json!({
            "name": "Grand Hotel",
            "location": "New York, USA",
            "price_per_night": 150.0,
            "available_rooms": 3,
            "rating": 4.5
        });

        let a: Box<dyn SupplierAdapter> = Box::new(SupplierA::new(SupplierA::DEFAULT_BASE_URL));
        let b: Box<dyn SupplierAdapter> = Box::new(SupplierB::new(SupplierB::DEFAULT_BASE_URL));
        let c: Box<dyn SupplierAdapter> = Box::new(SupplierC::new(SupplierC::DEFAULT_BASE_URL));
        let d: Box<dyn SupplierAdapter> = Box::new(SupplierD::new(SupplierD::DEFAULT_BASE_URL));
        let adapters = vec![(a, "hotels"), (b, "results"), (c, "data"), (d, "items")];

        for (adapter, field) in &adapters {
            let mut body = serde_json::Map::new();
            body.insert(field.to_string(), json!([entry.clone()]));
            let offers = adapter.parse_response(&Value::Object(body));

            assert_eq!(offers.len(), 1, "{} should read '{}'", adapter.name(), field);
            assert_eq!(offers[0].source, adapter.name());
            assert_eq!(offers[0].price_per_night, 150.0);

            // another supplier's container is not recognized
            let foreign = json!({ "unknown": [entry.clone()] });
            assert!(adapter.parse_response(&foreign).is_empty());
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let adapter = SupplierC::new(SupplierC::DEFAULT_BASE_URL);
        let body = json!({ "data": [ {} ] });

        let offers = adapter.parse_response(&body);

        assert_eq!(
            offers,
            vec![HotelOffer {
                name: String::new(),
                location: String::new(),
                price_per_night: 0.0,
                available_rooms: 0,
                rating: None,
                source: "supplier_c".to_string(),
            }]
        );
    }

    #[test]
    fn test_lenient_numeric_parsing() {
        let adapter = SupplierD::new(SupplierD::DEFAULT_BASE_URL);
        let body = json!({ "items": [
            { "name": "A", "price_per_night": "129.90", "available_rooms": "4", "rating": "4.1" },
            { "name": "B", "price_per_night": "n/a", "available_rooms": 2.7, "rating": null },
            { "name": "C", "price_per_night": -20, "available_rooms": -1 },
            "not an object"
        ]});

        let offers = adapter.parse_response(&body);

        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].price_per_night, 129.90);
        assert_eq!(offers[0].available_rooms, 4);
        assert_eq!(offers[0].rating, Some(4.1));
        assert_eq!(offers[1].price_per_night, 0.0);
        assert_eq!(offers[1].available_rooms, 2);
        assert_eq!(offers[1].rating, None);
        assert_eq!(offers[2].price_per_night, 0.0);
        assert_eq!(offers[2].available_rooms, 0);
    }

    #[test]
    fn test_non_array_container_is_unrecognized() {
        let adapter = SupplierA::new(SupplierA::DEFAULT_BASE_URL);
        assert!(adapter.parse_response(&json!({ "hotels": "none" })).is_empty());
        assert!(adapter.parse_response(&json!([])).is_empty());
        assert!(adapter.parse_response(&Value::Null).is_empty());
    }
}
