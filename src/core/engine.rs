use crate::domain::model::{HotelOffer, SearchQuery, SortBy};
use crate::domain::ports::{HotelSearch, SupplierAdapter, SupplierRequest};
use crate::utils::error::{AggregatorError, Result};
use reqwest::Client;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// What a single supplier contributed to one search.
#[derive(Debug)]
enum FetchOutcome {
    Offers(Vec<HotelOffer>),
    /// The supplier answered but not with something usable (non-2xx).
    Rejected(AggregatorError),
    /// Transport, timeout or body decoding failure.
    Failed(AggregatorError),
}

/// Fans a query out to every configured supplier and reduces the answers to
/// one filtered, deduplicated and ordered offer list.
pub struct AggregationEngine {
    adapters: Vec<Arc<dyn SupplierAdapter>>,
    client: Client,
}

impl AggregationEngine {
    /// Adapters are queried, and ties are broken, in the order given here.
    pub fn new(adapters: Vec<Arc<dyn SupplierAdapter>>) -> Self {
        Self {
            adapters,
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn supplier_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub async fn search(&self, query: &SearchQuery) -> Vec<HotelOffer> {
        let started = Instant::now();

        let fetched = self.fetch_all(query).await;
        let fetched_count = fetched.len();

        let filtered = apply_filters(fetched, query);
        let filtered_count = filtered.len();

        let deduplicated = deduplicate_best_price(filtered);
        let results = sort_offers(deduplicated, query.sort_order());

        tracing::info!(
            execution_time_ms = started.elapsed().as_secs_f64() * 1000.0,
            total_hotels = fetched_count,
            filtered_hotels = filtered_count,
            final_results = results.len(),
            "Hotel search completed"
        );

        results
    }

    /// Spawns one task per adapter and waits for all of them before merging.
    async fn fetch_all(&self, query: &SearchQuery) -> Vec<HotelOffer> {
        let mut handles = Vec::with_capacity(self.adapters.len());

        for adapter in &self.adapters {
            let request = adapter.build_request(query);
            let supplier = adapter.name().to_string();
            let handle = tokio::spawn(fetch_supplier(
                self.client.clone(),
                Arc::clone(adapter),
                request,
            ));
            handles.push((supplier, handle));
        }

        let mut offers = Vec::new();

        for (supplier, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|e| {
                FetchOutcome::Failed(AggregatorError::TaskError {
                    supplier: supplier.clone(),
                    message: e.to_string(),
                })
            });

            match outcome {
                FetchOutcome::Offers(batch) => {
                    tracing::debug!(supplier = %supplier, offers = batch.len(), "Supplier responded");
                    offers.extend(batch);
                }
                FetchOutcome::Rejected(e) => {
                    tracing::warn!(supplier = %supplier, "Supplier request failed: {}", e);
                }
                FetchOutcome::Failed(e) if e.is_timeout() => {
                    tracing::error!(supplier = %supplier, "Supplier request timed out: {}", e);
                }
                FetchOutcome::Failed(e) => {
                    tracing::error!(supplier = %supplier, "Failed to process supplier response: {}", e);
                }
            }
        }

        offers
    }
}

#[async_trait::async_trait]
impl HotelSearch for AggregationEngine {
    async fn search(&self, query: &SearchQuery) -> Vec<HotelOffer> {
        AggregationEngine::search(self, query).await
    }
}

async fn fetch_supplier(
    client: Client,
    adapter: Arc<dyn SupplierAdapter>,
    request: SupplierRequest,
) -> FetchOutcome {
    match fetch_body(&client, adapter.name(), request).await {
        Ok(body) => FetchOutcome::Offers(adapter.parse_response(&body)),
        Err(e @ AggregatorError::SupplierStatusError { .. }) => FetchOutcome::Rejected(e),
        Err(e) => FetchOutcome::Failed(e),
    }
}

async fn fetch_body(
    client: &Client,
    supplier: &str,
    request: SupplierRequest,
) -> Result<serde_json::Value> {
    tracing::debug!(supplier, endpoint = %request.endpoint, "Making supplier request");

    let response = client
        .get(&request.endpoint)
        .query(&request.params)
        .timeout(request.timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AggregatorError::SupplierStatusError {
            supplier: supplier.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json::<serde_json::Value>().await?)
}

fn passes_filters(offer: &HotelOffer, query: &SearchQuery) -> bool {
    if let Some(min_price) = query.min_price {
        if offer.price_per_night < min_price {
            return false;
        }
    }

    if let Some(max_price) = query.max_price {
        if offer.price_per_night > max_price {
            return false;
        }
    }

    offer.available_rooms >= 1
}

/// Drops offers outside the query's price bounds or without a free room.
pub fn apply_filters(offers: Vec<HotelOffer>, query: &SearchQuery) -> Vec<HotelOffer> {
    offers
        .into_iter()
        .filter(|offer| passes_filters(offer, query))
        .collect()
}

/// Keeps the cheapest offer per identity key. On an exact price tie the
/// earlier offer wins, so input order (supplier order) decides.
pub fn deduplicate_best_price(offers: Vec<HotelOffer>) -> Vec<HotelOffer> {
    let mut best: Vec<HotelOffer> = Vec::with_capacity(offers.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for offer in offers {
        match slots.entry(offer.identity_key()) {
            Entry::Occupied(slot) => {
                let current = &mut best[*slot.get()];
                if offer.price_per_night < current.price_per_night {
                    *current = offer;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(best.len());
                best.push(offer);
            }
        }
    }

    best
}

fn compare_rating_desc(a: &HotelOffer, b: &HotelOffer) -> Ordering {
    match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_offers(mut offers: Vec<HotelOffer>, order: SortBy) -> Vec<HotelOffer> {
    match order {
        SortBy::Price => offers.sort_by(|a, b| a.price_per_night.total_cmp(&b.price_per_night)),
        SortBy::Rating => offers.sort_by(compare_rating_desc),
    }
    offers
}
