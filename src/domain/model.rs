use crate::utils::error::{AggregatorError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied to the final result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Ascending price per night.
    #[default]
    #[serde(alias = "pricePerNight")]
    Price,
    /// Descending rating, unrated offers last.
    Rating,
}

impl SortBy {
    /// Lenient parse used for query-string style input: anything unknown is `None`,
    /// which the engine treats as price ordering.
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim() {
            "price" | "pricePerNight" | "price_per_night" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

impl FromStr for SortBy {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_param(s).ok_or_else(|| {
            AggregatorError::validation(
                "sort_by",
                format!("'{}' is not one of: price, pricePerNight, rating", s),
            )
        })
    }
}

/// Search criteria for one aggregation run. Built once at the boundary and
/// only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
}

impl SearchQuery {
    pub fn new(location: impl Into<String>, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            location: location.into(),
            check_in,
            check_out,
            guests: None,
            min_price: None,
            max_price: None,
            sort_by: None,
        }
    }

    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = Some(guests);
        self
    }

    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Effective ordering; unset falls back to price.
    pub fn sort_order(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    /// Applies the request rules against an explicit "today" so callers and
    /// tests control the date rule.
    pub fn validate_on(&self, today: NaiveDate) -> Result<()> {
        validate_non_empty_string("location", &self.location)?;

        if self.check_in < today {
            return Err(AggregatorError::validation(
                "check_in",
                format!("must be today ({}) or later", today),
            ));
        }

        if self.check_out <= self.check_in {
            return Err(AggregatorError::validation(
                "check_out",
                "must be after check_in",
            ));
        }

        if let Some(guests) = self.guests {
            if guests < 1 {
                return Err(AggregatorError::validation("guests", "must be at least 1"));
            }
        }

        if let Some(min_price) = self.min_price {
            validate_non_negative("min_price", min_price)?;
        }

        if let Some(max_price) = self.max_price {
            validate_non_negative("max_price", max_price)?;
            if let Some(min_price) = self.min_price {
                if max_price < min_price {
                    return Err(AggregatorError::validation(
                        "max_price",
                        "must be greater than or equal to min_price",
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<()> {
        self.validate_on(chrono::Local::now().date_naive())
    }
}

/// One normalized hotel offer as produced by a supplier adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub available_rooms: u32,
    pub rating: Option<f64>,
    pub source: String,
}

impl HotelOffer {
    /// Deduplication key: case-folded, trimmed name and location.
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}",
            self.name.trim().to_lowercase(),
            self.location.trim().to_lowercase()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMeta {
    pub total: usize,
    pub filters: SearchQuery,
}

/// Envelope returned to callers of the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<HotelOffer>,
    pub meta: SearchMeta,
}

impl SearchResponse {
    pub fn new(query: SearchQuery, offers: Vec<HotelOffer>) -> Self {
        Self {
            success: true,
            meta: SearchMeta {
                total: offers.len(),
                filters: query,
            },
            data: offers,
        }
    }
}
