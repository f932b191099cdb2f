use crate::domain::model::{SearchQuery, SortBy};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "hotel-search")]
#[command(about = "Search hotel availability across all configured suppliers")]
pub struct SearchArgs {
    /// Free-form place name
    #[arg(long)]
    pub location: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: NaiveDate,

    #[arg(long)]
    pub guests: Option<u32>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// price, pricePerNight or rating
    #[arg(long)]
    pub sort_by: Option<SortBy>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Pretty-print the JSON response")]
    pub pretty: bool,
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            location: self.location.clone(),
            check_in: self.check_in,
            check_out: self.check_out,
            guests: self.guests,
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by: self.sort_by,
        }
    }
}
